use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use crate::config::MediaConfig;

/// Abstract media processing command representation
///
/// Arguments are kept as `OsString` so file names reach the tool byte for byte.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaCommand {
    pub binary_path: String,
    pub args: Vec<OsString>,
    pub description: String,
}

impl MediaCommand {
    /// Create a new media processing command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref())
    }

    /// Add a libavfilter virtual input (e.g. a `color=` source)
    pub fn lavfi_input<S: Into<OsString>>(self, graph: S) -> Self {
        self.arg("-f").arg("lavfi").arg("-i").arg(graph)
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Set video codec
    pub fn video_codec<S: Into<OsString>>(self, codec: S) -> Self {
        self.arg("-c:v").arg(codec)
    }

    /// Set audio codec
    pub fn audio_codec<S: Into<OsString>>(self, codec: S) -> Self {
        self.arg("-c:a").arg(codec)
    }

    /// Stop writing when the shortest input ends
    pub fn shortest(self) -> Self {
        self.arg("-shortest")
    }
}

#[cfg(test)]
impl MediaCommand {
    pub(crate) fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    pub(crate) fn arg_value(&self, flag: &str) -> Option<&std::ffi::OsStr> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(OsString::as_os_str)
    }
}

impl fmt::Display for MediaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary_path)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Parameters of the generated video track
#[derive(Debug, Clone, PartialEq)]
pub struct VideoStyle {
    pub color: String,
    pub resolution: String,
}

/// Builder for the ffmpeg/ffprobe invocations used by the converter
pub struct MediaCommandBuilder {
    config: MediaConfig,
}

impl MediaCommandBuilder {
    /// Create a new command builder
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Build ffmpeg version check command
    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.config.ffmpeg_path, "Version check")
            .arg("-version")
    }

    /// Build ffprobe version check command
    pub fn probe_version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.config.ffprobe_path, "Probe version check")
            .arg("-version")
    }

    /// Build container metadata probe, printed as JSON on stdout
    pub fn probe_format<P: AsRef<Path>>(&self, input_path: P) -> MediaCommand {
        MediaCommand::new(&self.config.ffprobe_path, "Duration probe")
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(input_path.as_ref())
    }

    /// Build the encode muxing a solid color video track with the source audio
    pub fn solid_color_video<P: AsRef<Path>>(
        &self,
        audio_path: P,
        output_path: P,
        style: &VideoStyle,
        duration_secs: f64,
    ) -> MediaCommand {
        let source = format!(
            "color=c={}:size={}:duration={}",
            style.color, style.resolution, duration_secs
        );

        MediaCommand::new(&self.config.ffmpeg_path, "Solid color video encoding")
            .lavfi_input(source)
            .input(audio_path)
            .video_codec(&self.config.video_codec)
            .audio_codec(&self.config.audio_codec)
            .args(self.config.extra_args.iter())
            .shortest()
            .overwrite()
            .output(output_path)
    }
}
