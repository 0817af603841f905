use std::fmt;
use std::path::{Path, PathBuf};
use clap::CommandFactory;
use tokio::fs;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::cli::{Args, COLOR_NAMES};
use crate::config::Config;
use crate::converter::{ConversionRequest, Converter};
use crate::error::{ConvertError, Result};
use crate::media::{CommandRunner, VideoStyle};

/// Outcome counts of a directory run
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub successful: usize,
    pub failed: usize,
    pub output_dir: PathBuf,
}

impl BatchSummary {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            successful: 0,
            failed: 0,
            output_dir,
        }
    }

    pub fn attempted(&self) -> usize {
        self.successful + self.failed
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📊 Conversion Summary:")?;
        writeln!(f, "✅ Successful: {}", self.successful)?;
        writeln!(f, "❌ Failed: {}", self.failed)?;
        write!(f, "📁 Output directory: {}", self.output_dir.display())
    }
}

pub struct Workflow {
    config: Config,
    converter: Converter,
}

impl Workflow {
    pub fn new(config: Config, runner: Box<dyn CommandRunner>) -> Self {
        let converter = Converter::new(
            config.media.clone(),
            config.batch.target_extension.clone(),
            runner,
        );

        Self { config, converter }
    }

    /// Dispatch parsed arguments. `Ok` maps to exit status 0.
    pub async fn run(&self, args: &Args) -> Result<()> {
        if args.list_colors {
            println!("Available color names:");
            for color in COLOR_NAMES {
                println!("  - {}", color);
            }
            return Ok(());
        }

        if args.show_config {
            print!("{}", self.config.to_toml_string()?);
            return Ok(());
        }

        if args.directory.is_none() && args.input.is_none() {
            Args::command().print_help()?;
            return Ok(());
        }

        self.converter.check_availability().await?;

        let style = self.video_style(args);

        if let Some(directory) = &args.directory {
            let summary = self
                .process_directory(directory, args.output.as_deref(), &style)
                .await?;
            if summary.attempted() > 0 {
                println!("\n{}", summary);
            }
            return Ok(());
        }

        if let Some(input) = &args.input {
            let output = self
                .process_single_file(input, args.output.as_deref(), &style)
                .await?;
            println!("✅ Successfully converted to '{}'", output.display());
        }

        Ok(())
    }

    /// Command line values win over the configuration file
    pub fn video_style(&self, args: &Args) -> VideoStyle {
        VideoStyle {
            color: args
                .color
                .clone()
                .unwrap_or_else(|| self.config.video.color.clone()),
            resolution: args
                .resolution
                .clone()
                .unwrap_or_else(|| self.config.video.resolution.clone()),
        }
    }

    /// Convert a single audio file
    pub async fn process_single_file(
        &self,
        input_path: &Path,
        output_path: Option<&Path>,
        style: &VideoStyle,
    ) -> Result<PathBuf> {
        info!("Processing single file: {}", input_path.display());

        let mut request = ConversionRequest::new(input_path, style.clone());
        if let Some(output) = output_path {
            request = request.with_output(output);
        }

        self.converter.convert(&request).await
    }

    /// Convert every matching file directly inside `input_dir`, one at a time.
    /// A failed file is counted and the batch moves on.
    pub async fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: Option<&Path>,
        style: &VideoStyle,
    ) -> Result<BatchSummary> {
        info!("Processing directory: {}", input_dir.display());

        if !input_dir.is_dir() {
            return Err(ConvertError::DirectoryMissing(input_dir.display().to_string()));
        }

        let output_dir = match output_dir {
            Some(dir) => {
                fs::create_dir_all(dir).await?;
                dir.to_path_buf()
            }
            None => input_dir.to_path_buf(),
        };

        let source_extension = &self.config.batch.source_extension;
        let audio_files = self.find_source_files(input_dir)?;
        let mut summary = BatchSummary::new(output_dir.clone());

        if audio_files.is_empty() {
            println!(
                "No {} files found in '{}'",
                source_extension.to_uppercase(),
                input_dir.display()
            );
            return Ok(summary);
        }

        println!(
            "Found {} {} files to convert...",
            audio_files.len(),
            source_extension.to_uppercase()
        );

        for audio_path in audio_files {
            let file_name = audio_path.file_name().unwrap_or_default().to_string_lossy();
            let mut output_name = audio_path.file_stem().unwrap_or_default().to_os_string();
            output_name.push(".");
            output_name.push(self.converter.target_extension());
            let output_path = output_dir.join(output_name);

            println!("\n--- Converting: {} ---", file_name);

            let request = ConversionRequest::new(&audio_path, style.clone()).with_output(output_path);
            match self.converter.convert(&request).await {
                Ok(path) => {
                    println!("✅ Successfully converted to '{}'", path.display());
                    summary.successful += 1;
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", audio_path.display(), e);
                    println!("❌ {}", e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Batch finished: {} successful, {} failed",
            summary.successful, summary.failed
        );
        Ok(summary)
    }

    /// Regular files directly inside `dir` with the source extension, sorted by name.
    /// Fails if `dir` itself cannot be listed; unreadable entries are skipped with a warning.
    fn find_source_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let extension = &self.config.batch.source_extension;
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(ConvertError::Io(e.into())),
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            let path = entry.path();
            let matches = path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));

            if matches {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{CommandOutput, MediaCommand, MockCommandRunner};
    use assert_fs::prelude::*;
    use clap::Parser;
    use std::sync::{Arc, Mutex};

    const PROBE_JSON: &str = r#"{ "format": { "duration": "31.5" } }"#;

    fn style() -> VideoStyle {
        VideoStyle {
            color: "black".to_string(),
            resolution: "1920x1080".to_string(),
        }
    }

    fn is_probe(cmd: &MediaCommand) -> bool {
        cmd.binary_path == "ffprobe" && cmd.has_arg("-show_format")
    }

    fn is_encode(cmd: &MediaCommand) -> bool {
        cmd.binary_path == "ffmpeg" && cmd.has_arg("-shortest")
    }

    fn is_version(cmd: &MediaCommand) -> bool {
        cmd.args == ["-version"]
    }

    /// File name of the audio input (the second `-i`) of an encode command
    fn encode_input(cmd: &MediaCommand) -> Option<String> {
        cmd.args
            .iter()
            .enumerate()
            .filter(|(_, a)| a.as_os_str() == "-i")
            .nth(1)
            .and_then(|(i, _)| cmd.args.get(i + 1))
            .and_then(|p| Path::new(p).file_name().map(|n| n.to_string_lossy().to_string()))
    }

    fn workflow(mock: MockCommandRunner) -> Workflow {
        Workflow::new(Config::default(), Box::new(mock))
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let temp = assert_fs::TempDir::new().unwrap();
        for name in ["a.m4a", "b.m4a", "c.M4A", "notes.txt", "cover.jpg", "b.mp4"] {
            temp.child(name).touch().unwrap();
        }
        temp.child("nested").child("d.m4a").touch().unwrap();
        let out = temp.child("videos");

        let probed = Arc::new(Mutex::new(Vec::new()));
        let recorder = probed.clone();

        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .withf(is_probe)
            .times(3)
            .returning(move |cmd| {
                let name = Path::new(cmd.args.last().unwrap())
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .to_string();
                recorder.lock().unwrap().push(name);
                Ok(CommandOutput::ok(PROBE_JSON))
            });
        mock.expect_run()
            .withf(|cmd| is_encode(cmd) && encode_input(cmd).as_deref() == Some("a.m4a"))
            .times(1)
            .returning(|_| Ok(CommandOutput::failed("a.m4a: Invalid data found when processing input")));
        mock.expect_run()
            .withf(|cmd| is_encode(cmd) && encode_input(cmd).as_deref() != Some("a.m4a"))
            .times(2)
            .returning(|_| Ok(CommandOutput::ok("")));

        let summary = workflow(mock)
            .process_directory(temp.path(), Some(out.path()), &style())
            .await
            .unwrap();

        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.attempted(), 3);
        assert_eq!(summary.output_dir, out.path());
        assert!(out.path().is_dir());
        assert_eq!(*probed.lock().unwrap(), vec!["a.m4a", "b.m4a", "c.M4A"]);
    }

    #[tokio::test]
    async fn test_batch_output_paths() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("episode 1.m4a").touch().unwrap();
        let expected = temp.path().join("episode 1.mp4").into_os_string();

        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .withf(is_probe)
            .returning(|_| Ok(CommandOutput::ok(PROBE_JSON)));
        mock.expect_run()
            .withf(move |cmd| is_encode(cmd) && cmd.args.last() == Some(&expected))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));

        let summary = workflow(mock)
            .process_directory(temp.path(), None, &style())
            .await
            .unwrap();

        assert_eq!(summary.successful, 1);
        assert_eq!(summary.output_dir, temp.path());
    }

    #[tokio::test]
    async fn test_batch_without_matches() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("readme.txt").touch().unwrap();

        let mut mock = MockCommandRunner::new();
        mock.expect_run().never();

        let summary = workflow(mock)
            .process_directory(temp.path(), None, &style())
            .await
            .unwrap();

        assert_eq!(summary.attempted(), 0);
    }

    #[tokio::test]
    async fn test_batch_missing_directory() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run().never();

        let err = workflow(mock)
            .process_directory(Path::new("/nonexistent/podcasts"), None, &style())
            .await
            .unwrap_err();

        assert!(matches!(err, ConvertError::DirectoryMissing(_)));
    }

    #[tokio::test]
    async fn test_batch_uses_configured_extensions() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("take.wav").touch().unwrap();
        temp.child("take.m4a").touch().unwrap();
        let expected = temp.path().join("take.mkv").into_os_string();

        let mut config = Config::default();
        config.batch.source_extension = "wav".to_string();
        config.batch.target_extension = "mkv".to_string();

        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .withf(is_probe)
            .times(1)
            .returning(|_| Ok(CommandOutput::ok(PROBE_JSON)));
        mock.expect_run()
            .withf(move |cmd| is_encode(cmd) && cmd.args.last() == Some(&expected))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));

        let summary = Workflow::new(config, Box::new(mock))
            .process_directory(temp.path(), None, &style())
            .await
            .unwrap();

        assert_eq!(summary.successful, 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_batch_keeps_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = assert_fs::TempDir::new().unwrap();
        let input = temp.path().join(OsStr::from_bytes(b"caf\xe9.m4a"));
        std::fs::write(&input, b"").unwrap();

        let probe_input = input.clone().into_os_string();
        let encode_input = input.clone().into_os_string();
        let output = temp.path().join(OsStr::from_bytes(b"caf\xe9.mp4")).into_os_string();

        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .withf(move |cmd| is_probe(cmd) && cmd.args.last() == Some(&probe_input))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok(PROBE_JSON)));
        mock.expect_run()
            .withf(move |cmd| {
                is_encode(cmd) && cmd.args.contains(&encode_input) && cmd.args.last() == Some(&output)
            })
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));

        let summary = workflow(mock)
            .process_directory(temp.path(), None, &style())
            .await
            .unwrap();

        assert_eq!(summary.successful, 1);
        assert_eq!(summary.failed, 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_directory_is_error() {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;

        let temp = assert_fs::TempDir::new().unwrap();
        let locked = temp.child("locked");
        locked.create_dir_all().unwrap();
        locked.child("a.m4a").touch().unwrap();
        std::fs::set_permissions(locked.path(), Permissions::from_mode(0o000)).unwrap();

        // Privileged users can list it regardless of mode
        if std::fs::read_dir(locked.path()).is_ok() {
            std::fs::set_permissions(locked.path(), Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let mut mock = MockCommandRunner::new();
        mock.expect_run().never();

        let result = workflow(mock)
            .process_directory(locked.path(), None, &style())
            .await;
        std::fs::set_permissions(locked.path(), Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(ConvertError::Io(_))));
    }

    #[tokio::test]
    async fn test_no_arguments_prints_help_without_tools() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run().never();

        let args = Args::parse_from(["m4a2mp4"]);
        workflow(mock).run(&args).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_colors_touches_no_tools() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run().never();

        let args = Args::parse_from(["m4a2mp4", "--list-colors", "song.m4a"]);
        workflow(mock).run(&args).await.unwrap();
    }

    #[tokio::test]
    async fn test_show_config_touches_no_tools() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run().never();

        let args = Args::parse_from(["m4a2mp4", "--show-config"]);
        workflow(mock).run(&args).await.unwrap();
    }

    #[tokio::test]
    async fn test_unavailable_toolchain_stops_run() {
        let temp = assert_fs::TempDir::new().unwrap();
        let input = temp.child("song.m4a");
        input.touch().unwrap();

        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .withf(is_version)
            .times(1)
            .returning(|_| Err(ConvertError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"))));
        mock.expect_run().withf(is_probe).never();
        mock.expect_run().withf(is_encode).never();

        let args = Args::parse_from(["m4a2mp4".into(), input.path().as_os_str().to_owned()]);
        let err = workflow(mock).run(&args).await.unwrap_err();

        assert!(matches!(err, ConvertError::ToolchainUnavailable(_)));
    }

    #[tokio::test]
    async fn test_single_file_run() {
        let temp = assert_fs::TempDir::new().unwrap();
        let input = temp.child("song.m4a");
        input.touch().unwrap();

        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .withf(is_version)
            .times(2)
            .returning(|_| Ok(CommandOutput::ok("ffmpeg version 6.1.1")));
        mock.expect_run()
            .withf(is_probe)
            .times(1)
            .returning(|_| Ok(CommandOutput::ok(PROBE_JSON)));
        mock.expect_run()
            .withf(|cmd| {
                is_encode(cmd)
                    && cmd.has_arg("color=c=white:size=1280x720:duration=31.5")
            })
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));

        let args = Args::parse_from([
            "m4a2mp4".into(),
            input.path().as_os_str().to_owned(),
            "--color".into(),
            "white".into(),
            "--resolution".into(),
            "1280x720".into(),
        ]);
        workflow(mock).run(&args).await.unwrap();
    }

    #[tokio::test]
    async fn test_single_file_missing_input() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .withf(is_version)
            .returning(|_| Ok(CommandOutput::ok("ffmpeg version 6.1.1")));
        mock.expect_run().withf(is_probe).never();
        mock.expect_run().withf(is_encode).never();

        let args = Args::parse_from(["m4a2mp4", "/nonexistent/song.m4a"]);
        let err = workflow(mock).run(&args).await.unwrap_err();

        assert!(matches!(err, ConvertError::InputMissing(_)));
    }

    #[test]
    fn test_video_style_prefers_cli() {
        let mut config = Config::default();
        config.video.color = "0x336699".to_string();
        config.video.resolution = "1280x720".to_string();
        let workflow = Workflow::new(config, Box::new(MockCommandRunner::new()));

        let args = Args::parse_from(["m4a2mp4", "--resolution", "640x360"]);
        let style = workflow.video_style(&args);

        assert_eq!(style.color, "0x336699");
        assert_eq!(style.resolution, "640x360");
    }

    #[test]
    fn test_summary_display() {
        let summary = BatchSummary {
            successful: 4,
            failed: 1,
            output_dir: PathBuf::from("videos"),
        };

        let text = summary.to_string();
        assert!(text.contains("Successful: 4"));
        assert!(text.contains("Failed: 1"));
        assert!(text.contains("Output directory: videos"));
    }
}
