use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::MediaConfig;
use crate::error::{ConvertError, Result};
use crate::media::{parse_duration, CommandRunner, MediaCommand, MediaCommandBuilder, VideoStyle};

/// One audio file to turn into a video
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub style: VideoStyle,
}

impl ConversionRequest {
    pub fn new<P: Into<PathBuf>>(input: P, style: VideoStyle) -> Self {
        Self {
            input: input.into(),
            output: None,
            style,
        }
    }

    pub fn with_output<P: Into<PathBuf>>(mut self, output: P) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Explicit output as given, otherwise the input with its extension swapped
    pub fn output_path(&self, target_extension: &str) -> PathBuf {
        match &self.output {
            Some(output) => output.clone(),
            None => self.input.with_extension(target_extension),
        }
    }
}

/// Probe-then-encode pipeline for a single file
pub struct Converter {
    runner: Box<dyn CommandRunner>,
    commands: MediaCommandBuilder,
    target_extension: String,
}

impl Converter {
    pub fn new<S: Into<String>>(
        config: MediaConfig,
        target_extension: S,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            runner,
            commands: MediaCommandBuilder::new(config),
            target_extension: target_extension.into(),
        }
    }

    pub fn target_extension(&self) -> &str {
        &self.target_extension
    }

    /// Check that ffmpeg and ffprobe respond, returning ffmpeg's version line
    pub async fn check_availability(&self) -> Result<String> {
        let version = self.check_tool(self.commands.version_check()).await?;
        self.check_tool(self.commands.probe_version_check()).await?;

        let first_line = version.lines().next().unwrap_or("Unknown version").to_string();
        info!("Media processor is available: {}", first_line);
        Ok(first_line)
    }

    async fn check_tool(&self, command: MediaCommand) -> Result<String> {
        let output = self.runner.run(&command).await.map_err(|e| {
            ConvertError::ToolchainUnavailable(format!("{} not found: {}", command.binary_path, e))
        })?;

        if !output.success {
            return Err(ConvertError::ToolchainUnavailable(format!(
                "{} version check failed",
                command.binary_path
            )));
        }

        Ok(output.stdout)
    }

    /// Duration of the audio file in seconds, as reported by ffprobe
    pub async fn probe_duration(&self, input: &Path) -> Result<f64> {
        let command = self.commands.probe_format(input);

        let output = self.runner.run(&command).await.map_err(|e| {
            ConvertError::DurationUnavailable(format!("Failed to execute ffprobe: {}", e))
        })?;

        if !output.success {
            return Err(ConvertError::DurationUnavailable(format!(
                "ffprobe failed: {}",
                output.stderr.trim()
            )));
        }

        let duration = parse_duration(&output.stdout)?;
        debug!("Probed duration of {}: {}s", input.display(), duration);
        Ok(duration)
    }

    /// Convert one file, returning the path that was written.
    ///
    /// An existing file at the output path is overwritten.
    pub async fn convert(&self, request: &ConversionRequest) -> Result<PathBuf> {
        if !request.input.exists() {
            return Err(ConvertError::InputMissing(request.input.display().to_string()));
        }

        let output_path = request.output_path(&self.target_extension);
        let duration = self.probe_duration(&request.input).await?;

        info!("Converting '{}' to '{}'...", request.input.display(), output_path.display());
        info!("Audio duration: {:.2} seconds", duration);
        info!("Video resolution: {}", request.style.resolution);
        info!("Background color: {}", request.style.color);

        let command = self.commands.solid_color_video(
            &request.input,
            &output_path,
            &request.style,
            duration,
        );

        let output = self.runner.run(&command).await.map_err(|e| {
            ConvertError::EncodeFailed(format!("Failed to execute ffmpeg: {}", e))
        })?;

        if !output.success {
            warn!("{} failed for {}", command.description, request.input.display());
            return Err(ConvertError::EncodeFailed(output.stderr.trim().to_string()));
        }

        info!("Successfully converted to '{}'", output_path.display());
        Ok(output_path)
    }
}
