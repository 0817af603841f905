use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, ConvertError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub media: MediaConfig,
    pub video: VideoConfig,
    pub batch: BatchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub ffmpeg_path: String,
    /// Path to ffprobe binary
    pub ffprobe_path: String,
    /// Codec for the generated video stream
    pub video_codec: String,
    /// Codec the source audio is re-encoded with
    pub audio_codec: String,
    /// Additional encoding options, inserted after the codec options
    /// Common options: ["-preset", "medium", "-tune", "stillimage", "-pix_fmt", "yuv420p"]
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Background color name or value understood by ffmpeg (e.g. "black", "0x336699")
    pub color: String,
    /// Video resolution as WIDTHxHEIGHT
    pub resolution: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Extension of the audio files picked up in batch mode
    pub source_extension: String,
    /// Extension of the produced container files
    pub target_extension: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for a daily rotated log file. Console only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            color: "black".to_string(),
            resolution: "1920x1080".to_string(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            source_extension: "m4a".to_string(),
            target_extension: "mp4".to_string(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConvertError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)?;

        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConvertError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Only checks what would break path handling; color and resolution are left to ffmpeg
    fn validate(&self) -> Result<()> {
        for (name, ext) in [
            ("batch.source_extension", &self.batch.source_extension),
            ("batch.target_extension", &self.batch.target_extension),
        ] {
            if ext.is_empty() || ext.contains(['.', '/', '\\']) {
                return Err(ConvertError::Config(format!(
                    "Invalid {} '{}': expected a bare extension such as \"mp4\"",
                    name, ext
                )));
            }
        }
        Ok(())
    }
}
