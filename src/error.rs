use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("FFmpeg is not installed or not available in PATH: {0}")]
    ToolchainUnavailable(String),

    #[error("Input file '{0}' does not exist")]
    InputMissing(String),

    #[error("Input directory '{0}' does not exist")]
    DirectoryMissing(String),

    #[error("Could not determine audio duration: {0}")]
    DurationUnavailable(String),

    #[error("Error during conversion: {0}")]
    EncodeFailed(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Shown to the user when the toolchain check fails
pub const INSTALL_GUIDANCE: &str = "\
Please install FFmpeg: https://ffmpeg.org/download.html
On macOS: brew install ffmpeg
On Ubuntu/Debian: sudo apt install ffmpeg
On Windows: Download from https://ffmpeg.org/download.html";
