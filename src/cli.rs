use clap::Parser;
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  m4a2mp4 input.m4a
  m4a2mp4 input.m4a -o output.mp4
  m4a2mp4 -d /path/to/m4a/files
  m4a2mp4 -d /path/to/m4a/files -o /path/to/output
  m4a2mp4 input.m4a --color white --resolution 1280x720";

/// Color names shown by `--list-colors`; ffmpeg accepts many more
pub const COLOR_NAMES: [&str; 10] = [
    "black", "white", "red", "green", "blue", "yellow", "cyan", "magenta", "gray", "grey",
];

/// Convert M4A audio files to MP4 video files with a blank video component for YouTube upload
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None, after_help = EXAMPLES)]
pub struct Args {
    /// Input M4A file
    pub input: Option<PathBuf>,

    /// Output MP4 file, or output directory in batch mode
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory containing M4A files for batch conversion
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Background color for the video [default: black]
    #[arg(long)]
    pub color: Option<String>,

    /// Video resolution [default: 1920x1080]
    #[arg(long)]
    pub resolution: Option<String>,

    /// List available color names and exit
    #[arg(long)]
    pub list_colors: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub show_config: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
