//! m4a2mp4 - Audio to Video Converter
//!
//! Turns audio files into video files by muxing the original audio with a
//! generated solid-color video track, using ffmpeg and ffprobe.

pub mod cli;
pub mod config;
pub mod converter;
pub mod workflow;
pub mod media;
pub mod error;
