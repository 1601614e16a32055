//! Subburn - Video Subtitle Translation
//!
//! Extracts the audio track of a video with ffmpeg, translates the speech to
//! English with Whisper, writes the result as SRT cues and burns them back
//! into a copy of the video.

pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod subtitle;
pub mod transcribe;
pub mod workflow;
