//! Turn one audio file into a YouTube-ready video.
//!
//! The audio is transcribed with whisper.cpp, the transcript (or a custom
//! prompt) drives AI cover-art generation, and ffmpeg muxes the still image and
//! the audio into an MP4.  See [`pipeline`] for the orchestration.

pub mod art;
pub mod cli;
pub mod config;
pub mod pipeline;
pub mod process;
pub mod render;
pub mod stt;
