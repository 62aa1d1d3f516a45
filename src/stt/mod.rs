//! Transcription collaborator.
//!
//! # Architecture
//!
//! ```text
//! audio file ──▶ ffmpeg (16 kHz mono WAV, temp file)
//!                   │
//!                   ▼
//!              whisper-cli --output-txt ──▶ <audio stem>.txt
//! ```
//!
//! The temporary WAV lives only for the duration of one
//! [`Transcriber::transcribe`] call.

pub mod engine;

pub use engine::{transcript_path_for, SttError, Transcriber, WhisperCliTranscriber};
