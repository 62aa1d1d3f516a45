//! Core transcriber trait and the whisper.cpp implementation.
//!
//! # Overview
//!
//! [`Transcriber`] is the interface the pipeline uses.  It is object-safe and
//! `Send + Sync` so it can be held behind an `Arc<dyn Transcriber>`.
//!
//! [`WhisperCliTranscriber`] is the production implementation.  It shells out
//! twice: ffmpeg converts the input to 16 kHz mono PCM WAV, then `whisper-cli`
//! writes the transcript next to the source audio.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::config::SttConfig;
use crate::process::{self, until_interrupted, CommandRunner, ProcessError};

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// All errors that can arise from the transcription collaborator.
#[derive(Debug, Error)]
pub enum SttError {
    /// The `whisper-cli` executable does not exist.
    #[error("Whisper executable not found at {0}")]
    BinaryNotFound(String),

    /// The GGML model file does not exist.
    #[error("Whisper model not found at {0}")]
    ModelNotFound(String),

    /// The source audio could not be resolved.
    #[error("audio file not found: {0}")]
    AudioNotFound(String),

    /// The temporary WAV could not be created.
    #[error("could not create temporary WAV: {0}")]
    TempFile(#[source] std::io::Error),

    /// ffmpeg failed while converting the source to WAV.
    #[error("audio conversion failed: {0}")]
    Conversion(#[source] ProcessError),

    /// whisper-cli failed.
    #[error("transcription failed: {0}")]
    Transcription(#[source] ProcessError),

    /// whisper-cli exited cleanly but left no transcript behind.
    #[error("whisper-cli produced no transcript at {0}")]
    MissingOutput(String),

    /// Ctrl-C arrived while a subprocess was running.
    #[error("transcription interrupted")]
    Interrupted,
}

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Turns an audio file into a transcript file.
///
/// # Contract
///
/// - `audio` must exist.
/// - On success the returned path points at a UTF-8 text file holding the
///   transcript.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe `audio` and return the path of the written transcript.
    async fn transcribe(&self, audio: &Path) -> Result<PathBuf, SttError>;
}

// Compile-time assertion: Box<dyn Transcriber> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Transcriber>) {}
};

/// Sibling `.txt` path that whisper-cli writes for `audio`.
pub fn transcript_path_for(audio: &Path) -> PathBuf {
    audio.with_extension("txt")
}

// ---------------------------------------------------------------------------
// WhisperCliTranscriber
// ---------------------------------------------------------------------------

/// Production transcriber backed by a local whisper.cpp build.
#[derive(Debug, Clone)]
pub struct WhisperCliTranscriber {
    whisper: CommandRunner,
    ffmpeg: CommandRunner,
    model_path: PathBuf,
    sample_rate: u32,
}

impl WhisperCliTranscriber {
    pub fn from_config(config: &SttConfig) -> Self {
        Self {
            whisper: CommandRunner::new(&config.whisper_binary),
            ffmpeg: CommandRunner::new(&config.ffmpeg_binary),
            model_path: config.model_path.clone(),
            sample_rate: config.sample_rate,
        }
    }

    /// Fail fast when the binary or the model is missing.
    fn check_installation(&self) -> Result<(), SttError> {
        if !self.whisper.program().exists() {
            return Err(SttError::BinaryNotFound(
                self.whisper.program().display().to_string(),
            ));
        }
        if !self.model_path.exists() {
            return Err(SttError::ModelNotFound(self.model_path.display().to_string()));
        }
        Ok(())
    }

    async fn run(&self, audio: &Path) -> Result<PathBuf, SttError> {
        self.check_installation()?;

        let audio = tokio::fs::canonicalize(audio)
            .await
            .map_err(|_| SttError::AudioNotFound(audio.display().to_string()))?;
        let output_path = transcript_path_for(&audio);

        // Removed when dropped: on return, on `?`, and when the caller drops
        // this future on Ctrl-C.
        let wav = tempfile::Builder::new()
            .prefix("audio-to-video-")
            .suffix(".wav")
            .tempfile()
            .map_err(SttError::TempFile)?;

        self.convert_to_wav(&audio, &wav).await?;

        log::info!("stt: starting transcription of {}", audio.display());
        let stem = output_path.with_extension("");
        let out = self
            .whisper
            .run([
                OsStr::new("--model"),
                self.model_path.as_os_str(),
                OsStr::new("--file"),
                wav.path().as_os_str(),
                OsStr::new("--output-txt"),
                OsStr::new("--output-file"),
                stem.as_os_str(),
            ])
            .await
            .map_err(SttError::Transcription)?;
        log::debug!("whisper-cli output:\n{}", out.stdout);

        if !output_path.exists() {
            return Err(SttError::MissingOutput(output_path.display().to_string()));
        }

        log::info!("stt: transcript saved to {}", output_path.display());
        Ok(output_path)
    }

    async fn convert_to_wav(&self, audio: &Path, wav: &NamedTempFile) -> Result<(), SttError> {
        log::info!("stt: converting {} to WAV", audio.display());
        let rate = self.sample_rate.to_string();
        self.ffmpeg
            .run([
                OsStr::new("-i"),
                audio.as_os_str(),
                OsStr::new("-ar"),
                OsStr::new(&rate),
                OsStr::new("-ac"),
                OsStr::new("1"),
                OsStr::new("-c:a"),
                OsStr::new("pcm_s16le"),
                wav.path().as_os_str(),
                OsStr::new("-y"),
            ])
            .await
            .map_err(SttError::Conversion)?;
        Ok(())
    }
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(&self, audio: &Path) -> Result<PathBuf, SttError> {
        match until_interrupted(self.run(audio), process::ctrl_c()).await {
            Some(result) => result,
            None => {
                log::warn!("stt: interrupted, temporary files removed");
                Err(SttError::Interrupted)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_in(dir: &Path) -> SttConfig {
        SttConfig {
            whisper_binary: dir.join("whisper-cli"),
            model_path: dir.join("ggml-tiny.en.bin"),
            ffmpeg_binary: PathBuf::from("ffmpeg"),
            sample_rate: 16_000,
        }
    }

    #[test]
    fn transcript_path_is_sibling_txt() {
        assert_eq!(
            transcript_path_for(Path::new("data/podcast.wav")),
            PathBuf::from("data/podcast.txt")
        );
        assert_eq!(
            transcript_path_for(Path::new("episode.final.m4a")),
            PathBuf::from("episode.final.txt")
        );
    }

    #[tokio::test]
    async fn missing_binary_is_reported_first() {
        let dir = tempdir().unwrap();
        let audio = dir.path().join("a.wav");
        std::fs::write(&audio, b"RIFF").unwrap();

        let stt = WhisperCliTranscriber::from_config(&config_in(dir.path()));
        let err = stt.transcribe(&audio).await.unwrap_err();
        assert!(matches!(err, SttError::BinaryNotFound(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn missing_model_is_reported() {
        let dir = tempdir().unwrap();
        let cfg = config_in(dir.path());
        std::fs::write(&cfg.whisper_binary, b"").unwrap();
        let audio = dir.path().join("a.wav");
        std::fs::write(&audio, b"RIFF").unwrap();

        let stt = WhisperCliTranscriber::from_config(&cfg);
        let err = stt.transcribe(&audio).await.unwrap_err();
        assert!(matches!(err, SttError::ModelNotFound(_)), "got {err:?}");
        assert!(err.to_string().contains("ggml-tiny.en.bin"));
    }

    #[tokio::test]
    async fn missing_audio_is_reported() {
        let dir = tempdir().unwrap();
        let cfg = config_in(dir.path());
        std::fs::write(&cfg.whisper_binary, b"").unwrap();
        std::fs::write(&cfg.model_path, b"").unwrap();

        let stt = WhisperCliTranscriber::from_config(&cfg);
        let err = stt
            .transcribe(&dir.path().join("nope.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, SttError::AudioNotFound(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn failed_conversion_is_conversion_error() {
        let dir = tempdir().unwrap();
        let mut cfg = config_in(dir.path());
        std::fs::write(&cfg.whisper_binary, b"").unwrap();
        std::fs::write(&cfg.model_path, b"").unwrap();
        cfg.ffmpeg_binary = dir.path().join("no-ffmpeg-here");
        let audio = dir.path().join("a.wav");
        std::fs::write(&audio, b"RIFF").unwrap();

        let stt = WhisperCliTranscriber::from_config(&cfg);
        let err = stt.transcribe(&audio).await.unwrap_err();
        assert!(matches!(err, SttError::Conversion(_)), "got {err:?}");
    }

    /// Write an executable `sh` script into `dir`.
    #[cfg(unix)]
    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Stand-in ffmpeg: records the WAV path it was given, writes to it, and
    /// exits with `code`.
    #[cfg(unix)]
    fn fake_ffmpeg(dir: &Path, record: &Path, code: i32) -> PathBuf {
        let body = format!(
            "printf '%s' \"$9\" > '{}'\necho RIFF > \"$9\"\nexit {code}",
            record.display()
        );
        script(dir, "ffmpeg", &body)
    }

    #[cfg(unix)]
    fn recorded_wav(record: &Path) -> PathBuf {
        PathBuf::from(std::fs::read_to_string(record).unwrap())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_whisper_run_removes_temp_wav() {
        let dir = tempdir().unwrap();
        let record = dir.path().join("wav-path");
        let mut cfg = config_in(dir.path());
        cfg.ffmpeg_binary = fake_ffmpeg(dir.path(), &record, 0);
        cfg.whisper_binary = script(dir.path(), "whisper-cli", "echo fail >&2\nexit 2");
        std::fs::write(&cfg.model_path, b"").unwrap();
        let audio = dir.path().join("a.m4a");
        std::fs::write(&audio, b"audio").unwrap();

        let stt = WhisperCliTranscriber::from_config(&cfg);
        let err = stt.transcribe(&audio).await.unwrap_err();
        match &err {
            SttError::Transcription(ProcessError::Exit { stderr, .. }) => {
                assert_eq!(stderr, "fail")
            }
            other => panic!("expected Transcription, got {other:?}"),
        }

        let wav = recorded_wav(&record);
        assert_eq!(wav.extension().and_then(|e| e.to_str()), Some("wav"));
        assert!(!wav.exists(), "temporary WAV left behind at {}", wav.display());
        assert!(!dir.path().join("a.txt").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_ffmpeg_run_removes_temp_wav() {
        let dir = tempdir().unwrap();
        let record = dir.path().join("wav-path");
        let mut cfg = config_in(dir.path());
        cfg.ffmpeg_binary = fake_ffmpeg(dir.path(), &record, 1);
        cfg.whisper_binary = script(dir.path(), "whisper-cli", "exit 0");
        std::fs::write(&cfg.model_path, b"").unwrap();
        let audio = dir.path().join("a.m4a");
        std::fs::write(&audio, b"audio").unwrap();

        let stt = WhisperCliTranscriber::from_config(&cfg);
        let err = stt.transcribe(&audio).await.unwrap_err();
        assert!(
            matches!(err, SttError::Conversion(ProcessError::Exit { .. })),
            "got {err:?}"
        );
        assert!(!recorded_wav(&record).exists());
    }

    #[test]
    fn box_dyn_transcriber_compiles() {
        let cfg = SttConfig::default();
        let _: Box<dyn Transcriber> = Box::new(WhisperCliTranscriber::from_config(&cfg));
    }
}
