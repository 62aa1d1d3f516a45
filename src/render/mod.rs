//! Render collaborator. Still image + audio → MP4.
//!
//! [`VideoRenderer`] is the trait the pipeline calls; [`FfmpegRenderer`] is
//! the production implementation:
//!
//! ```text
//! ffmpeg -loop 1 -i IMAGE -i AUDIO -c:v libx264 -c:a aac -b:a 192k -shortest -y OUT
//! ```
//!
//! `-shortest` ends the encode when the audio ends.

use std::ffi::OsStr;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::RenderConfig;
use crate::process::{CommandRunner, ProcessError};

/// Errors raised while rendering the video.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Image file not found: {0}")]
    ImageNotFound(String),

    #[error("Audio file not found: {0}")]
    AudioNotFound(String),

    /// The output directory could not be created.
    #[error("could not prepare output directory: {0}")]
    OutputDir(#[from] std::io::Error),

    #[error("encode failed: {0}")]
    Encode(#[source] ProcessError),
}

/// Writes a video at `output` from a still `image` and an `audio` track.
#[async_trait]
pub trait VideoRenderer: Send + Sync {
    async fn render(&self, image: &Path, audio: &Path, output: &Path) -> Result<(), RenderError>;
}

/// ffmpeg-backed renderer.
#[derive(Debug, Clone)]
pub struct FfmpegRenderer {
    ffmpeg: CommandRunner,
    config: RenderConfig,
}

impl FfmpegRenderer {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            ffmpeg: CommandRunner::new(&config.ffmpeg_binary),
            config: config.clone(),
        }
    }
}

#[async_trait]
impl VideoRenderer for FfmpegRenderer {
    async fn render(&self, image: &Path, audio: &Path, output: &Path) -> Result<(), RenderError> {
        if !image.exists() {
            return Err(RenderError::ImageNotFound(image.display().to_string()));
        }
        if !audio.exists() {
            return Err(RenderError::AudioNotFound(audio.display().to_string()));
        }
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        log::info!("render: creating video at {}", output.display());
        self.ffmpeg
            .run([
                OsStr::new("-loop"),
                OsStr::new("1"),
                OsStr::new("-i"),
                image.as_os_str(),
                OsStr::new("-i"),
                audio.as_os_str(),
                OsStr::new("-c:v"),
                OsStr::new(&self.config.video_codec),
                OsStr::new("-c:a"),
                OsStr::new(&self.config.audio_codec),
                OsStr::new("-b:a"),
                OsStr::new(&self.config.audio_bitrate),
                OsStr::new("-shortest"),
                OsStr::new("-y"),
                output.as_os_str(),
            ])
            .await
            .map_err(RenderError::Encode)?;

        log::info!("render: video created");
        Ok(())
    }
}
