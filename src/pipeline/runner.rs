//! Pipeline orchestrator: drives transcript → cover art → approval → render.
//!
//! [`PipelineOrchestrator`] owns the four collaborators and turns a [`Job`]
//! into a [`JobReport`].
//!
//! # Pipeline flow
//!
//! ```text
//! audio exists? ── no ──▶ Aborted(MissingInput)
//!   │
//!   ▼
//! Transcript   cover art given   → skipped
//!              skip + .txt exists → read sibling transcript
//!              otherwise          → transcriber.transcribe
//!   │
//!   ▼
//! CoverArt     override  → must exist, used as-is
//!              prompt    → generator(prompt)     ┐ on error: placeholder,
//!              otherwise → generator(transcript) ┘ else NoFallbackAvailable
//!   │
//!   ▼
//! Approval     auto-approve or user answers "y"
//!   │
//!   ▼
//! Render       renderer.render → Done(path, size)
//! ```
//!
//! Every failure is caught here and becomes `Outcome::Aborted`; nothing is
//! retried.  Ctrl-C during generation or render cancels the job like a
//! rejection at the gate (the transcriber and the approver watch for it
//! themselves).

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::art::{ArtError, CoverArtGenerator};
use crate::process::{self, until_interrupted};
use crate::render::{RenderError, VideoRenderer};
use crate::stt::{SttError, Transcriber};

use super::approval::{Approval, Approver, Review};
use super::job::{ArtSource, Job};
use super::state::{
    Artifact, CoverArt, ErrorKind, JobReport, Outcome, PipelineState, Stage, Transcript,
    TranscriptOrigin, Transition, Video,
};

/// Default placeholder image used when generation fails.
pub const DEFAULT_PLACEHOLDER: &str = "data/placeholder.png";

/// Produces a future that resolves when the user asks to stop.
type InterruptSignal = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors that end a job.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("audio file not found: {}", .0.display())]
    AudioNotFound(PathBuf),

    #[error("could not read transcript {}: {source}", .path.display())]
    TranscriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("transcription failed: {0}")]
    Transcription(#[source] SttError),

    #[error("cover art file not found: {}", .0.display())]
    CoverArtNotFound(PathBuf),

    #[error(
        "no fallback cover art available at {} (generation failed: {cause})",
        .placeholder.display()
    )]
    NoFallback {
        placeholder: PathBuf,
        #[source]
        cause: ArtError,
    },

    #[error("video creation cancelled by user")]
    Rejected,

    #[error("video creation cancelled by user (interrupted)")]
    Interrupted,

    #[error("video creation failed: {0}")]
    Render(#[source] RenderError),

    #[error("could not stat rendered video {}: {source}", .path.display())]
    OutputMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::AudioNotFound(_)
            | PipelineError::TranscriptRead { .. }
            | PipelineError::CoverArtNotFound(_) => ErrorKind::MissingInput,
            PipelineError::Transcription(_)
            | PipelineError::Render(_)
            | PipelineError::OutputMissing { .. } => ErrorKind::CollaboratorFailure,
            PipelineError::NoFallback { .. } => ErrorKind::NoFallbackAvailable,
            PipelineError::Rejected | PipelineError::Interrupted => ErrorKind::UserCancelled,
        }
    }
}

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

/// Drives one job through the four stages.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use audio_to_video::art::OpenRouterGenerator;
/// use audio_to_video::config::AppConfig;
/// use audio_to_video::pipeline::{Job, PipelineOrchestrator, StdinApprover};
/// use audio_to_video::render::FfmpegRenderer;
/// use audio_to_video::stt::WhisperCliTranscriber;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let job = Job::new("data/podcast.m4a");
///
/// let orchestrator = PipelineOrchestrator::new(
///     Arc::new(WhisperCliTranscriber::from_config(&config.stt)),
///     Arc::new(OpenRouterGenerator::from_config(&config.art, &job.output_dir)),
///     Arc::new(FfmpegRenderer::from_config(&config.render)),
///     Arc::new(StdinApprover::new()),
/// )
/// .with_placeholder(&config.art.placeholder_path);
///
/// let report = orchestrator.run(&job).await;
/// std::process::exit(report.exit_code());
/// # }
/// ```
pub struct PipelineOrchestrator {
    transcriber: Arc<dyn Transcriber>,
    generator: Arc<dyn CoverArtGenerator>,
    renderer: Arc<dyn VideoRenderer>,
    approver: Arc<dyn Approver>,
    placeholder: PathBuf,
    interrupt: InterruptSignal,
}

/// A stage failure paired with the stage it happened in.
type Abort = (Stage, PipelineError);

impl PipelineOrchestrator {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        generator: Arc<dyn CoverArtGenerator>,
        renderer: Arc<dyn VideoRenderer>,
        approver: Arc<dyn Approver>,
    ) -> Self {
        Self {
            transcriber,
            generator,
            renderer,
            approver,
            placeholder: PathBuf::from(DEFAULT_PLACEHOLDER),
            interrupt: Arc::new(|| Box::pin(process::ctrl_c())),
        }
    }

    /// Use `path` as the fallback image instead of [`DEFAULT_PLACEHOLDER`].
    pub fn with_placeholder(mut self, path: impl Into<PathBuf>) -> Self {
        self.placeholder = path.into();
        self
    }

    /// Replace the Ctrl-C listener that cancels generation and render.
    pub fn with_interrupt<F, Fut>(mut self, signal: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.interrupt = Arc::new(move || Box::pin(signal()));
        self
    }

    // -----------------------------------------------------------------------
    // Entry point
    // -----------------------------------------------------------------------

    /// Run `job` to completion.  Never fails: every error ends up in the
    /// returned report.
    pub async fn run(&self, job: &Job) -> JobReport {
        let mut trail = Vec::new();
        let mut state = PipelineState::Start;

        let outcome = match self.drive(job, &mut state, &mut trail).await {
            Ok(video) => {
                log::info!(
                    "pipeline: done, {} ({} bytes)",
                    video.path.display(),
                    video.bytes
                );
                Outcome::Success(video)
            }
            Err((stage, error)) => {
                match error.kind() {
                    ErrorKind::UserCancelled => log::info!("pipeline: {stage}: {error}"),
                    _ => log::error!("pipeline: {stage} failed: {error}"),
                }
                trail.push(Transition {
                    stage,
                    result: Err(error.kind()),
                });
                state = PipelineState::Aborted;
                Outcome::Aborted { stage, error }
            }
        };

        JobReport {
            outcome,
            state,
            trail,
        }
    }

    async fn drive(
        &self,
        job: &Job,
        state: &mut PipelineState,
        trail: &mut Vec<Transition>,
    ) -> Result<Video, Abort> {
        log::info!("pipeline: processing {}", job.audio.display());

        if !job.audio.exists() {
            return Err((Stage::Transcript, PipelineError::AudioNotFound(job.audio.clone())));
        }
        let output = job.output_path();

        // ── 1. Transcript ────────────────────────────────────────────────
        *state = state.advance();
        let transcript = self
            .resolve_transcript(job)
            .await
            .map_err(|e| (Stage::Transcript, e))?;
        trail.push(Transition {
            stage: Stage::Transcript,
            result: Ok(match &transcript {
                Some(t) => Artifact::Transcript(t.clone()),
                None => Artifact::TranscriptSkipped,
            }),
        });

        // ── 2. Cover art ─────────────────────────────────────────────────
        *state = state.advance();
        let cover_art = self
            .resolve_cover_art(job, transcript.as_ref())
            .await
            .map_err(|e| (Stage::CoverArt, e))?;
        trail.push(Transition {
            stage: Stage::CoverArt,
            result: Ok(Artifact::CoverArt(cover_art.clone())),
        });

        // ── 3. Approval ──────────────────────────────────────────────────
        *state = state.advance();
        self.approve(job, &cover_art, &output)
            .await
            .map_err(|e| (Stage::Approval, e))?;
        trail.push(Transition {
            stage: Stage::Approval,
            result: Ok(Artifact::Approved {
                auto: job.auto_approve,
            }),
        });

        // ── 4. Render ────────────────────────────────────────────────────
        *state = state.advance();
        let video = self
            .render(job, &cover_art, &output)
            .await
            .map_err(|e| (Stage::Render, e))?;
        trail.push(Transition {
            stage: Stage::Render,
            result: Ok(Artifact::Video(video.clone())),
        });

        *state = state.advance();
        Ok(video)
    }

    // -----------------------------------------------------------------------
    // Stages
    // -----------------------------------------------------------------------

    async fn resolve_transcript(&self, job: &Job) -> Result<Option<Transcript>, PipelineError> {
        if job.cover_art.is_some() {
            log::info!("pipeline: skipping transcription (cover art provided)");
            return Ok(None);
        }

        let existing = job.transcript_path();
        if job.skip_transcription {
            if existing.exists() {
                log::info!("pipeline: using existing transcript {}", existing.display());
                let text = read_transcript(&existing).await?;
                return Ok(Some(Transcript {
                    path: existing,
                    text,
                    origin: TranscriptOrigin::Existing,
                }));
            }
            log::info!(
                "pipeline: no transcript at {}, transcribing",
                existing.display()
            );
        }

        let path = self
            .transcriber
            .transcribe(&job.audio)
            .await
            .map_err(PipelineError::Transcription)?;
        let text = read_transcript(&path).await?;
        Ok(Some(Transcript {
            path,
            text,
            origin: TranscriptOrigin::Transcribed,
        }))
    }

    async fn resolve_cover_art(
        &self,
        job: &Job,
        transcript: Option<&Transcript>,
    ) -> Result<CoverArt, PipelineError> {
        let prompt = match job.art_source(transcript) {
            ArtSource::Provided(path) => {
                if !path.exists() {
                    return Err(PipelineError::CoverArtNotFound(path.to_path_buf()));
                }
                log::info!("pipeline: using provided cover art {}", path.display());
                return Ok(CoverArt::Provided(path.to_path_buf()));
            }
            ArtSource::Generate(prompt) => prompt,
        };

        log::debug!("pipeline: generating cover art from {prompt:?}");
        let generated = self
            .interruptible(self.generator.generate(prompt.text()))
            .await?;
        match generated {
            Ok(path) => Ok(CoverArt::Generated(path)),
            Err(cause) => {
                log::warn!("pipeline: cover art generation failed ({cause}), trying placeholder");
                if self.placeholder.exists() {
                    Ok(CoverArt::Placeholder(self.placeholder.clone()))
                } else {
                    Err(PipelineError::NoFallback {
                        placeholder: self.placeholder.clone(),
                        cause,
                    })
                }
            }
        }
    }

    async fn approve(
        &self,
        job: &Job,
        cover_art: &CoverArt,
        output: &Path,
    ) -> Result<(), PipelineError> {
        if job.auto_approve {
            log::info!("pipeline: auto-approved");
            return Ok(());
        }

        let review = Review {
            cover_art: cover_art.path().clone(),
            output: output.to_path_buf(),
        };
        match self.approver.confirm(&review).await {
            Approval::Approved => Ok(()),
            Approval::Rejected => Err(PipelineError::Rejected),
            Approval::Interrupted => Err(PipelineError::Interrupted),
        }
    }

    async fn render(
        &self,
        job: &Job,
        cover_art: &CoverArt,
        output: &Path,
    ) -> Result<Video, PipelineError> {
        self.interruptible(self.renderer.render(cover_art.path(), &job.audio, output))
            .await?
            .map_err(PipelineError::Render)?;

        let bytes = tokio::fs::metadata(output)
            .await
            .map_err(|source| PipelineError::OutputMissing {
                path: output.to_path_buf(),
                source,
            })?
            .len();

        Ok(Video {
            path: output.to_path_buf(),
            bytes,
        })
    }

    /// Race `work` against the interrupt signal.
    async fn interruptible<T>(&self, work: impl Future<Output = T>) -> Result<T, PipelineError> {
        until_interrupted(work, (self.interrupt)())
            .await
            .ok_or(PipelineError::Interrupted)
    }
}

async fn read_transcript(path: &Path) -> Result<String, PipelineError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| PipelineError::TranscriptRead {
            path: path.to_path_buf(),
            source,
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
