//! Pipeline state machine, stage artifacts and the job outcome.
//!
//! [`PipelineState`] drives the orchestrator's state machine.  Every stage
//! produces a [`Transition`] holding either the [`Artifact`] it resolved or the
//! [`ErrorKind`] that ended the job.  The ordered list of transitions is the
//! job's status trail; the binary renders it, the orchestrator never prints.

use std::fmt;
use std::path::PathBuf;

use super::runner::PipelineError;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// The four sequential pipeline steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Transcript,
    CoverArt,
    Approval,
    Render,
}

impl Stage {
    /// 1-based position, used in status output ("Step 2: Cover Art").
    pub fn number(&self) -> u8 {
        match self {
            Stage::Transcript => 1,
            Stage::CoverArt => 2,
            Stage::Approval => 3,
            Stage::Render => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Transcript => "Transcript",
            Stage::CoverArt => "Cover Art",
            Stage::Approval => "Approval",
            Stage::Render => "Render",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}: {}", self.number(), self.label())
    }
}

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of the job.
///
/// ```text
/// Start ─▶ Transcript ─▶ CoverArt ─▶ Approval ─▶ Render ─▶ Done
///   └──────────┴────────────┴───────────┴──────────┴─────▶ Aborted
/// ```
///
/// No state is re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Start,
    Transcript,
    CoverArt,
    Approval,
    Render,
    Done,
    Aborted,
}

impl PipelineState {
    /// The state following `self` on success.  Terminal states stay put.
    pub fn advance(self) -> Self {
        match self {
            PipelineState::Start => PipelineState::Transcript,
            PipelineState::Transcript => PipelineState::CoverArt,
            PipelineState::CoverArt => PipelineState::Approval,
            PipelineState::Approval => PipelineState::Render,
            PipelineState::Render => PipelineState::Done,
            PipelineState::Done => PipelineState::Done,
            PipelineState::Aborted => PipelineState::Aborted,
        }
    }

    /// The stage being worked on in this state, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineState::Transcript => Some(Stage::Transcript),
            PipelineState::CoverArt => Some(Stage::CoverArt),
            PipelineState::Approval => Some(Stage::Approval),
            PipelineState::Render => Some(Stage::Render),
            PipelineState::Start | PipelineState::Done | PipelineState::Aborted => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Aborted)
    }
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

/// Where a transcript came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptOrigin {
    /// A sibling `.txt` that already existed (skip-transcription).
    Existing,
    /// Freshly produced by the transcription collaborator.
    Transcribed,
}

/// Transcript text plus the file it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub path: PathBuf,
    pub text: String,
    pub origin: TranscriptOrigin,
}

/// The resolved cover art.  Exactly one source is active per job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverArt {
    /// User-supplied image, used unmodified.
    Provided(PathBuf),
    /// Written by the image-generation collaborator.
    Generated(PathBuf),
    /// Fixed fallback used after a generation failure.
    Placeholder(PathBuf),
}

impl CoverArt {
    pub fn path(&self) -> &PathBuf {
        match self {
            CoverArt::Provided(p) | CoverArt::Generated(p) | CoverArt::Placeholder(p) => p,
        }
    }
}

/// The rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    pub path: PathBuf,
    pub bytes: u64,
}

impl Video {
    pub fn megabytes(&self) -> f64 {
        self.bytes as f64 / (1024.0 * 1024.0)
    }
}

/// What a successful stage produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// Transcription was not needed (cover art override).
    TranscriptSkipped,
    Transcript(Transcript),
    CoverArt(CoverArt),
    Approved { auto: bool },
    Video(Video),
}

// ---------------------------------------------------------------------------
// Error kinds
// ---------------------------------------------------------------------------

/// Coarse failure taxonomy shared by every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An input file (audio, transcript, cover art) is absent or unreadable.
    MissingInput,
    /// Transcription, generation or render failed.
    CollaboratorFailure,
    /// Generation failed and the placeholder image is missing too.
    NoFallbackAvailable,
    /// Rejected or interrupted at the approval gate.
    UserCancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::MissingInput => "missing input",
            ErrorKind::CollaboratorFailure => "collaborator failure",
            ErrorKind::NoFallbackAvailable => "no fallback available",
            ErrorKind::UserCancelled => "cancelled by user",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Trail / outcome
// ---------------------------------------------------------------------------

/// One entry of the status trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub stage: Stage,
    pub result: Result<Artifact, ErrorKind>,
}

/// Terminal result of a job.
#[derive(Debug)]
pub enum Outcome {
    Success(Video),
    Aborted { stage: Stage, error: PipelineError },
}

/// Everything the caller needs after a job: outcome, final state and trail.
#[derive(Debug)]
pub struct JobReport {
    pub outcome: Outcome,
    pub state: PipelineState,
    pub trail: Vec<Transition>,
}

impl JobReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    /// Process exit status: 0 on success, 1 on any failure or cancellation.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// Kind of the failure, `None` on success.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Aborted { error, .. } => Some(error.kind()),
        }
    }

    /// Stages in the order they were recorded.
    pub fn stages(&self) -> Vec<Stage> {
        self.trail.iter().map(|t| t.stage).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_start() {
        assert_eq!(PipelineState::default(), PipelineState::Start);
    }

    #[test]
    fn advance_walks_the_happy_path() {
        let mut state = PipelineState::Start;
        let mut seen = Vec::new();
        while !state.is_terminal() {
            state = state.advance();
            seen.push(state);
        }
        assert_eq!(
            seen,
            vec![
                PipelineState::Transcript,
                PipelineState::CoverArt,
                PipelineState::Approval,
                PipelineState::Render,
                PipelineState::Done,
            ]
        );
    }

    #[test]
    fn terminal_states_do_not_advance() {
        assert_eq!(PipelineState::Done.advance(), PipelineState::Done);
        assert_eq!(PipelineState::Aborted.advance(), PipelineState::Aborted);
    }

    #[test]
    fn stage_mapping() {
        assert_eq!(PipelineState::Start.stage(), None);
        assert_eq!(PipelineState::CoverArt.stage(), Some(Stage::CoverArt));
        assert_eq!(PipelineState::Render.stage(), Some(Stage::Render));
        assert_eq!(PipelineState::Aborted.stage(), None);
    }

    #[test]
    fn stage_display_names_step() {
        assert_eq!(Stage::Transcript.to_string(), "Step 1: Transcript");
        assert_eq!(Stage::Render.to_string(), "Step 4: Render");
    }

    #[test]
    fn cover_art_path_for_every_source() {
        let p = PathBuf::from("data/x.png");
        assert_eq!(CoverArt::Provided(p.clone()).path(), &p);
        assert_eq!(CoverArt::Generated(p.clone()).path(), &p);
        assert_eq!(CoverArt::Placeholder(p.clone()).path(), &p);
    }

    #[test]
    fn video_megabytes() {
        let v = Video {
            path: PathBuf::from("out.mp4"),
            bytes: 5 * 1024 * 1024,
        };
        assert!((v.megabytes() - 5.0).abs() < f64::EPSILON);
    }
}
