//! Pipeline orchestrator module.
//!
//! This module sequences the four stages of a job and exposes the types the
//! binary needs to report the result.
//!
//! # Architecture
//!
//! ```text
//! Job
//!  │
//!  ▼
//! PipelineOrchestrator::run()
//!  │
//!  ├─ Transcript  → Transcriber          (skipped / existing .txt / transcribe)
//!  ├─ CoverArt    → CoverArtGenerator    (override / prompt / transcript, placeholder fallback)
//!  ├─ Approval    → Approver             (auto-approve / stdin "y")
//!  └─ Render      → VideoRenderer
//!  │
//!  ▼
//! JobReport { outcome, state, trail }
//! ```

pub mod approval;
pub mod job;
pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use approval::{is_affirmative, Approval, Approver, Review, StdinApprover};
pub use job::{ArtSource, Job, PromptSource, DEFAULT_OUTPUT_DIR};
pub use runner::{PipelineError, PipelineOrchestrator, DEFAULT_PLACEHOLDER};
pub use state::{
    Artifact, CoverArt, ErrorKind, JobReport, Outcome, PipelineState, Stage, Transcript,
    TranscriptOrigin, Transition, Video,
};
