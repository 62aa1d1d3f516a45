//! Approval gate: the single user checkpoint before rendering.
//!
//! [`StdinApprover`] shows the resolved cover art and the planned output path
//! and waits for one answer on stdin.  Only `y` (any case, surrounding
//! whitespace ignored) approves; any other answer, end of input, or Ctrl-C
//! cancels the job.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use async_trait::async_trait;

use crate::process;

/// What the user is asked to confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub cover_art: PathBuf,
    pub output: PathBuf,
}

/// The user's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approval {
    Approved,
    Rejected,
    Interrupted,
}

/// Blocks until the user approves or cancels.
#[async_trait]
pub trait Approver: Send + Sync {
    async fn confirm(&self, review: &Review) -> Approval;
}

/// `true` only for the affirmative token.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Interactive approver reading one line from stdin.
#[derive(Debug, Clone, Default)]
pub struct StdinApprover;

impl StdinApprover {
    pub fn new() -> Self {
        Self
    }

    fn read_answer() -> Approval {
        read_answer_from(std::io::stdin().lock())
    }
}

/// Read one line from `reader` and map it to a decision.  End of input and
/// read errors reject.
fn read_answer_from(mut reader: impl BufRead) -> Approval {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => Approval::Rejected,
        Ok(_) if is_affirmative(&line) => Approval::Approved,
        Ok(_) => Approval::Rejected,
        Err(e) => {
            log::warn!("approval: could not read answer: {e}");
            Approval::Rejected
        }
    }
}

#[async_trait]
impl Approver for StdinApprover {
    async fn confirm(&self, review: &Review) -> Approval {
        println!();
        println!("👀 Step 3: Review");
        println!("🎨 Cover art: {}", review.cover_art.display());
        println!("🎬 Output will be: {}", review.output.display());
        print!("\n🤔 Proceed with video creation? (y/n): ");
        let _ = std::io::stdout().flush();

        // The read stays blocked on its own thread if Ctrl-C wins; the binary
        // exits right after a cancelled job, so it is never joined.
        let read = tokio::task::spawn_blocking(Self::read_answer);

        tokio::select! {
            answer = read => answer.unwrap_or_else(|e| {
                log::warn!("approval: reader task failed: {e}");
                Approval::Rejected
            }),
            _ = process::ctrl_c() => {
                println!();
                Approval::Interrupted
            }
        }
    }
}
