//! Prompt builder for cover-art generation.
//!
//! [`PromptBuilder`] wraps the source text (a transcript or a user-supplied
//! prompt) in a fixed album-art template.  An optional aesthetic description is
//! read from `<prompts_dir>/image_aesthetic.txt` so the visual style of a
//! series can be tuned without recompiling.

use std::path::{Path, PathBuf};

/// Number of leading characters of the source text used as "key themes".
pub const MAX_THEME_CHARS: usize = 400;

const AESTHETIC_FILE: &str = "image_aesthetic";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds image-generation prompts.
///
/// # Example
/// ```rust
/// use audio_to_video::art::PromptBuilder;
///
/// let builder = PromptBuilder::with_aesthetic("Muted teal palette.");
/// let prompt = builder.build("a talk about tide pools");
/// assert!(prompt.contains("tide pools"));
/// assert!(prompt.contains("Muted teal palette."));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    aesthetic: String,
}

impl PromptBuilder {
    /// Load the aesthetic snippet from `prompts_dir`.
    ///
    /// A missing or unreadable file yields an empty aesthetic and a warning;
    /// prompt building never fails.
    pub fn load(prompts_dir: &Path) -> Self {
        Self {
            aesthetic: load_prompt(prompts_dir, AESTHETIC_FILE),
        }
    }

    /// Builder with an explicit aesthetic (no filesystem access).
    pub fn with_aesthetic(aesthetic: impl Into<String>) -> Self {
        Self {
            aesthetic: aesthetic.into(),
        }
    }

    /// Render the full prompt for `source`.
    pub fn build(&self, source: &str) -> String {
        let themes = key_themes(source);
        let prompt = format!(
            "Create sophisticated podcast album art based on these themes from the audio content: \"{themes}\"\n\
             \n\
             {aesthetic}\n\
             \n\
             Generate an artistic, abstract visual representation that captures the essence of this \
             content while maintaining the signature podcast series aesthetic described above.",
            aesthetic = self.aesthetic,
        );
        prompt.trim().to_string()
    }
}

/// First [`MAX_THEME_CHARS`] characters of `source`, cut on a char boundary.
pub fn key_themes(source: &str) -> &str {
    match source.char_indices().nth(MAX_THEME_CHARS) {
        Some((idx, _)) => &source[..idx],
        None => source,
    }
}

fn load_prompt(prompts_dir: &Path, name: &str) -> String {
    let path: PathBuf = prompts_dir.join(format!("{name}.txt"));
    match std::fs::read_to_string(&path) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            log::warn!("prompt file {} not readable ({e}); using default", path.display());
            String::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
