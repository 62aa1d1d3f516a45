//! The unit of work for one invocation.

use std::path::{Path, PathBuf};

use crate::stt::transcript_path_for;

use super::state::Transcript;

/// Default directory for generated artifacts.
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// One request to turn an audio file into a video.
///
/// ```
/// use std::path::PathBuf;
/// use audio_to_video::pipeline::Job;
///
/// let job = Job::new("episodes/podcast.m4a").auto_approve(true);
/// assert_eq!(job.output_path(), PathBuf::from("data/podcast_video.mp4"));
/// assert_eq!(job.transcript_path(), PathBuf::from("episodes/podcast.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub audio: PathBuf,
    pub output: Option<PathBuf>,
    pub cover_art: Option<PathBuf>,
    pub prompt: Option<String>,
    pub skip_transcription: bool,
    pub auto_approve: bool,
    pub output_dir: PathBuf,
}

impl Job {
    pub fn new(audio: impl Into<PathBuf>) -> Self {
        Self {
            audio: audio.into(),
            output: None,
            cover_art: None,
            prompt: None,
            skip_transcription: false,
            auto_approve: false,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_cover_art(mut self, cover_art: impl Into<PathBuf>) -> Self {
        self.cover_art = Some(cover_art.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn skip_transcription(mut self, skip: bool) -> Self {
        self.skip_transcription = skip;
        self
    }

    pub fn auto_approve(mut self, auto: bool) -> Self {
        self.auto_approve = auto;
        self
    }

    /// Requested output path, or `<output_dir>/<audio stem>_video.mp4`.
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => {
                let stem = self
                    .audio
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "audio".into());
                self.output_dir.join(format!("{stem}_video.mp4"))
            }
        }
    }

    /// Sibling `.txt` of the audio file.
    pub fn transcript_path(&self) -> PathBuf {
        transcript_path_for(&self.audio)
    }

    /// Resolve what the cover-art stage should do.
    ///
    /// Precedence: override path > custom prompt > transcript.
    pub fn art_source<'a>(&'a self, transcript: Option<&'a Transcript>) -> ArtSource<'a> {
        if let Some(path) = &self.cover_art {
            return ArtSource::Provided(path);
        }
        match &self.prompt {
            Some(prompt) => ArtSource::Generate(PromptSource::Custom(prompt)),
            None => ArtSource::Generate(PromptSource::Transcript(
                transcript.map(|t| t.text.as_str()).unwrap_or_default(),
            )),
        }
    }
}

/// Text the generator is asked to illustrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptSource<'a> {
    Custom(&'a str),
    Transcript(&'a str),
}

impl<'a> PromptSource<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            PromptSource::Custom(s) | PromptSource::Transcript(s) => s,
        }
    }
}

/// Resolved plan for the cover-art stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtSource<'a> {
    Provided(&'a Path),
    Generate(PromptSource<'a>),
}
