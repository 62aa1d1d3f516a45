//! Command-line interface.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::pipeline::Job;

const EXAMPLES: &str = "\
Examples:

Basic usage:
  audio-to-video data/my-audio.mp4

With custom output:
  audio-to-video data/podcast.m4a -o videos/episode-001.mp4

Use existing cover art:
  audio-to-video data/audio.wav --cover-art data/my-art.png

Auto-approve (no manual intervention):
  audio-to-video data/audio.mp3 --auto-approve

Custom AI prompt for cover art:
  audio-to-video data/audio.wav --prompt \"Abstract geometric art with purple gradients\"

Skip transcription (use existing):
  audio-to-video data/audio.mp4 --skip-transcription";

/// Create YouTube-ready videos from audio with AI-generated cover art.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "audio-to-video", version, about, after_help = EXAMPLES)]
pub struct Cli {
    /// Path to input audio file
    pub audio_file: PathBuf,

    /// Output video path (default: <output-dir>/<audio stem>_video.mp4)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use existing cover art image instead of generating
    #[arg(long)]
    pub cover_art: Option<PathBuf>,

    /// Custom prompt for AI cover art generation
    #[arg(long)]
    pub prompt: Option<String>,

    /// Skip transcription if transcript file already exists
    #[arg(long)]
    pub skip_transcription: bool,

    /// Skip user approval and proceed automatically
    #[arg(long)]
    pub auto_approve: bool,

    /// Directory for output files (default from settings, normally "data")
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Settings file to use instead of the platform default
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the job, falling back to `default_output_dir` when
    /// `--output-dir` was not given.
    pub fn to_job(&self, default_output_dir: &Path) -> Job {
        let output_dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir.to_path_buf());

        let mut job = Job::new(&self.audio_file)
            .with_output_dir(output_dir)
            .skip_transcription(self.skip_transcription)
            .auto_approve(self.auto_approve);
        job.output = self.output.clone();
        job.cover_art = self.cover_art.clone();
        job.prompt = self.prompt.clone();
        job
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn positional_only() {
        let cli = Cli::try_parse_from(["audio-to-video", "data/ep.m4a"]).unwrap();
        assert_eq!(cli.audio_file, PathBuf::from("data/ep.m4a"));
        assert!(cli.output.is_none());
        assert!(!cli.skip_transcription);
        assert!(!cli.auto_approve);

        let job = cli.to_job(Path::new("data"));
        assert_eq!(job.output_path(), PathBuf::from("data/ep_video.mp4"));
    }

    #[test]
    fn all_options() {
        let cli = Cli::try_parse_from([
            "audio-to-video",
            "data/audio.m4a",
            "-o",
            "final.mp4",
            "--cover-art",
            "art.png",
            "--prompt",
            "Minimalist podcast art",
            "--skip-transcription",
            "--auto-approve",
            "--output-dir",
            "out",
        ])
        .unwrap();

        let job = cli.to_job(Path::new("data"));
        assert_eq!(job.output, Some(PathBuf::from("final.mp4")));
        assert_eq!(job.cover_art, Some(PathBuf::from("art.png")));
        assert_eq!(job.prompt.as_deref(), Some("Minimalist podcast art"));
        assert!(job.skip_transcription);
        assert!(job.auto_approve);
        assert_eq!(job.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn output_dir_falls_back_to_default() {
        let cli = Cli::try_parse_from(["audio-to-video", "a.wav"]).unwrap();
        let job = cli.to_job(Path::new("videos"));
        assert_eq!(job.output_dir, PathBuf::from("videos"));
    }

    #[test]
    fn missing_audio_argument_is_an_error() {
        assert!(Cli::try_parse_from(["audio-to-video"]).is_err());
    }

    #[test]
    fn version_flag_is_recognised() {
        let err = Cli::try_parse_from(["audio-to-video", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
