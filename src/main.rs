//! Application entry point for audio-to-video.
//!
//! # Startup sequence
//!
//! 1. Parse the command line.
//! 2. Initialise logging.
//! 3. Load [`AppConfig`] (returns default on first run) and resolve the image
//!    API key from the environment.
//! 4. Build the collaborators and the [`PipelineOrchestrator`].
//! 5. Run the job, print the status trail and exit with 0 or 1.

use std::sync::Arc;

use clap::Parser;

use audio_to_video::{
    art::OpenRouterGenerator,
    cli::Cli,
    config::{settings::API_KEY_ENV, AppConfig},
    pipeline::{
        Artifact, CoverArt, JobReport, Outcome, PipelineOrchestrator, StdinApprover, Transition,
        TranscriptOrigin,
    },
    render::FfmpegRenderer,
    stt::WhisperCliTranscriber,
};

// ---------------------------------------------------------------------------
// Status output
// ---------------------------------------------------------------------------

/// `5000000` → `"5,000,000"`
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn print_transition(t: &Transition) {
    let Ok(artifact) = &t.result else {
        return;
    };
    match artifact {
        Artifact::TranscriptSkipped => {
            println!("⏭️ {}: skipped (using provided cover art)", t.stage)
        }
        Artifact::Transcript(tr) => match tr.origin {
            TranscriptOrigin::Existing => {
                println!("⏭️ {}: using existing transcript {}", t.stage, tr.path.display())
            }
            TranscriptOrigin::Transcribed => {
                println!("✅ {}: transcription saved to {}", t.stage, tr.path.display())
            }
        },
        Artifact::CoverArt(art) => match art {
            CoverArt::Provided(p) => {
                println!("🖼️ {}: using provided cover art {}", t.stage, p.display())
            }
            CoverArt::Generated(p) => {
                println!("✅ {}: cover art generated {}", t.stage, p.display())
            }
            CoverArt::Placeholder(p) => {
                println!("🔄 {}: generation failed, using placeholder {}", t.stage, p.display())
            }
        },
        Artifact::Approved { auto: true } => println!("⚡ {}: auto-approved", t.stage),
        Artifact::Approved { auto: false } => println!("👍 {}: approved", t.stage),
        Artifact::Video(_) => println!("🎬 {}: video rendered", t.stage),
    }
}

fn print_report(report: &JobReport) {
    for t in &report.trail {
        print_transition(t);
    }

    match &report.outcome {
        Outcome::Success(video) => {
            println!();
            println!("🎉 Success! Video created:");
            println!("📁 Location: {}", video.path.display());
            println!(
                "📊 Size: {} bytes ({:.1} MB)",
                group_thousands(video.bytes),
                video.megabytes()
            );
        }
        Outcome::Aborted { stage, error } => {
            eprintln!("❌ {stage}: {error}");
        }
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // 1. Command line
    let cli = Cli::parse();

    // 2. Logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // 3. Configuration
    let loaded = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    config.resolve_api_key(std::env::var(API_KEY_ENV).ok());

    let job = cli.to_job(&config.output.output_dir);
    // A missing file is reported by the orchestrator as the job's failure.
    if job.audio.exists() {
        let name = job
            .audio
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| job.audio.display().to_string());
        println!("🎵 Processing: {name}");
    }

    // 4. Collaborators
    let orchestrator = PipelineOrchestrator::new(
        Arc::new(WhisperCliTranscriber::from_config(&config.stt)),
        Arc::new(OpenRouterGenerator::from_config(&config.art, &job.output_dir)),
        Arc::new(FfmpegRenderer::from_config(&config.render)),
        Arc::new(StdinApprover::new()),
    )
    .with_placeholder(&config.art.placeholder_path);

    // 5. Run
    let report = orchestrator.run(&job).await;
    print_report(&report);

    // Exit here rather than returning: a stdin read abandoned at the approval
    // gate would otherwise keep the runtime from shutting down.
    std::process::exit(report.exit_code());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(5_000_000), "5,000,000");
        assert_eq!(group_thousands(12_345_678), "12,345,678");
    }
}
