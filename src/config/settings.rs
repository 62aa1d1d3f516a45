//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.  Every section is
//! `#[serde(default)]`, so a settings file only needs the keys it overrides.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable consulted for the image API key when the settings
/// file leaves `art.api_key` unset.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the whisper.cpp transcription collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// Path to the `whisper-cli` executable.
    pub whisper_binary: PathBuf,
    /// Path to the GGML model file handed to `--model`.
    pub model_path: PathBuf,
    /// ffmpeg executable used to convert the input to 16 kHz mono WAV.
    pub ffmpeg_binary: PathBuf,
    /// Sample rate of the intermediate WAV.
    pub sample_rate: u32,
}

impl Default for SttConfig {
    fn default() -> Self {
        let paths = AppPaths::new();
        Self {
            whisper_binary: paths.whisper_binary(),
            model_path: paths.whisper_model(),
            ffmpeg_binary: PathBuf::from("ffmpeg"),
            sample_rate: 16_000,
        }
    }
}

// ---------------------------------------------------------------------------
// ArtConfig
// ---------------------------------------------------------------------------

/// Settings for the image-generation collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtConfig {
    /// Base URL of the OpenRouter-compatible API (no trailing slash).
    pub base_url: String,
    /// Bearer token.  `None` here means "take it from `OPENROUTER_API_KEY`".
    pub api_key: Option<String>,
    /// Model identifier sent in the request body.
    pub model: String,
    /// Maximum seconds to wait for the image response.
    pub timeout_secs: u64,
    /// Directory holding `image_aesthetic.txt`.
    pub prompts_dir: PathBuf,
    /// Image used when generation fails.
    pub placeholder_path: PathBuf,
}

impl Default for ArtConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".into(),
            api_key: None,
            model: "google/gemini-3-pro-image-preview".into(),
            timeout_secs: 180,
            prompts_dir: PathBuf::from("prompts"),
            placeholder_path: PathBuf::from("data/placeholder.png"),
        }
    }
}

// ---------------------------------------------------------------------------
// RenderConfig
// ---------------------------------------------------------------------------

/// Settings for the ffmpeg render collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// ffmpeg executable.
    pub ffmpeg_binary: PathBuf,
    /// Video codec passed to `-c:v`.
    pub video_codec: String,
    /// Audio codec passed to `-c:a`.
    pub audio_codec: String,
    /// Audio bitrate passed to `-b:a`.
    pub audio_bitrate: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_binary: PathBuf::from("ffmpeg"),
            video_codec: "libx264".into(),
            audio_codec: "aac".into(),
            audio_bitrate: "192k".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

/// Where generated artifacts land when the CLI does not say otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for generated cover art and default video output.
    pub output_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data"),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use audio_to_video::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Transcription settings.
    pub stt: SttConfig,
    /// Cover-art generation settings.
    pub art: ArtConfig,
    /// Video render settings.
    pub render: RenderConfig,
    /// Output locations.
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Fill `art.api_key` from `env_value` when the file did not set one.
    ///
    /// An explicit key in the settings file always wins.
    pub fn resolve_api_key(&mut self, env_value: Option<String>) {
        let configured = self.art.api_key.as_deref().is_some_and(|k| !k.is_empty());
        if !configured {
            self.art.api_key = env_value.filter(|k| !k.is_empty());
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

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.stt.whisper_binary, loaded.stt.whisper_binary);
        assert_eq!(original.stt.model_path, loaded.stt.model_path);
        assert_eq!(original.stt.sample_rate, loaded.stt.sample_rate);

        assert_eq!(original.art.base_url, loaded.art.base_url);
        assert_eq!(original.art.api_key, loaded.art.api_key);
        assert_eq!(original.art.model, loaded.art.model);
        assert_eq!(original.art.placeholder_path, loaded.art.placeholder_path);

        assert_eq!(original.render.video_codec, loaded.render.video_codec);
        assert_eq!(original.render.audio_bitrate, loaded.render.audio_bitrate);

        assert_eq!(original.output.output_dir, loaded.output.output_dir);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.art.model, default.art.model);
        assert_eq!(config.output.output_dir, default.output.output_dir);
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.art.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(cfg.art.model, "google/gemini-3-pro-image-preview");
        assert!(cfg.art.api_key.is_none());
        assert_eq!(cfg.art.placeholder_path, PathBuf::from("data/placeholder.png"));
        assert_eq!(cfg.stt.sample_rate, 16_000);
        assert_eq!(cfg.render.video_codec, "libx264");
        assert_eq!(cfg.render.audio_codec, "aac");
        assert_eq!(cfg.render.audio_bitrate, "192k");
        assert_eq!(cfg.output.output_dir, PathBuf::from("data"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[render]\naudio_bitrate = \"320k\"\n").expect("write");

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.render.audio_bitrate, "320k");
        assert_eq!(cfg.render.video_codec, "libx264");
        assert_eq!(cfg.art.model, "google/gemini-3-pro-image-preview");
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.art.api_key = Some("sk-or-test".into());
        cfg.art.timeout_secs = 30;
        cfg.stt.ffmpeg_binary = PathBuf::from("/opt/ffmpeg/bin/ffmpeg");
        cfg.output.output_dir = PathBuf::from("videos");

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.art.api_key, Some("sk-or-test".into()));
        assert_eq!(loaded.art.timeout_secs, 30);
        assert_eq!(loaded.stt.ffmpeg_binary, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(loaded.output.output_dir, PathBuf::from("videos"));
    }

    #[test]
    fn env_key_fills_missing_api_key() {
        let mut cfg = AppConfig::default();
        cfg.resolve_api_key(Some("from-env".into()));
        assert_eq!(cfg.art.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn configured_api_key_wins_over_env() {
        let mut cfg = AppConfig::default();
        cfg.art.api_key = Some("from-file".into());
        cfg.resolve_api_key(Some("from-env".into()));
        assert_eq!(cfg.art.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn empty_env_key_is_ignored() {
        let mut cfg = AppConfig::default();
        cfg.resolve_api_key(Some(String::new()));
        assert!(cfg.art.api_key.is_none());
    }
}
