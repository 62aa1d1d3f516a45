//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\audio-to-video\
//!   macOS:   ~/Library/Application Support/audio-to-video/
//!   Linux:   ~/.config/audio-to-video/
//!
//! whisper.cpp checkout (binary + models):
//!   ~/LLM-apps/whisper.cpp/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Root of the local whisper.cpp build.
    pub whisper_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "audio-to-video";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let whisper_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("LLM-apps")
            .join("whisper.cpp");

        let settings_file = config_dir.join("settings.toml");

        Self {
            settings_file,
            whisper_dir,
        }
    }

    /// Default `whisper-cli` location inside [`whisper_dir`](Self::whisper_dir).
    pub fn whisper_binary(&self) -> PathBuf {
        self.whisper_dir.join("build").join("bin").join("whisper-cli")
    }

    /// Default GGML model inside [`whisper_dir`](Self::whisper_dir).
    pub fn whisper_model(&self) -> PathBuf {
        self.whisper_dir.join("models").join("ggml-tiny.en.bin")
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.settings_file.ends_with("audio-to-video/settings.toml"));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
    }

    #[test]
    fn whisper_paths_live_under_whisper_dir() {
        let paths = AppPaths::new();
        assert!(paths.whisper_binary().starts_with(&paths.whisper_dir));
        assert!(paths
            .whisper_binary()
            .file_name()
            .is_some_and(|n| n == "whisper-cli"));
        assert!(paths
            .whisper_model()
            .file_name()
            .is_some_and(|n| n == "ggml-tiny.en.bin"));
    }
}
