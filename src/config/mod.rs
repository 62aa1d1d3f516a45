//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each
//! collaborator, `AppPaths` for cross-platform directories, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save_to`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, ArtConfig, OutputConfig, RenderConfig, SttConfig};
