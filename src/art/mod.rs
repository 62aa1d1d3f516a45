//! Cover-art collaborator.
//!
//! This module provides:
//! * [`CoverArtGenerator`] — async trait implemented by image backends.
//! * [`OpenRouterGenerator`] — OpenRouter-compatible chat endpoint with image
//!   output.
//! * [`PromptBuilder`] — wraps a transcript or custom prompt in the album-art
//!   template.
//! * [`ArtError`] — error variants for generation.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use audio_to_video::art::{CoverArtGenerator, OpenRouterGenerator};
//! use audio_to_video::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut config = AppConfig::default();
//!     config.resolve_api_key(std::env::var("OPENROUTER_API_KEY").ok());
//!
//!     let generator = OpenRouterGenerator::from_config(&config.art, "data");
//!     let path = generator.generate("an episode about tide pools").await.unwrap();
//!     println!("{}", path.display());
//! }
//! ```

pub mod generator;
pub mod prompt;

pub use generator::{
    decode_data_url, image_file_name, ArtError, CoverArtGenerator, OpenRouterGenerator,
};
pub use prompt::PromptBuilder;
