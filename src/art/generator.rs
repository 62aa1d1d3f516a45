//! Core `CoverArtGenerator` trait and the OpenRouter implementation.
//!
//! `OpenRouterGenerator` calls an OpenRouter-compatible `/chat/completions`
//! endpoint with image output enabled and writes the returned PNG into the
//! output directory.  All connection details come from [`ArtConfig`]; the API
//! key is passed in explicitly and never read from the environment here.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

use crate::art::prompt::PromptBuilder;
use crate::config::ArtConfig;

// ---------------------------------------------------------------------------
// ArtError
// ---------------------------------------------------------------------------

/// Errors that can occur while generating cover art.
#[derive(Debug, Error)]
pub enum ArtError {
    /// No API key was configured.
    #[error("OPENROUTER_API_KEY is not set")]
    MissingApiKey,

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("image request timed out")]
    Timeout,

    /// The API answered with a non-success status.
    #[error("image API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response did not contain decodable image data.
    #[error("malformed image response: {0}")]
    MalformedResponse(String),

    /// The decoded image could not be written to disk.
    #[error("could not write cover art: {0}")]
    Write(#[from] std::io::Error),
}

impl From<reqwest::Error> for ArtError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ArtError::Timeout
        } else {
            ArtError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// CoverArtGenerator trait
// ---------------------------------------------------------------------------

/// Async trait for cover-art generation.
///
/// `source` is the text the artwork is based on (a transcript or a custom
/// prompt).  On success the returned path points at a newly written image.
#[async_trait]
pub trait CoverArtGenerator: Send + Sync {
    async fn generate(&self, source: &str) -> Result<PathBuf, ArtError>;
}

// ---------------------------------------------------------------------------
// OpenRouterGenerator
// ---------------------------------------------------------------------------

/// Generates cover art through an OpenRouter-compatible chat endpoint.
pub struct OpenRouterGenerator {
    client: reqwest::Client,
    config: ArtConfig,
    prompt_builder: PromptBuilder,
    output_dir: PathBuf,
}

impl OpenRouterGenerator {
    /// Build a generator from config, writing images into `output_dir`.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.
    pub fn from_config(config: &ArtConfig, output_dir: impl Into<PathBuf>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            prompt_builder: PromptBuilder::load(&config.prompts_dir),
            output_dir: output_dir.into(),
        }
    }

    /// Replace the prompt builder loaded from `prompts_dir`.
    pub fn with_prompt_builder(mut self, prompt_builder: PromptBuilder) -> Self {
        self.prompt_builder = prompt_builder;
        self
    }

    async fn request_image(&self, api_key: &str, prompt: &str) -> Result<Vec<u8>, ArtError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let body = serde_json::json!({
            "model":      self.config.model,
            "messages":   [ { "role": "user", "content": prompt } ],
            "modalities": ["image", "text"]
        });

        log::info!("art: requesting image from model {}", self.config.model);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ArtError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ArtError::MalformedResponse(e.to_string()))?;

        let data_url = json["choices"][0]["message"]["images"][0]["image_url"]["url"]
            .as_str()
            .ok_or_else(|| {
                log::debug!("art: full response: {json}");
                ArtError::MalformedResponse("no image data in response".into())
            })?;

        decode_data_url(data_url)
    }
}

#[async_trait]
impl CoverArtGenerator for OpenRouterGenerator {
    async fn generate(&self, source: &str) -> Result<PathBuf, ArtError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ArtError::MissingApiKey)?;

        let prompt = self.prompt_builder.build(source);
        log::debug!("art: prompt = {prompt:?}");

        let image = self.request_image(api_key, &prompt).await?;
        let path = write_image(&self.output_dir, &image, chrono::Utc::now().timestamp()).await?;

        log::info!("art: cover art saved to {}", path.display());
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Decode the payload of a `data:<mime>;base64,<payload>` URL.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, ArtError> {
    let (_, encoded) = data_url
        .split_once(',')
        .ok_or_else(|| ArtError::MalformedResponse("image URL is not a data URL".into()))?;

    general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| ArtError::MalformedResponse(format!("bad base64 image payload: {e}")))
}

/// `cover_art_<unix seconds>.png`
pub fn image_file_name(timestamp: i64) -> String {
    format!("cover_art_{timestamp}.png")
}

async fn write_image(dir: &Path, image: &[u8], timestamp: i64) -> Result<PathBuf, ArtError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(image_file_name(timestamp));
    tokio::fs::write(&path, image).await?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
