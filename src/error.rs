// Error types for the stylosphere application.
// Covers AI provider errors, gallery storage errors, and general failures.

#![allow(dead_code)]

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StyloError {
    #[error("AI service error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("API key rejected: select a valid key (set GEMINI_API_KEY)")]
    InvalidKey,

    #[error("Missing GEMINI_API_KEY environment variable")]
    MissingKey,

    #[error("The model returned no usable output")]
    EmptyResponse,

    #[error("Request was blocked: {0}")]
    Blocked(String),

    #[error("Unsupported image file: {0}")]
    UnsupportedImage(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl StyloError {
    /// Whether this error should prompt the user to re-select an API key.
    pub fn is_key_error(&self) -> bool {
        matches!(self, StyloError::InvalidKey | StyloError::MissingKey)
    }
}

pub type Result<T> = std::result::Result<T, StyloError>;
