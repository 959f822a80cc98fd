//! Error types for content loading

use thiserror::Error;

/// Failure to fetch a single resource
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{path}: not found")]
    NotFound { path: String },

    #[error("{url}: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{path}: resolves outside the site root")]
    OutsideRoot { path: String },

    #[error("{path}: timed out after {secs}s")]
    Timeout { path: String, secs: u64 },

    #[error("invalid base URL {0:?}")]
    InvalidBaseUrl(String),
}

/// Page-level failure: nothing can be rendered from this source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to fetch manifest: {0}")]
    Manifest(#[source] FetchError),

    #[error("Manifest is not valid JSON: {0}")]
    ManifestJson(#[from] serde_json::Error),

    #[error("Manifest must be a JSON array")]
    ManifestNotArray,

    #[error("No Markdown renderer available")]
    RendererUnavailable,

    #[error("Failed to load static posts from {path}: {message}")]
    StaticPosts { path: String, message: String },
}
