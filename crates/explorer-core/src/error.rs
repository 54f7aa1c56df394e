//! Error types shared across the crate.
//!
//! [`SourceError`] is the failure a source stream carries in its `Err`
//! items. [`StreamError`] covers misuse of the combinators themselves.

use serde::{Deserialize, Serialize};

// ==============================================================================
// Source Errors
// ==============================================================================

/// The HTTP response attached to a failed request, as far as it was read.
///
/// `body` holds the decoded JSON body when the server sent one; `text`
/// holds the raw body when it could not be decoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Failure reported by an upstream producer through a source stream.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("request failed with HTTP status {}", .0.status)]
    Response(ErrorResponse),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("decode failure: {0}")]
    Decode(String),
}

/// Access to the HTTP response carried by an error, if any.
///
/// Error normalization (see [`crate::stream::ExtractedError`]) reads the
/// response body and text through this trait. Errors that never carry a
/// response can rely on the default.
pub trait ResponseError {
    fn response(&self) -> Option<&ErrorResponse> {
        None
    }
}

impl ResponseError for SourceError {
    fn response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Response(response) => Some(response),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

impl ResponseError for ErrorResponse {
    fn response(&self) -> Option<&ErrorResponse> {
        Some(self)
    }
}

impl ResponseError for String {}

impl ResponseError for &'static str {}

// ==============================================================================
// Combinator Errors
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    #[error("duplicate snapshot field: {0}")]
    DuplicateField(String),
}
