//! # API Errors
//!
//! Error types for GitHub access operations.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur during API operations.
///
/// Remote failures keep GitHub's own message so the caller can show it
/// as-is. Nothing here is retried.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No token is set; raised before any network access.
    #[error("GitHub not initialized. Please add your token in Settings.")]
    Uninitialized,

    /// An empty or blank token was supplied.
    #[error("Please enter a GitHub token")]
    InvalidToken,

    /// The token was rejected (401).
    #[error("{message}")]
    Unauthorized {
        /// Message reported by GitHub.
        message: String,
    },

    /// The resource is not accessible with this token (403).
    #[error("{message}")]
    Forbidden {
        /// Message reported by GitHub.
        message: String,
    },

    /// The resource does not exist or is hidden (404).
    #[error("{message}")]
    NotFound {
        /// Message reported by GitHub.
        message: String,
    },

    /// Any other non-success response.
    #[error("GitHub API error ({status}): {message}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Message reported by GitHub.
        message: String,
    },

    /// Network or HTTP transport error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to deserialize response.
    #[error("invalid response format: {0}")]
    InvalidResponse(String),

    /// The configured API URL cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Token persistence failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error body returned by the GitHub REST API.
#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    message: String,
}

impl ApiError {
    /// Builds an error from a non-success response.
    ///
    /// Prefers the `message` field of the JSON body, then the raw body,
    /// then the canonical reason phrase.
    pub(crate) fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<RemoteErrorBody>(body)
            .map(|b| b.message)
            .ok()
            .filter(|m| !m.is_empty())
            .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized { message },
            StatusCode::FORBIDDEN => Self::Forbidden { message },
            StatusCode::NOT_FOUND => Self::NotFound { message },
            _ => Self::Remote {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// HTTP status of a remote failure, if this error came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Remote { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the token itself was rejected.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
