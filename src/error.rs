//! Error types returned by the bounty board clients
//!
//! Every client operation returns [`Result`]. Match on [`BoardError`] variants
//! to branch on specific conditions (who claimed a bounty, a missing bounty)
//! or treat the whole enum as a catch-all.

use chrono::{DateTime, Utc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    /// Non-2xx response that has no more specific kind
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The bounty is already claimed by another wallet
    #[error("Bounty already claimed by {claimed_by}")]
    AlreadyClaimed {
        claimed_by: String,
        claimed_at: Option<DateTime<Utc>>,
    },

    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Transport failure (connect, timeout, 5xx) after all attempts were used
    #[error("Request failed: {0}")]
    Request(String),

    /// Response body could not be decoded into the expected model
    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Wallet address required")]
    MissingWallet,
}

impl BoardError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// HTTP status associated with this error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::AlreadyClaimed { .. } => Some(409),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Server-side failures worth another attempt. Conflicts and other 4xx
    /// are deterministic given the board state and never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status >= 500,
            Self::Request(_) => true,
            _ => false,
        }
    }

    pub fn is_already_claimed(&self) -> bool {
        matches!(self, Self::AlreadyClaimed { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
