//! Error types surfaced by a lookup.
//!
//! Transport and rejection failures end the lookup; a malformed handle only
//! costs the one derived account link.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("query endpoint unreachable: {reason}")]
    Transport { reason: String },

    #[error("query endpoint returned HTTP {status}")]
    QueryRejected { status: u32 },

    #[error("query response could not be decoded: {reason}")]
    Decode { reason: String },

    #[error("invalid query endpoint {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

impl From<curl::Error> for LookupError {
    fn from(error: curl::Error) -> Self {
        Self::Transport {
            reason: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode {
            reason: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("account handle {handle:?} has no user@host separator")]
    MalformedHandle { handle: String },
}
