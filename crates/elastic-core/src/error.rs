//! Error taxonomy for the client.
//!
//! Every failure a caller can observe normalizes to [`ElasticError`]; raw
//! transport failures never escape unclassified.

use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::response::ResponseEnvelope;
use crate::types::ErrorBody;
use crate::validation::ValidationError;

/// Failure raised by the transport port.
///
/// `Status` carries the full response so the dispatch core can reinterpret
/// it against the per-call acceptable-status set; the other variants are
/// failures where no HTTP status was obtainable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("server returned status [{}]", .response.status)]
    Status { response: ResponseEnvelope },

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { response } => Some(response.status),
            _ => None,
        }
    }
}

/// Normalized API error: the server answered with a status outside the
/// per-call acceptable set.
///
/// When the response body parsed as the service's structured error document,
/// `error` holds it; otherwise `body` keeps a snippet of the raw body and
/// `message` records what went wrong while normalizing.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: u16,
    pub error: Option<ErrorBody>,
    pub message: String,
    pub body: Option<String>,
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "status [{}]", self.status)?;
        if let Some(error) = &self.error {
            if let Some(kind) = &error.error.kind {
                write!(f, " [{kind}]")?;
            }
            if let Some(reason) = &error.error.reason {
                write!(f, ": {reason}")?;
            }
            return Ok(());
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Top-level client error.
#[derive(Debug, Error)]
pub enum ElasticError {
    /// The request failed client-side validation; nothing was sent.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The transport failed before a status was obtainable.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a non-acceptable status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A response was received but could not be converted.
    #[error("{message}")]
    Parse {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The compatibility gate resolved incompatible; nothing was sent.
    #[error("incompatible server: {0}")]
    Compatibility(String),

    /// The call was cancelled through its cancellation handle before a
    /// result was produced.
    #[error("request was cancelled")]
    Cancelled,
}

impl ElasticError {
    /// HTTP status attached to this error, if any was obtained.
    pub fn status(&self) -> Option<u16> {
        match self {
            ElasticError::Transport(error) => error.status(),
            ElasticError::Api(error) => Some(error.status),
            _ => None,
        }
    }
}
