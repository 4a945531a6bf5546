//! Client-side request validation.
//!
//! Validation runs before any conversion or network call: a request that
//! fails its own `validate` never reaches the transport.

use thiserror::Error;

use crate::types::{DeleteRequest, GetRequest, IndexRequest, InfoRequest, PingRequest, SearchRequest};

/// Errors raised by client-side validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid field value: {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Validation hook checked by the dispatch core before a request is sent.
///
/// The default implementation accepts everything; request types with
/// required fields override it.
pub trait Validatable {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl Validatable for InfoRequest {}

impl Validatable for PingRequest {}

impl Validatable for GetRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require("index", &self.index)?;
        require("id", &self.id)
    }
}

impl Validatable for IndexRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require("index", &self.index)?;
        if let Some(id) = &self.id {
            require("id", id)?;
        }
        Ok(())
    }
}

impl Validatable for DeleteRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require("index", &self.index)?;
        require("id", &self.id)
    }
}

impl Validatable for SearchRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        for index in &self.indices {
            require("indices", index)?;
        }
        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}
