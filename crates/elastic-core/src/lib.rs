//! # elastic-core
//!
//! Core types for a typed Elasticsearch client.
//!
//! This crate provides:
//! - Plain-data request and response descriptors (the transport lives in
//!   `elastic-http`)
//! - The media-type table, including versioned-compatible forms
//! - Client-side request validation
//! - Server version parsing and the product compatibility policy
//! - The client error taxonomy
//!
//! ## Example
//!
//! ```rust
//! use elastic_core::{validate_product, Compatibility, InfoResponse};
//!
//! let info: InfoResponse = serde_json::from_str(
//!     r#"{"version": {"number": "8.9.0"}}"#,
//! ).unwrap();
//!
//! let outcome = validate_product(&info, Some("Elasticsearch"));
//! assert_eq!(outcome, Compatibility::Compatible);
//! ```

pub mod error;
pub mod media;
pub mod request;
pub mod response;
pub mod types;
pub mod validation;
pub mod version;

// Re-exports for convenience
pub use error::*;
pub use media::*;
pub use request::*;
pub use response::*;
pub use types::*;
pub use validation::*;
pub use version::*;
