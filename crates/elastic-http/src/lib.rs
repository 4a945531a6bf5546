//! # elastic-http
//!
//! HTTP transport and request dispatch for the typed Elasticsearch client.
//!
//! This crate provides:
//! - The [`Transport`] port and its reqwest implementation
//! - The dispatch core: async, blocking, and listener execution of typed
//!   requests, with per-call acceptable-status classification
//! - The one-time server compatibility gate shared by all calls on a client
//! - Cancellation handles for listener-based calls
//! - Compatibility-mode header rewriting and error normalization
//!
//! ## Example
//!
//! ```ignore
//! use elastic_http::{ElasticClient, TransportConfig};
//! use elastic_core::GetRequest;
//!
//! let client = ElasticClient::new(TransportConfig::with_base_url(
//!     "http://localhost:9200",
//! ))?;
//!
//! let doc = client.get(&GetRequest::new("docs", "1")).await?;
//! if doc.found {
//!     println!("{:?}", doc.source);
//! }
//! ```

mod cancel;
mod classify;
mod client;
mod compat;
mod gate;
mod ops;
mod transport;

pub use cancel::Cancellable;
pub use classify::normalize_status_error;
pub use client::{
    ConversionError, ElasticClient, ElasticClientBuilder, API_VERSIONING_ENV_VARIABLE,
};
pub use compat::rewrite_for_compatibility;
pub use transport::{HttpTransport, Transport, TransportConfig};
