//! Transport port and its reqwest implementation.
//!
//! The dispatch core talks to the network through the [`Transport`] trait so
//! tests can substitute a scripted transport without real HTTP requests. The
//! production implementation wraps a pooled `reqwest::Client`.
//!
//! # Error Classification
//!
//! - Non-2xx status → [`TransportError::Status`] carrying the full response
//! - Timeouts → [`TransportError::Timeout`]
//! - Connection failures → [`TransportError::Connect`]
//! - Everything else → [`TransportError::Other`]

use std::time::Duration;

use async_trait::async_trait;
use elastic_core::{HttpMethod, RequestDescriptor, ResponseEnvelope, TransportError};
use tracing::{debug, warn};

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Base URL of the server (e.g. "http://localhost:9200")
    pub base_url: String,
    /// Request timeout (includes connection + response)
    pub timeout: Duration,
    /// Connection timeout (TCP + TLS handshake)
    pub connect_timeout: Duration,
    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,
    /// Idle connection timeout
    pub pool_idle_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            pool_max_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl TransportConfig {
    /// Create a new config with the specified base URL and default values
    /// for all other settings.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Single-call HTTP port.
///
/// Implementations perform exactly one HTTP round-trip per call and raise
/// [`TransportError::Status`] for non-2xx responses so the dispatch core can
/// reinterpret them against the per-call acceptable-status set. Retries,
/// timeouts, and connection pooling are the implementation's business.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Result<ResponseEnvelope, TransportError>;
}

/// Reqwest-backed transport.
///
/// # Thread Safety
///
/// `Clone` and shareable across tasks; the underlying reqwest client handles
/// connection pooling internally.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: TransportConfig,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build http client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Wrap a pre-built reqwest client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            config: TransportConfig::with_base_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url_for(&self, request: &RequestDescriptor) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            request.path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<ResponseEnvelope, TransportError> {
        let url = self.url_for(request);
        debug!(method = request.method.as_str(), url = %url, "sending request");

        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &url);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            if !request.has_header("Content-Type") {
                builder = builder.header("Content-Type", &body.media_type);
            }
            builder = builder.body(body.content.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify_error(e, &url))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_error(e, &url))?;

        let envelope = ResponseEnvelope {
            status,
            headers,
            body: if bytes.is_empty() {
                None
            } else {
                Some(bytes.to_vec())
            },
        };

        if envelope.is_success() {
            Ok(envelope)
        } else {
            warn!(status, url = %url, "server returned error status");
            Err(TransportError::Status { response: envelope })
        }
    }
}

/// Classify a reqwest error into the transport taxonomy.
fn classify_error(error: reqwest::Error, url: &str) -> TransportError {
    if error.is_timeout() {
        warn!(url = %url, "request timed out");
        TransportError::Timeout(error.to_string())
    } else if error.is_connect() {
        warn!(url = %url, "failed to connect");
        TransportError::Connect(error.to_string())
    } else {
        warn!(url = %url, error = %error, "request failed");
        TransportError::Other(error.to_string())
    }
}
