//! Scripted transport and response fixtures shared by the dispatch, gate,
//! and cancellation tests.
#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use elastic_core::{RequestDescriptor, ResponseEnvelope, TransportError};
use elastic_http::Transport;

type Responder =
    Box<dyn Fn(&RequestDescriptor) -> Result<ResponseEnvelope, TransportError> + Send + Sync>;

/// Transport stub driven by a scripted responder, recording every call.
///
/// The discovery call targets "/", substantive calls target anything else;
/// the counters below split on that.
pub struct MockTransport {
    responder: Responder,
    delay: Option<Duration>,
    calls: Mutex<Vec<RequestDescriptor>>,
}

impl MockTransport {
    pub fn new(
        responder: impl Fn(&RequestDescriptor) -> Result<ResponseEnvelope, TransportError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Delay every response; used to hold the gate open while concurrent
    /// callers pile up.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RequestDescriptor> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Calls against the discovery endpoint.
    pub fn discovery_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.path == "/")
            .count()
    }

    /// Calls against anything but the discovery endpoint.
    pub fn substantive_calls(&self) -> usize {
        self.call_count() - self.discovery_calls()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<ResponseEnvelope, TransportError> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(request)
    }
}

/// Info body for a current server.
pub fn info_body() -> Vec<u8> {
    br#"{
        "name": "node-1",
        "cluster_name": "docs",
        "version": {"number": "8.9.0", "build_flavor": "default"},
        "tagline": "You Know, for Search"
    }"#
    .to_vec()
}

/// 2xx discovery response advertising a current server with the product
/// header set.
pub fn info_envelope() -> ResponseEnvelope {
    ResponseEnvelope::new(200)
        .header("X-Elastic-Product", "Elasticsearch")
        .header("Content-Type", "application/json")
        .body(info_body())
}

/// JSON response envelope with the given status.
pub fn json_envelope(status: u16, value: serde_json::Value) -> ResponseEnvelope {
    ResponseEnvelope::new(status)
        .header("Content-Type", "application/json")
        .body(serde_json::to_vec(&value).unwrap())
}

/// Found-document body for `GET /{index}/_doc/{id}`.
pub fn found_doc(index: &str, id: &str) -> serde_json::Value {
    serde_json::json!({
        "_index": index,
        "_id": id,
        "found": true,
        "_source": {"title": "a document"}
    })
}

/// Not-found body carried on a get 404.
pub fn missing_doc(index: &str, id: &str) -> serde_json::Value {
    serde_json::json!({
        "_index": index,
        "_id": id,
        "found": false
    })
}

/// Responder answering the discovery call with a compatible server and every
/// other call with `response`.
pub fn compatible_server(
    response: impl Fn(&RequestDescriptor) -> Result<ResponseEnvelope, TransportError>
        + Send
        + Sync
        + 'static,
) -> impl Fn(&RequestDescriptor) -> Result<ResponseEnvelope, TransportError> + Send + Sync + 'static
{
    move |request| {
        if request.path == "/" {
            Ok(info_envelope())
        } else {
            response(request)
        }
    }
}
