//! One-time server compatibility gate.
//!
//! The first request on a client triggers a discovery call to the root
//! endpoint; its outcome — compatible, or incompatible with a reason — is
//! memoized and shared by every concurrent and later call on the same
//! client. A discovery that fails at the transport level clears the memo
//! *before* failing its waiters, so the next request starts a fresh attempt:
//! retry is caller-driven, never timer-driven.

use std::sync::{Arc, Mutex};

use elastic_core::{
    validate_product, Compatibility, HttpMethod, InfoResponse, RequestDescriptor,
    ResponseEnvelope, TransportError, PRODUCT_HEADER,
};
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use crate::transport::Transport;

type GateFuture = Shared<BoxFuture<'static, Result<Compatibility, TransportError>>>;
type GateSlot = Arc<Mutex<Option<GateFuture>>>;

/// Shared, lazily-computed compatibility check.
///
/// "Not yet known" is an empty slot; a published future is either in flight
/// or resolved. The slot mutex guards only the create-if-absent transition —
/// attaching to a published future is a clone, no further locking.
#[derive(Clone)]
pub(crate) struct CompatibilityGate {
    transport: Arc<dyn Transport>,
    slot: GateSlot,
}

impl CompatibilityGate {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// The future shared by all callers of the current epoch, created and
    /// published by the first caller to observe an empty slot. No duplicate
    /// discovery call is issued while one is outstanding.
    pub fn future(&self) -> GateFuture {
        let mut slot = self.slot.lock().expect("gate slot lock poisoned");
        if let Some(future) = slot.as_ref() {
            return future.clone();
        }

        let future = discover(Arc::clone(&self.transport), Arc::clone(&self.slot))
            .boxed()
            .shared();
        *slot = Some(future.clone());
        future
    }
}

/// Issue the discovery request and resolve the check.
///
/// Driven by whichever caller polls the shared future first; dropping one
/// waiter never cancels the discovery for the others.
async fn discover(
    transport: Arc<dyn Transport>,
    slot: GateSlot,
) -> Result<Compatibility, TransportError> {
    debug!("issuing discovery request to validate the server product");
    let request = RequestDescriptor::new(HttpMethod::Get, "/");

    match transport.send(&request).await {
        Ok(response) => Ok(validate_discovery_response(&response)),
        Err(TransportError::Status { response })
            if response.status == 401 || response.status == 403 =>
        {
            // The root endpoint is not readable with these credentials.
            // Let requests through; validation is not possible.
            debug!(
                status = response.status,
                "discovery endpoint denied access, skipping product validation"
            );
            Ok(Compatibility::Compatible)
        }
        Err(error) => {
            // Clear the memo first so the next caller retries, then fail the
            // waiters of this attempt. The order matters: a waiter reacting
            // to this failure must already observe the empty slot.
            *slot.lock().expect("gate slot lock poisoned") = None;
            warn!(error = %error, "discovery request failed");
            Err(error)
        }
    }
}

/// Apply the product policy to a delivered discovery response.
///
/// A body that does not parse as an info document resolves the check to
/// incompatible — it is not a transport failure and is memoized like any
/// other outcome.
fn validate_discovery_response(response: &ResponseEnvelope) -> Compatibility {
    if response.status == 401 || response.status == 403 {
        return Compatibility::Compatible;
    }

    let info: InfoResponse = match response
        .body
        .as_deref()
        .ok_or_else(|| "response body expected but not returned".to_string())
        .and_then(|body| serde_json::from_slice(body).map_err(|e| e.to_string()))
    {
        Ok(info) => info,
        Err(error) => {
            warn!(error = %error, "failed to parse the discovery response");
            return Compatibility::Incompatible(format!(
                "Failed to parse info response. Check logs for detailed information - {error}"
            ));
        }
    };

    validate_product(&info, response.header_value(PRODUCT_HEADER))
}
