//! Dispatch core: typed request execution against the transport.
//!
//! Three entry points share one pipeline:
//!
//! - [`ElasticClient::perform`] — async execution
//! - [`ElasticClient::perform_blocking`] — blocks the calling thread
//! - [`ElasticClient::perform_with_listener`] — callback delivery with a
//!   [`Cancellable`] handle
//!
//! The pipeline per call: client-side validation, conversion to a transport
//! descriptor, compatibility-mode header rewriting, the shared compatibility
//! gate, the transport call, and classification of the result against the
//! per-call acceptable-status set.

use std::sync::{Arc, OnceLock};

use elastic_core::{
    Compatibility, ElasticError, RequestDescriptor, ResponseEnvelope, StatusSet, TransportError,
    Validatable,
};
use tokio::runtime::{Builder as RuntimeBuilder, Handle, Runtime};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cancel::Cancellable;
use crate::classify::normalize_status_error;
use crate::compat::rewrite_for_compatibility;
use crate::gate::CompatibilityGate;
use crate::transport::{HttpTransport, Transport, TransportConfig};

/// Environment variable enabling compatibility-mode header rewriting when no
/// explicit choice was made at construction. Checked once, at construction.
pub const API_VERSIONING_ENV_VARIABLE: &str = "ELASTIC_CLIENT_APIVERSIONING";

/// Failure produced by a response converter; wrapped into
/// [`ElasticError::Parse`] with the original cause preserved.
pub type ConversionError = Box<dyn std::error::Error + Send + Sync>;

/// Typed client over a [`Transport`].
///
/// # Thread Safety
///
/// The client holds no call-specific state; concurrent blocking and async
/// calls on a shared instance are independent except through the
/// compatibility gate, whose outcome they share.
pub struct ElasticClient {
    transport: Arc<dyn Transport>,
    gate: CompatibilityGate,
    api_compatibility: bool,
    fallback_runtime: OnceLock<Runtime>,
}

impl ElasticClient {
    /// Client over a reqwest transport with the given configuration.
    /// Compatibility mode follows [`API_VERSIONING_ENV_VARIABLE`].
    pub fn new(config: TransportConfig) -> Result<Self, ElasticError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::builder().build(Arc::new(transport)))
    }

    /// Client over an explicit transport, with compatibility mode from the
    /// environment. Tests use this to inject scripted transports.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self::builder().build(transport)
    }

    pub fn builder() -> ElasticClientBuilder {
        ElasticClientBuilder::default()
    }

    /// Whether compatibility-mode header rewriting is active.
    pub fn api_compatibility(&self) -> bool {
        self.api_compatibility
    }

    /// Asynchronous execution.
    ///
    /// Validation and conversion failures surface before anything is sent;
    /// the compatibility gate resolves before the substantive call is issued.
    pub async fn perform<R, T, RC, TC>(
        &self,
        request: &R,
        request_converter: RC,
        response_converter: TC,
        ignores: StatusSet,
    ) -> Result<T, ElasticError>
    where
        R: Validatable,
        RC: Fn(&R) -> Result<RequestDescriptor, ElasticError>,
        TC: Fn(&ResponseEnvelope) -> Result<T, ConversionError>,
    {
        let descriptor = self.prepare(request, request_converter)?;
        dispatch(
            self.gate.clone(),
            Arc::clone(&self.transport),
            descriptor,
            response_converter,
            ignores,
            None,
        )
        .await
    }

    /// Blocking execution. Drives the async path on a client-owned runtime.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async context; use [`perform`] there.
    ///
    /// [`perform`]: ElasticClient::perform
    pub fn perform_blocking<R, T, RC, TC>(
        &self,
        request: &R,
        request_converter: RC,
        response_converter: TC,
        ignores: StatusSet,
    ) -> Result<T, ElasticError>
    where
        R: Validatable,
        RC: Fn(&R) -> Result<RequestDescriptor, ElasticError>,
        TC: Fn(&ResponseEnvelope) -> Result<T, ConversionError>,
    {
        self.fallback_runtime()
            .block_on(self.perform(request, request_converter, response_converter, ignores))
    }

    /// Asynchronous execution with callback delivery.
    ///
    /// Validation and conversion run synchronously, before any suspension
    /// point: a failure there invokes the listener immediately and returns
    /// [`Cancellable::no_op`] — nothing was sent, there is nothing to cancel.
    /// Otherwise the call is queued on the compatibility gate and the
    /// returned handle cancels it; a cancellation requested before the
    /// transport call is issued is honored at issuance, and the listener
    /// receives [`ElasticError::Cancelled`] — never a silent drop.
    ///
    /// The listener runs on the resolving task; callers must not assume a
    /// particular thread identity.
    pub fn perform_with_listener<R, T, RC, TC, L>(
        &self,
        request: &R,
        request_converter: RC,
        response_converter: TC,
        ignores: StatusSet,
        listener: L,
    ) -> Cancellable
    where
        R: Validatable,
        RC: Fn(&R) -> Result<RequestDescriptor, ElasticError>,
        TC: Fn(&ResponseEnvelope) -> Result<T, ConversionError> + Send + 'static,
        T: Send + 'static,
        L: FnOnce(Result<T, ElasticError>) + Send + 'static,
    {
        let descriptor = match self.prepare(request, request_converter) {
            Ok(descriptor) => descriptor,
            Err(error) => {
                listener(Err(error));
                return Cancellable::no_op();
            }
        };

        let token = CancellationToken::new();
        let cancellable = Cancellable::armed(token.clone());
        let call = dispatch(
            self.gate.clone(),
            Arc::clone(&self.transport),
            descriptor,
            response_converter,
            ignores,
            Some(token),
        );
        self.spawn_handle().spawn(async move {
            listener(call.await);
        });

        cancellable
    }

    /// Steps shared by every entry point: validation, conversion, and
    /// compatibility-mode rewriting. The rewrite only ever touches the fresh
    /// descriptor built here, never a caller-held request.
    fn prepare<R, RC>(
        &self,
        request: &R,
        request_converter: RC,
    ) -> Result<RequestDescriptor, ElasticError>
    where
        R: Validatable,
        RC: Fn(&R) -> Result<RequestDescriptor, ElasticError>,
    {
        request.validate()?;
        let mut descriptor = request_converter(request)?;
        if self.api_compatibility {
            rewrite_for_compatibility(&mut descriptor);
        }
        Ok(descriptor)
    }

    /// Runtime for blocking calls and for listener dispatch outside a tokio
    /// context. Built on first use; a single worker is plenty, the client
    /// only parks on I/O here.
    fn fallback_runtime(&self) -> &Runtime {
        self.fallback_runtime.get_or_init(|| {
            RuntimeBuilder::new_multi_thread()
                .worker_threads(1)
                .thread_name("elastic-client")
                .enable_all()
                .build()
                .expect("failed to build the client runtime")
        })
    }

    fn spawn_handle(&self) -> Handle {
        Handle::try_current().unwrap_or_else(|_| self.fallback_runtime().handle().clone())
    }
}

/// Builder for [`ElasticClient`].
#[derive(Debug, Default)]
pub struct ElasticClientBuilder {
    api_compatibility: Option<bool>,
}

impl ElasticClientBuilder {
    /// Explicitly enable or disable compatibility mode, overriding the
    /// environment flag.
    pub fn api_compatibility(mut self, enabled: bool) -> Self {
        self.api_compatibility = Some(enabled);
        self
    }

    pub fn build(self, transport: Arc<dyn Transport>) -> ElasticClient {
        let api_compatibility = self.api_compatibility.unwrap_or_else(|| {
            std::env::var(API_VERSIONING_ENV_VARIABLE)
                .map(|value| value == "true")
                .unwrap_or(false)
        });

        ElasticClient {
            gate: CompatibilityGate::new(Arc::clone(&transport)),
            transport,
            api_compatibility,
            fallback_runtime: OnceLock::new(),
        }
    }
}

/// The asynchronous half of the pipeline: gate, transport call, and
/// classification. Cancellation, when a token is present, is honored while
/// waiting on the gate, at the moment of issuance, and during the call;
/// dropping the transport future aborts the underlying request. Waiting on
/// the gate never cancels the shared discovery on behalf of other callers.
async fn dispatch<T, TC>(
    gate: CompatibilityGate,
    transport: Arc<dyn Transport>,
    descriptor: RequestDescriptor,
    response_converter: TC,
    ignores: StatusSet,
    cancellation: Option<CancellationToken>,
) -> Result<T, ElasticError>
where
    TC: Fn(&ResponseEnvelope) -> Result<T, ConversionError>,
{
    let gate_future = gate.future();
    let gate_outcome = match &cancellation {
        Some(token) => tokio::select! {
            _ = token.cancelled() => return Err(ElasticError::Cancelled),
            outcome = gate_future => outcome,
        },
        None => gate_future.await,
    };

    match gate_outcome {
        Ok(Compatibility::Compatible) => {}
        Ok(Compatibility::Incompatible(reason)) => {
            return Err(ElasticError::Compatibility(reason));
        }
        Err(error) => return Err(ElasticError::Transport(error)),
    }

    // A cancellation requested while the gate was resolving is observed
    // here, before the call is issued.
    if let Some(token) = &cancellation {
        if token.is_cancelled() {
            return Err(ElasticError::Cancelled);
        }
    }

    debug!(
        method = descriptor.method.as_str(),
        path = %descriptor.path,
        "dispatching request"
    );
    let send = transport.send(&descriptor);
    let result = match &cancellation {
        Some(token) => tokio::select! {
            _ = token.cancelled() => return Err(ElasticError::Cancelled),
            result = send => result,
        },
        None => send.await,
    };

    finish(result, &response_converter, &ignores)
}

/// Classification of a transport outcome against the acceptable-status set.
///
/// An acceptable status is first treated as a valid response shape; only if
/// that conversion fails is it normalized as an error — a `get` 404 is a
/// regular "not found" document when it parses, an error document when it
/// does not.
fn finish<T, TC>(
    result: Result<ResponseEnvelope, TransportError>,
    response_converter: &TC,
    ignores: &StatusSet,
) -> Result<T, ElasticError>
where
    TC: Fn(&ResponseEnvelope) -> Result<T, ConversionError>,
{
    match result {
        Ok(response) => response_converter(&response).map_err(|source| ElasticError::Parse {
            message: format!(
                "unable to parse response body for status [{}]",
                response.status
            ),
            source,
        }),
        Err(TransportError::Status { response }) => {
            if ignores.contains(response.status) {
                match response_converter(&response) {
                    Ok(converted) => Ok(converted),
                    Err(_) => Err(ElasticError::Api(normalize_status_error(&response))),
                }
            } else {
                Err(ElasticError::Api(normalize_status_error(&response)))
            }
        }
        Err(error) => Err(ElasticError::Transport(error)),
    }
}
