//! Normalization of status errors into typed API errors.

use elastic_core::{ApiError, ErrorBody, ResponseEnvelope};
use tracing::debug;

const SNIPPET_LEN: usize = 256;

/// Convert a status-carrying transport failure into a normalized [`ApiError`].
///
/// If the response has a body, it is parsed as the service's structured error
/// document; when that fails — some proxies answer with HTML, some endpoints
/// with plain text — the result falls back to a status-only error with a body
/// snippet. This function never fails: callers always get a valid normalized
/// error.
pub fn normalize_status_error(response: &ResponseEnvelope) -> ApiError {
    let status = response.status;
    let message = format!("server returned status [{status}]");

    let Some(body) = response.body.as_deref() else {
        return ApiError {
            status,
            error: None,
            message,
            body: None,
        };
    };

    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(document) => ApiError {
            status,
            error: Some(document),
            message,
            body: None,
        },
        Err(parse_error) => {
            debug!(status, error = %parse_error, "error body did not parse as an error document");
            ApiError {
                status,
                error: None,
                message: format!("Unable to parse response body: {parse_error}"),
                body: response.body_snippet(SNIPPET_LEN),
            }
        }
    }
}
