//! Request/response lifecycle logging.
//!
//! Every sent request reports two events to a [`Logger`]: one after the
//! transport call returns (method, URL, latency) and one once the response body
//! has been read (status, headers, body). Body codec failures are reported too.
//! The default [`TracingLogger`] turns them into `tracing` events; [`NoLogger`]
//! silences a request entirely.

use crate::Error;
use http::{HeaderMap, Method, StatusCode};
use std::time::Duration;

/// Sink for request lifecycle events.
///
/// Implementations must be cheap to call and safe to share between concurrent
/// requests.
pub trait Logger: Send + Sync {
    /// Called once per request after the transport call returned, whether it
    /// succeeded or not.
    fn request(&self, method: &Method, url: &str, latency: Duration);

    /// Called once the full response body has been read.
    fn response(&self, status: StatusCode, headers: &HeaderMap, body: &[u8]);

    /// Called when `send` gives up because the request body could not be encoded.
    fn encode_failed(&self, _error: &Error) {}

    /// Called when a response body could not be decoded.
    fn decode_failed(&self, _error: &Error) {}
}

/// Emits lifecycle events through `tracing`.
///
/// The request line and the response status are logged at `info`, headers and
/// body at `debug`. Responses with a status of 400 or above are logged at
/// `warn` together with their body.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn request(&self, method: &Method, url: &str, latency: Duration) {
        tracing::info!(
            method = %method,
            url = %url,
            latency_ms = latency.as_millis(),
            "Executed HTTP request"
        );
    }

    fn response(&self, status: StatusCode, headers: &HeaderMap, body: &[u8]) {
        let body = String::from_utf8_lossy(body);

        if status.is_client_error() || status.is_server_error() {
            tracing::warn!(
                status = status.as_u16(),
                response = %body,
                "Received HTTP error response"
            );
        } else {
            tracing::info!(status = status.as_u16(), "Received HTTP response");
        }

        tracing::debug!(headers = ?headers, body = %body, "Response details");
    }

    fn encode_failed(&self, error: &Error) {
        tracing::error!(error = %error, "Failed to encode request body");
    }

    fn decode_failed(&self, error: &Error) {
        tracing::error!(
            error = %error,
            raw_response = error.raw_response().unwrap_or_default(),
            "Failed to deserialize response"
        );
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLogger;

impl Logger for NoLogger {
    fn request(&self, _method: &Method, _url: &str, _latency: Duration) {}

    fn response(&self, _status: StatusCode, _headers: &HeaderMap, _body: &[u8]) {}

    fn encode_failed(&self, _error: &Error) {}

    fn decode_failed(&self, _error: &Error) {}
}
