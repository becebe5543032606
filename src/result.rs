//! The outcome of a single call.

use crate::Error;
use http::StatusCode;

/// Status, protocol error text, and transport error of a sent request.
///
/// A transport error means no response was received, so `status_code` stays
/// `0` and `response_error` stays empty. A status of 400 or above is not a
/// transport error: `err` stays `None` and `response_error` holds the raw
/// response body.
#[derive(Debug, Clone, Default)]
pub struct CallResult {
    /// The HTTP status code, or `0` if no response was received.
    pub status_code: u16,
    /// The raw response body, set only when `status_code >= 400`.
    pub response_error: String,
    /// The transport, build, or decode error, if any.
    pub err: Option<Error>,
}

impl CallResult {
    pub(crate) fn failed(err: Error) -> Self {
        Self {
            err: Some(err),
            ..Self::default()
        }
    }

    /// Returns the unified error of the call.
    ///
    /// The transport error wins if there is one. Otherwise a status of 400 or
    /// above yields [`Error::HttpError`], displayed as `[<code>]<body>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use restclient::CallResult;
    ///
    /// let result = CallResult {
    ///     status_code: 400,
    ///     response_error: "Blob is broken\n".to_string(),
    ///     err: None,
    /// };
    /// assert_eq!(result.error().unwrap().to_string(), "[400]Blob is broken\n");
    ///
    /// let ok = CallResult { status_code: 204, ..Default::default() };
    /// assert!(ok.error().is_none());
    /// ```
    pub fn error(&self) -> Option<Error> {
        if let Some(err) = &self.err {
            return Some(err.clone());
        }
        if self.status_code >= 400 {
            let status = StatusCode::from_u16(self.status_code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return Some(Error::HttpError {
                status,
                raw_response: self.response_error.clone(),
            });
        }
        None
    }

    /// Returns `Err` with the unified error, `Ok(())` otherwise.
    pub fn into_result(self) -> crate::Result<()> {
        match self.error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Returns `true` if neither a transport nor a protocol error occurred.
    pub fn is_success(&self) -> bool {
        self.err.is_none() && self.status_code < 400
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Format;

    #[test]
    fn test_no_error_below_400() {
        for code in [200, 201, 204, 301, 399] {
            let result = CallResult {
                status_code: code,
                ..Default::default()
            };
            assert!(result.error().is_none(), "status {}", code);
            assert!(result.is_success());
        }
    }

    #[test]
    fn test_protocol_error() {
        let result = CallResult {
            status_code: 503,
            response_error: "down".to_string(),
            err: None,
        };

        let err = result.error().unwrap();
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "[503]down");
        assert!(result.clone().into_result().is_err());
    }

    #[test]
    fn test_transport_error_wins() {
        let result = CallResult {
            status_code: 500,
            response_error: "ignored".to_string(),
            err: Some(Error::SerializationFailed {
                format: Format::Json,
                message: "boom".to_string(),
            }),
        };

        match result.error() {
            Some(Error::SerializationFailed { message, .. }) => assert_eq!(message, "boom"),
            other => panic!("Expected SerializationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_leaves_status_unset() {
        let result = CallResult::failed(Error::Configuration("bad".to_string()));
        assert_eq!(result.status_code, 0);
        assert!(result.response_error.is_empty());
        assert!(!result.is_success());
    }
}
