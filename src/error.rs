//! Error types for building, sending, and decoding requests.
//!
//! Two classes of failure exist. Transport and build errors (the call could not
//! be made or its body could not be read or decoded) and protocol errors (a
//! complete response arrived with a status of 400 or above). Both are folded
//! into the single [`Error`] type so callers that don't care about the
//! difference can use one `?`.

use http::StatusCode;
use std::sync::Arc;

/// The body format a codec error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `application/json`
    Json,
    /// `application/xml`
    Xml,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Json => f.write_str("JSON"),
            Format::Xml => f.write_str("XML"),
        }
    }
}

/// The main error type of the crate.
///
/// The type is `Clone` so that a [`CallResult`](crate::CallResult) can hand out
/// its unified error by value without giving up its own copy.
///
/// # Examples
///
/// ```no_run
/// use restclient::Error;
///
/// # async fn example() {
/// let item = restclient::get("https://api.example.com/users").send().await;
///
/// match item.error() {
///     None => println!("ok: {}", item.text()),
///     Some(Error::HttpError { status, raw_response }) => {
///         eprintln!("server said {}: {}", status, raw_response);
///     }
///     Some(e) => eprintln!("call failed: {}", e),
/// }
/// # }
/// ```
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    /// A network-level error occurred (connection failed, DNS lookup failed,
    /// TLS handshake failed, or the response body could not be read).
    #[error("Network error: {0}")]
    Network(#[source] Arc<reqwest::Error>),

    /// The transport refused to construct the request.
    ///
    /// Typical causes are a malformed URL or an invalid header name or value.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[source] Arc<reqwest::Error>),

    /// Failed to encode the outgoing request body.
    ///
    /// This is recorded by the request builder and surfaced when the request
    /// is sent, before any network activity.
    #[error("Failed to serialize {format} request body: {message}")]
    SerializationFailed {
        /// The body format that was being produced
        format: Format,
        /// The codec error message
        message: String,
    },

    /// Failed to decode the response body into the requested type.
    #[error("Failed to deserialize {format} response: {message}")]
    DeserializationFailed {
        /// The body format that was being decoded
        format: Format,
        /// The codec error message
        message: String,
        /// The raw response body as text
        raw_response: String,
    },

    /// Invalid configuration was provided to a [`RestClientBuilder`](crate::RestClientBuilder).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The server answered with a status code of 400 or above.
    ///
    /// The display form is `[<code>]<body>`, e.g. `[400]Blob is broken`.
    #[error("[{}]{}", .status.as_u16(), .raw_response)]
    HttpError {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
    },
}

impl Error {
    /// Returns `true` for transport and build errors, `false` for protocol errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use restclient::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::HttpError {
    ///     status: StatusCode::NOT_FOUND,
    ///     raw_response: "missing".to_string(),
    /// };
    /// assert!(!err.is_transport());
    /// assert_eq!(err.to_string(), "[404]missing");
    /// ```
    pub fn is_transport(&self) -> bool {
        !matches!(self, Error::HttpError { .. })
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpError { status, .. } => Some(*status),
            Error::Network(e) | Error::InvalidRequest(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error carries one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::HttpError { raw_response, .. } => Some(raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            Error::InvalidRequest(Arc::new(e))
        } else {
            Error::Network(Arc::new(e))
        }
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
