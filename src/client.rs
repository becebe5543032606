//! Client configuration shared by requests.
//!
//! A [`RestClient`] bundles the `reqwest::Client` used for the transport call,
//! the [`Logger`] that receives lifecycle events, and headers added to every
//! request. Use [`RestClientBuilder`] to configure one, or the free functions
//! [`get`], [`post`], [`put`] and [`delete`] for the process-wide default.

use crate::logger::{Logger, NoLogger, TracingLogger};
use crate::{Error, RequestBuilder, Result};
use http::{HeaderName, HeaderValue, Method};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Configuration applied to every request created from it.
///
/// Cloning is cheap; clones share the same connection pool.
///
/// # Examples
///
/// ```no_run
/// use restclient::RestClient;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), restclient::Error> {
/// let client = RestClient::builder()
///     .timeout(Duration::from_secs(30))
///     .default_header("User-Agent", "my-app/1.0")?
///     .build()?;
///
/// let item = client.get("https://api.example.com/users").query_param("limit", 14).send().await;
/// println!("{}", item.text());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    http_client: reqwest::Client,
    logger: Arc<dyn Logger>,
    default_headers: Vec<(String, String)>,
}

impl RestClient {
    /// Creates a new `RestClientBuilder` for configuring a client.
    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::new()
    }

    /// Starts a `GET` request to `path`.
    pub fn get(&self, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self, Method::GET, path)
    }

    /// Starts a `POST` request to `path`.
    pub fn post(&self, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self, Method::POST, path)
    }

    /// Starts a `PUT` request to `path`.
    pub fn put(&self, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self, Method::PUT, path)
    }

    /// Starts a `DELETE` request to `path`.
    pub fn delete(&self, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self, Method::DELETE, path)
    }

    pub(crate) fn http_client(&self) -> &reqwest::Client {
        &self.inner.http_client
    }

    pub(crate) fn logger(&self) -> Arc<dyn Logger> {
        Arc::clone(&self.inner.logger)
    }

    pub(crate) fn default_headers(&self) -> &[(String, String)] {
        &self.inner.default_headers
    }

    /// Returns the process-wide default client, built on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client could not be built.
    pub fn shared() -> Result<&'static RestClient> {
        static DEFAULT: OnceLock<Result<RestClient>> = OnceLock::new();
        DEFAULT
            .get_or_init(|| RestClientBuilder::new().build())
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("default_headers", &self.inner.default_headers)
            .finish_non_exhaustive()
    }
}

fn with_default(
    shared: Result<&RestClient>,
    method: Method,
    path: impl Into<String>,
) -> RequestBuilder {
    match shared {
        Ok(client) => RequestBuilder::new(client, method, path),
        Err(err) => RequestBuilder::unusable(method, path, err),
    }
}

/// Starts a `GET` request with the default client.
///
/// If the default client cannot be built, the error is returned by `send`.
pub fn get(path: impl Into<String>) -> RequestBuilder {
    with_default(RestClient::shared(), Method::GET, path)
}

/// Starts a `POST` request with the default client.
pub fn post(path: impl Into<String>) -> RequestBuilder {
    with_default(RestClient::shared(), Method::POST, path)
}

/// Starts a `PUT` request with the default client.
pub fn put(path: impl Into<String>) -> RequestBuilder {
    with_default(RestClient::shared(), Method::PUT, path)
}

/// Starts a `DELETE` request with the default client.
pub fn delete(path: impl Into<String>) -> RequestBuilder {
    with_default(RestClient::shared(), Method::DELETE, path)
}

/// Builder for configuring and creating a [`RestClient`].
///
/// # Examples
///
/// ```no_run
/// use restclient::RestClientBuilder;
///
/// # fn example() -> Result<(), restclient::Error> {
/// let client = RestClientBuilder::new()
///     .no_logger()
///     .default_header("Accept", "application/json")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct RestClientBuilder {
    http_client: Option<reqwest::Client>,
    logger: Arc<dyn Logger>,
    default_headers: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl RestClientBuilder {
    /// Creates a new `RestClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            http_client: None,
            logger: Arc::new(TracingLogger),
            default_headers: Vec::new(),
            timeout: None,
        }
    }

    /// Uses `client` for every request instead of building one.
    ///
    /// An injected client keeps its own timeout settings; [`timeout`](Self::timeout)
    /// is ignored.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the request timeout of the built `reqwest::Client`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the logger for every request.
    pub fn logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Silences all logging.
    pub fn no_logger(self) -> Self {
        self.logger(NoLogger)
    }

    /// Adds a header sent before the request's own headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.default_headers
            .push((name.as_ref().to_string(), value.as_ref().to_string()));
        Ok(self)
    }

    /// Builds the configured `RestClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn build(self) -> Result<RestClient> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(|e| {
                    Error::Configuration(format!("Failed to build HTTP client: {}", e))
                })?
            }
        };

        Ok(RestClient {
            inner: Arc::new(RestClientInner {
                http_client,
                logger: self.logger,
                default_headers: self.default_headers,
            }),
        })
    }
}

impl Default for RestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_header_validation() {
        let result = RestClient::builder().default_header("bad header", "value");
        assert!(matches!(result, Err(Error::Configuration(_))));

        let result = RestClient::builder().default_header("X-Ok", "line\nbreak");
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_shared_client_is_reused() {
        let first = RestClient::shared().unwrap();
        let second = RestClient::shared().unwrap();
        assert!(Arc::ptr_eq(&first.inner, &second.inner));
    }

    #[tokio::test]
    async fn test_unbuildable_default_fails_on_send() {
        let err = Error::Configuration("Failed to build HTTP client: no TLS".to_string());
        let builder = with_default(Err(err), Method::GET, "http://127.0.0.1:1/never")
            .query_param("a", 1)
            .no_logger();

        assert_eq!(builder.url(), "http://127.0.0.1:1/never?a=1");

        let item = builder.send().await;
        assert_eq!(item.status_code(), 0);
        match item.result.err {
            Some(Error::Configuration(message)) => assert!(message.contains("no TLS")),
            other => panic!("Expected Configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_free_functions_bind_methods() {
        assert_eq!(get("/a").method(), Method::GET);
        assert_eq!(post("/a").method(), Method::POST);
        assert_eq!(put("/a").method(), Method::PUT);
        assert_eq!(delete("/a").method(), Method::DELETE);
    }
}
