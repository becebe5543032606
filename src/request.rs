//! Fluent request builder and invocation.
//!
//! A [`RequestBuilder`] is bound to a method and a path when it is created and
//! accumulates query parameters, headers, credentials, and a body through
//! chained calls. [`RequestBuilder::send`] consumes it, performs exactly one
//! transport call, and wraps the outcome in a [`ResponseItem`].
//!
//! Body encoding failures do not interrupt the chain. The first one is kept as
//! the builder's error, later body calls are ignored, and `send` returns it
//! without touching the network.

use crate::client::RestClient;
use crate::error::Format;
use crate::logger::{Logger, NoLogger, TracingLogger};
use crate::query::{Query, ToQueryValue};
use crate::{Error, ResponseItem};
use http::header::CONTENT_TYPE;
use http::Method;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Content type set by [`RequestBuilder::json_body`].
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
/// Content type set by [`RequestBuilder::xml_body`].
pub const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

#[derive(Debug, Clone)]
struct BasicAuth {
    username: String,
    password: Option<String>,
}

/// Builder for a single request.
///
/// Created by [`get`](crate::get), [`post`](crate::post), [`put`](crate::put),
/// [`delete`](crate::delete), or the methods of the same name on
/// [`RestClient`].
///
/// # Examples
///
/// ```no_run
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct NewPost {
///     title: String,
/// }
///
/// # async fn example() -> Result<(), restclient::Error> {
/// let item = restclient::post("https://api.example.com/posts")
///     .query_param("draft", true)
///     .header("Accept-Language", "da")
///     .json_body(&NewPost { title: "Hello".to_string() })
///     .send()
///     .await;
///
/// println!("status {}", item.status_code());
/// item.into_result()?;
/// # Ok(())
/// # }
/// ```
pub struct RequestBuilder {
    method: Method,
    path: String,
    query: Query,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    basic_auth: Option<BasicAuth>,
    err: Option<Error>,
    http_client: Option<reqwest::Client>,
    logger: Arc<dyn Logger>,
}

impl RequestBuilder {
    pub(crate) fn new(client: &RestClient, method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Query::new(),
            headers: client.default_headers().to_vec(),
            body: None,
            basic_auth: None,
            err: None,
            http_client: Some(client.http_client().clone()),
            logger: client.logger(),
        }
    }

    /// A builder whose client could not be set up. `err` is returned by `send`.
    pub(crate) fn unusable(method: Method, path: impl Into<String>, err: Error) -> Self {
        Self {
            method,
            path: path.into(),
            query: Query::new(),
            headers: Vec::new(),
            body: None,
            basic_auth: None,
            err: Some(err),
            http_client: None,
            logger: Arc::new(TracingLogger),
        }
    }

    /// Sets the logger for this request.
    pub fn logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Silences all logging for this request.
    pub fn no_logger(self) -> Self {
        self.logger(NoLogger)
    }

    /// Sends this request through `client` instead of the configured one.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Adds a query parameter. See [`Query::add`].
    pub fn query_param<V: ToQueryValue>(mut self, key: &str, value: V) -> Self {
        self.query.add(key, value);
        self
    }

    /// Appends a header value. Repeating a key sends the header repeatedly.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Sets HTTP basic authentication credentials.
    pub fn basic_auth(mut self, username: impl Into<String>, password: Option<String>) -> Self {
        self.basic_auth = Some(BasicAuth {
            username: username.into(),
            password,
        });
        self
    }

    /// Sets a raw body and its content type.
    ///
    /// Ignored if the builder already holds an error.
    pub fn body(mut self, body: impl Into<Vec<u8>>, content_type: &str) -> Self {
        if self.err.is_some() {
            return self;
        }
        self.set_body(body.into(), content_type);
        self
    }

    /// Encodes `value` as JSON and uses it as the body.
    ///
    /// Sets `Content-Type` to [`JSON_CONTENT_TYPE`]. An encoding failure is
    /// kept and returned by [`send`](Self::send).
    pub fn json_body<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        if self.err.is_some() {
            return self;
        }
        match serde_json::to_vec(value) {
            Ok(body) => self.set_body(body, JSON_CONTENT_TYPE),
            Err(e) => self.fail(Format::Json, e.to_string()),
        }
        self
    }

    /// Encodes `value` as XML and uses it as the body.
    ///
    /// Sets `Content-Type` to [`XML_CONTENT_TYPE`]. The root element is named
    /// after the type of `value`.
    pub fn xml_body<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        if self.err.is_some() {
            return self;
        }
        match quick_xml::se::to_string(value) {
            Ok(body) => self.set_body(body.into_bytes(), XML_CONTENT_TYPE),
            Err(e) => self.fail(Format::Xml, e.to_string()),
        }
        self
    }

    fn set_body(&mut self, body: Vec<u8>, content_type: &str) {
        self.headers
            .retain(|(key, _)| !key.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
        self.headers
            .push((CONTENT_TYPE.as_str().to_string(), content_type.to_string()));
        self.body = Some(body);
    }

    fn fail(&mut self, format: Format, message: String) {
        self.err = Some(Error::SerializationFailed { format, message });
    }

    /// Returns the error recorded while building, if any.
    pub fn error(&self) -> Option<&Error> {
        self.err.as_ref()
    }

    /// Returns the request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the URL the request will be sent to: the path followed by the
    /// rendered query.
    ///
    /// The path is used as given. A path that already contains `?` gets a
    /// second `?`-prefixed query appended, which yields an invalid URL.
    pub fn url(&self) -> String {
        format!("{}{}", self.path, self.query)
    }

    /// Sends the request and reads the full response.
    ///
    /// Never fails itself: every failure ends up in the returned item's
    /// [`CallResult`](crate::CallResult). Transport errors leave the status
    /// code at `0`; statuses of 400 and above keep the body in
    /// `response_error`.
    pub async fn send(mut self) -> ResponseItem {
        if let Some(err) = self.err.take() {
            if matches!(err, Error::SerializationFailed { .. }) {
                self.logger.encode_failed(&err);
            }
            return ResponseItem::failed(err, self.logger);
        }

        let Some(http_client) = self.http_client.take() else {
            let err = Error::Configuration("No HTTP client available".to_string());
            return ResponseItem::failed(err, self.logger);
        };

        let url = self.url();
        let mut builder = http_client.request(self.method.clone(), url.as_str());
        for (key, value) in &self.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(auth) = &self.basic_auth {
            builder = builder.basic_auth(&auth.username, auth.password.as_ref());
        }
        if let Some(body) = self.body.take() {
            builder = builder.body(body);
        }

        let request = match builder.build() {
            Ok(request) => request,
            Err(e) => {
                return ResponseItem::failed(Error::InvalidRequest(Arc::new(e)), self.logger)
            }
        };

        let start_time = Instant::now();
        let result = http_client.execute(request).await;
        self.logger.request(&self.method, &url, start_time.elapsed());

        let response = match result {
            Ok(response) => response,
            Err(e) => return ResponseItem::failed(Error::from(e), self.logger),
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = match response.bytes().await {
            Ok(body) => body.to_vec(),
            Err(e) => return ResponseItem::failed(Error::from(e), self.logger),
        };

        self.logger.response(status, &headers, &body);

        ResponseItem::new(status, headers, body, self.logger)
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("method", &self.method)
            .field("url", &self.url())
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .field("has_basic_auth", &self.basic_auth.is_some())
            .field("err", &self.err)
            .finish()
    }
}
