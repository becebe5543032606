//! Response wrapper with lazily decoded views.
//!
//! A [`ResponseItem`] keeps the raw body and headers of a response together
//! with its [`CallResult`]. Typed views are produced on demand and each one
//! returns nothing once the call has a transport error.
//!
//! JSON and XML decoding only happen for a status of exactly `200 OK`. Other
//! success codes such as `201` or `204` leave the target untouched; use
//! [`ResponseItem::text`] or [`ResponseItem::bytes`] to read their bodies.

use crate::error::Format;
use crate::logger::Logger;
use crate::{CallResult, Error};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// A fully read response and the outcome of the call that produced it.
///
/// # Examples
///
/// ```no_run
/// use serde::Deserialize;
///
/// #[derive(Debug, Default, Deserialize)]
/// struct User {
///     name: String,
/// }
///
/// # async fn example() -> Result<(), restclient::Error> {
/// let mut item = restclient::get("https://api.example.com/users/1").send().await;
///
/// let mut user = User::default();
/// item.json(&mut user);
/// item.into_result()?;
///
/// println!("User: {}", user.name);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ResponseItem {
    headers: HeaderMap,
    body: Vec<u8>,
    logger: Arc<dyn Logger>,
    /// The outcome of the call.
    pub result: CallResult,
}

impl ResponseItem {
    pub(crate) fn new(
        status: StatusCode,
        headers: HeaderMap,
        body: Vec<u8>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let response_error = if status.as_u16() >= 400 {
            String::from_utf8_lossy(&body).into_owned()
        } else {
            String::new()
        };

        Self {
            headers,
            body,
            logger,
            result: CallResult {
                status_code: status.as_u16(),
                response_error,
                err: None,
            },
        }
    }

    pub(crate) fn failed(err: Error, logger: Arc<dyn Logger>) -> Self {
        Self {
            headers: HeaderMap::new(),
            body: Vec::new(),
            logger,
            result: CallResult::failed(err),
        }
    }

    /// Returns the body as text, or `""` if the call failed.
    pub fn text(&self) -> String {
        if self.result.err.is_some() {
            return String::new();
        }
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Returns the raw body, or an empty slice if the call failed.
    pub fn bytes(&self) -> &[u8] {
        if self.result.err.is_some() {
            return &[];
        }
        &self.body
    }

    /// Decodes a JSON body into `target`.
    ///
    /// Only runs when the status is exactly `200` and no error is recorded. A
    /// decode failure is stored in `result.err` and `target` is left as it was.
    pub fn json<T: DeserializeOwned>(&mut self, target: &mut T) {
        if !self.decodable() {
            return;
        }
        match serde_json::from_slice(&self.body) {
            Ok(value) => *target = value,
            Err(e) => self.result.err = Some(self.decode_error(Format::Json, e.to_string())),
        }
    }

    /// Decodes an XML body into `target`.
    ///
    /// Same rules as [`ResponseItem::json`].
    pub fn xml<T: DeserializeOwned>(&mut self, target: &mut T) {
        if !self.decodable() {
            return;
        }
        let decoded = std::str::from_utf8(&self.body)
            .map_err(|e| e.to_string())
            .and_then(|text| quick_xml::de::from_str(text).map_err(|e| e.to_string()));
        match decoded {
            Ok(value) => *target = value,
            Err(message) => self.result.err = Some(self.decode_error(Format::Xml, message)),
        }
    }

    /// Returns every value of the response header `key`, in order.
    ///
    /// Lookup is case-insensitive. Returns `None` if the header is absent or
    /// the call failed.
    pub fn header(&self, key: &str) -> Option<Vec<String>> {
        if self.result.err.is_some() {
            return None;
        }
        let values: Vec<String> = self
            .headers
            .get_all(key)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values)
        }
    }

    /// Returns all response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the status code, or `0` if no response was received.
    pub fn status_code(&self) -> u16 {
        self.result.status_code
    }

    /// See [`CallResult::error`].
    pub fn error(&self) -> Option<Error> {
        self.result.error()
    }

    /// See [`CallResult::into_result`].
    pub fn into_result(self) -> crate::Result<()> {
        self.result.into_result()
    }

    fn decodable(&self) -> bool {
        self.result.err.is_none() && self.result.status_code == StatusCode::OK.as_u16()
    }

    fn decode_error(&self, format: Format, message: String) -> Error {
        let err = Error::DeserializationFailed {
            format,
            message,
            raw_response: String::from_utf8_lossy(&self.body).into_owned(),
        };
        self.logger.decode_failed(&err);
        err
    }
}

impl std::fmt::Debug for ResponseItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseItem")
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::NoLogger;
    use http::{HeaderValue, Method};
    use serde::Deserialize;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct DecodeFailures(Mutex<Vec<String>>);

    impl Logger for DecodeFailures {
        fn request(&self, _method: &Method, _url: &str, _latency: Duration) {}

        fn response(&self, _status: StatusCode, _headers: &HeaderMap, _body: &[u8]) {}

        fn decode_failed(&self, error: &Error) {
            self.0.lock().unwrap().push(error.to_string());
        }
    }

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Msg {
        #[serde(rename = "Msg")]
        msg: String,
    }

    fn item(status: u16, body: &str) -> ResponseItem {
        ResponseItem::new(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            body.as_bytes().to_vec(),
            Arc::new(NoLogger),
        )
    }

    #[test]
    fn test_json_on_200() {
        let mut item = item(200, r#"{"Msg":"Blob"}"#);
        let mut msg = Msg::default();
        item.json(&mut msg);

        assert_eq!(msg.msg, "Blob");
        assert!(item.error().is_none());
    }

    #[test]
    fn test_json_skipped_on_other_2xx() {
        for status in [201, 204] {
            let mut item = item(status, r#"{"Msg":"Blob"}"#);
            let mut msg = Msg {
                msg: "untouched".to_string(),
            };
            item.json(&mut msg);

            assert_eq!(msg.msg, "untouched");
            assert!(item.error().is_none());
            assert_eq!(item.text(), r#"{"Msg":"Blob"}"#);
        }
    }

    #[test]
    fn test_json_decode_failure_is_recorded() {
        let mut item = item(200, "invalid json");
        let mut msg = Msg::default();
        item.json(&mut msg);

        match item.error() {
            Some(Error::DeserializationFailed {
                format,
                raw_response,
                ..
            }) => {
                assert_eq!(format, Format::Json);
                assert_eq!(raw_response, "invalid json");
            }
            other => panic!("Expected DeserializationFailed, got {:?}", other),
        }
        assert_eq!(item.text(), "");
        assert!(item.bytes().is_empty());
    }

    #[test]
    fn test_xml_on_200() {
        let mut item = item(200, "<Body><Msg>Blob</Msg></Body>");
        let mut msg = Msg::default();
        item.xml(&mut msg);

        assert_eq!(msg.msg, "Blob");
        assert!(item.error().is_none());
    }

    #[test]
    fn test_protocol_error_keeps_body() {
        let item = item(400, "Blob is broken\n");

        assert_eq!(item.status_code(), 400);
        assert_eq!(item.result.response_error, "Blob is broken\n");
        assert!(item.result.err.is_none());
        assert_eq!(item.text(), "Blob is broken\n");
        assert_eq!(item.error().unwrap().to_string(), "[400]Blob is broken\n");
    }

    #[test]
    fn test_repeated_header_values() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        let item = ResponseItem::new(StatusCode::OK, headers, Vec::new(), Arc::new(NoLogger));

        assert_eq!(
            item.header("Set-Cookie"),
            Some(vec!["a=1".to_string(), "b=2".to_string()])
        );
        assert_eq!(item.header("x-missing"), None);
    }

    #[test]
    fn test_failed_item_hides_everything() {
        let item = ResponseItem::failed(
            Error::Configuration("nope".to_string()),
            Arc::new(NoLogger),
        );

        assert_eq!(item.status_code(), 0);
        assert_eq!(item.text(), "");
        assert_eq!(item.header("content-type"), None);
        assert!(matches!(item.error(), Some(Error::Configuration(_))));
    }

    #[test]
    fn test_decode_failure_goes_to_logger() {
        let logger = Arc::new(DecodeFailures::default());
        let mut item = ResponseItem::new(
            StatusCode::OK,
            HeaderMap::new(),
            b"<not-json>".to_vec(),
            logger.clone(),
        );
        let mut msg = Msg::default();
        item.json(&mut msg);

        let failures = logger.0.lock().unwrap();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("JSON"));
    }

    #[test]
    fn test_skipped_decode_is_not_logged() {
        let logger = Arc::new(DecodeFailures::default());
        let mut item = ResponseItem::new(
            StatusCode::NO_CONTENT,
            HeaderMap::new(),
            b"<not-json>".to_vec(),
            logger.clone(),
        );
        let mut msg = Msg::default();
        item.xml(&mut msg);

        assert!(logger.0.lock().unwrap().is_empty());
    }
}
