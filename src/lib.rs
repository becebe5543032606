//! # restclient - a fluent HTTP request builder
//!
//! `restclient` builds a request through chained calls, sends it with
//! `reqwest`, and hands back a [`ResponseItem`] that keeps the raw response
//! and decodes it into typed values on demand.
//!
//! ## Quick Start
//!
//! ```no_run
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct CreateUser {
//!     name: String,
//! }
//!
//! #[derive(Debug, Default, Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), restclient::Error> {
//!     // Query parameters accept native values, optionals and sequences
//!     let mut item = restclient::get("https://api.example.com/users/123")
//!         .query_param("fields", vec!["id", "name"])
//!         .query_param("expand", None::<bool>)
//!         .send()
//!         .await;
//!
//!     let mut user = User::default();
//!     item.json(&mut user);
//!     item.into_result()?;
//!     println!("User: {}", user.name);
//!
//!     let created = restclient::post("https://api.example.com/users")
//!         .json_body(&CreateUser { name: "Alice".to_string() })
//!         .send()
//!         .await;
//!     println!("Created with status {}", created.status_code());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! A sent request never returns `Err` directly. Its [`CallResult`] separates
//! transport failures (`err`) from responses with a status of 400 or above
//! (`status_code` and `response_error`), and [`CallResult::error`] merges both
//! into one optional [`Error`]:
//!
//! ```no_run
//! use restclient::Error;
//!
//! # async fn example() {
//! let item = restclient::delete("https://api.example.com/users/1").send().await;
//!
//! match item.error() {
//!     None => println!("deleted"),
//!     Some(Error::HttpError { status, raw_response }) => {
//!         eprintln!("HTTP error {}: {}", status, raw_response);
//!     }
//!     Some(e) => eprintln!("transport error: {}", e),
//! }
//! # }
//! ```
//!
//! Body encoding errors raised while building are kept and reported by
//! `send` without any network activity, so a chain never has to stop for `?`.

mod client;
mod error;
pub mod logger;
pub mod query;
mod request;
mod response;
mod result;

pub use client::{delete, get, post, put, RestClient, RestClientBuilder};
pub use error::{Error, Format, Result};
pub use logger::{Logger, NoLogger, TracingLogger};
pub use query::{Query, QueryValue, ToQueryValue};
pub use request::{RequestBuilder, JSON_CONTENT_TYPE, XML_CONTENT_TYPE};
pub use response::ResponseItem;
pub use result::CallResult;
