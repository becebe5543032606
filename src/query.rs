//! Query-string encoding.
//!
//! [`Query`] collects `key=value` pairs in insertion order and renders them as
//! `?a=1&b=2`. Values are anything implementing [`ToQueryValue`], which covers
//! native scalars, strings, optionals, and sequences. Sequences repeat the key
//! once per element. Kinds that have no query-string form (maps, `()`) are
//! accepted and contribute nothing.
//!
//! ```
//! use restclient::Query;
//!
//! let limit: Option<u32> = Some(23);
//! let rendered = Query::new()
//!     .add("Blob", "Crop")
//!     .add("Limit", limit)
//!     .add("pList", vec![1, 2, 3])
//!     .add("missing", None::<i32>)
//!     .render();
//!
//! assert_eq!(rendered, "?Blob=Crop&Limit=23&pList=1&pList=2&pList=3");
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use url::form_urlencoded;

/// A value as seen by the query encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// Nothing to encode. The pair is skipped.
    Absent,
    /// Rendered as `true` or `false`.
    Bool(bool),
    /// Rendered in decimal with its sign.
    Int(i64),
    /// Rendered in decimal.
    Uint(u64),
    /// Rendered as the shortest decimal that round-trips.
    Float(f64),
    /// Percent-encoded with form-urlencoded rules.
    Str(String),
    /// One pair per element, the key repeated, in order.
    Seq(Vec<QueryValue>),
    /// A kind with no query-string form. Silently skipped.
    Unsupported,
}

/// Conversion into a [`QueryValue`].
///
/// Implemented for the native types a caller would normally pass as a query
/// parameter, so no manual wrapping is needed.
pub trait ToQueryValue {
    /// Returns the encoder view of `self`.
    fn to_query_value(&self) -> QueryValue;
}

impl ToQueryValue for QueryValue {
    fn to_query_value(&self) -> QueryValue {
        self.clone()
    }
}

impl ToQueryValue for bool {
    fn to_query_value(&self) -> QueryValue {
        QueryValue::Bool(*self)
    }
}

macro_rules! impl_signed {
    ($($t:ty),*) => {$(
        impl ToQueryValue for $t {
            fn to_query_value(&self) -> QueryValue {
                QueryValue::Int(i64::from(*self))
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {$(
        impl ToQueryValue for $t {
            fn to_query_value(&self) -> QueryValue {
                QueryValue::Uint(u64::from(*self))
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64);
impl_unsigned!(u8, u16, u32, u64);

impl ToQueryValue for isize {
    fn to_query_value(&self) -> QueryValue {
        // isize is at most 64 bits on every supported target
        QueryValue::Int(*self as i64)
    }
}

impl ToQueryValue for usize {
    fn to_query_value(&self) -> QueryValue {
        QueryValue::Uint(*self as u64)
    }
}

impl ToQueryValue for f64 {
    fn to_query_value(&self) -> QueryValue {
        QueryValue::Float(*self)
    }
}

impl ToQueryValue for f32 {
    fn to_query_value(&self) -> QueryValue {
        // Widening directly would expose the binary expansion (0.1 -> 0.10000000149011612),
        // so go through the shortest f32 representation instead.
        let widened = self.to_string().parse().unwrap_or(f64::from(*self));
        QueryValue::Float(widened)
    }
}

impl ToQueryValue for str {
    fn to_query_value(&self) -> QueryValue {
        QueryValue::Str(self.to_owned())
    }
}

impl ToQueryValue for String {
    fn to_query_value(&self) -> QueryValue {
        QueryValue::Str(self.clone())
    }
}

impl ToQueryValue for Cow<'_, str> {
    fn to_query_value(&self) -> QueryValue {
        QueryValue::Str(self.to_string())
    }
}

impl ToQueryValue for char {
    fn to_query_value(&self) -> QueryValue {
        QueryValue::Str(self.to_string())
    }
}

impl ToQueryValue for () {
    fn to_query_value(&self) -> QueryValue {
        QueryValue::Absent
    }
}

impl<T: ToQueryValue + ?Sized> ToQueryValue for &T {
    fn to_query_value(&self) -> QueryValue {
        (**self).to_query_value()
    }
}

impl<T: ToQueryValue + ?Sized> ToQueryValue for &mut T {
    fn to_query_value(&self) -> QueryValue {
        (**self).to_query_value()
    }
}

impl<T: ToQueryValue + ?Sized> ToQueryValue for Box<T> {
    fn to_query_value(&self) -> QueryValue {
        (**self).to_query_value()
    }
}

impl<T: ToQueryValue + ?Sized> ToQueryValue for Rc<T> {
    fn to_query_value(&self) -> QueryValue {
        (**self).to_query_value()
    }
}

impl<T: ToQueryValue + ?Sized> ToQueryValue for Arc<T> {
    fn to_query_value(&self) -> QueryValue {
        (**self).to_query_value()
    }
}

impl<T: ToQueryValue> ToQueryValue for Option<T> {
    fn to_query_value(&self) -> QueryValue {
        match self {
            Some(value) => value.to_query_value(),
            None => QueryValue::Absent,
        }
    }
}

impl<T: ToQueryValue> ToQueryValue for [T] {
    fn to_query_value(&self) -> QueryValue {
        QueryValue::Seq(self.iter().map(ToQueryValue::to_query_value).collect())
    }
}

impl<T: ToQueryValue, const N: usize> ToQueryValue for [T; N] {
    fn to_query_value(&self) -> QueryValue {
        self.as_slice().to_query_value()
    }
}

impl<T: ToQueryValue> ToQueryValue for Vec<T> {
    fn to_query_value(&self) -> QueryValue {
        self.as_slice().to_query_value()
    }
}

impl<T: ToQueryValue> ToQueryValue for VecDeque<T> {
    fn to_query_value(&self) -> QueryValue {
        QueryValue::Seq(self.iter().map(ToQueryValue::to_query_value).collect())
    }
}

impl<K, V, S> ToQueryValue for HashMap<K, V, S> {
    fn to_query_value(&self) -> QueryValue {
        QueryValue::Unsupported
    }
}

impl<K, V> ToQueryValue for BTreeMap<K, V> {
    fn to_query_value(&self) -> QueryValue {
        QueryValue::Unsupported
    }
}

/// An ordered list of encoded query pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pairs: Vec<String>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key` with `value`.
    ///
    /// Absent values (`None`, `()`) and unsupported kinds leave the query
    /// unchanged. Sequences add one pair per element. The key is escaped with
    /// the same rules as string values, so `filter[name]` becomes `filter%5Bname%5D`.
    pub fn add<V: ToQueryValue>(&mut self, key: &str, value: V) -> &mut Self {
        let value = value.to_query_value();
        self.push(key, value);
        self
    }

    fn push(&mut self, key: &str, value: QueryValue) {
        let rendered = match value {
            QueryValue::Absent | QueryValue::Unsupported => return,
            QueryValue::Bool(b) => b.to_string(),
            QueryValue::Int(i) => i.to_string(),
            QueryValue::Uint(u) => u.to_string(),
            QueryValue::Float(f) => f.to_string(),
            QueryValue::Str(s) => escape(&s),
            QueryValue::Seq(items) => {
                for item in items {
                    self.push(key, item);
                }
                return;
            }
        };
        self.pairs.push(format!("{}={}", escape(key), rendered));
    }

    /// Renders the query as `?k=v&k2=v2`, or `""` when empty.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Returns `true` if no pair has been added.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the number of encoded pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pair) in self.pairs.iter().enumerate() {
            f.write_str(if i == 0 { "?" } else { "&" })?;
            f.write_str(pair)?;
        }
        Ok(())
    }
}

fn escape(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
