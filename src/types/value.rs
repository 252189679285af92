//! Attribute values stored in context, user and tenant maps.
//!
//! A value is either known when the error is built ([`Value::Literal`],
//! [`Value::Nested`]) or produced on demand ([`Value::Deferred`]). Deferred
//! producers run every time a map is resolved and never reach serialized
//! output unevaluated.
//!
//! # Examples
//!
//! ```
//! use error_strata::{deferred, ErrorBuilder, Value};
//!
//! let err = ErrorBuilder::new()
//!     .with("attempt", 3)
//!     .with("snapshot", deferred!(format!("{} items", 42)))
//!     .build("sync failed");
//!
//! assert_eq!(err.context()["attempt"], 3);
//! assert_eq!(err.context()["snapshot"], "42 items");
//! ```
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

/// Key/value attributes attached to one layer.
pub type AttrMap = BTreeMap<String, Value>;

/// Resolved attributes, ready for serialization.
pub type JsonMap = serde_json::Map<String, JsonValue>;

/// A possibly deferred attribute value.
#[derive(Clone)]
pub enum Value {
    /// A value known at construction time.
    Literal(JsonValue),
    /// A nested map, resolved with the same rules as its parent.
    Nested(AttrMap),
    /// A producer evaluated at read time.
    Deferred(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl Value {
    #[inline]
    pub fn literal(value: impl Into<JsonValue>) -> Self {
        Self::Literal(value.into())
    }

    /// Wraps a zero-argument producer that runs whenever the value is resolved.
    pub fn deferred<F, T>(producer: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Into<Value>,
    {
        Self::Deferred(Arc::new(move || producer().into()))
    }

    /// Builds a nested map value.
    pub fn nested<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Nested(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    #[inline]
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// Evaluates deferred producers and nested maps into plain JSON.
    pub fn resolve(&self) -> JsonValue {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Nested(map) => JsonValue::Object(resolve_map(map)),
            Self::Deferred(producer) => producer().resolve(),
        }
    }
}

/// Resolves every value of `map`.
pub fn resolve_map(map: &AttrMap) -> JsonMap {
    map.iter().map(|(k, v)| (k.clone(), v.resolve())).collect()
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Nested(map) => f.debug_tuple("Nested").field(map).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

macro_rules! impl_from_literal {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::Literal(JsonValue::from(value))
                }
            }
        )*
    };
}

impl_from_literal!(
    JsonValue, String, &str, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
);

impl From<&String> for Value {
    #[inline]
    fn from(value: &String) -> Self {
        Self::Literal(JsonValue::String(value.clone()))
    }
}

impl From<AttrMap> for Value {
    #[inline]
    fn from(map: AttrMap) -> Self {
        Self::Nested(map)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<JsonValue>,
{
    #[inline]
    fn from(items: Vec<T>) -> Self {
        Self::Literal(JsonValue::from(items))
    }
}

/// Renders a resolved value the way humans expect: strings without quotes.
pub(crate) fn display_json(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
