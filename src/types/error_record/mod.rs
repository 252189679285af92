//! The immutable error record and its per-layer attributes.
//!
//! An [`ErrorRecord`] is one layer: an optional message, an optional
//! [`Cause`], the attributes set on the builder that produced it and the stack
//! captured when it was finalized. Layers chain through structured causes;
//! the accessors in [`chain`] resolve attributes across that chain.
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::builder::ErrorBuilder;
use crate::config::Config;
use crate::stack::{Frame, StackTrace};
use crate::types::{AttrMap, Cause, ErrorVec, RequestInfo, ResponseInfo};

pub mod chain;
pub mod format;
mod traits;

pub use chain::Layers;
pub use format::RecordFormatter;

/// Attributes set on one layer. Absent means "not set on this layer".
#[derive(Debug, Clone, Default)]
pub(crate) struct Attributes {
    pub(crate) code: Option<String>,
    pub(crate) time: Option<DateTime<Utc>>,
    pub(crate) duration: Option<Duration>,
    pub(crate) domain: Option<String>,
    pub(crate) tags: ErrorVec<String>,
    pub(crate) context: Arc<AttrMap>,
    pub(crate) trace: Option<String>,
    pub(crate) span: Option<String>,
    pub(crate) hint: Option<String>,
    pub(crate) public: Option<String>,
    pub(crate) owner: Option<String>,
    pub(crate) user_id: Option<String>,
    pub(crate) user_data: Arc<AttrMap>,
    pub(crate) tenant_id: Option<String>,
    pub(crate) tenant_data: Arc<AttrMap>,
    pub(crate) request: Option<(Arc<RequestInfo>, bool)>,
    pub(crate) response: Option<(Arc<ResponseInfo>, bool)>,
}

/// A structured error layer.
///
/// Records are produced by [`ErrorBuilder`] and never mutated afterwards, so
/// they can be shared freely between threads. Because a cause must exist
/// before the record wrapping it, a chain of records is always finite.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub(crate) message: Option<String>,
    pub(crate) cause: Option<Cause>,
    pub(crate) attrs: Attributes,
    pub(crate) stack: StackTrace,
    pub(crate) config: Arc<Config>,
}

impl ErrorRecord {
    /// Builds a record with only a message, using the environment configuration.
    #[inline(never)]
    pub fn new(message: impl Into<String>) -> Self {
        ErrorBuilder::new().build(message)
    }

    /// Wraps `error` in a record without a message of its own.
    #[inline(never)]
    pub fn wrap<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        ErrorBuilder::new().wrap(error)
    }

    /// Starts a new builder.
    #[inline]
    pub fn builder() -> ErrorBuilder {
        ErrorBuilder::new()
    }

    /// Message set on this layer only.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The error this layer wraps.
    #[inline]
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Tags set on this layer only.
    #[inline]
    pub fn own_tags(&self) -> &[String] {
        &self.attrs.tags
    }

    /// Correlation token of this layer; generated when none was set.
    #[inline]
    pub fn span(&self) -> &str {
        self.stack.span()
    }

    /// Frames captured when this layer was finalized.
    #[inline]
    pub fn stack_trace(&self) -> &StackTrace {
        &self.stack
    }

    #[inline]
    pub fn stack_frames(&self) -> &[Frame] {
        self.stack.frames()
    }

    /// Configuration this layer was captured with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The deepest error of the chain: the opaque error under the last
    /// structured layer, or that layer itself when it wraps nothing.
    pub fn root_cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        let deepest = self.layers().last().unwrap_or(self);
        match &deepest.cause {
            Some(Cause::Opaque(error)) => error.as_ref(),
            _ => deepest as &(dyn Error + Send + Sync + 'static),
        }
    }

    /// Whether `other` is the very same value as the root cause.
    pub fn is_root_cause(&self, other: &(dyn Error + 'static)) -> bool {
        let root: &(dyn Error + 'static) = self.root_cause();
        std::ptr::addr_eq(root as *const dyn Error, other as *const dyn Error)
    }

    /// Whether the root cause is an `E` equal to `other`.
    pub fn root_cause_eq<E>(&self, other: &E) -> bool
    where
        E: Error + PartialEq + 'static,
    {
        let root: &(dyn Error + 'static) = self.root_cause();
        root.downcast_ref::<E>().is_some_and(|root| root == other)
    }

    /// First opaque cause along the chain that is an `E`.
    pub fn find_cause<E>(&self) -> Option<&E>
    where
        E: Error + 'static,
    {
        self.layers().find_map(|layer| match &layer.cause {
            Some(Cause::Opaque(error)) => error.downcast_ref::<E>(),
            _ => None,
        })
    }

    /// Summary text: `message: cause`, or whichever of the two exists.
    pub(crate) fn summary(&self) -> String {
        match (&self.message, &self.cause) {
            (Some(message), Some(cause)) => format!("{}: {}", message, cause),
            (Some(message), None) => message.clone(),
            (None, Some(cause)) => cause.to_string(),
            (None, None) => String::new(),
        }
    }
}
