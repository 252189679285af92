//! Fluent construction of [`ErrorRecord`] layers.
//!
//! Setters consume and return the builder; terminal methods borrow it, so one
//! configured builder can serve as a template for many errors. Every terminal
//! method captures the call stack at the point it is invoked.
//!
//! # Examples
//!
//! ```
//! use error_strata::ErrorBuilder;
//!
//! let template = ErrorBuilder::new().in_domain("billing").tags(["payments"]);
//!
//! let first = template.clone().code("card_declined").build("charge failed");
//! let second = template.with("invoice", 1042).build("refund failed");
//!
//! assert_eq!(first.domain(), Some("billing"));
//! assert_eq!(second.context()["invoice"], 1042);
//! assert!(second.code().is_none());
//! ```
use std::any::Any;
use std::error::Error;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::Config;
use crate::recovery;
use crate::stack;
use crate::types::{
    error_record::Attributes, Cause, ErrorRecord, JoinedError, RequestInfo, ResponseInfo, Value,
};

/// Accumulates attributes for the next error layer.
#[derive(Debug, Clone)]
#[must_use]
pub struct ErrorBuilder {
    attrs: Attributes,
    config: Arc<Config>,
}

impl Default for ErrorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorBuilder {
    /// Starts a builder configured from the environment, stamped with the current time.
    pub fn new() -> Self {
        Self::with_config_arc(Arc::new(Config::from_env()))
    }

    fn with_config_arc(config: Arc<Config>) -> Self {
        let attrs = Attributes { time: Some(Utc::now()), ..Attributes::default() };
        Self { attrs, config }
    }

    /// Replaces the capture and rendering configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Arc::new(config);
        self
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Machine-readable code.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.attrs.code = non_empty(code.into());
        self
    }

    /// Overrides the creation time.
    pub fn time(mut self, time: DateTime<Utc>) -> Self {
        self.attrs.time = Some(time);
        self
    }

    /// Records the time elapsed since `start`.
    pub fn since(mut self, start: Instant) -> Self {
        self.attrs.duration = non_zero(start.elapsed());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.attrs.duration = non_zero(duration);
        self
    }

    /// Feature or product area.
    pub fn in_domain(mut self, domain: impl Into<String>) -> Self {
        self.attrs.domain = non_empty(domain.into());
        self
    }

    /// Appends tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attrs.tags.extend(tags.into_iter().map(Into::into).filter(|tag| !tag.is_empty()));
        self
    }

    pub fn tag(self, tag: impl Into<String>) -> Self {
        self.tags([tag])
    }

    /// Adds one context entry; later values replace earlier ones under the same key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.attrs.context).insert(key.into(), value.into());
        self
    }

    /// Adds several context entries.
    pub fn with_all<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let context = Arc::make_mut(&mut self.attrs.context);
        context.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Transaction id.
    pub fn trace(mut self, trace: impl Into<String>) -> Self {
        self.attrs.trace = non_empty(trace.into());
        self
    }

    /// Correlation token for the unit of work; generated when not set.
    pub fn span(mut self, span: impl Into<String>) -> Self {
        self.attrs.span = non_empty(span.into());
        self
    }

    /// Debugging hint for whoever reads the error.
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.attrs.hint = non_empty(hint.into());
        self
    }

    /// Message safe to return to end users.
    pub fn public(mut self, public: impl Into<String>) -> Self {
        self.attrs.public = non_empty(public.into());
        self
    }

    /// Team or person responsible.
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.attrs.owner = non_empty(owner.into());
        self
    }

    /// Sets the user id and adds user attributes.
    pub fn user<I, K, V>(mut self, id: impl Into<String>, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.attrs.user_id = non_empty(id.into());
        Arc::make_mut(&mut self.attrs.user_data)
            .extend(data.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn user_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.attrs.user_data).insert(key.into(), value.into());
        self
    }

    /// Sets the tenant id and adds tenant attributes.
    pub fn tenant<I, K, V>(mut self, id: impl Into<String>, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.attrs.tenant_id = non_empty(id.into());
        Arc::make_mut(&mut self.attrs.tenant_data)
            .extend(data.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn tenant_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.attrs.tenant_data).insert(key.into(), value.into());
        self
    }

    /// Attaches a request snapshot; `with_body` controls whether dumps include its body.
    pub fn request(mut self, request: RequestInfo, with_body: bool) -> Self {
        self.attrs.request = Some((Arc::new(request), with_body));
        self
    }

    pub fn response(mut self, response: ResponseInfo, with_body: bool) -> Self {
        self.attrs.response = Some((Arc::new(response), with_body));
        self
    }

    /// Builds a new error with `message` and no cause.
    #[inline(never)]
    pub fn build(&self, message: impl Into<String>) -> ErrorRecord {
        self.finalize(Some(message.into()), None)
    }

    /// Wraps `error`; the new layer has no message of its own.
    ///
    /// An [`ErrorRecord`] passed here becomes a structured cause and takes
    /// part in attribute resolution.
    #[inline(never)]
    pub fn wrap<E>(&self, error: E) -> ErrorRecord
    where
        E: Error + Send + Sync + 'static,
    {
        self.finalize(None, Some(Cause::new(error)))
    }

    /// Wraps `error` under `message`.
    #[inline(never)]
    pub fn wrap_with<E>(&self, error: E, message: impl Into<String>) -> ErrorRecord
    where
        E: Error + Send + Sync + 'static,
    {
        self.finalize(Some(message.into()), Some(Cause::new(error)))
    }

    /// Wraps an already boxed error.
    #[inline(never)]
    pub fn wrap_boxed(&self, error: Box<dyn Error + Send + Sync + 'static>) -> ErrorRecord {
        self.finalize(None, Some(Cause::from_boxed(error)))
    }

    /// Combines several errors into one layer; `None` when there are none.
    #[inline(never)]
    pub fn join<I, E>(&self, errors: I) -> Option<ErrorRecord>
    where
        I: IntoIterator<Item = E>,
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        let causes: Vec<Cause> = errors.into_iter().map(|e| Cause::from_boxed(e.into())).collect();
        if causes.is_empty() {
            return None;
        }
        Some(self.finalize(None, Some(Cause::new(JoinedError::new(causes)))))
    }

    /// Runs `f`, turning a panic into an error.
    ///
    /// The closure is treated as unwind safe: a panic means the work failed,
    /// and whatever it was mutating should be considered suspect by the caller.
    #[inline(never)]
    pub fn recover<T, F>(&self, f: F) -> Result<T, ErrorRecord>
    where
        F: FnOnce() -> T,
    {
        panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| self.recover_payload(payload))
    }

    /// Like [`recover`](Self::recover), wrapping the recovered error under `message`.
    #[inline(never)]
    pub fn recover_with<T, F>(&self, f: F, message: impl Into<String>) -> Result<T, ErrorRecord>
    where
        F: FnOnce() -> T,
    {
        self.recover(f).map_err(|err| self.finalize(Some(message.into()), Some(Cause::from(err))))
    }

    /// Panics with an error built from this builder when `condition` is false.
    ///
    /// The panic payload is the [`ErrorRecord`] itself, so an enclosing
    /// [`recover`](Self::recover) yields it back with all its attributes.
    pub fn assert(self, condition: bool) -> Self {
        if !condition {
            panic::panic_any(self.build("assertion failed"));
        }
        self
    }

    /// Like [`assert`](Self::assert) with a custom message.
    pub fn assert_with(self, condition: bool, message: impl Into<String>) -> Self {
        if !condition {
            panic::panic_any(self.build(message));
        }
        self
    }

    pub(crate) fn recover_payload(&self, payload: Box<dyn Any + Send>) -> ErrorRecord {
        let cause = recovery::payload_into_cause(payload);
        #[cfg(feature = "tracing")]
        tracing::debug!(cause = %cause, "recovered from panic");
        self.finalize(None, Some(cause))
    }

    #[inline(never)]
    pub(crate) fn finalize(&self, message: Option<String>, cause: Option<Cause>) -> ErrorRecord {
        let span = self.attrs.span.clone().unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        let stack = stack::capture(&self.config, 1, span);

        ErrorRecord {
            message: message.and_then(non_empty),
            cause,
            attrs: self.attrs.clone(),
            stack,
            config: Arc::clone(&self.config),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn non_zero(duration: Duration) -> Option<Duration> {
    (!duration.is_zero()).then_some(duration)
}
