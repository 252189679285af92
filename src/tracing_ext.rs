//! Tracing integration.
//!
//! Records can be emitted as `tracing` events carrying their resolved
//! attributes as fields, and builders can pick up the current span as the
//! error's correlation token.
//!
//! # Feature Flag
//!
//! Requires the `tracing` feature:
//!
//! ```toml
//! [dependencies]
//! error-strata = { version = "0.1", features = ["tracing"] }
//! ```
use tracing::{Level, Span};

use crate::builder::ErrorBuilder;
use crate::types::ErrorRecord;

/// Emits an [`ErrorRecord`] as a tracing event.
///
/// The event message is the error summary. Fields: `code`, `domain`,
/// `trace`, `span`, `tags`, `context` (JSON) and `stacktrace`.
///
/// # Example
///
/// ```rust,ignore
/// use error_strata::traits::TracingErrorExt;
///
/// if let Err(err) = handle(request) {
///     err.emit();
/// }
/// ```
pub trait TracingErrorExt {
    /// Emits at `ERROR` level.
    fn emit(&self) {
        self.emit_at(Level::ERROR);
    }

    fn emit_at(&self, level: Level);
}

impl TracingErrorExt for ErrorRecord {
    fn emit_at(&self, level: Level) {
        let tags = self.tags().join(",");
        let context = serde_json::Value::Object(self.context()).to_string();
        let stacktrace = self.stacktrace();

        // Callsite levels must be constant.
        macro_rules! emit {
            ($level:expr) => {
                tracing::event!(
                    $level,
                    code = self.code(),
                    domain = self.domain(),
                    trace = self.trace(),
                    span = self.span(),
                    tags = %tags,
                    context = %context,
                    stacktrace = %stacktrace,
                    "{}",
                    self
                )
            };
        }

        match level {
            Level::ERROR => emit!(Level::ERROR),
            Level::WARN => emit!(Level::WARN),
            Level::INFO => emit!(Level::INFO),
            Level::DEBUG => emit!(Level::DEBUG),
            _ => emit!(Level::TRACE),
        }
    }
}

impl ErrorBuilder {
    /// Uses the current tracing span as this error's span.
    pub fn in_current_span(self) -> Self {
        self.in_span(&Span::current())
    }

    /// Uses `span` as this error's span and records its name in the context.
    ///
    /// A disabled span leaves the builder untouched.
    pub fn in_span(self, span: &Span) -> Self {
        let Some(id) = span.id() else {
            return self;
        };
        let builder = self.span(format!("{:016x}", id.into_u64()));
        match span.metadata() {
            Some(metadata) => builder.with("span_name", metadata.name()),
            None => builder,
        }
    }
}
