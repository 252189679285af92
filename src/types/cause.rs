//! What an [`ErrorRecord`] wraps.
use std::error::Error;
use std::fmt::{self, Display};
use std::sync::Arc;

use crate::types::ErrorRecord;

/// The wrapped error of a layer.
///
/// Resolution only descends through [`Cause::Structured`]; an opaque cause
/// ends the chain for attribute purposes but still contributes its message.
#[derive(Debug, Clone)]
pub enum Cause {
    Structured(Arc<ErrorRecord>),
    Opaque(Arc<dyn Error + Send + Sync + 'static>),
}

impl Cause {
    /// Wraps any error, recognising an [`ErrorRecord`] behind the type.
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::from_boxed(Box::new(error))
    }

    /// Wraps a boxed error, recognising an [`ErrorRecord`] behind the box.
    pub fn from_boxed(error: Box<dyn Error + Send + Sync + 'static>) -> Self {
        match error.downcast::<ErrorRecord>() {
            Ok(record) => Self::Structured(Arc::new(*record)),
            Err(other) => Self::Opaque(Arc::from(other)),
        }
    }

    /// The wrapped record, if this cause is structured.
    #[inline]
    pub fn as_record(&self) -> Option<&ErrorRecord> {
        match self {
            Self::Structured(record) => Some(record),
            Self::Opaque(_) => None,
        }
    }

    /// The wrapped error as a trait object.
    pub fn as_error(&self) -> &(dyn Error + Send + Sync + 'static) {
        match self {
            Self::Structured(record) => record.as_ref(),
            Self::Opaque(error) => error.as_ref(),
        }
    }
}

impl Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured(record) => write!(f, "{}", record),
            Self::Opaque(error) => write!(f, "{}", error),
        }
    }
}

impl From<ErrorRecord> for Cause {
    #[inline]
    fn from(record: ErrorRecord) -> Self {
        Self::Structured(Arc::new(record))
    }
}

impl From<Arc<ErrorRecord>> for Cause {
    #[inline]
    fn from(record: Arc<ErrorRecord>) -> Self {
        Self::Structured(record)
    }
}

/// Panic payload that was not itself an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanicError {
    message: String,
}

impl PanicError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for PanicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for PanicError {}

/// Several errors reported as one; messages are joined by newlines.
#[derive(Debug, Clone)]
pub struct JoinedError {
    errors: Vec<Cause>,
}

impl JoinedError {
    pub fn new(errors: Vec<Cause>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[Cause] {
        &self.errors
    }
}

impl Display for JoinedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl Error for JoinedError {}
