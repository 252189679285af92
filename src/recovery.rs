//! Panic recovery.
//!
//! A panic inside a recovered unit of work becomes an [`ErrorRecord`]. The
//! payload decides the cause:
//!
//! - an [`ErrorRecord`] (e.g. from [`ErrorBuilder::assert`]) becomes a
//!   structured cause, so its attributes survive the unwind;
//! - a `Box<dyn Error + Send + Sync>` or `Arc<dyn Error + Send + Sync>`
//!   becomes an opaque cause;
//! - a `&str` or `String` message becomes a [`PanicError`];
//! - anything else becomes `PanicError("unknown panic payload")`.
//!
//! # Examples
//!
//! ```
//! use error_strata::recover;
//!
//! let err = recover(|| -> u32 { panic!("worker {} crashed", 7) }).unwrap_err();
//! assert_eq!(err.to_string(), "worker 7 crashed");
//! ```
use std::any::Any;
use std::error::Error;
use std::sync::Arc;

use crate::builder::ErrorBuilder;
use crate::types::{Cause, ErrorRecord, PanicError};

const UNKNOWN_PAYLOAD: &str = "unknown panic payload";

/// Runs `f` with a fresh builder, converting a panic into an error.
#[inline(never)]
pub fn recover<T, F>(f: F) -> Result<T, ErrorRecord>
where
    F: FnOnce() -> T,
{
    ErrorBuilder::new().recover(f)
}

/// Converts a panic payload into a cause.
pub fn payload_into_cause(payload: Box<dyn Any + Send>) -> Cause {
    let payload = match payload.downcast::<ErrorRecord>() {
        Ok(record) => return Cause::from(*record),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<Box<dyn Error + Send + Sync>>() {
        Ok(error) => return Cause::from_boxed(*error),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<Arc<dyn Error + Send + Sync>>() {
        Ok(error) => return Cause::Opaque(*error),
        Err(payload) => payload,
    };

    let message = if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        UNKNOWN_PAYLOAD.to_owned()
    };
    Cause::new(PanicError::new(message))
}
