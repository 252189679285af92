//! Extension trait for wrapping `Result` errors in [`ErrorRecord`] layers.
//!
//! # Examples
//!
//! ```
//! use error_strata::traits::ResultExt;
//! use error_strata::ErrorRecord;
//!
//! fn load_config() -> Result<String, ErrorRecord> {
//!     std::fs::read_to_string("definitely-missing.toml").ctx("loading configuration file")
//! }
//!
//! let err = load_config().unwrap_err();
//! assert!(err.to_string().starts_with("loading configuration file: "));
//! ```
use std::error::Error;

use crate::builder::ErrorBuilder;
use crate::types::ErrorRecord;

/// Adds a layer to the error of a `Result`.
///
/// The `*_with` variants only run their closure on the error path.
///
/// # Examples
///
/// ```
/// use error_strata::traits::ResultExt;
/// use error_strata::{ErrorBuilder, ErrorRecord};
///
/// fn parse_port(raw: &str) -> Result<u16, ErrorRecord> {
///     let builder = ErrorBuilder::new().code("bad_port").with("raw", raw);
///     raw.parse::<u16>().wrap_err_with(&builder, || format!("parsing {:?}", raw))
/// }
///
/// let err = parse_port("http").unwrap_err();
/// assert_eq!(err.code(), Some("bad_port"));
/// assert_eq!(err.context()["raw"], "http");
/// ```
pub trait ResultExt<T, E> {
    /// Wraps the error under `message` using a fresh builder.
    fn ctx<M>(self, message: M) -> Result<T, ErrorRecord>
    where
        M: Into<String>;

    /// Like [`ctx`](ResultExt::ctx), computing the message lazily.
    fn ctx_with<M, F>(self, f: F) -> Result<T, ErrorRecord>
    where
        M: Into<String>,
        F: FnOnce() -> M;

    /// Wraps the error with the attributes of `builder` and no message.
    fn wrap_err(self, builder: &ErrorBuilder) -> Result<T, ErrorRecord>;

    /// Wraps the error with the attributes of `builder` and a lazy message.
    fn wrap_err_with<M, F>(self, builder: &ErrorBuilder, f: F) -> Result<T, ErrorRecord>
    where
        M: Into<String>,
        F: FnOnce() -> M;
}

impl<T, E> ResultExt<T, E> for Result<T, E>
where
    E: Error + Send + Sync + 'static,
{
    #[inline(never)]
    fn ctx<M>(self, message: M) -> Result<T, ErrorRecord>
    where
        M: Into<String>,
    {
        self.map_err(|error| ErrorBuilder::new().wrap_with(error, message))
    }

    #[inline(never)]
    fn ctx_with<M, F>(self, f: F) -> Result<T, ErrorRecord>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        self.map_err(|error| ErrorBuilder::new().wrap_with(error, f()))
    }

    #[inline(never)]
    fn wrap_err(self, builder: &ErrorBuilder) -> Result<T, ErrorRecord> {
        self.map_err(|error| builder.wrap(error))
    }

    #[inline(never)]
    fn wrap_err_with<M, F>(self, builder: &ErrorBuilder, f: F) -> Result<T, ErrorRecord>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        self.map_err(|error| builder.wrap_with(error, f()))
    }
}
