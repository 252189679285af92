//! Error record, causes, attribute values and HTTP snapshots.
//!
//! # Examples
//!
//! ```
//! use error_strata::{ErrorBuilder, ErrorRecord};
//!
//! let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
//! let inner = ErrorBuilder::new().code("cfg_missing").with("path", "config.toml").wrap(io);
//! let outer = ErrorBuilder::new().in_domain("startup").wrap_with(inner, "boot failed");
//!
//! assert_eq!(outer.to_string(), "boot failed: config.toml");
//! assert_eq!(outer.code(), Some("cfg_missing"));
//! assert_eq!(outer.domain(), Some("startup"));
//! assert_eq!(outer.layers().count(), 2);
//! ```
use smallvec::SmallVec;

pub mod cause;
pub mod error_record;
pub mod http;
pub mod value;

pub use cause::*;
pub use error_record::*;
pub use http::*;
pub use value::*;

/// SmallVec-backed collection used for per-layer tags.
///
/// Uses inline storage for up to 2 elements; most layers carry zero or one tag.
pub type ErrorVec<E> = SmallVec<[E; 2]>;

/// Result alias with [`ErrorRecord`] as the failure type.
pub type RecordResult<T> = Result<T, ErrorRecord>;
