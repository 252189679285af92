//! Layered structured errors.
//!
//! Every time an error crosses a boundary it can be wrapped in a new
//! [`ErrorRecord`] layer carrying a code, domain, tags, context, user and
//! tenant data, HTTP snapshots and the call stack captured at that point.
//! Reads resolve across the whole chain:
//!
//! - scalars (code, domain, hint, ...) return the deepest value that was set;
//! - maps (context, user data, tenant data) merge with shallower layers
//!   overriding deeper ones;
//! - tags are the union of all layers.
//!
//! # Examples
//!
//! ## Building and wrapping
//!
//! ```
//! use error_strata::ErrorBuilder;
//!
//! let db = ErrorBuilder::new()
//!     .code("db_timeout")
//!     .in_domain("storage")
//!     .tags(["database"])
//!     .with("table", "users")
//!     .build("query timed out");
//!
//! let api = ErrorBuilder::new()
//!     .in_domain("api")
//!     .tags(["http"])
//!     .public("Please try again later")
//!     .wrap_with(db, "GET /users failed");
//!
//! assert_eq!(api.to_string(), "GET /users failed: query timed out");
//! assert_eq!(api.code(), Some("db_timeout"));
//! assert_eq!(api.domain(), Some("storage"));
//! assert_eq!(api.tags(), vec!["http", "database"]);
//! assert_eq!(api.public(), Some("Please try again later"));
//! ```
//!
//! ## Structured output
//!
//! ```
//! use error_strata::ErrorBuilder;
//!
//! let err = ErrorBuilder::new().code("E1").with("attempt", 2).build("failed");
//! let json = serde_json::to_value(&err).unwrap();
//!
//! assert_eq!(json["error"], "failed");
//! assert_eq!(json["code"], "E1");
//! assert_eq!(json["context"]["attempt"], 2);
//! ```
//!
//! ## Panic recovery
//!
//! ```
//! use error_strata::ErrorBuilder;
//!
//! let result = ErrorBuilder::new().code("worker_crash").recover(|| -> u8 { panic!("overflow") });
//! let err = result.unwrap_err();
//!
//! assert_eq!(err.to_string(), "overflow");
//! assert_eq!(err.code(), Some("worker_crash"));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Fluent construction of error layers
pub mod builder;
/// Capture and rendering configuration
pub mod config;
/// Shorthand macros for building errors
pub mod macros;
/// Convenience re-exports for quick starts
pub mod prelude;
/// Panic recovery
pub mod recovery;
/// Stack capture, path cleaning and source fragments
pub mod stack;
/// Extension traits
pub mod traits;
/// Error record, causes and attribute values
pub mod types;

/// Tracing integration (requires `tracing` feature)
#[cfg(feature = "tracing")]
#[cfg_attr(docsrs, doc(cfg(feature = "tracing")))]
pub mod tracing_ext;

/// Tower integration (requires `tower` feature)
#[cfg(feature = "tower")]
#[cfg_attr(docsrs, doc(cfg(feature = "tower")))]
pub mod tower;

pub use builder::ErrorBuilder;
pub use config::Config;
pub use recovery::recover;
pub use stack::{Frame, SourceCache, StackTrace};
pub use traits::*;
pub use types::{
    AttrMap, Cause, ErrorRecord, ErrorVec, JoinedError, JsonMap, Layers, PanicError,
    RecordFormatter, RecordResult, RequestInfo, ResponseInfo, Value,
};
