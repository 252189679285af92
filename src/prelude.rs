//! Convenience re-exports for common usage patterns.
//!
//! ```
//! use error_strata::prelude::*;
//! ```
//!
//! # What's Included
//!
//! - **Macros**: [`record!`], [`deferred!`], [`ensure!`]
//! - **Types**: [`ErrorBuilder`], [`ErrorRecord`], [`Value`], [`Config`]
//! - **Traits**: [`ResultExt`]
//!
//! # Examples
//!
//! ```
//! use error_strata::prelude::*;
//!
//! fn load_config(path: &str) -> RecordResult<String> {
//!     std::fs::read_to_string(path).ctx_with(|| format!("loading {}", path))
//! }
//!
//! assert!(load_config("no-such-file.toml").is_err());
//! ```

// Macros
pub use crate::{deferred, ensure, record};

// Core types
pub use crate::types::{ErrorRecord, RecordResult, Value};
pub use crate::{Config, ErrorBuilder};

// Traits
pub use crate::traits::ResultExt;
#[cfg(feature = "tracing")]
pub use crate::traits::TracingErrorExt;
