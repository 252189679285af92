//! Extension traits.
//!
//! - [`ResultExt`]: wrap the error of any `Result` in a new layer
//! - `TracingErrorExt` (feature `tracing`): emit a record as a tracing event

pub mod result_ext;

pub use result_ext::ResultExt;

#[cfg(feature = "tracing")]
pub use crate::tracing_ext::TracingErrorExt;
