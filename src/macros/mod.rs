//! Shorthand macros.
//!
//! - [`macro@crate::record`] - formats a message and builds an [`ErrorRecord`](crate::ErrorRecord),
//!   optionally from a configured builder.
//! - [`macro@crate::deferred`] - wraps an expression into a [`Value::Deferred`](crate::Value::Deferred)
//!   that is evaluated every time the attribute is read.
//! - [`macro@crate::ensure`] - returns early with an error when a condition does not hold.
//!
//! # Examples
//!
//! ```
//! use error_strata::{ensure, record, ErrorBuilder, ErrorRecord};
//!
//! fn withdraw(balance: u64, amount: u64) -> Result<u64, ErrorRecord> {
//!     let builder = ErrorBuilder::new().code("insufficient_funds");
//!     ensure!(amount <= balance, builder => "cannot withdraw {} from {}", amount, balance);
//!     Ok(balance - amount)
//! }
//!
//! let err = withdraw(10, 25).unwrap_err();
//! assert_eq!(err.to_string(), "cannot withdraw 25 from 10");
//! assert_eq!(err.code(), Some("insufficient_funds"));
//!
//! let plain = record!("user {} not found", 42);
//! assert_eq!(plain.to_string(), "user 42 not found");
//! ```

/// Builds an [`ErrorRecord`](crate::ErrorRecord) from a format string.
///
/// - `record!("fmt", args..)` uses a fresh [`ErrorBuilder`](crate::ErrorBuilder)
/// - `record!(builder => "fmt", args..)` uses the given builder
///
/// # Examples
///
/// ```
/// use error_strata::{record, ErrorBuilder};
///
/// let builder = ErrorBuilder::new().in_domain("auth");
/// let err = record!(builder => "token expired {} seconds ago", 30);
///
/// assert_eq!(err.to_string(), "token expired 30 seconds ago");
/// assert_eq!(err.domain(), Some("auth"));
/// ```
#[macro_export]
macro_rules! record {
    ($builder:expr => $($arg:tt)+) => {
        $builder.build(::std::format!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::ErrorBuilder::new().build(::std::format!($($arg)+))
    };
}

/// Creates a deferred attribute value from an expression.
///
/// The expression is moved into a closure and re-evaluated whenever the
/// attribute is resolved, so it must be `Send + Sync + 'static`.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use error_strata::{deferred, ErrorBuilder};
///
/// let reads = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&reads);
/// let err = ErrorBuilder::new()
///     .with("reads", deferred!(counter.fetch_add(1, Ordering::SeqCst) + 1))
///     .build("boom");
///
/// assert_eq!(reads.load(Ordering::SeqCst), 0);
/// assert_eq!(err.context()["reads"], 1);
/// assert_eq!(err.context()["reads"], 2);
/// ```
#[macro_export]
macro_rules! deferred {
    ($($body:tt)+) => {
        $crate::Value::deferred(move || { $($body)+ })
    };
}

/// Returns `Err` early when `cond` is false.
///
/// The error is converted with `Into`, so the enclosing function may return
/// any error type that an [`ErrorRecord`](crate::ErrorRecord) converts into.
///
/// - `ensure!(cond)` uses the condition text as the message
/// - `ensure!(cond, "fmt", args..)` formats a message
/// - `ensure!(cond, builder => "fmt", args..)` builds from a configured builder
#[macro_export]
macro_rules! ensure {
    ($cond:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err(
                $crate::ErrorBuilder::new()
                    .build(::core::concat!("condition failed: ", ::core::stringify!($cond)))
                    .into(),
            );
        }
    };
    ($cond:expr, $builder:expr => $($arg:tt)+) => {
        if !$cond {
            return ::core::result::Result::Err($crate::record!($builder => $($arg)+).into());
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return ::core::result::Result::Err($crate::record!($($arg)+).into());
        }
    };
}
