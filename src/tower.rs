//! Tower integration.
//!
//! [`RecoveryLayer`] turns every failure of the wrapped service into an
//! [`ErrorRecord`] built from a template [`ErrorBuilder`]:
//!
//! - errors from `poll_ready` or the response future are wrapped;
//! - panics raised while creating or polling the response future are
//!   recovered and wrapped the same way a [`recover`](ErrorBuilder::recover)
//!   call would.
//!
//! # Feature Flag
//!
//! Requires the `tower` feature:
//!
//! ```toml
//! [dependencies]
//! error-strata = { version = "0.1", features = ["tower"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use error_strata::tower::RecoveryLayer;
//! use error_strata::ErrorBuilder;
//! use tower::ServiceBuilder;
//!
//! let service = ServiceBuilder::new()
//!     .layer(RecoveryLayer::new(ErrorBuilder::new().in_domain("api-gateway")))
//!     .service(my_service);
//! ```
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::error::Error;
use std::panic::{self, AssertUnwindSafe};

use futures_core::future::FusedFuture;
use pin_project_lite::pin_project;
use tower::{Layer, Service};

use crate::builder::ErrorBuilder;
use crate::types::ErrorRecord;

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// A Tower [`Layer`] that converts service failures and panics into [`ErrorRecord`]s.
#[derive(Clone, Debug)]
pub struct RecoveryLayer {
    builder: ErrorBuilder,
}

impl RecoveryLayer {
    /// Creates a layer whose errors carry the attributes of `builder`.
    #[inline]
    pub fn new(builder: ErrorBuilder) -> Self {
        Self { builder }
    }

    #[inline]
    pub fn builder(&self) -> &ErrorBuilder {
        &self.builder
    }
}

impl<S> Layer<S> for RecoveryLayer {
    type Service = RecoveryService<S>;

    #[inline]
    fn layer(&self, inner: S) -> Self::Service {
        RecoveryService { inner, builder: self.builder.clone() }
    }
}

/// A Tower [`Service`] created by [`RecoveryLayer`].
#[derive(Clone, Debug)]
pub struct RecoveryService<S> {
    inner: S,
    builder: ErrorBuilder,
}

impl<S> RecoveryService<S> {
    #[inline]
    pub fn new(inner: S, builder: ErrorBuilder) -> Self {
        Self { inner, builder }
    }

    #[inline]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    #[inline]
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    #[inline]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, Request> Service<Request> for RecoveryService<S>
where
    S: Service<Request>,
    S::Error: Into<BoxError>,
{
    type Response = S::Response;
    type Error = ErrorRecord;
    type Future = RecoveryFuture<S::Future>;

    #[inline]
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        let builder = &self.builder;
        self.inner.poll_ready(cx).map_err(|e| builder.wrap_boxed(e.into()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let builder = self.builder.clone();
        match panic::catch_unwind(AssertUnwindSafe(|| self.inner.call(request))) {
            Ok(future) => RecoveryFuture { inner: Some(future), builder, failed: None },
            Err(payload) => {
                let failed = builder.recover_payload(payload);
                RecoveryFuture { inner: None, builder, failed: Some(failed) }
            },
        }
    }
}

pin_project! {
    /// Future returned by [`RecoveryService`].
    #[must_use = "futures do nothing unless polled"]
    pub struct RecoveryFuture<F> {
        #[pin]
        inner: Option<F>,
        builder: ErrorBuilder,
        failed: Option<ErrorRecord>,
    }
}

impl<F, T, E> Future for RecoveryFuture<F>
where
    F: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    type Output = Result<T, ErrorRecord>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        if let Some(failed) = this.failed.take() {
            return Poll::Ready(Err(failed));
        }

        let inner = this.inner.as_mut().as_pin_mut().expect("polled after completion");
        let output = match panic::catch_unwind(AssertUnwindSafe(|| inner.poll(cx))) {
            Ok(Poll::Pending) => return Poll::Pending,
            Ok(Poll::Ready(Ok(response))) => Ok(response),
            Ok(Poll::Ready(Err(error))) => Err(this.builder.wrap_boxed(error.into())),
            Err(payload) => Err(this.builder.recover_payload(payload)),
        };
        this.inner.set(None);
        Poll::Ready(output)
    }
}

impl<F, T, E> FusedFuture for RecoveryFuture<F>
where
    F: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    #[inline]
    fn is_terminated(&self) -> bool {
        self.inner.is_none() && self.failed.is_none()
    }
}

/// Extension trait for wrapping a service with panic recovery.
pub trait ServiceRecoveryExt<Request>: Service<Request> + Sized {
    /// # Example
    ///
    /// ```rust,ignore
    /// use error_strata::tower::ServiceRecoveryExt;
    ///
    /// let wrapped = my_service.with_recovery(ErrorBuilder::new().owner("storage-team"));
    /// ```
    fn with_recovery(self, builder: ErrorBuilder) -> RecoveryService<Self> {
        RecoveryService::new(self, builder)
    }
}

impl<S, Request> ServiceRecoveryExt<Request> for S where S: Service<Request> {}
