//! Dual-mode invocation
//!
//! Every asynchronous client operation returns a [`Pending`]. One internal
//! future backs two entry points:
//!
//! - `pending.await` resolves with the operation's value or rejects with its
//!   error
//! - `pending.on_complete(callback)` runs the operation on the current Tokio
//!   runtime and hands the result to `callback`
//!
//! An operation reporting several values resolves with a tuple, so a single
//! value is never wrapped in a sequence.

use std::fmt;
use std::future::{Future, IntoFuture};

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::runtime::Handle;

use crate::error::{ImageKitError, Result};

/// An operation that has not been driven yet
#[must_use = "a Pending operation does nothing until awaited or given a callback"]
pub struct Pending<T> {
    future: BoxFuture<'static, Result<T>>,
}

impl<T: Send + 'static> Pending<T> {
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            future: future.boxed(),
        }
    }

    /// An operation that fails as soon as it is driven
    pub fn failed(error: ImageKitError) -> Self {
        Self::new(async move { Err(error) })
    }

    /// Callback mode
    ///
    /// The callback receives exactly one `Result`, from a task spawned on the
    /// current runtime.
    ///
    /// # Errors
    ///
    /// Fails synchronously with `ImageKitError::Usage` when called outside a
    /// Tokio runtime; the callback is then never invoked.
    pub fn on_complete<F>(self, callback: F) -> Result<()>
    where
        F: FnOnce(Result<T>) + Send + 'static,
    {
        let handle = Handle::try_current().map_err(|_| {
            ImageKitError::usage("a completion callback requires a running Tokio runtime")
        })?;

        let future = self.future;
        handle.spawn(async move { callback(future.await) });
        Ok(())
    }

    /// Transform the successful value once it arrives
    pub fn and_then<U, F>(self, f: F) -> Pending<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Result<U> + Send + 'static,
    {
        let future = self.future;
        Pending::new(async move { future.await.and_then(f) })
    }
}

impl<T> IntoFuture for Pending<T> {
    type Output = Result<T>;
    type IntoFuture = BoxFuture<'static, Result<T>>;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

impl<T> fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending").finish_non_exhaustive()
    }
}
