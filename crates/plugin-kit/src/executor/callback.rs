//! Callback shapes accepted by the call adapter

use std::{fmt, future::Future, sync::Arc};

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::warn;

use crate::error::{PluginError, Result};

/// Synchronous callback returning its value directly
pub type DirectFn<A, T> = dyn Fn(A) -> Result<T> + Send + Sync;

/// Callback returning a deferred value
pub type DeferredFn<A, T> = dyn Fn(A) -> BoxFuture<'static, Result<T>> + Send + Sync;

/// Callback reporting its outcome through a [`Done`] handle
///
/// Returning `Err` before the handle is settled fails the invocation.
pub type CompletionFn<A, T> = dyn Fn(A, Done<T>) -> Result<()> + Send + Sync;

/// A user callback tagged with its calling convention
///
/// The convention is chosen by the caller when building the callback; the
/// adapter never guesses it.
///
/// # Examples
///
/// ```ignore
/// // Direct value
/// let direct = Callback::direct(|_: ()| Ok(5));
///
/// // Deferred value
/// let deferred = Callback::deferred(|_: ()| async { Ok(5) });
///
/// // Completion handle
/// let completion = Callback::completion(|_: (), done: Done<i32>| {
///     done.ok(7);
///     Ok(())
/// });
/// ```
pub enum Callback<A, T = ()> {
    /// Returns its value (or error) synchronously
    Direct(Arc<DirectFn<A, T>>),

    /// Returns a future that settles later
    Deferred(Arc<DeferredFn<A, T>>),

    /// Receives an extra completion handle and settles it, possibly later
    Completion(Arc<CompletionFn<A, T>>),
}

impl<A, T> Callback<A, T> {
    /// Wrap a synchronous function
    pub fn direct<F>(f: F) -> Self
    where
        F: Fn(A) -> Result<T> + Send + Sync + 'static,
    {
        Self::Direct(Arc::new(f))
    }

    /// Wrap a function returning a future
    pub fn deferred<F, Fut>(f: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self::Deferred(Arc::new(move |args| -> BoxFuture<'static, Result<T>> {
            Box::pin(f(args))
        }))
    }

    /// Wrap a completion-style function
    pub fn completion<F>(f: F) -> Self
    where
        F: Fn(A, Done<T>) -> Result<()> + Send + Sync + 'static,
    {
        Self::Completion(Arc::new(f))
    }

    /// Name of the calling convention, for logging
    pub fn convention(&self) -> &'static str {
        match self {
            Self::Direct(_) => "direct",
            Self::Deferred(_) => "deferred",
            Self::Completion(_) => "completion",
        }
    }
}

impl<A, T> Clone for Callback<A, T> {
    fn clone(&self) -> Self {
        match self {
            Self::Direct(f) => Self::Direct(Arc::clone(f)),
            Self::Deferred(f) => Self::Deferred(Arc::clone(f)),
            Self::Completion(f) => Self::Completion(Arc::clone(f)),
        }
    }
}

impl<A, T> fmt::Debug for Callback<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback::{}", self.convention())
    }
}

/// Single-assignment completion handle
///
/// Handed to [`Callback::Completion`] functions. The first call to
/// [`settle`](Done::settle) (or [`ok`](Done::ok) / [`fail`](Done::fail))
/// decides the outcome; later calls are ignored. Clones share the same slot,
/// so a handle can be moved into a spawned task. If every clone is dropped
/// without settling, the invocation fails with
/// [`PluginError::CompletionDropped`].
pub struct Done<T> {
    slot: Arc<Mutex<Option<oneshot::Sender<Result<T>>>>>,
}

impl<T> Done<T> {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<Result<T>>) {
        let (tx, rx) = oneshot::channel();
        let done = Self {
            slot: Arc::new(Mutex::new(Some(tx))),
        };
        (done, rx)
    }

    /// Settle with a result
    ///
    /// Returns `false` if the handle had already been settled.
    pub fn settle(&self, result: Result<T>) -> bool {
        let sender = self.slot.lock().take();
        match sender {
            Some(tx) => {
                // The receiver only goes away once the invocation is finished.
                let _ = tx.send(result);
                true
            }
            None => {
                warn!("Ignoring completion of an already settled callback");
                false
            }
        }
    }

    /// Settle with a value
    pub fn ok(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Settle with an error
    pub fn fail(&self, error: PluginError) -> bool {
        self.settle(Err(error))
    }

    /// Whether the handle has been settled
    pub fn is_settled(&self) -> bool {
        self.slot.lock().is_none()
    }
}

impl<T> Clone for Done<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> fmt::Debug for Done<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done")
            .field("settled", &self.is_settled())
            .finish()
    }
}
