//! Call adapter
//!
//! Hook authors write callbacks in one of three styles: return a value,
//! return a future, or report through a completion handle. The adapter turns
//! all three into one contract: an `async` call that settles exactly once
//! with either a value or a [`PluginError`].
//!
//! Panics raised while a callback runs are captured and reported as
//! [`PluginError::Panicked`], the same way an error return would be.
//!
//! # Examples
//!
//! ```ignore
//! use plugin_kit::executor::{call_function, Callback, Done};
//!
//! let cb = Callback::completion(|_: (), done: Done<i32>| {
//!     done.ok(7);
//!     Ok(())
//! });
//! assert_eq!(call_function(Some(&cb), ()).await?, Some(7));
//! ```

mod callback;

pub use callback::{Callback, CompletionFn, DeferredFn, DirectFn, Done};

use std::{
    any::Any,
    panic::{catch_unwind, AssertUnwindSafe},
};

use futures::FutureExt;
use tracing::trace;

use crate::error::{PluginError, Result};

/// Invoke a callback and wait for its outcome
///
/// * `None` resolves immediately to `Ok(None)`.
/// * [`Callback::Direct`] settles with the returned result.
/// * [`Callback::Deferred`] follows the returned future.
/// * [`Callback::Completion`] receives a fresh [`Done`] handle and settles
///   with whatever reaches it first: the handle, an `Err` return, or a panic.
pub async fn call_function<A, T>(callback: Option<&Callback<A, T>>, args: A) -> Result<Option<T>>
where
    A: Send,
    T: Send,
{
    let Some(callback) = callback else {
        return Ok(None);
    };

    match callback {
        Callback::Direct(f) => {
            let result = catch_unwind(AssertUnwindSafe(|| f(args))).map_err(panicked)?;
            result.map(Some)
        }
        Callback::Deferred(f) => {
            let future = catch_unwind(AssertUnwindSafe(|| f(args))).map_err(panicked)?;
            let result = AssertUnwindSafe(future)
                .catch_unwind()
                .await
                .map_err(panicked)?;
            result.map(Some)
        }
        Callback::Completion(f) => {
            let (done, rx) = Done::channel();
            let returned = catch_unwind(AssertUnwindSafe(|| f(args, done.clone())));
            match returned {
                Ok(Ok(())) => {}
                Ok(Err(error)) if !done.is_settled() => {
                    done.fail(error);
                }
                Ok(Err(error)) => {
                    trace!(error = %error, "Error returned after completion was settled");
                }
                Err(payload) => {
                    done.fail(panicked(payload));
                }
            }
            // Only the callback's own clones may keep the channel open now.
            drop(done);

            match rx.await {
                Ok(result) => result.map(Some),
                Err(_) => Err(PluginError::CompletionDropped),
            }
        }
    }
}

pub(crate) fn panicked(payload: Box<dyn Any + Send>) -> PluginError {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    };
    PluginError::Panicked(message)
}
