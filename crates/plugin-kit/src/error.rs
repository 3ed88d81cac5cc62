//! Error types for the plugin kit
//!
//! Every failure a hook can produce, and every failure of the helper
//! utilities, is expressed as a [`PluginError`]. Errors use the `thiserror`
//! crate and are propagated unchanged to the caller of a middleware run.
//!
//! # Error Handling Patterns
//!
//! 1. **Synchronous hook failure**: a direct callback returns `Err` or panics.
//!    The call adapter turns it into a failed result.
//!
//! 2. **Asynchronous hook failure**: a deferred callback resolves to `Err`, or
//!    a completion-style callback settles its [`Done`](crate::executor::Done)
//!    handle with an error.
//!
//! 3. **Aggregate each failure**: one or more `each` invocations fail. The
//!    first failure observed is reported; the others still run to completion.
//!
//! The kit performs no retries and no recovery; that is left to the caller.
//!
//! # Examples
//!
//! ```ignore
//! match middleware.run(&files, context).await {
//!     Ok(()) => println!("all files processed"),
//!     Err(PluginError::Panicked(msg)) => eprintln!("hook panicked: {}", msg),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Errors that can occur while running hooks or using the helpers
#[derive(Debug, Error)]
pub enum PluginError {
    /// A hook reported a failure
    ///
    /// The string carries the message supplied by the hook author.
    #[error("Hook execution failed: {0}")]
    ExecutionFailed(String),

    /// A hook panicked while running
    ///
    /// The panic is captured by the call adapter. The string contains the
    /// panic payload when it was a string, or a placeholder otherwise.
    #[error("Hook panicked: {0}")]
    Panicked(String),

    /// A completion-style hook dropped its completion handle without settling it
    #[error("Completion callback was dropped without being called")]
    CompletionDropped,

    /// An option carried a value of the wrong shape
    #[error("Invalid option '{key}': {reason}")]
    InvalidOption {
        /// Name of the offending option
        key: String,
        /// What was wrong with it
        reason: String,
    },

    /// A text payload named an encoding the file helper does not know
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// A text payload could not be decoded with the requested encoding
    #[error("Decode error: {0}")]
    Decode(String),

    /// JSON error
    ///
    /// Wraps `serde_json::Error` for option parsing and structured file content.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    ///
    /// Wraps `serde_yaml::Error` for option parsing.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Any other error raised by hook code
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl PluginError {
    /// Build an [`PluginError::ExecutionFailed`] from a message
    pub fn failed(message: impl Into<String>) -> Self {
        Self::ExecutionFailed(message.into())
    }

    /// Wrap an arbitrary error raised by hook code
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other(Box::new(error))
    }

    pub(crate) fn invalid_option(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for plugin kit operations
pub type Result<T> = std::result::Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_message() {
        let err = PluginError::failed("boom");
        assert_eq!(err.to_string(), "Hook execution failed: boom");
    }

    #[test]
    fn test_other_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing layout");
        let err = PluginError::other(io);
        assert_eq!(err.to_string(), "missing layout");
    }

    #[test]
    fn test_invalid_option_names_key() {
        let err = PluginError::invalid_option("dot", "expected a boolean");
        assert_eq!(err.to_string(), "Invalid option 'dot': expected a boolean");
    }
}
