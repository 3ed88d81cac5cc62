//! Plugin Kit
//!
//! Building blocks for static site generator plugins that transform a
//! collection of files.
//!
//! # Overview
//!
//! A plugin receives a mutable mapping of filename to file record plus a
//! shared build context, and must eventually signal success or failure. Most
//! plugins share the same shape: some setup, a transformation applied to
//! every file matching a pattern, and some teardown. This crate provides:
//!
//! 1. **Call adapter** (`executor`): one async contract over callbacks that
//!    return a value, return a future, or settle a completion handle
//! 2. **Middleware** (`middleware`): before/each/after orchestration with
//!    pattern filtering and first-failure reporting
//! 3. **Pattern matcher** (`matcher`): glob, regex and predicate patterns
//! 4. **Options** (`options`): dynamic option maps, merge over defaults and
//!    deep clone
//! 5. **File helper** (`files`): create file records from text, bytes or
//!    structured values
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use plugin_kit::{Callback, Entry, FileCollection, FileRecord, HookDefinition};
//!
//! let files: FileCollection = [
//!     ("index.md", FileRecord::new("# Home")),
//!     ("style.css", FileRecord::new("body {}")),
//! ]
//! .into_iter()
//! .collect();
//!
//! let middleware = HookDefinition::<()>::new()
//!     .matching("*.md")
//!     .each(Callback::direct(|entry: Entry<()>| {
//!         entry.files.update(&entry.name, |file| file.mode = "0600".into());
//!         Ok(())
//!     }))
//!     .name("private-markdown")
//!     .build();
//!
//! middleware.run(&files, Arc::new(())).await?;
//! # Ok::<(), plugin_kit::PluginError>(())
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T>` which is an alias for
//! `std::result::Result<T, PluginError>`. Panics in hook code are captured
//! and reported as errors.
//!
//! # Thread Safety
//!
//! Collections, callbacks and middleware are `Send + Sync` and cheap to
//! clone. The collection lock is never held while a hook is awaited.

pub mod error;
pub mod executor;
pub mod files;
pub mod matcher;
pub mod middleware;
pub mod options;
pub mod types;

// Re-export public types
pub use error::{PluginError, Result};
pub use executor::{call_function, Callback, Done};
pub use files::{create_file, CreateOptions, FileContent};
pub use matcher::{FilenameTest, MatchOptions, Matcher, Pattern, PatternSpec};
pub use middleware::{chain, Chain, HookDefinition, Middleware, Plugin};
pub use options::{merge, OptionMap, OptionValue};
pub use types::{Batch, Entry, FileCollection, FileRecord};
