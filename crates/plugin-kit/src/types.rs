//! Core data types shared by the hooks
//!
//! This module defines the file collection a middleware run operates on, the
//! records stored in it, and the argument bundles handed to `before`, `each`
//! and `after` hooks.
//!
//! # Examples
//!
//! ```ignore
//! use plugin_kit::{FileCollection, FileRecord};
//!
//! let files = FileCollection::new();
//! files.insert("index.md", FileRecord::new(b"# Hello".to_vec()));
//! files.update("index.md", |file| file.mode = "0600".to_string());
//! assert_eq!(files.get("index.md").unwrap().mode, "0600");
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::options::OptionMap;

/// Default permission mode of a new file record
pub const DEFAULT_MODE: &str = "0644";

/// A single file in a collection
///
/// The orchestrator treats records as opaque; only their presence in the
/// collection matters to it.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    /// Raw file contents
    pub contents: Vec<u8>,

    /// Permission mode as an octal string (e.g. `"0644"`)
    pub mode: String,

    /// Free-form metadata (front matter, plugin annotations, ...)
    pub metadata: OptionMap,
}

impl FileRecord {
    /// Create a record with the default mode and no metadata
    pub fn new(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: contents.into(),
            mode: DEFAULT_MODE.to_string(),
            metadata: OptionMap::new(),
        }
    }

    /// Contents interpreted as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents).into_owned()
    }
}

/// Caller-owned mapping of filename to [`FileRecord`]
///
/// Cloning the collection clones the handle, not the files: every clone
/// observes the same entries. Iteration follows insertion order. The lock is
/// only held for the duration of a single method call.
#[derive(Debug, Clone, Default)]
pub struct FileCollection {
    files: Arc<RwLock<IndexMap<String, FileRecord>>>,
}

impl FileCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Whether the collection has no files
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }

    /// Whether a file with this name is present
    pub fn contains(&self, name: &str) -> bool {
        self.files.read().contains_key(name)
    }

    /// Snapshot of a single record
    pub fn get(&self, name: &str) -> Option<FileRecord> {
        self.files.read().get(name).cloned()
    }

    /// Insert or overwrite a record, returning the previous one
    pub fn insert(&self, name: impl Into<String>, file: FileRecord) -> Option<FileRecord> {
        self.files.write().insert(name.into(), file)
    }

    /// Remove a record, returning it if it was present
    pub fn remove(&self, name: &str) -> Option<FileRecord> {
        self.files.write().shift_remove(name)
    }

    /// Mutate a record in place
    ///
    /// Returns `false` when no file with this name exists.
    pub fn update<F>(&self, name: &str, f: F) -> bool
    where
        F: FnOnce(&mut FileRecord),
    {
        match self.files.write().get_mut(name) {
            Some(file) => {
                f(file);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the filenames, in enumeration order
    pub fn keys(&self) -> Vec<String> {
        self.files.read().keys().cloned().collect()
    }

    /// Snapshot of every entry, in enumeration order
    pub fn snapshot(&self) -> Vec<(String, FileRecord)> {
        self.files
            .read()
            .iter()
            .map(|(name, file)| (name.clone(), file.clone()))
            .collect()
    }
}

impl<N: Into<String>> FromIterator<(N, FileRecord)> for FileCollection {
    fn from_iter<I: IntoIterator<Item = (N, FileRecord)>>(iter: I) -> Self {
        let files = iter
            .into_iter()
            .map(|(name, file)| (name.into(), file))
            .collect();
        Self {
            files: Arc::new(RwLock::new(files)),
        }
    }
}

/// Arguments of the `before` and `after` hooks
pub struct Batch<C> {
    /// The collection being processed
    pub files: FileCollection,

    /// Caller-supplied context (typically the site generator instance)
    pub context: Arc<C>,
}

impl<C> Clone for Batch<C> {
    fn clone(&self) -> Self {
        Self {
            files: self.files.clone(),
            context: Arc::clone(&self.context),
        }
    }
}

/// Arguments of the `each` hook
pub struct Entry<C> {
    /// Filename of the matched file
    pub name: String,

    /// The file as it was when the invocation was dispatched
    pub file: FileRecord,

    /// The collection being processed
    pub files: FileCollection,

    /// Caller-supplied context
    pub context: Arc<C>,
}

impl<C> Clone for Entry<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            file: self.file.clone(),
            files: self.files.clone(),
            context: Arc::clone(&self.context),
        }
    }
}
