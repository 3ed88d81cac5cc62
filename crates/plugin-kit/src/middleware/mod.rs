//! Before/each/after middleware
//!
//! A [`HookDefinition`] describes three optional hooks and a filename
//! pattern. [`Middleware::new`] compiles it into a reusable middleware that,
//! for every run:
//!
//! 1. calls `before` with the whole collection and waits for it,
//! 2. calls `each` for every matching file still present in the collection,
//!    all at once, and waits for every call to settle,
//! 3. calls `after` with the whole collection,
//!
//! stopping at the first failure. Every hook goes through the
//! [call adapter](crate::executor::call_function), so hooks may be direct,
//! deferred or completion-style.
//!
//! # Examples
//!
//! ```ignore
//! use plugin_kit::{Callback, FileCollection, HookDefinition};
//!
//! let middleware = HookDefinition::<Site>::new()
//!     .matching("**/*.md")
//!     .each(Callback::direct(|entry: Entry<Site>| {
//!         entry.files.update(&entry.name, |file| file.contents.make_ascii_uppercase());
//!         Ok(())
//!     }))
//!     .name("shout")
//!     .build();
//!
//! middleware.run(&files, Arc::new(site)).await?;
//! ```

mod chain;

pub use chain::{chain, Chain};

use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
    time::Instant,
};

use async_trait::async_trait;
use futures::{
    stream::{FuturesUnordered, StreamExt},
    FutureExt,
};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::{
    error::{PluginError, Result},
    executor::{call_function, panicked, Callback},
    matcher::{MatchOptions, Matcher, Pattern, PatternSpec},
    options::{self, OptionMap, OptionValue},
    types::{Batch, Entry, FileCollection},
};

/// A unit of work over a file collection
///
/// Implemented by [`Middleware`] and [`Chain`]. `name` is the introspection
/// surface for tools that list plugins by name.
#[async_trait]
pub trait Plugin<C>: Send + Sync
where
    C: Send + Sync + 'static,
{
    /// Process the collection
    async fn run(&self, files: &FileCollection, context: Arc<C>) -> Result<()>;

    /// Display name, if one was given
    fn name(&self) -> Option<&str> {
        None
    }
}

/// Hooks and pattern configuration for a [`Middleware`]
///
/// Every field is optional. Missing hooks are no-ops and the default pattern
/// matches every file.
pub struct HookDefinition<C> {
    /// Called once with the whole collection before any `each`
    pub before: Option<Callback<Batch<C>>>,

    /// Called once per matching file
    pub each: Option<Callback<Entry<C>>>,

    /// Called once with the whole collection after every `each` succeeded
    pub after: Option<Callback<Batch<C>>>,

    /// Which files `each` is called for
    pub pattern: PatternSpec,

    /// Options forwarded to glob patterns
    pub match_options: MatchOptions,

    /// Display name of the produced middleware
    pub name: Option<String>,
}

impl<C> Default for HookDefinition<C> {
    fn default() -> Self {
        Self {
            before: None,
            each: None,
            after: None,
            pattern: PatternSpec::everything(),
            match_options: MatchOptions::default(),
            name: None,
        }
    }
}

impl<C> HookDefinition<C> {
    /// Empty definition: no hooks, every file matches
    pub fn new() -> Self {
        Self::default()
    }

    /// Hook called once before any `each`
    pub fn before(mut self, callback: Callback<Batch<C>>) -> Self {
        self.before = Some(callback);
        self
    }

    /// Hook called once per matching file
    pub fn each(mut self, callback: Callback<Entry<C>>) -> Self {
        self.each = Some(callback);
        self
    }

    /// Hook called once after every `each` succeeded
    pub fn after(mut self, callback: Callback<Batch<C>>) -> Self {
        self.after = Some(callback);
        self
    }

    /// Restrict `each` to files matching the pattern specification
    pub fn matching(mut self, pattern: impl Into<PatternSpec>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Options applied to glob patterns
    pub fn match_options(mut self, options: MatchOptions) -> Self {
        self.match_options = options;
        self
    }

    /// Display name of the produced middleware
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Apply `match`, `matchOptions` and `name` from a dynamic option map
    ///
    /// Other keys are ignored. Missing or null keys leave the current value
    /// in place. `match` may be a glob string, a regex, or a list of either.
    pub fn configure(mut self, overrides: &OptionMap) -> Result<Self> {
        let defaults: OptionMap = [
            ("match".to_string(), OptionValue::Null),
            ("matchOptions".to_string(), OptionValue::Null),
            ("name".to_string(), OptionValue::Null),
        ]
        .into_iter()
        .collect();
        let merged = options::merge(&defaults, overrides);

        match &merged["match"] {
            OptionValue::Null => {}
            OptionValue::List(items) => {
                self.pattern = items
                    .iter()
                    .map(pattern_from_option)
                    .collect::<Result<Vec<_>>>()?
                    .into();
            }
            single => self.pattern = pattern_from_option(single)?.into(),
        }

        match &merged["matchOptions"] {
            OptionValue::Null => {}
            OptionValue::Map(map) => self.match_options = MatchOptions::from_options(map)?,
            other => {
                return Err(PluginError::invalid_option(
                    "matchOptions",
                    format!("expected a map, found {}", other.kind()),
                ))
            }
        }

        match &merged["name"] {
            OptionValue::Null => {}
            OptionValue::String(name) => self.name = Some(name.clone()),
            other => {
                return Err(PluginError::invalid_option(
                    "name",
                    format!("expected a string, found {}", other.kind()),
                ))
            }
        }

        Ok(self)
    }

    /// Compile into a [`Middleware`]
    pub fn build(self) -> Middleware<C> {
        Middleware::new(self)
    }
}

fn pattern_from_option(value: &OptionValue) -> Result<Pattern> {
    match value {
        OptionValue::String(glob) => Ok(Pattern::Glob(glob.clone())),
        OptionValue::Regex(re) => Ok(Pattern::Regex(re.as_ref().clone())),
        other => Err(PluginError::invalid_option(
            "match",
            format!("expected a glob or regex, found {}", other.kind()),
        )),
    }
}

struct Inner<C> {
    before: Option<Callback<Batch<C>>>,
    each: Option<Callback<Entry<C>>>,
    after: Option<Callback<Batch<C>>>,
    matcher: Matcher,
    name: Option<String>,
}

/// Compiled before/each/after middleware
///
/// Cheap to clone; clones share the compiled hooks.
pub struct Middleware<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for Middleware<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> std::fmt::Debug for Middleware<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Middleware")
            .field("name", &self.inner.name)
            .field("before", &self.inner.before)
            .field("each", &self.inner.each)
            .field("after", &self.inner.after)
            .field("matcher", &self.inner.matcher)
            .finish()
    }
}

impl<C> Middleware<C> {
    /// Compile a hook definition
    pub fn new(definition: HookDefinition<C>) -> Self {
        let matcher = Matcher::compile(definition.pattern, &definition.match_options);
        Self {
            inner: Arc::new(Inner {
                before: definition.before,
                each: definition.each,
                after: definition.after,
                matcher,
                name: definition.name,
            }),
        }
    }

    /// Display name given in the definition
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Copy of this middleware under another display name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                before: self.inner.before.clone(),
                each: self.inner.each.clone(),
                after: self.inner.after.clone(),
                matcher: self.inner.matcher.clone(),
                name: Some(name.into()),
            }),
        }
    }
}

impl<C> Middleware<C>
where
    C: Send + Sync + 'static,
{
    /// Run before, each and after over the collection
    ///
    /// Returns the first error raised by any hook. `each` calls that were
    /// already started still run to completion before the error is returned.
    pub async fn run(&self, files: &FileCollection, context: Arc<C>) -> Result<()> {
        let label = self.name().unwrap_or("<anonymous>");
        let start = Instant::now();

        debug!(middleware = %label, file_count = files.len(), "Running before hook");
        let batch = Batch {
            files: files.clone(),
            context: Arc::clone(&context),
        };
        if let Err(e) = call_function(self.inner.before.as_ref(), batch).await {
            error!(middleware = %label, phase = "before", error = %e, "Hook failed");
            return Err(e);
        }

        let processed = match self.run_each(files, &context, label).await {
            Ok(processed) => processed,
            Err(e) => {
                error!(middleware = %label, phase = "each", error = %e, "Hook failed");
                return Err(e);
            }
        };

        debug!(middleware = %label, "Running after hook");
        let batch = Batch {
            files: files.clone(),
            context,
        };
        if let Err(e) = call_function(self.inner.after.as_ref(), batch).await {
            error!(middleware = %label, phase = "after", error = %e, "Hook failed");
            return Err(e);
        }

        info!(
            middleware = %label,
            processed = processed,
            duration_ms = start.elapsed().as_millis() as u64,
            "Middleware completed"
        );
        Ok(())
    }

    /// Dispatch `each` for every matching, still present file
    ///
    /// Filenames are snapshotted and filtered first; presence is re-checked
    /// when each call is dispatched. Returns the number of files processed.
    async fn run_each(&self, files: &FileCollection, context: &Arc<C>, label: &str) -> Result<usize> {
        let snapshot = files.snapshot();
        let matcher = &self.inner.matcher;
        // Predicates and custom tests are user code.
        let matched: Vec<String> = catch_unwind(AssertUnwindSafe(|| {
            snapshot
                .into_iter()
                .filter(|(name, file)| matcher.is_match_file(name, Some(file)))
                .map(|(name, _)| name)
                .collect()
        }))
        .map_err(panicked)?;

        debug!(
            middleware = %label,
            matched = matched.len(),
            "Dispatching each hook"
        );

        let each = self.inner.each.as_ref();
        let mut pending: FuturesUnordered<_> = matched
            .into_iter()
            .map(|name| {
                let files = files.clone();
                let context = Arc::clone(context);
                async move {
                    let Some(file) = files.get(&name) else {
                        warn!(file = %name, "File removed before dispatch, skipping");
                        return Ok(false);
                    };
                    let entry = Entry {
                        name,
                        file,
                        files,
                        context,
                    };
                    call_function(each, entry).await.map(|_| true)
                }
            })
            .collect();

        let mut processed = 0;
        let mut first_error = None;
        while let Some(outcome) = pending.next().await {
            match outcome {
                Ok(true) => processed += 1,
                Ok(false) => {}
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(e) => debug!(middleware = %label, error = %e, "Additional each failure"),
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(processed),
        }
    }

    /// Run on the ambient tokio runtime and report through a callback
    ///
    /// `completion` is called exactly once, with `None` on success or the
    /// first error otherwise.
    pub fn run_with_completion<F>(
        &self,
        files: FileCollection,
        context: Arc<C>,
        completion: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Option<PluginError>) + Send + 'static,
    {
        let middleware = self.clone();
        tokio::spawn(async move {
            let outcome = AssertUnwindSafe(middleware.run(&files, context))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(panicked(payload)));
            completion(outcome.err());
        })
    }
}

#[async_trait]
impl<C> Plugin<C> for Middleware<C>
where
    C: Send + Sync + 'static,
{
    async fn run(&self, files: &FileCollection, context: Arc<C>) -> Result<()> {
        Middleware::run(self, files, context).await
    }

    fn name(&self) -> Option<&str> {
        Middleware::name(self)
    }
}
