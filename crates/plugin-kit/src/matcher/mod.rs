//! Filename pattern matching
//!
//! A [`PatternSpec`] is a list of [`Pattern`]s: glob strings, regular
//! expressions, predicates, or objects implementing [`FilenameTest`]. It is
//! compiled once into a [`Matcher`], which reports a match when any of the
//! patterns matches.
//!
//! # Examples
//!
//! ```ignore
//! use plugin_kit::matcher::{Matcher, MatchOptions, Pattern};
//!
//! let matcher = Matcher::compile(
//!     vec![Pattern::from("**/*.md"), Pattern::from(regex::Regex::new(r"\.html$")?)],
//!     &MatchOptions::default(),
//! );
//! assert!(matcher.is_match("posts/hello.md"));
//! assert!(matcher.is_match("index.html"));
//! ```
//!
//! # Glob options
//!
//! [`MatchOptions`] is forwarded to every glob pattern:
//!
//! * `basename` - patterns without `/` are matched against the last path segment
//! * `dot` - wildcards may match a leading `.` in a segment
//! * `nocase` - case-insensitive comparison

mod glob;

use std::{fmt, sync::Arc};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::Result,
    options::{self, OptionMap, OptionValue},
    types::FileRecord,
};
use glob::Glob;

/// Predicate over a filename and, when available, its file record
pub type PredicateFn = dyn Fn(&str, Option<&FileRecord>) -> bool + Send + Sync;

/// An object that can test a filename
pub trait FilenameTest: Send + Sync {
    /// Whether the filename matches
    fn test(&self, filename: &str) -> bool;
}

impl FilenameTest for Regex {
    fn test(&self, filename: &str) -> bool {
        self.is_match(filename)
    }
}

/// Glob options
///
/// Unknown keys are ignored when deserializing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Match patterns without a slash against the basename only
    pub basename: bool,

    /// Let wildcards match dotfiles
    pub dot: bool,

    /// Case-insensitive matching
    pub nocase: bool,
}

impl MatchOptions {
    /// Defaults as an option map, used when merging dynamic options
    pub fn defaults() -> OptionMap {
        ["basename", "dot", "nocase"]
            .into_iter()
            .map(|key| (key.to_string(), OptionValue::Bool(false)))
            .collect()
    }

    /// Build options from a dynamic map
    ///
    /// Keys other than `basename`, `dot` and `nocase` are dropped. A
    /// recognised key holding anything but a boolean (or null) is an error.
    pub fn from_options(map: &OptionMap) -> Result<Self> {
        let merged = options::merge(&Self::defaults(), map);
        Ok(Self {
            basename: options::bool_option(&merged, "basename", false)?,
            dot: options::bool_option(&merged, "dot", false)?,
            nocase: options::bool_option(&merged, "nocase", false)?,
        })
    }
}

/// One element of a pattern specification
#[derive(Clone)]
pub enum Pattern {
    /// Glob string
    Glob(String),

    /// Regular expression tested against the whole filename
    Regex(Regex),

    /// Arbitrary predicate
    Predicate(Arc<PredicateFn>),

    /// Object exposing a `test` method
    Test(Arc<dyn FilenameTest>),
}

impl Pattern {
    /// Wrap a predicate closure
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, Option<&FileRecord>) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    /// Wrap an object implementing [`FilenameTest`]
    pub fn test<T: FilenameTest + 'static>(tester: T) -> Self {
        Self::Test(Arc::new(tester))
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Glob(glob) => f.debug_tuple("Glob").field(glob).finish(),
            Self::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::Test(_) => f.write_str("Test(..)"),
        }
    }
}

impl From<&str> for Pattern {
    fn from(glob: &str) -> Self {
        Self::Glob(glob.to_string())
    }
}

impl From<String> for Pattern {
    fn from(glob: String) -> Self {
        Self::Glob(glob)
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Self::Regex(re)
    }
}

/// List of patterns combined with logical OR
#[derive(Debug, Clone, Default)]
pub struct PatternSpec(Vec<Pattern>);

impl PatternSpec {
    /// Empty specification; matches nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Specification matching every filename
    pub fn everything() -> Self {
        Self(vec![Pattern::predicate(|_, _| true)])
    }

    pub fn push(&mut self, pattern: impl Into<Pattern>) {
        self.0.push(pattern.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.0.iter()
    }
}

impl From<Pattern> for PatternSpec {
    fn from(pattern: Pattern) -> Self {
        Self(vec![pattern])
    }
}

impl From<&str> for PatternSpec {
    fn from(glob: &str) -> Self {
        Self(vec![glob.into()])
    }
}

impl From<String> for PatternSpec {
    fn from(glob: String) -> Self {
        Self(vec![glob.into()])
    }
}

impl From<Regex> for PatternSpec {
    fn from(re: Regex) -> Self {
        Self(vec![re.into()])
    }
}

impl<T: Into<Pattern>> From<Vec<T>> for PatternSpec {
    fn from(patterns: Vec<T>) -> Self {
        Self(patterns.into_iter().map(Into::into).collect())
    }
}

impl From<&[&str]> for PatternSpec {
    fn from(globs: &[&str]) -> Self {
        Self(globs.iter().map(|glob| Pattern::from(*glob)).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PatternSpec {
    fn from(globs: [&str; N]) -> Self {
        Self(globs.into_iter().map(Pattern::from).collect())
    }
}

#[derive(Clone)]
enum Compiled {
    Glob(Glob),
    Regex(Regex),
    Predicate(Arc<PredicateFn>),
    Test(Arc<dyn FilenameTest>),
}

/// Compiled pattern specification
#[derive(Clone)]
pub struct Matcher {
    patterns: Vec<Compiled>,
    options: MatchOptions,
}

impl Matcher {
    /// Compile a pattern specification
    ///
    /// An empty specification yields a matcher that never matches.
    pub fn compile(spec: impl Into<PatternSpec>, options: &MatchOptions) -> Self {
        let spec = spec.into();
        let patterns: Vec<Compiled> = spec
            .0
            .into_iter()
            .map(|pattern| match pattern {
                Pattern::Glob(glob) => Compiled::Glob(Glob::new(&glob)),
                Pattern::Regex(re) => Compiled::Regex(re),
                Pattern::Predicate(f) => Compiled::Predicate(f),
                Pattern::Test(tester) => Compiled::Test(tester),
            })
            .collect();

        debug!(
            pattern_count = patterns.len(),
            basename = options.basename,
            dot = options.dot,
            nocase = options.nocase,
            "Compiled filename matcher"
        );

        Self {
            patterns,
            options: *options,
        }
    }

    /// Whether the filename matches any pattern
    pub fn is_match(&self, filename: &str) -> bool {
        self.is_match_file(filename, None)
    }

    /// Whether the filename matches any pattern, giving predicates the record
    pub fn is_match_file(&self, filename: &str, file: Option<&FileRecord>) -> bool {
        self.patterns.iter().any(|pattern| match pattern {
            Compiled::Glob(glob) => glob.is_match(filename, &self.options),
            Compiled::Regex(re) => re.is_match(filename),
            Compiled::Predicate(f) => f(filename, file),
            Compiled::Test(tester) => tester.test(filename),
        })
    }

    /// Names that match, in input order
    pub fn filter<I, S>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter(|name| self.is_match(name.as_ref()))
            .map(|name| name.as_ref().to_string())
            .collect()
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("patterns", &self.patterns.len())
            .field("options", &self.options)
            .finish()
    }
}
