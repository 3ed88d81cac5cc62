//! Property-based tests for the before/each/after middleware
//!
//! Tests that verify ordering, dispatch and failure properties of a
//! middleware run over arbitrary collections.

use std::{
    collections::BTreeSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;
use plugin_kit::*;
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Before,
    EachStart(String),
    EachEnd(String),
    After,
}

// Strategy for generating site-like filenames
fn filename_strategy() -> impl Strategy<Value = String> {
    (
        prop::option::of("[a-z]{1,6}"),
        "[a-z0-9_-]{1,8}",
        prop::sample::select(vec!["md", "html", "css", "txt"]),
    )
        .prop_map(|(dir, stem, ext)| match dir {
            Some(dir) => format!("{}/{}.{}", dir, stem, ext),
            None => format!("{}.{}", stem, ext),
        })
}

fn collection_strategy() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(filename_strategy(), 0..12)
}

// Route hook logs to the test harness so failures show the run's trace
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn collection(names: &BTreeSet<String>) -> FileCollection {
    names
        .iter()
        .map(|name| (name.clone(), FileRecord::new(name.as_bytes())))
        .collect()
}

fn recording_middleware(log: &Arc<Mutex<Vec<Event>>>, pattern: &str) -> Middleware<()> {
    let before_log = Arc::clone(log);
    let each_log = Arc::clone(log);
    let after_log = Arc::clone(log);

    HookDefinition::<()>::new()
        .matching(pattern)
        .before(Callback::deferred(move |_: Batch<()>| {
            let log = Arc::clone(&before_log);
            async move {
                tokio::task::yield_now().await;
                log.lock().push(Event::Before);
                Ok(())
            }
        }))
        .each(Callback::deferred(move |entry: Entry<()>| {
            let log = Arc::clone(&each_log);
            async move {
                log.lock().push(Event::EachStart(entry.name.clone()));
                tokio::task::yield_now().await;
                log.lock().push(Event::EachEnd(entry.name));
                Ok(())
            }
        }))
        .after(Callback::direct(move |_: Batch<()>| {
            after_log.lock().push(Event::After);
            Ok(())
        }))
        .build()
}

proptest! {
    /// `before` settles before any `each` starts, and `after` runs once
    /// every `each` has settled.
    #[test]
    fn prop_phase_ordering(names in collection_strategy()) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let middleware = recording_middleware(&log, "**/*.md");
        let files = collection(&names);

        tokio_test::block_on(middleware.run(&files, Arc::new(()))).unwrap();

        let log = log.lock().clone();
        prop_assert_eq!(log.first(), Some(&Event::Before));
        prop_assert_eq!(log.last(), Some(&Event::After));
        prop_assert_eq!(log.iter().filter(|e| **e == Event::Before).count(), 1);
        prop_assert_eq!(log.iter().filter(|e| **e == Event::After).count(), 1);
    }

    /// `each` is invoked exactly once per matching filename.
    #[test]
    fn prop_each_once_per_matching_file(names in collection_strategy()) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let middleware = recording_middleware(&log, "**/*.md");
        let files = collection(&names);

        tokio_test::block_on(middleware.run(&files, Arc::new(()))).unwrap();

        let started: Vec<String> = log
            .lock()
            .iter()
            .filter_map(|e| match e {
                Event::EachStart(name) => Some(name.clone()),
                _ => None,
            })
            .collect();
        let unique: BTreeSet<String> = started.iter().cloned().collect();
        let expected: BTreeSet<String> =
            names.iter().filter(|n| n.ends_with(".md")).cloned().collect();

        prop_assert_eq!(started.len(), unique.len());
        prop_assert_eq!(unique, expected);
    }

    /// Files removed by `before` get zero `each` invocations.
    #[test]
    fn prop_removed_files_are_skipped(
        names in collection_strategy(),
        drop_mask in prop::collection::vec(any::<bool>(), 12),
    ) {
        let doomed: BTreeSet<String> = names
            .iter()
            .zip(drop_mask.iter())
            .filter(|(_, drop)| **drop)
            .map(|(name, _)| name.clone())
            .collect();
        let to_remove = doomed.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let middleware = HookDefinition::<()>::new()
            .before(Callback::direct(move |batch: Batch<()>| {
                for name in &to_remove {
                    batch.files.remove(name);
                }
                Ok(())
            }))
            .each(Callback::direct(move |entry: Entry<()>| {
                sink.lock().push(entry.name);
                Ok(())
            }))
            .build();
        let files = collection(&names);

        tokio_test::block_on(middleware.run(&files, Arc::new(()))).unwrap();

        let seen: BTreeSet<String> = seen.lock().iter().cloned().collect();
        let expected: BTreeSet<String> = names.difference(&doomed).cloned().collect();
        prop_assert_eq!(seen, expected);
    }

    /// A failing `each` fails the run, skips `after`, and does not stop the
    /// other `each` calls from settling.
    #[test]
    fn prop_each_failure_skips_after(
        names in collection_strategy(),
        fail_mask in prop::collection::vec(any::<bool>(), 12),
    ) {
        let failing: BTreeSet<String> = names
            .iter()
            .zip(fail_mask.iter())
            .filter(|(_, fail)| **fail)
            .map(|(name, _)| name.clone())
            .collect();
        let should_fail = !failing.is_empty();
        let settled = Arc::new(AtomicUsize::new(0));
        let after_called = Arc::new(Mutex::new(false));

        let counter = Arc::clone(&settled);
        let flag = Arc::clone(&after_called);
        let middleware = HookDefinition::<()>::new()
            .each(Callback::deferred(move |entry: Entry<()>| {
                let counter = Arc::clone(&counter);
                let fail = failing.contains(&entry.name);
                async move {
                    tokio::task::yield_now().await;
                    counter.fetch_add(1, Ordering::SeqCst);
                    if fail {
                        Err(PluginError::failed(entry.name))
                    } else {
                        Ok(())
                    }
                }
            }))
            .after(Callback::direct(move |_| {
                *flag.lock() = true;
                Ok(())
            }))
            .build();
        let files = collection(&names);

        let outcome = tokio_test::block_on(middleware.run(&files, Arc::new(())));

        prop_assert_eq!(outcome.is_err(), should_fail);
        prop_assert_eq!(*after_called.lock(), !should_fail);
        prop_assert_eq!(settled.load(Ordering::SeqCst), names.len());
    }
}

#[tokio::test]
async fn test_before_failure_reaches_completion() {
    init_tracing();
    let each_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&each_calls);
    let middleware = HookDefinition::<()>::new()
        .before(Callback::completion(|_: Batch<()>, done: Done<()>| {
            done.fail(PluginError::failed("setup"));
            Ok(())
        }))
        .each(Callback::direct(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }))
        .build();
    let files: FileCollection = [("a.md", FileRecord::new("a"))].into_iter().collect();

    let (tx, rx) = tokio::sync::oneshot::channel();
    middleware
        .run_with_completion(files, Arc::new(()), move |error| {
            let _ = tx.send(error);
        })
        .await
        .unwrap();

    let error = rx.await.unwrap().expect("run should fail");
    assert_eq!(error.to_string(), "Hook execution failed: setup");
    assert_eq!(each_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_context_is_shared_across_hooks() {
    init_tracing();
    #[derive(Default)]
    struct Site {
        pages: AtomicUsize,
    }

    let middleware = HookDefinition::<Site>::new()
        .matching("*.html")
        .each(Callback::direct(|entry: Entry<Site>| {
            entry.context.pages.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }))
        .build();
    let files: FileCollection = [
        ("index.html", FileRecord::new("")),
        ("about.html", FileRecord::new("")),
        ("style.css", FileRecord::new("")),
    ]
    .into_iter()
    .collect();
    let site = Arc::new(Site::default());

    middleware.run(&files, Arc::clone(&site)).await.unwrap();
    assert_eq!(site.pages.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_each_can_create_and_rename_files() {
    init_tracing();
    let middleware = HookDefinition::<()>::new()
        .matching("*.md")
        .each(Callback::direct(|entry: Entry<()>| {
            let html = entry.name.replace(".md", ".html");
            create_file(
                &entry.files,
                html,
                FileContent::Bytes(entry.file.contents.clone()),
                &CreateOptions::default(),
            )?;
            entry.files.remove(&entry.name);
            Ok(())
        }))
        .build();
    let files: FileCollection = [("a.md", FileRecord::new("# A")), ("b.md", FileRecord::new("# B"))]
        .into_iter()
        .collect();

    middleware.run(&files, Arc::new(())).await.unwrap();

    let mut keys = files.keys();
    keys.sort();
    assert_eq!(keys, vec!["a.html", "b.html"]);
    assert_eq!(files.get("a.html").unwrap().text(), "# A");
}
