//! Property-based tests for the filename matcher

use std::sync::Arc;

use plugin_kit::*;
use proptest::prelude::*;
use regex::Regex;

// Strategy for generating a single path segment without glob syntax
fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,7}".prop_map(|s| s.to_string())
}

// Strategy for generating relative paths with up to three segments
fn path_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(segment_strategy(), 1..4),
        prop::option::of("[a-z]{1,4}"),
    )
        .prop_map(|(segments, ext)| {
            let path = segments.join("/");
            match ext {
                Some(ext) => format!("{}.{}", path, ext),
                None => path,
            }
        })
}

fn opts(basename: bool, dot: bool, nocase: bool) -> MatchOptions {
    MatchOptions {
        basename,
        dot,
        nocase,
    }
}

proptest! {
    /// A pattern without glob syntax matches exactly its own text.
    #[test]
    fn prop_literal_pattern_matches_itself(name in path_strategy(), other in path_strategy()) {
        let matcher = Matcher::compile(name.as_str(), &MatchOptions::default());
        prop_assert!(matcher.is_match(&name));
        prop_assert_eq!(matcher.is_match(&other), other == name);
    }

    /// `*` never crosses a `/` unless basename matching is on.
    #[test]
    fn prop_star_stays_in_one_segment(name in path_strategy()) {
        let plain = Matcher::compile("*", &MatchOptions::default());
        let basename = Matcher::compile("*", &opts(true, false, false));

        prop_assert_eq!(plain.is_match(&name), !name.contains('/'));
        prop_assert!(basename.is_match(&name));
    }

    /// `**` matches any path without hidden segments.
    #[test]
    fn prop_globstar_matches_every_visible_path(name in path_strategy()) {
        let matcher = Matcher::compile("**", &MatchOptions::default());
        prop_assert!(matcher.is_match(&name));
    }

    /// Wildcards skip dotfiles unless `dot` is set.
    #[test]
    fn prop_dotfiles_need_dot_option(segment in segment_strategy()) {
        let hidden = format!(".{}", segment);
        let plain = Matcher::compile("*", &MatchOptions::default());
        let dot = Matcher::compile("*", &opts(false, true, false));

        prop_assert!(!plain.is_match(&hidden));
        prop_assert!(dot.is_match(&hidden));
    }

    /// `nocase` makes matching insensitive to ASCII case.
    #[test]
    fn prop_nocase(name in "[a-z]{1,8}\\.[a-z]{1,3}") {
        let upper = name.to_uppercase();
        let sensitive = Matcher::compile(name.as_str(), &MatchOptions::default());
        let insensitive = Matcher::compile(name.as_str(), &opts(false, false, true));

        prop_assert!(!sensitive.is_match(&upper));
        prop_assert!(insensitive.is_match(&upper));
    }

    /// A leading `!` inverts a glob.
    #[test]
    fn prop_negation_inverts(name in path_strategy()) {
        let positive = Matcher::compile("**/*.md", &MatchOptions::default());
        let negative = Matcher::compile("!**/*.md", &MatchOptions::default());
        prop_assert_eq!(negative.is_match(&name), !positive.is_match(&name));
    }

    /// Regex patterns agree with the regex itself and ignore glob options.
    #[test]
    fn prop_regex_agrees_with_is_match(
        name in path_strategy(),
        source in prop::sample::select(vec![r"\.md$", r"^[a-m]", r"/", r"^[^/]+$"]),
        nocase in any::<bool>(),
    ) {
        let re = Regex::new(source).unwrap();
        let matcher = Matcher::compile(re.clone(), &opts(false, false, nocase));
        prop_assert_eq!(matcher.is_match(&name), re.is_match(&name));
    }

    /// A list matches when any of its members does.
    #[test]
    fn prop_list_is_disjunction(name in path_strategy()) {
        let md = Matcher::compile("**/*.md", &MatchOptions::default());
        let html = Matcher::compile("**/*.html", &MatchOptions::default());
        let both = Matcher::compile(["**/*.md", "**/*.html"], &MatchOptions::default());

        prop_assert_eq!(both.is_match(&name), md.is_match(&name) || html.is_match(&name));
    }
}

#[test]
fn test_txt_round_trip() {
    let names = ["a.txt", "a.TXT", "b/a.txt"];

    let plain = Matcher::compile("*.txt", &MatchOptions::default());
    assert_eq!(plain.filter(names), vec!["a.txt"]);

    let nocase = Matcher::compile("*.txt", &opts(false, false, true));
    assert_eq!(nocase.filter(names), vec!["a.txt", "a.TXT"]);

    let deep = Matcher::compile("**/*.txt", &MatchOptions::default());
    assert_eq!(deep.filter(names), vec!["a.txt", "b/a.txt"]);
}

#[test]
fn test_predicate_and_custom_test() {
    struct LongName;

    impl FilenameTest for LongName {
        fn test(&self, filename: &str) -> bool {
            filename.len() > 5
        }
    }

    let predicate = Matcher::compile(
        Pattern::predicate(|name: &str, _: Option<&FileRecord>| name.starts_with("draft-")),
        &MatchOptions::default(),
    );
    assert!(predicate.is_match("draft-post.md"));
    assert!(!predicate.is_match("post.md"));

    let custom = Matcher::compile(Pattern::Test(Arc::new(LongName)), &MatchOptions::default());
    assert!(custom.is_match("abcdef"));
    assert!(!custom.is_match("abc"));
}

#[test]
fn test_empty_spec_matches_nothing_and_default_matches_all() {
    let empty = Matcher::compile(PatternSpec::new(), &MatchOptions::default());
    assert!(!empty.is_match("a.md"));

    let everything = Matcher::compile(PatternSpec::everything(), &MatchOptions::default());
    assert!(everything.is_match("a.md"));
    assert!(everything.is_match(".hidden/x"));
}

#[test]
fn test_options_from_map() {
    let map = options::from_json_str(r#"{"nocase": true, "unknown": 1}"#).unwrap();
    let parsed = MatchOptions::from_options(&map).unwrap();
    assert_eq!(parsed, opts(false, false, true));

    let bad = options::from_json_str(r#"{"dot": "yes"}"#).unwrap();
    assert!(MatchOptions::from_options(&bad).is_err());
}
