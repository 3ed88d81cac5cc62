//! Glob pattern engine
//!
//! Patterns are parsed once into a list of nodes and matched with a
//! backtracking walk over the filename that remembers failed positions.
//! Supported syntax: `*`, `?`, `**`
//! segments, leading `!` negation, bracket classes (with POSIX names), brace
//! alternation and ranges, extglobs `@(..)` `?(..)` `+(..)` `*(..)` `!(..)`,
//! plain `(a|b)` groups and backslash escapes.

use std::{cell::RefCell, collections::HashSet};

use super::MatchOptions;

#[derive(Debug, Clone)]
enum Node {
    Literal(char),
    Slash,
    AnyChar,
    /// `nonempty` is set when the star is the whole segment
    Star {
        nonempty: bool,
    },
    /// `**/`: zero or more whole segments
    GlobStar,
    /// `/**` at the end: nothing, or `/` followed by anything
    TrailingGlobStar,
    /// A pattern (or alternative) that is only `**`
    LoneGlobStar,
    Class(Class),
    Group(Group),
    NumRange {
        start: i64,
        end: i64,
        width: usize,
    },
    CharRange {
        start: char,
        end: char,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKind {
    One,
    ZeroOrOne,
    OneOrMore,
    ZeroOrMore,
    Not,
}

#[derive(Debug, Clone)]
struct Group {
    kind: GroupKind,
    alternatives: Vec<Vec<Node>>,
    /// Extglobs refuse a leading dot; brace groups leave it to their contents
    guard: bool,
}

#[derive(Debug, Clone)]
struct Class {
    negated: bool,
    items: Vec<ClassItem>,
}

#[derive(Debug, Clone)]
enum ClassItem {
    Char(char),
    Range(char, char),
    Posix(Posix),
}

#[derive(Debug, Clone, Copy)]
enum Posix {
    Alnum,
    Alpha,
    Blank,
    Cntrl,
    Digit,
    Graph,
    Lower,
    Print,
    Punct,
    Space,
    Upper,
    Word,
    Xdigit,
}

impl Posix {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "alnum" => Self::Alnum,
            "alpha" => Self::Alpha,
            "blank" => Self::Blank,
            "cntrl" => Self::Cntrl,
            "digit" => Self::Digit,
            "graph" => Self::Graph,
            "lower" => Self::Lower,
            "print" => Self::Print,
            "punct" => Self::Punct,
            "space" => Self::Space,
            "upper" => Self::Upper,
            "word" => Self::Word,
            "xdigit" => Self::Xdigit,
            _ => return None,
        })
    }

    fn matches(self, c: char) -> bool {
        match self {
            Self::Alnum => c.is_ascii_alphanumeric(),
            Self::Alpha => c.is_ascii_alphabetic(),
            Self::Blank => c == ' ' || c == '\t',
            Self::Cntrl => c.is_ascii_control(),
            Self::Digit => c.is_ascii_digit(),
            Self::Graph => c.is_ascii_graphic(),
            Self::Lower => c.is_ascii_lowercase(),
            Self::Print => c.is_ascii_graphic() || c == ' ',
            Self::Punct => c.is_ascii_punctuation(),
            Self::Space => c.is_ascii_whitespace() || c == '\x0b',
            Self::Upper => c.is_ascii_uppercase(),
            Self::Word => c.is_ascii_alphanumeric() || c == '_',
            Self::Xdigit => c.is_ascii_hexdigit(),
        }
    }
}

impl Class {
    fn matches(&self, c: char, nocase: bool) -> bool {
        let hit = if nocase {
            c.to_lowercase()
                .chain(c.to_uppercase())
                .any(|variant| self.items.iter().any(|item| item.matches(variant)))
                || self.items.iter().any(|item| item.matches(c))
        } else {
            self.items.iter().any(|item| item.matches(c))
        };
        hit != self.negated
    }
}

impl ClassItem {
    fn matches(&self, c: char) -> bool {
        match self {
            Self::Char(x) => *x == c,
            Self::Range(lo, hi) => *lo <= c && c <= *hi,
            Self::Posix(class) => class.matches(c),
        }
    }
}

/// A compiled glob pattern
#[derive(Debug, Clone)]
pub(crate) struct Glob {
    negated: bool,
    has_slash: bool,
    nodes: Vec<Node>,
}

impl Glob {
    pub(crate) fn new(pattern: &str) -> Self {
        let chars: Vec<char> = pattern.chars().collect();

        let mut negated = false;
        let mut start = 0;
        while chars.get(start) == Some(&'!') && chars.get(start + 1) != Some(&'(') {
            negated = !negated;
            start += 1;
        }

        let body = &chars[start..];
        let mut parser = Parser { chars: body, pos: 0 };
        let nodes = parser.sequence(&[], true);

        Self {
            negated,
            has_slash: body.contains(&'/'),
            nodes,
        }
    }

    pub(crate) fn is_match(&self, name: &str, options: &MatchOptions) -> bool {
        let target = if options.basename && !self.has_slash {
            name.rsplit('/').next().unwrap_or(name)
        } else {
            name
        };

        let text: Vec<char> = target.chars().collect();
        let matching = Matching {
            text: &text,
            dot: options.dot,
            nocase: options.nocase,
            dead_ends: RefCell::default(),
        };
        let matched = matching.top(&self.nodes, 0, 0);
        matched != self.negated
    }
}

struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn sequence(&mut self, stop: &[char], mut segment_start: bool) -> Vec<Node> {
        let mut nodes = Vec::new();

        while let Some(c) = self.peek(0) {
            if stop.contains(&c) {
                break;
            }
            let at_start = segment_start;
            segment_start = false;

            match c {
                '/' => {
                    self.pos += 1;
                    nodes.push(Node::Slash);
                    segment_start = true;
                }
                '\\' => {
                    self.pos += 1;
                    match self.peek(0) {
                        Some(escaped) => {
                            self.pos += 1;
                            nodes.push(Node::Literal(escaped));
                        }
                        None => nodes.push(Node::Literal('\\')),
                    }
                }
                '*' => {
                    if self.peek(1) == Some('(') {
                        if let Some(group) = self.extglob(GroupKind::ZeroOrMore, at_start) {
                            nodes.push(group);
                            continue;
                        }
                    }

                    let mut count = 0;
                    while self.peek(0) == Some('*') {
                        count += 1;
                        self.pos += 1;
                    }
                    let next = self.peek(0);
                    let ends_segment = next.map_or(true, |n| n == '/' || stop.contains(&n));

                    if count >= 2 && at_start && ends_segment {
                        if next == Some('/') {
                            self.pos += 1;
                            nodes.push(Node::GlobStar);
                            segment_start = true;
                        } else if matches!(nodes.last(), Some(Node::Slash)) {
                            nodes.pop();
                            nodes.push(Node::TrailingGlobStar);
                        } else {
                            nodes.push(Node::LoneGlobStar);
                        }
                    } else {
                        nodes.push(Node::Star {
                            nonempty: at_start && ends_segment,
                        });
                    }
                }
                '?' | '+' | '@' | '!' if self.peek(1) == Some('(') => {
                    let kind = match c {
                        '?' => GroupKind::ZeroOrOne,
                        '+' => GroupKind::OneOrMore,
                        '@' => GroupKind::One,
                        _ => GroupKind::Not,
                    };
                    match self.extglob(kind, at_start) {
                        Some(group) => nodes.push(group),
                        None => {
                            self.pos += 1;
                            nodes.push(if c == '?' {
                                Node::AnyChar
                            } else {
                                Node::Literal(c)
                            });
                        }
                    }
                }
                '?' => {
                    self.pos += 1;
                    nodes.push(Node::AnyChar);
                }
                '(' => match self.closing(self.pos, '(', ')') {
                    Some(_) => {
                        self.pos += 1;
                        let alternatives = self.alternatives('|', ')', at_start);
                        nodes.push(Node::Group(Group {
                            kind: GroupKind::One,
                            alternatives,
                            guard: true,
                        }));
                    }
                    None => {
                        self.pos += 1;
                        nodes.push(Node::Literal('('));
                    }
                },
                '[' => match self.class() {
                    Some(class) => nodes.push(Node::Class(class)),
                    None => {
                        self.pos += 1;
                        nodes.push(Node::Literal('['));
                    }
                },
                '{' => match self.brace(at_start) {
                    Some(node) => nodes.push(node),
                    None => {
                        self.pos += 1;
                        nodes.push(Node::Literal('{'));
                    }
                },
                _ => {
                    self.pos += 1;
                    nodes.push(Node::Literal(c));
                }
            }
        }

        nodes
    }

    /// Parse `X(a|b)` where the cursor is on `X`
    fn extglob(&mut self, kind: GroupKind, segment_start: bool) -> Option<Node> {
        self.closing(self.pos + 1, '(', ')')?;
        self.pos += 2;
        let alternatives = self.alternatives('|', ')', segment_start);
        Some(Node::Group(Group {
            kind,
            alternatives,
            guard: true,
        }))
    }

    fn alternatives(&mut self, separator: char, close: char, segment_start: bool) -> Vec<Vec<Node>> {
        let mut alternatives = Vec::new();
        loop {
            alternatives.push(self.sequence(&[separator, close], segment_start));
            if self.peek(0) == Some(separator) {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.peek(0) == Some(close) {
            self.pos += 1;
        }
        alternatives
    }

    /// Index of the delimiter closing the one at `open_pos`
    fn closing(&self, open_pos: usize, open: char, close: char) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = open_pos;
        while let Some(&c) = self.chars.get(i) {
            if c == '\\' {
                i += 2;
                continue;
            }
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            i += 1;
        }
        None
    }

    fn brace(&mut self, segment_start: bool) -> Option<Node> {
        let close = self.closing(self.pos, '{', '}')?;
        let content = &self.chars[self.pos + 1..close];

        if let Some(range) = parse_range(content) {
            self.pos = close + 1;
            return Some(range);
        }

        if !has_top_level_comma(content) {
            return None;
        }

        self.pos += 1;
        let alternatives = self.alternatives(',', '}', segment_start);
        Some(Node::Group(Group {
            kind: GroupKind::One,
            alternatives,
            guard: false,
        }))
    }

    fn class(&mut self) -> Option<Class> {
        let mut i = self.pos + 1;
        let negated = matches!(self.chars.get(i), Some(&'!') | Some(&'^'));
        if negated {
            i += 1;
        }

        let mut items = Vec::new();
        let mut first = true;
        loop {
            let mut c = *self.chars.get(i)?;
            if c == ']' && !first {
                break;
            }
            first = false;

            if c == '[' && self.chars.get(i + 1) == Some(&':') {
                if let Some(end) = find_posix_end(self.chars, i + 2) {
                    let name: String = self.chars[i + 2..end].iter().collect();
                    if let Some(class) = Posix::from_name(&name) {
                        items.push(ClassItem::Posix(class));
                        i = end + 2;
                        continue;
                    }
                }
            }

            if c == '\\' {
                i += 1;
                c = *self.chars.get(i)?;
            }

            match (self.chars.get(i + 1), self.chars.get(i + 2)) {
                (Some(&'-'), Some(&hi)) if hi != ']' => {
                    items.push(ClassItem::Range(c, hi));
                    i += 3;
                }
                _ => {
                    items.push(ClassItem::Char(c));
                    i += 1;
                }
            }
        }

        self.pos = i + 1;
        Some(Class { negated, items })
    }
}

fn find_posix_end(chars: &[char], from: usize) -> Option<usize> {
    (from..chars.len().saturating_sub(1)).find(|&i| chars[i] == ':' && chars[i + 1] == ']')
}

fn has_top_level_comma(content: &[char]) -> bool {
    let mut depth = 0i32;
    let mut escaped = false;
    for &c in content {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' | '(' | '[' => depth += 1,
            '}' | ')' | ']' => depth -= 1,
            ',' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

fn parse_range(content: &[char]) -> Option<Node> {
    let text: String = content.iter().collect();
    let (lo, hi) = text.split_once("..")?;

    if let (Ok(a), Ok(b)) = (lo.parse::<i64>(), hi.parse::<i64>()) {
        let padded = |s: &str| {
            let digits = s.trim_start_matches('-');
            digits.len() > 1 && digits.starts_with('0')
        };
        let width = if padded(lo) || padded(hi) {
            lo.trim_start_matches('-')
                .len()
                .max(hi.trim_start_matches('-').len())
        } else {
            0
        };
        return Some(Node::NumRange {
            start: a.min(b),
            end: a.max(b),
            width,
        });
    }

    let mut lo_chars = lo.chars();
    let mut hi_chars = hi.chars();
    match (lo_chars.next(), lo_chars.next(), hi_chars.next(), hi_chars.next()) {
        (Some(a), None, Some(b), None) if a.is_ascii_alphanumeric() && b.is_ascii_alphanumeric() => {
            Some(Node::CharRange {
                start: a.min(b),
                end: a.max(b),
            })
        }
        _ => None,
    }
}

struct Matching<'a> {
    text: &'a [char],
    dot: bool,
    nocase: bool,
    /// `(node, position)` pairs of the top-level sequence known not to match
    dead_ends: RefCell<HashSet<(usize, usize)>>,
}

impl Matching<'_> {
    /// Match `nodes[index..]` from `i` through to the end of the text
    ///
    /// The continuation of a top-level node is always the rest of the
    /// pattern, so a failure at `(index, i)` holds for every later visit.
    fn top(&self, nodes: &[Node], index: usize, i: usize) -> bool {
        let Some(node) = nodes.get(index) else {
            return i == self.text.len();
        };
        if self.dead_ends.borrow().contains(&(index, i)) {
            return false;
        }
        let matched = self.node(node, i, &|j| self.top(nodes, index + 1, j));
        if !matched {
            self.dead_ends.borrow_mut().insert((index, i));
        }
        matched
    }

    fn seq(&self, nodes: &[Node], i: usize, k: &dyn Fn(usize) -> bool) -> bool {
        match nodes.split_first() {
            None => k(i),
            Some((node, rest)) => self.node(node, i, &|j| self.seq(rest, j, k)),
        }
    }

    fn node(&self, node: &Node, i: usize, k: &dyn Fn(usize) -> bool) -> bool {
        let current = self.text.get(i).copied();

        match node {
            Node::Literal(c) => current.is_some_and(|t| self.char_eq(t, *c)) && k(i + 1),
            Node::Slash => current == Some('/') && k(i + 1),
            Node::AnyChar => current.is_some_and(|t| t != '/') && !self.hidden(i) && k(i + 1),
            Node::Star { nonempty } => {
                if self.hidden(i) {
                    return false;
                }
                let first = if *nonempty { i + 1 } else { i };
                (first..=self.segment_end(i)).any(|j| k(j))
            }
            Node::GlobStar => self.globstar(i, k),
            Node::TrailingGlobStar => k(i) || (current == Some('/') && self.any_path(i + 1, k)),
            Node::LoneGlobStar => self.any_path(i, k),
            Node::Class(class) => {
                current.is_some_and(|t| t != '/' && class.matches(t, self.nocase))
                    && !self.hidden(i)
                    && k(i + 1)
            }
            Node::NumRange { start, end, width } => self.num_range(*start, *end, *width, i, k),
            Node::CharRange { start, end } => {
                current.is_some_and(|t| {
                    let in_range = |c: char| *start <= c && c <= *end;
                    in_range(t)
                        || (self.nocase
                            && (in_range(t.to_ascii_lowercase()) || in_range(t.to_ascii_uppercase())))
                }) && k(i + 1)
            }
            Node::Group(group) => {
                if group.guard && self.hidden(i) {
                    return false;
                }
                self.group(group, i, k)
            }
        }
    }

    fn group(&self, group: &Group, i: usize, k: &dyn Fn(usize) -> bool) -> bool {
        let alternatives = &group.alternatives;
        match group.kind {
            GroupKind::One => alternatives.iter().any(|alt| self.seq(alt, i, k)),
            GroupKind::ZeroOrOne => k(i) || alternatives.iter().any(|alt| self.seq(alt, i, k)),
            GroupKind::OneOrMore => self.repeat(alternatives, i, k),
            GroupKind::ZeroOrMore => k(i) || self.repeat(alternatives, i, k),
            GroupKind::Not => (i..=self.segment_end(i)).any(|j| {
                !alternatives
                    .iter()
                    .any(|alt| self.seq(alt, i, &|end| end == j))
                    && k(j)
            }),
        }
    }

    fn repeat(&self, alternatives: &[Vec<Node>], i: usize, k: &dyn Fn(usize) -> bool) -> bool {
        self.repeat_from(alternatives, i, k, &RefCell::default())
    }

    // `k` is fixed for one repetition, so a failed start position stays failed
    fn repeat_from(
        &self,
        alternatives: &[Vec<Node>],
        i: usize,
        k: &dyn Fn(usize) -> bool,
        failed: &RefCell<HashSet<usize>>,
    ) -> bool {
        if failed.borrow().contains(&i) {
            return false;
        }
        let matched = alternatives.iter().any(|alt| {
            self.seq(alt, i, &|j| {
                k(j) || (j > i && self.repeat_from(alternatives, j, k, failed))
            })
        });
        if !matched {
            failed.borrow_mut().insert(i);
        }
        matched
    }

    fn globstar(&self, mut i: usize, k: &dyn Fn(usize) -> bool) -> bool {
        loop {
            if k(i) {
                return true;
            }
            if self.hidden(i) {
                return false;
            }
            let end = self.segment_end(i);
            if end >= self.text.len() {
                return false;
            }
            i = end + 1;
        }
    }

    fn any_path(&self, start: usize, k: &dyn Fn(usize) -> bool) -> bool {
        let mut j = start;
        loop {
            if k(j) {
                return true;
            }
            if j >= self.text.len() || self.hidden(j) {
                return false;
            }
            j += 1;
        }
    }

    fn num_range(&self, start: i64, end: i64, width: usize, i: usize, k: &dyn Fn(usize) -> bool) -> bool {
        let mut digits_start = i;
        if self.text.get(i) == Some(&'-') {
            digits_start += 1;
        }
        let digits_end = digits_start
            + self.text[digits_start.min(self.text.len())..]
                .iter()
                .take_while(|c| c.is_ascii_digit())
                .count();

        (digits_start + 1..=digits_end).any(|e| {
            let s: String = self.text[i..e].iter().collect();
            let Ok(n) = s.parse::<i64>() else {
                return false;
            };
            let digits = s.trim_start_matches('-');
            let width_ok = if width > 0 {
                digits.len() == width
            } else {
                digits.len() == 1 || !digits.starts_with('0')
            };
            start <= n && n <= end && width_ok && k(e)
        })
    }

    fn char_eq(&self, a: char, b: char) -> bool {
        a == b || (self.nocase && a.to_lowercase().eq(b.to_lowercase()))
    }

    fn at_segment_start(&self, i: usize) -> bool {
        i == 0 || self.text.get(i - 1) == Some(&'/')
    }

    /// A leading dot that wildcards may not consume
    fn hidden(&self, i: usize) -> bool {
        !self.dot && self.text.get(i) == Some(&'.') && self.at_segment_start(i)
    }

    fn segment_end(&self, i: usize) -> usize {
        self.text[i.min(self.text.len())..]
            .iter()
            .position(|&c| c == '/')
            .map_or(self.text.len(), |offset| i + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_match(pattern: &str, name: &str) -> bool {
        Glob::new(pattern).is_match(name, &MatchOptions::default())
    }

    fn is_match_with(pattern: &str, name: &str, options: MatchOptions) -> bool {
        Glob::new(pattern).is_match(name, &options)
    }

    #[test]
    fn test_star_stays_in_segment() {
        assert!(is_match("*.txt", "a.txt"));
        assert!(!is_match("*.txt", "a.TXT"));
        assert!(!is_match("*.txt", "b/a.txt"));
        assert!(is_match("src/*.rs", "src/lib.rs"));
        assert!(!is_match("src/*", "src/"));
    }

    #[test]
    fn test_globstar() {
        assert!(is_match("**/*.txt", "a.txt"));
        assert!(is_match("**/*.txt", "b/a.txt"));
        assert!(is_match("**/*.txt", "b/c/d/a.txt"));
        assert!(is_match("a/**/b", "a/b"));
        assert!(is_match("a/**/b", "a/x/y/b"));
        assert!(is_match("a/**", "a"));
        assert!(is_match("a/**", "a/b/c"));
        assert!(is_match("**", "a/b/c"));
        assert!(!is_match("a/**", "ab"));
    }

    #[test]
    fn test_double_star_inside_segment_is_star() {
        assert!(is_match("a**b", "axxb"));
        assert!(!is_match("a**b", "a/b"));
    }

    #[test]
    fn test_question_mark() {
        assert!(is_match("a?c", "abc"));
        assert!(!is_match("a?c", "a/c"));
        assert!(!is_match("a?c", "ac"));
    }

    #[test]
    fn test_negation() {
        assert!(is_match("!*.md", "a.txt"));
        assert!(!is_match("!*.md", "a.md"));
        assert!(is_match("!!*.md", "a.md"));
    }

    #[test]
    fn test_dotfiles() {
        assert!(!is_match("*", ".hidden"));
        assert!(!is_match("*.js", ".js"));
        assert!(!is_match("**/*.txt", ".git/a.txt"));
        assert!(is_match(".*", ".hidden"));
        assert!(is_match("a/.b", "a/.b"));

        let dot = MatchOptions {
            dot: true,
            ..Default::default()
        };
        assert!(is_match_with("*", ".hidden", dot));
        assert!(is_match_with("**/*.txt", ".git/a.txt", dot));
    }

    #[test]
    fn test_nocase() {
        let nocase = MatchOptions {
            nocase: true,
            ..Default::default()
        };
        assert!(is_match_with("*.txt", "a.TXT", nocase));
        assert!(is_match_with("[a-c]*", "Banana", nocase));
        assert!(is_match_with("{a..c}.md", "B.md", nocase));
    }

    #[test]
    fn test_basename() {
        let basename = MatchOptions {
            basename: true,
            ..Default::default()
        };
        assert!(is_match_with("*.txt", "b/c/a.txt", basename));
        assert!(!is_match_with("b/*.txt", "x/b/a.txt", basename));
    }

    #[test]
    fn test_bracket_classes() {
        assert!(is_match("[abc].md", "b.md"));
        assert!(!is_match("[abc].md", "d.md"));
        assert!(is_match("[a-z]1", "q1"));
        assert!(is_match("[!a-z]1", "Q1"));
        assert!(is_match("[^a-z]1", "Q1"));
        assert!(is_match("[]]", "]"));
        assert!(!is_match("a[/]b", "a/b"));
    }

    #[test]
    fn test_unterminated_delimiters_are_literal() {
        assert!(is_match("[abc", "[abc"));
        assert!(is_match("{a,b", "{a,b"));
        assert!(is_match("(a|b", "(a|b"));
        assert!(is_match("{a}", "{a}"));
    }

    #[test]
    fn test_posix_classes() {
        assert!(is_match("[[:digit:]].md", "7.md"));
        assert!(!is_match("[[:digit:]].md", "x.md"));
        assert!(is_match("[[:alpha:][:digit:]]x", "ax"));
        assert!(is_match("[[:upper:]]*", "README"));
        assert!(is_match("[[:space:]]", " "));
    }

    #[test]
    fn test_braces() {
        assert!(is_match("*.{md,html}", "a.md"));
        assert!(is_match("*.{md,html}", "a.html"));
        assert!(!is_match("*.{md,html}", "a.txt"));
        assert!(is_match("{src/**/*.js,lib/*.js}", "src/a/b.js"));
        assert!(is_match("a{b,{c,d}}e", "ade"));
        assert!(is_match("{,x}a", "a"));
    }

    #[test]
    fn test_brace_ranges() {
        assert!(is_match("page{1..3}.html", "page2.html"));
        assert!(!is_match("page{1..3}.html", "page4.html"));
        assert!(is_match("page{1..12}.html", "page10.html"));
        assert!(!is_match("page{1..12}.html", "page01.html"));
        assert!(is_match("v{01..10}", "v05"));
        assert!(!is_match("v{01..10}", "v5"));
        assert!(is_match("{a..e}.txt", "c.txt"));
        assert!(!is_match("{a..e}.txt", "f.txt"));
    }

    #[test]
    fn test_extglobs() {
        assert!(is_match("@(a|b).md", "a.md"));
        assert!(!is_match("@(a|b).md", "ab.md"));
        assert!(is_match("x?(y).md", "x.md"));
        assert!(is_match("x?(y).md", "xy.md"));
        assert!(!is_match("x?(y).md", "xyy.md"));
        assert!(is_match("x+(y).md", "xyyy.md"));
        assert!(!is_match("x+(y).md", "x.md"));
        assert!(is_match("x*(y|z).md", "x.md"));
        assert!(is_match("x*(y|z).md", "xyzzy.md"));
        assert!(is_match("!(draft).md", "post.md"));
        assert!(!is_match("!(draft).md", "draft.md"));
        assert!(is_match("!(*.min).js", "app.js"));
        assert!(!is_match("!(*.min).js", "app.min.js"));
    }

    #[test]
    fn test_parenthesized_alternation() {
        assert!(is_match("(posts|pages)/*.md", "pages/a.md"));
        assert!(!is_match("(posts|pages)/*.md", "drafts/a.md"));
    }

    #[test]
    fn test_escapes() {
        assert!(is_match(r"\*.md", "*.md"));
        assert!(!is_match(r"\*.md", "a.md"));
        assert!(is_match(r"a\{b,c\}", "a{b,c}"));
    }

    #[test]
    fn test_repeated_wildcards_fail_fast() {
        let run = "a".repeat(200);
        assert!(!is_match("*a*a*a*a*a*a*b", &run));
        assert!(is_match("*a*a*a*a*a*a*", &run));
        assert!(!is_match("+(a|aa)b", &run));
        assert!(is_match("+(a|aa)", &run));
        assert!(!is_match("*(a|aa)*(a|aa)b", &run));
    }
}
