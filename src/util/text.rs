use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

static RE_TAG: OnceLock<Regex> = OnceLock::new();
static RE_ENTITY: OnceLock<Regex> = OnceLock::new();
static RE_WHITESPACE: OnceLock<Regex> = OnceLock::new();

/// Compiles `pattern` into `cell` on first use.
///
/// Only for literal patterns: an invalid one panics, and the unit tests of
/// every caller exercise each pattern.
pub(crate) fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).unwrap_or_else(|e| panic!("bad pattern {pattern}: {e}")))
}

/// Removes anything shaped like an HTML tag (`<...>`), including tags that
/// span several lines.
///
/// Returns `Cow::Borrowed` when the input has no tags.
///
/// # Examples
///
/// ```
/// use mediumfeed::util::strip_tags;
///
/// assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
/// ```
pub fn strip_tags(s: &str) -> Cow<'_, str> {
    compiled(&RE_TAG, r"<[^>]*>").replace_all(s, "")
}

/// Replaces HTML entities (`&amp;`, `&#8217;`, ...) with a single space.
///
/// Entities are dropped, not decoded: excerpts only need readable words.
pub fn strip_entities(s: &str) -> Cow<'_, str> {
    compiled(&RE_ENTITY, r"&[^;]+;").replace_all(s, " ")
}

/// Collapses every run of whitespace (Unicode-aware) into one ASCII space.
pub fn collapse_whitespace(s: &str) -> Cow<'_, str> {
    compiled(&RE_WHITESPACE, r"\s+").replace_all(s, " ")
}

/// Returns the longest prefix of `s` holding at most `max_chars` characters.
///
/// Cuts on a char boundary, so multi-byte text never panics.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Counts whitespace-separated words.
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}
