//! Parameter sanitization: filters extracted path-parameter values before
//! they reach handler code.
//!
//! Every captured value passes four filters in order: markup tags are
//! stripped, the remaining markup-significant characters are escaped,
//! everything outside alphanumerics and whitespace is removed, and a fixed
//! denylist of SQL keywords is removed case-insensitively until none
//! remains.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a full markup tag, e.g. `<script>` or `</a>`.
static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("invalid tag pattern"));

/// Matches every character outside the allowed alphabet.
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\s]").expect("invalid character-class pattern"));

/// The SQL keyword denylist, removed case-insensitively in a single pass.
static SQL_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)SELECT|INSERT|UPDATE|DELETE|DROP|TABLE|UNION")
        .expect("invalid keyword pattern")
});

/// Sanitize a single captured parameter value.
///
/// The output contains no `<`/`>` characters and no case-insensitive
/// occurrence of the denylisted SQL keywords.
pub fn sanitize(input: &str) -> String {
    let stripped = TAGS.replace_all(input, "");
    let escaped = escape_markup(&stripped);
    let mut value = DISALLOWED.replace_all(&escaped, "").into_owned();
    // Removing a keyword can splice its neighbors into a new occurrence
    // ("DRDROPOP" leaves "DROP" behind), so repeat until nothing matches.
    loop {
        match SQL_KEYWORDS.replace_all(&value, "") {
            Cow::Borrowed(_) => break,
            Cow::Owned(next) => value = next,
        }
    }
    value
}

/// Escape markup-significant characters as HTML entities.
fn escape_markup(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
