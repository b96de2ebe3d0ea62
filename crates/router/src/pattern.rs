//! Route pattern compilation.
//!
//! A route pattern is a path template with literal segments and `:name`
//! placeholders (e.g. `/user/:id`). Compilation rewrites every `/:name`
//! segment into a named capture group matching one or more non-`/`
//! characters and anchors the whole expression, so a pattern either matches
//! the full normalized path or not at all.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a `/:name` placeholder segment inside a route pattern.
static PARAM_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/:([^/]+)").expect("invalid placeholder pattern"));

/// A route pattern compiled into an anchored matcher plus the capture names
/// in declaration order.
#[derive(Debug, Clone)]
pub(crate) struct CompiledPattern {
    regex: Regex,
    param_names: Vec<String>,
}

impl CompiledPattern {
    /// Compile a path template. Fails when the rewritten pattern is not a
    /// valid regular expression (e.g. a malformed placeholder name).
    pub(crate) fn compile(pattern: &str) -> Result<Self, regex::Error> {
        let rewritten = PARAM_SEGMENT.replace_all(pattern, "/(?P<${1}>[^/]+)");
        let regex = Regex::new(&format!("^{rewritten}$"))?;
        let param_names =
            PARAM_SEGMENT.captures_iter(pattern).map(|caps| caps[1].to_string()).collect();
        Ok(Self { regex, param_names })
    }

    /// Match the full normalized path, returning the captured values in
    /// declaration order.
    pub(crate) fn captures(&self, path: &str) -> Option<Vec<(String, String)>> {
        let caps = self.regex.captures(path)?;
        Some(
            self.param_names
                .iter()
                .map(|name| (name.clone(), caps[name.as_str()].to_string()))
                .collect(),
        )
    }
}

/// The outcome of evaluating one candidate route against a normalized path.
///
/// `ConstraintFailed` and `NoMatch` both let the route-table scan continue;
/// keeping them as distinct variants makes that control flow explicit
/// instead of collapsing a failed `where` constraint into a plain miss.
#[derive(Debug)]
pub(crate) enum MatchOutcome {
    /// Pattern and constraints matched; holds captures in declaration order.
    Matched(Vec<(String, String)>),
    /// Pattern matched but a `where` constraint rejected a captured value.
    ConstraintFailed,
    /// Pattern matched but the route is AJAX-only and the request is not.
    ForbiddenOrigin,
    /// Pattern did not match.
    NoMatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_matches_exactly() {
        let pattern = CompiledPattern::compile("/users").unwrap();
        assert_eq!(pattern.captures("/users"), Some(vec![]));
        assert_eq!(pattern.captures("/users/1"), None);
        assert_eq!(pattern.captures("/user"), None);
    }

    #[test]
    fn root_pattern() {
        let pattern = CompiledPattern::compile("/").unwrap();
        assert_eq!(pattern.captures("/"), Some(vec![]));
        assert_eq!(pattern.captures("/x"), None);
    }

    #[test]
    fn single_placeholder() {
        let pattern = CompiledPattern::compile("/user/:id").unwrap();
        assert_eq!(
            pattern.captures("/user/42"),
            Some(vec![("id".to_string(), "42".to_string())])
        );
        assert_eq!(pattern.captures("/user"), None);
        assert_eq!(pattern.captures("/user/42/edit"), None);
    }

    #[test]
    fn placeholder_does_not_cross_segments() {
        let pattern = CompiledPattern::compile("/files/:name").unwrap();
        assert_eq!(pattern.captures("/files/a/b"), None);
    }

    #[test]
    fn multiple_placeholders_in_declaration_order() {
        let pattern = CompiledPattern::compile("/blog/:year/:slug").unwrap();
        assert_eq!(
            pattern.captures("/blog/2026/hello"),
            Some(vec![
                ("year".to_string(), "2026".to_string()),
                ("slug".to_string(), "hello".to_string()),
            ])
        );
    }

    #[test]
    fn mixed_literal_and_placeholder_segments() {
        let pattern = CompiledPattern::compile("/user/:id/posts").unwrap();
        assert_eq!(
            pattern.captures("/user/7/posts"),
            Some(vec![("id".to_string(), "7".to_string())])
        );
        assert_eq!(pattern.captures("/user/7/comments"), None);
    }
}
