//! Path normalization: turns a raw request target into the canonical key
//! used for route matching.
//!
//! Normalization strips the query string, collapses repeated slashes,
//! removes the deployment base prefix, drops a single trailing slash (root
//! stays `/`) and maps the default document to `/`. The function is pure
//! and idempotent: `normalize(normalize(x), p) == normalize(x, p)`.

/// The default document that is treated as equivalent to the root path.
const DEFAULT_DOCUMENT: &str = "/index.php";

/// Normalize a raw request target against a deployment base prefix.
///
/// The base prefix is supplied pre-resolved by the deployment (e.g. the
/// mount point of the application under the document root); it is stripped
/// only at a segment boundary, repeatedly, so the result never starts with
/// it again.
pub fn normalize(raw_target: &str, base_prefix: &str) -> String {
    let path = match raw_target.find('?') {
        Some(idx) => &raw_target[..idx],
        None => raw_target,
    };

    let mut path = collapse_slashes(path);

    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }

    path = strip_prefix(path, base_prefix);

    if path.is_empty() {
        return "/".to_string();
    }
    if path == DEFAULT_DOCUMENT {
        return "/".to_string();
    }
    path
}

/// Collapse any run of two or more `/` into a single one.
fn collapse_slashes(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    let mut prev_slash = false;

    for ch in path.chars() {
        if ch == '/' {
            if !prev_slash {
                collapsed.push('/');
            }
            prev_slash = true;
        } else {
            collapsed.push(ch);
            prev_slash = false;
        }
    }

    collapsed
}

/// Strip `prefix` from the front of `path`, segment-aligned, until the path
/// no longer starts with it. An exhausted path becomes root.
fn strip_prefix(mut path: String, prefix: &str) -> String {
    if prefix.is_empty() || prefix == "/" {
        return path;
    }

    while let Some(rest) = path.strip_prefix(prefix) {
        if !rest.is_empty() && !rest.starts_with('/') {
            // Not a segment boundary ("/app" must not eat into "/apple").
            break;
        }
        path = if rest.is_empty() { "/".to_string() } else { rest.to_string() };
        if path == "/" {
            break;
        }
    }

    path
}
