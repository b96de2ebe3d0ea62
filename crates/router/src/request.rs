//! Request handling module that provides access to the inbound request
//! signals the router consumes and to extracted path parameters.
//!
//! This module contains two types:
//! - `RequestContext`: the method, raw target, headers and client identity
//!   of one inbound request, as already extracted by the outer HTTP layer
//! - `RouteParams`: the sanitized path-parameter values captured while
//!   matching a route, in capture order

use http::{HeaderMap, Method};

/// The header a script-initiated request uses to self-identify.
const AJAX_HEADER: &str = "x-requested-with";
const AJAX_HEADER_VALUE: &str = "xmlhttprequest";

/// The per-request context handed to `Router::dispatch`.
///
/// The router is transport-agnostic: it consumes the method, the raw
/// request target, the headers (for the AJAX signal) and the client
/// identity, all of which the outer HTTP layer has already extracted.
#[derive(Debug)]
pub struct RequestContext {
    method: Method,
    target: String,
    headers: HeaderMap,
    remote_addr: String,
}

impl RequestContext {
    /// Creates a context for a request with the given method and raw target
    /// (path plus optional query string).
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self { method, target: target.into(), headers: HeaderMap::new(), remote_addr: String::new() }
    }

    /// Attaches the request headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Attaches the client identity (e.g. the remote address), used to key
    /// the rate-limit counter store.
    #[must_use]
    pub fn with_remote_addr(mut self, remote_addr: impl Into<String>) -> Self {
        self.remote_addr = remote_addr.into();
        self
    }

    /// Returns the HTTP method of the request.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the raw request target as received from the transport.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the HTTP headers of the request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the client identity.
    pub fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    /// Returns true when the request self-identifies as script-initiated
    /// via the `X-Requested-With` header.
    pub fn is_ajax(&self) -> bool {
        self.headers
            .get(AJAX_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.eq_ignore_ascii_case(AJAX_HEADER_VALUE))
    }
}

/// Sanitized path parameters captured while matching a route.
///
/// Values are stored in capture order, so handlers can consume them
/// positionally, and can additionally be looked up by placeholder name.
#[derive(Debug, Clone, Default)]
pub struct RouteParams {
    entries: Vec<(String, String)>,
}

impl RouteParams {
    /// Creates an empty parameter set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    /// Returns true if there are no path parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of path parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gets the value of a path parameter by its placeholder name.
    /// Returns None if the parameter doesn't exist.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&str> {
        let name = name.as_ref();
        self.entries.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// Iterates over the values in capture order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, value)| value.as_str())
    }

    /// Iterates over `(name, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn ajax_signal_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AJAX_HEADER, HeaderValue::from_static("XMLHttpRequest"));
        let ctx = RequestContext::new(Method::GET, "/x").with_headers(headers);
        assert!(ctx.is_ajax());
    }

    #[test]
    fn missing_header_is_not_ajax() {
        let ctx = RequestContext::new(Method::GET, "/x");
        assert!(!ctx.is_ajax());
    }

    #[test]
    fn other_header_value_is_not_ajax() {
        let mut headers = HeaderMap::new();
        headers.insert(AJAX_HEADER, HeaderValue::from_static("fetch"));
        let ctx = RequestContext::new(Method::GET, "/x").with_headers(headers);
        assert!(!ctx.is_ajax());
    }

    #[test]
    fn params_positional_and_by_name() {
        let params = RouteParams::new(vec![
            ("year".to_string(), "2026".to_string()),
            ("slug".to_string(), "hello".to_string()),
        ]);
        assert_eq!(params.len(), 2);
        assert_eq!(params.values().collect::<Vec<_>>(), vec!["2026", "hello"]);
        assert_eq!(params.get("slug"), Some("hello"));
        assert_eq!(params.get("missing"), None);
    }
}
