//! The route table and its registration surface.
//!
//! A `Router` is populated during application bootstrap and treated as
//! immutable afterwards: dispatch takes `&self`, so concurrent request
//! handling needs no locking. `add_route` returns a `RouteHandle` that owns
//! the registration context for the just-added route, which is what the
//! chained builder calls (`constrain`, `set_alias`, `only_ajax`, ...)
//! attach to.

use crate::handler::{GlobalMiddleware, MiddlewareEntry, MiddlewareFn, Position, RouteHandler};
use crate::pattern::{CompiledPattern, MatchOutcome};
use crate::request::RequestContext;

use std::collections::HashMap;
use std::sync::Arc;

use http::{Method, StatusCode};
use regex::Regex;

/// A method key in the route table: either one concrete HTTP method or the
/// wildcard that matches any method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    /// Matches every HTTP method. Wildcard routes are tried after all
    /// method-specific routes.
    Any,
    Only(Method),
}

impl From<Method> for RouteMethod {
    fn from(method: Method) -> Self {
        Self::Only(method)
    }
}

macro_rules! route_method {
    ($method:ident, $upper_case_method:ident) => {
        #[inline]
        pub fn $method() -> RouteMethod {
            RouteMethod::Only(Method::$upper_case_method)
        }
    };
}

route_method!(get, GET);
route_method!(post, POST);
route_method!(put, PUT);
route_method!(delete, DELETE);
route_method!(head, HEAD);
route_method!(options, OPTIONS);
route_method!(patch, PATCH);

#[inline]
pub fn any() -> RouteMethod {
    RouteMethod::Any
}

/// One registered route. Owned exclusively by the route table.
pub(crate) struct RouteRecord {
    pub(crate) pattern: CompiledPattern,
    pub(crate) handler: Arc<dyn RouteHandler>,
    pub(crate) ajax_only: bool,
    pub(crate) is_api: bool,
    pub(crate) status: Option<StatusCode>,
    /// `where` constraints captured at registration time, keyed by
    /// placeholder name.
    pub(crate) constraints: HashMap<String, Regex>,
}

impl RouteRecord {
    /// Evaluate this candidate against a normalized path.
    pub(crate) fn match_path(&self, path: &str, is_ajax: bool) -> MatchOutcome {
        let Some(captures) = self.pattern.captures(path) else {
            return MatchOutcome::NoMatch;
        };
        if self.ajax_only && !is_ajax {
            return MatchOutcome::ForbiddenOrigin;
        }
        for (name, value) in &captures {
            if let Some(constraint) = self.constraints.get(name) {
                if !constraint.is_match(value) {
                    return MatchOutcome::ConstraintFailed;
                }
            }
        }
        MatchOutcome::Matched(captures)
    }
}

impl std::fmt::Debug for RouteRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteRecord")
            .field("ajax_only", &self.ajax_only)
            .field("is_api", &self.is_api)
            .field("status", &self.status)
            .field("constraints", &self.constraints.keys())
            .finish_non_exhaustive()
    }
}

/// The request router: route table, aliases, named routes and middleware,
/// all owned by one value that the application entry point constructs and
/// then hands by reference into request-scoped dispatch calls.
#[derive(Debug, Default)]
pub struct Router {
    /// Per-method buckets in registration order. Matching scans the bucket
    /// for the request method first, then the `Any` bucket.
    pub(crate) routes: HashMap<RouteMethod, Vec<(String, RouteRecord)>>,
    /// Alias path -> canonical path; resolved once, single-hop.
    pub(crate) aliases: HashMap<String, String>,
    /// Route name -> raw pattern, for reverse URL generation only.
    named: HashMap<String, String>,
    pub(crate) middlewares: Vec<MiddlewareEntry>,
    pub(crate) global_middleware: GlobalMiddleware,
    pub(crate) redirect_url: Option<String>,
    pub(crate) error_page: Option<String>,
    base_prefix: String,
    group_prefix: String,
}

impl Router {
    /// Create a new empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deployment base prefix stripped during path normalization.
    /// The prefix is supplied pre-resolved (derived externally from the
    /// deployment's mount point).
    pub fn set_base_prefix(&mut self, prefix: impl Into<String>) {
        self.base_prefix = prefix.into();
    }

    pub(crate) fn base_prefix(&self) -> &str {
        &self.base_prefix
    }

    /// Set a URL to redirect to when no route matches.
    pub fn set_error_redirect(&mut self, url: impl Into<String>) {
        self.redirect_url = Some(url.into());
    }

    /// Set a page for the renderer to show when no route matches.
    pub fn set_error_page(&mut self, page: impl Into<String>) {
        self.error_page = Some(page.into());
    }

    /// Register a handler under every listed method for `path`, which may
    /// contain `:name` placeholder segments. The active group prefix is
    /// prepended. Registering the same (method, path) again silently
    /// replaces the earlier record in place (last write wins).
    ///
    /// # Panics
    ///
    /// Panics when the pattern does not compile; registration happens
    /// during bootstrap, before any dispatch.
    pub fn add_route<M, H>(&mut self, methods: M, path: &str, handler: H) -> RouteHandle<'_>
    where
        M: IntoIterator<Item = RouteMethod>,
        H: RouteHandler + 'static,
    {
        let path = self.prefixed(path);
        let compiled = CompiledPattern::compile(&path).expect("invalid route pattern");
        let handler: Arc<dyn RouteHandler> = Arc::new(handler);

        let methods: Vec<RouteMethod> = methods.into_iter().collect();
        for method in &methods {
            let record = RouteRecord {
                pattern: compiled.clone(),
                handler: Arc::clone(&handler),
                ajax_only: false,
                is_api: false,
                status: None,
                constraints: HashMap::new(),
            };
            let bucket = self.routes.entry(method.clone()).or_default();
            match bucket.iter_mut().find(|(existing, _)| existing == &path) {
                Some((_, existing)) => *existing = record,
                None => bucket.push((path.clone(), record)),
            }
        }

        RouteHandle { router: self, path, methods }
    }

    /// Bundle related routes under a common path prefix. The prefix is
    /// prepended to every `add_route` call made inside the callback (the
    /// callback also receives it for paths it builds itself), and the
    /// route-middleware set is snapshotted and restored around the
    /// callback, so middleware registered inside the group does not leak
    /// outward.
    pub fn add_group<F>(&mut self, prefix: &str, callback: F)
    where
        F: FnOnce(&mut Self, &str),
    {
        let saved_middlewares = self.middlewares.clone();
        let saved_prefix = self.group_prefix.clone();

        self.group_prefix.push_str(prefix);
        callback(self, prefix);

        self.group_prefix = saved_prefix;
        self.middlewares = saved_middlewares;
    }

    /// Register an app-wide middleware that runs for every dispatched path
    /// not present in `exempt_paths`. Only the first registered global
    /// middleware function is ever invoked; the exemption lists of all
    /// registrations are merged.
    pub fn add_global_middleware<I, S, F>(&mut self, exempt_paths: I, middleware: F)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&RequestContext) + Send + Sync + 'static,
    {
        self.global_middleware.funcs.push(Arc::new(middleware));
        self.global_middleware.exempt.extend(exempt_paths.into_iter().map(Into::into));
    }

    /// Build the URL for a named route by substituting the literal `:key`
    /// placeholders with the given values. Unresolved placeholders are left
    /// intact; an unknown name yields `None`.
    ///
    /// Substitution is textual, so a parameter name that is a prefix of
    /// another (`:id` vs `:identifier`) is a known collision risk.
    pub fn url_for(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        let pattern = self.named.get(name)?;
        let mut url = pattern.clone();
        for (key, value) in params {
            url = url.replace(&format!(":{key}"), value);
        }
        Some(url)
    }

    fn prefixed(&self, path: &str) -> String {
        if self.group_prefix.is_empty() {
            return path.to_string();
        }
        let mut full = format!("{}{}", self.group_prefix, path);
        if full.len() > 1 && full.ends_with('/') {
            full.pop();
        }
        full
    }
}

/// The registration context returned by [`Router::add_route`].
///
/// The handle owns the (methods, path) key of the route it belongs to;
/// every chained call attaches to exactly that route, never to whatever was
/// registered last elsewhere.
#[derive(Debug)]
pub struct RouteHandle<'router> {
    router: &'router mut Router,
    path: String,
    methods: Vec<RouteMethod>,
}

impl RouteHandle<'_> {
    /// Add a `where` constraint for a placeholder of this route. The
    /// constraint applies to the records registered by the originating
    /// `add_route` call only, never retroactively to other routes.
    ///
    /// # Panics
    ///
    /// Panics when the constraint is not a valid regular expression.
    #[must_use]
    pub fn constrain(mut self, param: &str, constraint: &str) -> Self {
        let regex = Regex::new(constraint).expect("invalid where constraint");
        self.update_records(|record| {
            record.constraints.insert(param.to_string(), regex.clone());
        });
        self
    }

    /// Register this route under `name` for reverse URL generation.
    #[must_use]
    pub fn named(self, name: &str) -> Self {
        if !name.is_empty() {
            self.router.named.insert(name.to_string(), self.path.clone());
        }
        self
    }

    /// Bind an alternate path to this route's canonical path. Aliases are
    /// resolved single-hop at dispatch; an alias pointing at another alias
    /// is not followed transitively.
    #[must_use]
    pub fn set_alias(self, alias: &str) -> Self {
        self.router.aliases.insert(alias.to_string(), self.path.clone());
        self
    }

    /// Restrict this route to requests that self-identify as
    /// script-initiated.
    #[must_use]
    pub fn only_ajax(mut self) -> Self {
        self.update_records(|record| record.ajax_only = true);
        self
    }

    /// Flag this route as an API route: dispatch terminates without closing
    /// out the surrounding document.
    #[must_use]
    pub fn as_api(mut self) -> Self {
        self.update_records(|record| record.is_api = true);
        self
    }

    /// Emit `status` as a response side effect when this route matches.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.update_records(|record| record.status = Some(status));
        self
    }

    /// Attach a middleware to this route at the given position. Only the
    /// first middleware registered for a (path, position) pair runs.
    #[must_use]
    pub fn middleware<F>(self, middleware: F, position: Position) -> Self
    where
        F: Fn(&RequestContext) + Send + Sync + 'static,
    {
        let func: MiddlewareFn = Arc::new(middleware);
        self.router.middlewares.push(MiddlewareEntry {
            func,
            route: self.path.clone(),
            position,
        });
        self
    }

    fn update_records(&mut self, mut update: impl FnMut(&mut RouteRecord)) {
        for method in &self.methods {
            if let Some(bucket) = self.router.routes.get_mut(method) {
                if let Some((_, record)) =
                    bucket.iter_mut().find(|(existing, _)| existing == &self.path)
                {
                    update(record);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use crate::request::RouteParams;

    fn noop() -> impl RouteHandler {
        handler_fn(|_params: &RouteParams| {})
    }

    #[test]
    fn registers_under_every_method() {
        let mut router = Router::new();
        router.add_route([get(), post()], "/users", noop());

        assert!(router.routes[&RouteMethod::Only(Method::GET)].iter().any(|(p, _)| p == "/users"));
        assert!(router.routes[&RouteMethod::Only(Method::POST)].iter().any(|(p, _)| p == "/users"));
    }

    #[test]
    fn duplicate_registration_replaces_in_place() {
        let mut router = Router::new();
        router.add_route([get()], "/a", noop());
        let _ = router.add_route([get()], "/b", noop()).only_ajax();
        router.add_route([get()], "/a", noop());

        let bucket = &router.routes[&RouteMethod::Only(Method::GET)];
        assert_eq!(bucket.len(), 2);
        // Re-registration keeps the original scan position.
        assert_eq!(bucket[0].0, "/a");
        assert_eq!(bucket[1].0, "/b");
    }

    #[test]
    fn reregistration_resets_route_flags() {
        let mut router = Router::new();
        let _ = router.add_route([get()], "/a", noop()).only_ajax();
        router.add_route([get()], "/a", noop());

        let bucket = &router.routes[&RouteMethod::Only(Method::GET)];
        assert!(!bucket[0].1.ajax_only);
    }

    #[test]
    fn constraints_attach_to_their_route_only() {
        let mut router = Router::new();
        let _ = router.add_route([get()], "/user/:id", noop()).constrain("id", r"^\d+$");
        router.add_route([get()], "/page/:slug", noop());

        let bucket = &router.routes[&RouteMethod::Only(Method::GET)];
        assert!(bucket[0].1.constraints.contains_key("id"));
        assert!(bucket[1].1.constraints.is_empty());
    }

    #[test]
    fn group_prefixes_nested_routes() {
        let mut router = Router::new();
        router.add_group("/admin", |router, _prefix| {
            router.add_route([get()], "/users", noop());
        });
        router.add_route([get()], "/users", noop());

        let bucket = &router.routes[&RouteMethod::Only(Method::GET)];
        assert_eq!(bucket[0].0, "/admin/users");
        assert_eq!(bucket[1].0, "/users");
    }

    #[test]
    fn nested_groups_concatenate_prefixes() {
        let mut router = Router::new();
        router.add_group("/api", |router, _| {
            router.add_group("/v1", |router, _| {
                router.add_route([get()], "/status", noop());
            });
        });

        let bucket = &router.routes[&RouteMethod::Only(Method::GET)];
        assert_eq!(bucket[0].0, "/api/v1/status");
    }

    #[test]
    fn group_root_route_has_no_trailing_slash() {
        let mut router = Router::new();
        router.add_group("/admin", |router, _| {
            router.add_route([get()], "/", noop());
        });

        let bucket = &router.routes[&RouteMethod::Only(Method::GET)];
        assert_eq!(bucket[0].0, "/admin");
    }

    #[test]
    fn group_middleware_does_not_leak_outward() {
        let mut router = Router::new();
        router.add_group("/admin", |router, _| {
            let _ = router
                .add_route([get()], "/users", noop())
                .middleware(|_ctx| {}, Position::Before);
        });

        assert!(router.middlewares.is_empty());
    }

    #[test]
    fn url_for_known_routes() {
        let mut router = Router::new();
        let _ = router.add_route([get()], "/", noop()).named("home");
        let _ = router.add_route([get()], "/user/:id", noop()).named("profile");

        assert_eq!(router.url_for("home", &[]), Some("/".to_string()));
        assert_eq!(router.url_for("profile", &[("id", "7")]), Some("/user/7".to_string()));
    }

    #[test]
    fn url_for_unknown_name_is_none() {
        let router = Router::new();
        assert_eq!(router.url_for("missing", &[]), None);
    }

    #[test]
    fn url_for_leaves_unresolved_placeholders() {
        let mut router = Router::new();
        let _ = router.add_route([get()], "/blog/:year/:slug", noop()).named("post");

        assert_eq!(
            router.url_for("post", &[("year", "2026")]),
            Some("/blog/2026/:slug".to_string())
        );
    }

    #[test]
    fn alias_binds_to_the_handle_route() {
        let mut router = Router::new();
        let _ = router.add_route([get()], "/really/long/path", noop()).set_alias("/short");

        assert_eq!(router.aliases.get("/short"), Some(&"/really/long/path".to_string()));
    }
}
