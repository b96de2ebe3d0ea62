//! Route dispatch: the per-request matching algorithm.
//!
//! Exactly once per request the dispatcher normalizes the target, resolves
//! a possible alias (single hop), and scans the route table: all routes
//! registered under the request method in registration order, then all
//! wildcard-method routes. The first candidate whose pattern and `where`
//! constraints both hold wins; a failed constraint only disqualifies that
//! candidate and the scan continues. On a match the pipeline runs global
//! middleware, before-middleware, the handler (with sanitized captures) and
//! after-middleware, then decides how the response stream terminates.
//!
//! AJAX-only routes reject non-script-initiated requests with a 403 status
//! side effect, but only for candidates whose pattern matched the path:
//! AJAX-only routes elsewhere in the table stay silent during the scan.

use crate::error::RouterError;
use crate::handler::Position;
use crate::normalize::normalize;
use crate::pattern::MatchOutcome;
use crate::render::Renderer;
use crate::request::{RequestContext, RouteParams};
use crate::router::{RouteMethod, RouteRecord, Router};
use crate::sanitize::sanitize;

use http::StatusCode;
use tracing::{debug, warn};

/// How a dispatched request was concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A route (or the configured error page) handled the request.
    Handled(Termination),
    /// No candidate matched and no recovery is configured; the boundary
    /// layer turns this into a 404 response.
    NotFound,
    /// The only candidates whose pattern matched were AJAX-only routes hit
    /// by a non-script-initiated request.
    Forbidden,
    /// No candidate matched and a redirect target is configured.
    Redirected(String),
}

/// How the response stream terminates after a handled route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The renderer closed out the full document.
    CloseDocument,
    /// API and AJAX-only routes stop right after the handler sequence; no
    /// further output follows.
    Exit,
}

impl Router {
    /// Dispatch one request against the route table.
    ///
    /// Route-level misses are reported through [`Outcome`]; only fatal
    /// conditions raised by the handler itself (unknown controller or
    /// method, handler failure) surface as errors.
    pub fn dispatch(
        &self,
        ctx: &RequestContext,
        renderer: &dyn Renderer,
    ) -> Result<Outcome, RouterError> {
        let mut path = normalize(ctx.target(), self.base_prefix());
        if let Some(canonical) = self.aliases.get(&path) {
            debug!(alias = %path, canonical = %canonical, "resolved route alias");
            path = canonical.clone();
        }
        debug!(method = %ctx.method(), path = %path, "dispatching request");

        let mut forbidden_hit = false;
        let candidate_sets =
            [RouteMethod::Only(ctx.method().clone()), RouteMethod::Any];
        for key in &candidate_sets {
            let Some(bucket) = self.routes.get(key) else {
                continue;
            };
            for (route_path, record) in bucket {
                match record.match_path(&path, ctx.is_ajax()) {
                    MatchOutcome::NoMatch => {}
                    MatchOutcome::ConstraintFailed => {
                        debug!(route = %route_path, path = %path, "where constraint rejected candidate");
                    }
                    MatchOutcome::ForbiddenOrigin => {
                        debug!(route = %route_path, "skipping ajax-only route for non-ajax request");
                        renderer.set_status(StatusCode::FORBIDDEN);
                        forbidden_hit = true;
                    }
                    MatchOutcome::Matched(captures) => {
                        return self.run_route(route_path, record, captures, &path, ctx, renderer);
                    }
                }
            }
        }

        if let Some(url) = &self.redirect_url {
            debug!(path = %path, redirect = %url, "no route matched, redirecting");
            return Ok(Outcome::Redirected(url.clone()));
        }
        if let Some(page) = &self.error_page {
            debug!(path = %path, page = %page, "no route matched, rendering error page");
            let vars = [
                ("path".to_string(), path.clone()),
                ("method".to_string(), ctx.method().to_string()),
            ];
            renderer.render_error_page(page, &vars);
            renderer.close_document();
            return Ok(Outcome::Handled(Termination::CloseDocument));
        }
        if forbidden_hit {
            warn!(method = %ctx.method(), path = %path, "request origin forbidden");
            return Ok(Outcome::Forbidden);
        }

        warn!(method = %ctx.method(), path = %path, "no route matched");
        Ok(Outcome::NotFound)
    }

    /// Run the middleware/handler pipeline for a matched route and decide
    /// the termination mode.
    fn run_route(
        &self,
        route_path: &str,
        record: &RouteRecord,
        captures: Vec<(String, String)>,
        path: &str,
        ctx: &RequestContext,
        renderer: &dyn Renderer,
    ) -> Result<Outcome, RouterError> {
        if let Some(status) = record.status {
            renderer.set_status(status);
        }

        // Only the first registered global middleware function runs.
        if let Some(global) = self.global_middleware.funcs.first() {
            if !self.global_middleware.exempt.iter().any(|exempt| exempt == path) {
                global(ctx);
            }
        }

        self.run_middleware(route_path, Position::Before, ctx);

        let params = RouteParams::new(
            captures.into_iter().map(|(name, value)| (name, sanitize(&value))).collect(),
        );
        record.handler.invoke(&params)?;

        self.run_middleware(route_path, Position::After, ctx);

        if !record.is_api && !record.ajax_only {
            renderer.close_document();
            Ok(Outcome::Handled(Termination::CloseDocument))
        } else {
            Ok(Outcome::Handled(Termination::Exit))
        }
    }

    /// Route middleware lookup is first-match by (route path, position);
    /// later registrations for the same pair stay stored but never run.
    fn run_middleware(&self, route_path: &str, position: Position, ctx: &RequestContext) {
        if let Some(entry) = self
            .middlewares
            .iter()
            .find(|entry| entry.route == route_path && entry.position == position)
        {
            (entry.func)(ctx);
        }
    }
}
