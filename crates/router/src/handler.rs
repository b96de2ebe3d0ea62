use crate::error::RouterError;
use crate::request::{RequestContext, RouteParams};

use std::marker::PhantomData;
use std::sync::Arc;

/// A registered route target, invoked with the sanitized path-parameter
/// values captured for the matched route.
pub trait RouteHandler: Send + Sync {
    fn invoke(&self, params: &RouteParams) -> Result<(), RouterError>;
}

/// Conversion seam for handler return values, so plain closures and
/// fallible closures both register as handlers.
pub trait IntoHandlerResult {
    fn into_handler_result(self) -> Result<(), RouterError>;
}

impl IntoHandlerResult for () {
    fn into_handler_result(self) -> Result<(), RouterError> {
        Ok(())
    }
}

impl IntoHandlerResult for Result<(), RouterError> {
    fn into_handler_result(self) -> Result<(), RouterError> {
        self
    }
}

/// A closure holder which represents any route-handler Fn.
pub struct FnHandler<F, R> {
    f: F,
    _phantom: PhantomData<fn() -> R>,
}

impl<F, R> FnHandler<F, R>
where
    F: Fn(&RouteParams) -> R,
    R: IntoHandlerResult,
{
    fn new(f: F) -> Self {
        Self { f, _phantom: PhantomData }
    }
}

pub fn handler_fn<F, R>(f: F) -> FnHandler<F, R>
where
    F: Fn(&RouteParams) -> R,
    R: IntoHandlerResult,
{
    FnHandler::new(f)
}

impl<F, R> RouteHandler for FnHandler<F, R>
where
    F: Fn(&RouteParams) -> R + Send + Sync,
    R: IntoHandlerResult,
{
    fn invoke(&self, params: &RouteParams) -> Result<(), RouterError> {
        (self.f)(params).into_handler_result()
    }
}

/// A middleware function attached before or after a route handler, or
/// registered globally. Middleware runs on the raw request context, before
/// any parameter extraction.
pub type MiddlewareFn = Arc<dyn Fn(&RequestContext) + Send + Sync>;

/// Where a route middleware runs relative to the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Before,
    After,
}

/// One route-middleware registration. Entries are kept in registration
/// order; lookup consults only the first entry for a (route, position)
/// pair, so later registrations for the same pair are shadowed.
#[derive(Clone)]
pub(crate) struct MiddlewareEntry {
    pub(crate) func: MiddlewareFn,
    pub(crate) route: String,
    pub(crate) position: Position,
}

impl std::fmt::Debug for MiddlewareEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareEntry")
            .field("route", &self.route)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

/// The app-wide middleware set: an exemption list plus the registered
/// functions, of which only the first is ever invoked.
#[derive(Default)]
pub(crate) struct GlobalMiddleware {
    pub(crate) funcs: Vec<MiddlewareFn>,
    pub(crate) exempt: Vec<String>,
}

impl std::fmt::Debug for GlobalMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalMiddleware")
            .field("funcs", &self.funcs.len())
            .field("exempt", &self.exempt)
            .finish()
    }
}
