mod dispatch;
mod error;
mod handler;
mod normalize;
mod pattern;
mod request;
mod router;
mod sanitize;

pub mod controller;
pub mod rate_limit;
pub mod render;
pub mod session;

pub use dispatch::Outcome;
pub use dispatch::Termination;
pub use error::RouterError;
pub use handler::handler_fn;
pub use handler::FnHandler;
pub use handler::IntoHandlerResult;
pub use handler::MiddlewareFn;
pub use handler::Position;
pub use handler::RouteHandler;
pub use normalize::normalize;
pub use request::RequestContext;
pub use request::RouteParams;
pub use router::{any, delete, get, head, options, patch, post, put};
pub use router::RouteHandle;
pub use router::RouteMethod;
pub use router::Router;
pub use sanitize::sanitize;
