use thiserror::Error;

/// Failures surfaced to the request boundary.
///
/// Route-level misses are not errors (they are `Outcome` variants); this
/// taxonomy covers the conditions the boundary must decide about, typically
/// by logging and emitting a 4xx/5xx response.
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("no route matched {method} {path}")]
    NoRouteMatch { method: String, path: String },

    #[error("controller {name} is not registered")]
    UnknownController { name: String },

    #[error("controller {controller} has no method {method}")]
    UnknownMethod { controller: String, method: String },

    #[error("rate limit exceeded for client {client}")]
    RateLimitExceeded { client: String },

    #[error("handler failed: {source}")]
    Handler {
        #[from]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RouterError {
    pub fn no_route_match<M: ToString, P: ToString>(method: M, path: P) -> Self {
        Self::NoRouteMatch { method: method.to_string(), path: path.to_string() }
    }

    pub fn unknown_controller<S: ToString>(name: S) -> Self {
        Self::UnknownController { name: name.to_string() }
    }

    pub fn unknown_method<C: ToString, M: ToString>(controller: C, method: M) -> Self {
        Self::UnknownMethod { controller: controller.to_string(), method: method.to_string() }
    }

    pub fn rate_limit_exceeded<S: ToString>(client: S) -> Self {
        Self::RateLimitExceeded { client: client.to_string() }
    }

    pub fn handler<E: Into<Box<dyn std::error::Error + Send + Sync>>>(source: E) -> Self {
        Self::Handler { source: source.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_variants_render_their_context() {
        assert_eq!(
            RouterError::no_route_match("GET", "/missing").to_string(),
            "no route matched GET /missing"
        );
        assert_eq!(
            RouterError::rate_limit_exceeded("10.0.0.1").to_string(),
            "rate limit exceeded for client 10.0.0.1"
        );
        assert_eq!(
            RouterError::unknown_method("UserController", "destroy").to_string(),
            "controller UserController has no method destroy"
        );
    }
}
