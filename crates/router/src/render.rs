//! The renderer collaborator.
//!
//! Document assembly and error-page templating live outside the router;
//! dispatch only drives this narrow contract: status side effects, the
//! configured not-found page, and closing out the surrounding document
//! after a successful non-API, non-AJAX route.

use http::StatusCode;

#[cfg_attr(test, mockall::automock)]
pub trait Renderer {
    /// Record a response status side effect (403 on a forbidden-origin
    /// skip, a route's configured status, ...). Later calls may overwrite
    /// earlier ones; the last one wins when the response is written.
    fn set_status(&self, status: StatusCode);

    /// Render the configured not-found page with template variables.
    fn render_error_page(&self, page: &str, vars: &[(String, String)]);

    /// Append the trailing structural content of the full document. Called
    /// after a successful non-API, non-AJAX route and after the not-found
    /// page has been rendered.
    fn close_document(&self);
}
