use arbor_router::rate_limit::{RateDecision, RateLimiter};
use arbor_router::render::Renderer;
use arbor_router::session::MemoryStore;
use arbor_router::{
    get, handler_fn, post, Outcome, Position, RequestContext, RouteParams, Router, RouterError,
};

use http::{Method, StatusCode};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Stand-in for the document assembly layer.
struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn set_status(&self, status: StatusCode) {
        println!("[status] {status}");
    }

    fn render_error_page(&self, page: &str, vars: &[(String, String)]) {
        println!("[error page] {page} {vars:?}");
    }

    fn close_document(&self) {
        println!("</body></html>");
    }
}

fn home(_params: &RouteParams) {
    println!("<h1>home</h1>");
}

fn show_user(params: &RouteParams) {
    println!("<h1>user {}</h1>", params.get("id").unwrap_or("?"));
}

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut router = Router::new();

    let _ = router.add_route([get()], "/", handler_fn(home)).named("home").set_alias("/start");
    let _ = router
        .add_route([get()], "/user/:id", handler_fn(show_user))
        .constrain("id", r"^\d+$")
        .named("profile")
        .middleware(|_ctx| println!("<!-- before user -->"), Position::Before);

    router.add_group("/admin", |router, _prefix| {
        router.add_route([get(), post()], "/users", handler_fn(|_params: &RouteParams| {
            println!("<h1>admin users</h1>");
        }));
    });

    router.add_global_middleware(["/"], |ctx: &RequestContext| {
        info!(path = ctx.target(), "global middleware");
    });

    info!(profile = router.url_for("profile", &[("id", "7")]).as_deref(), "reverse url");

    let renderer = ConsoleRenderer;
    for (method, target) in [
        (Method::GET, "/"),
        (Method::GET, "/start"),
        (Method::GET, "/user/42?tab=posts"),
        (Method::GET, "/user/abc"),
        (Method::GET, "/admin/users"),
    ] {
        let ctx = RequestContext::new(method, target).with_remote_addr("127.0.0.1");
        let outcome = router.dispatch(&ctx, &renderer).expect("dispatch failed");
        if outcome == Outcome::NotFound {
            let err = RouterError::no_route_match(ctx.method(), target);
            warn!(%err, "unhandled request");
        }
        info!(path = target, outcome = ?outcome, "request finished");
    }

    // Fixed-window limiter backed by the session store.
    let store = MemoryStore::new();
    let limiter = RateLimiter::new(5, 60).with_message("too many requests, slow down");
    for _ in 0..7 {
        match limiter.check(&store, "127.0.0.1") {
            RateDecision::Allow => info!("rate limit check passed"),
            RateDecision::Reject { body } => {
                let err = RouterError::rate_limit_exceeded("127.0.0.1");
                warn!(%err, body = %body, "rejected");
            }
        }
    }
}
