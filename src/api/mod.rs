//! HTTP surface: the employees API, the static frontend, and the login
//! gateway wiring.

pub mod handlers;

use crate::{
    auth::{self, AuthGateway},
    directory::DirectoryCache,
};
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::get,
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, services::ServeDir, set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

/// Build the application router.
///
/// Everything except `/health` and the OAuth callback sits behind the
/// gateway. Without a gateway (no OAuth client configured) the page is
/// served open; that mode exists for local development only.
#[must_use]
pub fn app(
    gateway: Option<Arc<AuthGateway>>,
    cache: Arc<DirectoryCache>,
    static_dir: &str,
) -> Router {
    let mut router = Router::new()
        .route("/api/employees", get(handlers::employees))
        .fallback_service(ServeDir::new(static_dir));

    if let Some(gateway) = gateway {
        // The callback route is registered after the login layer so it stays
        // reachable for visitors who are, by definition, not logged in yet.
        router = router
            .layer(middleware::from_fn(auth::require_login))
            .route(auth::CALLBACK_PATH, get(auth::callback))
            .layer(Extension(gateway));
    }

    router.route("/health", get(handlers::health)).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &Request<Body>| {
                    HeaderValue::from_str(Ulid::new().to_string().as_str()).ok()
                },
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(Extension(cache)),
    )
}

fn make_span(request: &Request<Body>) -> Span {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "request",
        method = %request.method(),
        path,
        request_id = ?request.headers().get("x-request-id"),
    )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(
    port: u16,
    gateway: Option<Arc<AuthGateway>>,
    cache: Arc<DirectoryCache>,
    static_dir: &str,
) -> Result<()> {
    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app(gateway, cache, static_dir).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Gracefully shutdown");
}
