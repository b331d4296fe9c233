//! Router assembly and the serve loop.
//!
//! The server exposes a single endpoint, `POST /signature`, behind a request
//! trace layer and a body-size limit. Shutdown is two-phase: a SIGINT or
//! SIGTERM stops accepting connections, then in-flight requests get a
//! bounded grace period before the process gives up and exits non-zero.

use std::io;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::info;

use crate::routes;
use crate::state::AppState;

/// Build the application router: the signature endpoint, upload size limit,
/// request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/signature", post(routes::signature::post_signature))
        .layer(DefaultBodyLimit::max(state.config.server.max_upload_bytes))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until SIGINT/SIGTERM, then wait out the shutdown grace period.
///
/// Returns an error when binding fails, the server errors out, or in-flight
/// requests outlive the grace period.
pub async fn run(state: AppState) -> io::Result<()> {
    let listen = state.config.server.listen.clone();
    let grace = Duration::from_secs(state.config.server.shutdown_grace_secs);
    let app = build_router(state);

    let listener = TcpListener::bind(&listen).await?;
    info!("Listening on {listen}");

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server: JoinHandle<io::Result<()>> = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                stop_rx.await.ok();
            })
            .await
    });

    tokio::select! {
        result = &mut server => return flatten(result),
        () = shutdown_signal() => {}
    }

    let _ = stop_tx.send(());
    info!(
        "Shutting down, allowing {}s for in-flight requests",
        grace.as_secs()
    );

    match timeout(grace, &mut server).await {
        Ok(result) => flatten(result),
        Err(_) => {
            server.abort();
            Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "shutdown grace period expired",
            ))
        }
    }
}

fn flatten(result: Result<io::Result<()>, tokio::task::JoinError>) -> io::Result<()> {
    match result {
        Ok(inner) => inner,
        Err(e) => Err(io::Error::other(e)),
    }
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to register SIGTERM");
        tokio::select! {
            _ = ctrl_c => info!("Received SIGINT"),
            _ = sigterm.recv() => info!("Received SIGTERM"),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received SIGINT");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(AppState::new(Config::default()))
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let request = Request::builder()
            .uri("/nope")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_signature_is_method_not_allowed() {
        let request = Request::builder()
            .uri("/signature")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
