//! HTTP server setup and routing.

pub mod auth;
pub mod dto;
pub mod handlers;
pub mod state;

use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use self::state::AppState;
use crate::ServerError;

/// Create the Axum application router with all routes and middleware.
pub fn create_app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/uservotes/:voteid", post(handlers::cast_vote))
        .route(
            "/voteitem",
            get(handlers::list_items)
                .post(handlers::add_item)
                .put(handlers::edit_item),
        )
        .route("/voteitem/:id", delete(handlers::delete_item))
        .route("/clearvote", delete(handlers::clear_votes))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind the listener. `host` may be a name such as `localhost`.
pub async fn bind_listener(host: &str, port: u16) -> Result<TcpListener, ServerError> {
    let listener = TcpListener::bind((host, port)).await?;
    info!("Server listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Serve `app` on `listener` until Ctrl+C or SIGTERM.
pub async fn run_server(app: Router, listener: TcpListener) -> Result<(), ServerError> {

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_listener_resolves_host_names() {
        let listener = bind_listener("localhost", 0).await.unwrap();

        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }

    #[tokio::test]
    async fn test_bind_listener_reports_unknown_host() {
        let result = bind_listener("no-such-host.invalid", 0).await;

        assert!(matches!(result, Err(ServerError::IoError(_))));
    }
}
