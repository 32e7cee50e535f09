//! HTTP server assembly.

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::handlers::{self, AppState};

/// Build the application router. Exposed separately from [`ApiServer`] so
/// tests can drive it without binding a socket.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route(
            "/email",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route("/email/check/:email", get(handlers::check_entry))
        .route("/email/validate/:email", put(handlers::validate_entry))
        .route("/email/send/:member_id", post(handlers::send_message))
        .route("/email/:id/spam", put(handlers::mark_spam))
        .route("/email/:id/unspam", put(handlers::unmark_spam))
        .route("/email/:id", delete(handlers::delete_entry));

    Router::new()
        .nest("/foyer/v1", api)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The API server: binds a port and serves the router until shutdown.
pub struct ApiServer {
    state: Arc<AppState>,
    port: u16,
}

impl ApiServer {
    pub fn new(state: Arc<AppState>, port: u16) -> Self {
        Self { state, port }
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(%addr, "api server listening");
        axum::serve(listener, router(self.state)).await?;
        Ok(())
    }
}
