use crate::config::Config;
use crate::error::{KgforgeError, Result};
use crate::generation::Generate;
use crate::server::handler::process_request;
use crate::store::StoreRead;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
pub struct AppState<G, S> {
    generator: Arc<G>,
    store: Option<Arc<S>>,
}

impl<G, S> Clone for AppState<G, S> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
            store: self.store.clone(),
        }
    }
}

/// HTTP front for the graph request handler.
pub struct HttpServer<G, S> {
    state: AppState<G, S>,
    allowed_origins: Vec<String>,
    port: u16,
}

impl<G, S> HttpServer<G, S>
where
    G: Generate + 'static,
    S: StoreRead + 'static,
{
    pub fn new(generator: G, store: Option<S>, config: &Config) -> Self {
        Self {
            state: AppState {
                generator: Arc::new(generator),
                store: store.map(Arc::new),
            },
            allowed_origins: config.server.allowed_origins.clone(),
            port: config.server.port,
        }
    }

    /// Run the HTTP server
    pub async fn run(self) -> Result<()> {
        let addr = format!("127.0.0.1:{}", self.port);
        let app = self.router();

        log::info!("Starting knowledge graph server on http://{}", addr);
        log::info!("Graph endpoint: http://{}/graph", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            KgforgeError::Io(std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                format!(
                    "Failed to bind to {}: {}. Another process may be using this port; set server.port in config.toml to change it.",
                    addr, e
                ),
            ))
        })?;

        axum::serve(listener, app).await.map_err(|e| {
            KgforgeError::Io(std::io::Error::other(format!("HTTP server error: {}", e)))
        })?;

        Ok(())
    }

    /// Create the axum router
    fn router(&self) -> Router {
        // Build CORS layer.
        // - If allowed_origins is configured: restrict to that list.
        // - If empty (local dev): allow Any for convenience.
        let cors = if self.allowed_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<axum::http::HeaderValue> = self
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/graph", post(handle_graph::<G, S>))
            .route("/health", get(handle_health))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors),
            )
            .with_state(self.state.clone())
    }
}

/// Handle POST /graph
async fn handle_graph<G, S>(State(state): State<AppState<G, S>>, body: String) -> Response
where
    G: Generate + 'static,
    S: StoreRead + 'static,
{
    let reply = process_request(state.generator.as_ref(), state.store.as_deref(), &body).await;

    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}

/// Handle health check endpoint
async fn handle_health() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": "kgforge",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
        .into_response()
}
