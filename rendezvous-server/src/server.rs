use crate::config::{ConfigError, RelayConfig};
use crate::room::RoomRegistry;
use crate::signaling::{health, join, peek, publish, ws_handler};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// The relay's HTTP/WebSocket front bound to one [`RoomRegistry`].
pub struct RelayServer {
    registry: RoomRegistry,
    config: RelayConfig,
}

impl RelayServer {
    pub fn new(config: RelayConfig) -> Result<Self, ConfigError> {
        let registry = RoomRegistry::new(config.registry.clone())?;
        Ok(Self { registry, config })
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/health", get(health))
            .route("/peer", post(publish))
            .route("/join/{room_id}", get(peek).post(join))
            .route("/{room_id}", get(ws_handler))
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.registry.clone())
    }

    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let app = self.router();
        if let Ok(addr) = listener.local_addr() {
            info!("Rendezvous relay listening on http://{}", addr);
        }
        axum::serve(listener, app).await
    }
}
