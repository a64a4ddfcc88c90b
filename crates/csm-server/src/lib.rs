//! HTTP surface for the CSM speech generation service.
//!
//! Thin transport over the two core operations: the generator resolves
//! eagerly at startup, and `/generate` forwards requests to
//! [`csm_speech::SpeechService`].

pub mod api;
pub mod state;

pub use api::create_router;
pub use state::AppState;

use std::sync::Arc;

/// Server configuration (host, port).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Configuration from `CSM_HOST` / `CSM_PORT`, with defaults.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            host: std::env::var("CSM_HOST").unwrap_or(default.host),
            port: std::env::var("CSM_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(default.port),
        }
    }
}

/// Resolve the model, bind, and serve until shutdown.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let state = Arc::new(AppState::new());

    log::info!("Loading CSM model...");
    match state.service.warm_up().await {
        Ok(()) => log::info!("CSM model loaded successfully"),
        Err(e) => log::error!("Failed to load CSM model: {e}"),
    }

    let app = create_router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Listening on {addr}");

    axum::serve(listener, app).await
}
