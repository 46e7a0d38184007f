use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use recitation_configuration::ServerConfig;
use tokio::net::TcpListener;

pub mod error;
pub mod handlers;
mod state;

pub use error::HttpError;
pub use handlers::{health, score_recitation};
pub use state::AppState;

/// Slack on top of the audio cap for the multipart framing and the text
/// fields travelling alongside the file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_audio_bytes + MULTIPART_OVERHEAD_BYTES);
    let score_route = post(score_recitation).layer(body_limit);

    Router::new()
        .route("/health", get(health))
        .route("/api/recitation/score", score_route)
        .with_state(state)
}

pub async fn create_app_routes(state: AppState, config: &ServerConfig) -> anyhow::Result<()> {
    let router = build_router(state);
    let address = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&address).await?;
    tracing::info!(%address, "recitation http server listening");
    axum::serve(listener, router).await?;
    Ok(())
}
