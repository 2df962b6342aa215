//! Scoring service
//!
//! Serves `POST /predict` and `GET /health` over a scaler and model loaded
//! once at startup.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use handlers::{Confidence, PredictResponse};
pub use state::PredictorContext;

use crate::core::Result;
use log::{error, info};
use std::sync::Arc;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Serve requests until ctrl+c
pub async fn run_server(config: ServerConfig, ctx: PredictorContext) -> Result<()> {
    let loaded_at = ctx.loaded_at();
    let app = create_router(Arc::new(ctx));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!(
        "Scoring service listening on http://{} (artifacts loaded {})",
        listener.local_addr()?,
        loaded_at.to_rfc3339()
    );

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install ctrl+c handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received, stopping server");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
