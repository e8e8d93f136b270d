//! Local development copy of the auth API.
//!
//! Accounts and sessions live in memory and vanish when the process exits.

pub mod accounts;
pub mod handlers;

pub use accounts::AccountDirectory;
pub use handlers::{DevServerState, auth_routes};

use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;
use crate::error::ServerError;

/// Serve the auth API on `config.bind_addr` until the process is stopped.
pub async fn serve(config: &ServerConfig) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind_addr.to_string(),
            source,
        })?;
    let app = auth_routes(DevServerState::default()).layer(CorsLayer::permissive());
    tracing::info!(addr = %config.bind_addr, "Auth dev server started");
    axum::serve(listener, app).await?;
    Ok(())
}
