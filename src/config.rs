//! Configuration types.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Default API base URL (the development server's default bind address).
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

/// Default bind address for the development server.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// File name of the persisted client store.
pub const STORE_FILE_NAME: &str = "app-storage.json";

/// Client-side configuration: where the auth API lives and where session /
/// display preferences are persisted.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL the `/api/auth/*` routes are resolved against.
    pub api_base_url: String,
    /// Per-request timeout for auth calls.
    pub request_timeout: Duration,
    /// Path of the persisted store document.
    pub store_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(15),
            store_path: default_store_path().unwrap_or_else(|_| PathBuf::from(STORE_FILE_NAME)),
        }
    }
}

impl ClientConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// - `CHESS_ONBOARD_API_URL`
    /// - `CHESS_ONBOARD_TIMEOUT_SECS`
    /// - `CHESS_ONBOARD_STORE_PATH`
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_base_url = std::env::var("CHESS_ONBOARD_API_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        url::Url::parse(&api_base_url).map_err(|e| ConfigError::InvalidValue {
            key: "CHESS_ONBOARD_API_URL".to_string(),
            message: e.to_string(),
        })?;

        let request_timeout = match std::env::var("CHESS_ONBOARD_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "CHESS_ONBOARD_TIMEOUT_SECS".to_string(),
                    message: format!("expected a whole number of seconds, got {raw:?}"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "CHESS_ONBOARD_TIMEOUT_SECS".to_string(),
                        message: "must be greater than zero".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            Err(_) => defaults.request_timeout,
        };

        let store_path = std::env::var("CHESS_ONBOARD_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.store_path);

        Ok(Self {
            api_base_url,
            request_timeout,
            store_path,
        })
    }
}

/// `$HOME/.chess-onboard/app-storage.json`.
pub fn default_store_path() -> Result<PathBuf, ConfigError> {
    let home =
        std::env::var("HOME").map_err(|_| ConfigError::NoDefaultPath("the client store".into()))?;
    Ok(PathBuf::from(home)
        .join(".chess-onboard")
        .join(STORE_FILE_NAME))
}

/// Development auth server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Build config from `CHESS_ONBOARD_BIND`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("CHESS_ONBOARD_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());
        let bind_addr = raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: "CHESS_ONBOARD_BIND".to_string(),
            message: format!("not a socket address: {raw:?}"),
        })?;
        Ok(Self { bind_addr })
    }
}
