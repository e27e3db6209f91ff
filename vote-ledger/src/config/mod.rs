//! Configuration and dependency initialization.

mod dependencies;
mod logging;

pub use dependencies::{ConnectionMode, Dependencies, StoreKind};
pub use logging::{init_logging, LogFormat, DEFAULT_LOG_FILTER};

use std::env;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

/// Default bind host.
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Read `SERVER_HOST`, `SERVER_PORT` and `CORS_ALLOWED_ORIGINS`.
    pub fn from_env() -> Self {
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string());
        let port = env::var("SERVER_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_SERVER_PORT);
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        Self {
            host,
            port,
            cors_allowed_origins,
        }
    }

    /// Host and port to bind. The host is resolved when the listener binds.
    pub fn bind_address(&self) -> (&str, u16) {
        (&self.host, self.port)
    }

    /// CORS layer for the configured origins.
    pub fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        let allow_origin = if origins.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(origins)
        };

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    }
}

/// Split a comma-separated list, dropping blank entries.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" http://a.test, ,http://b.test "),
            vec!["http://a.test", "http://b.test"]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_bind_address_keeps_host_name() {
        let config = ServerConfig {
            host: "localhost".to_string(),
            port: 8080,
            cors_allowed_origins: vec![],
        };

        assert_eq!(config.bind_address(), ("localhost", 8080));
    }
}
