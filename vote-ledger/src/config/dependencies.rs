//! Dependency initialization and wiring for the vote ledger.

use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::server::auth::{IdentityVerifier, StaticTokenVerifier};
use crate::server::state::AppState;
use crate::ServerError;
use vote_ledger_repository::{
    InMemoryStore, KeyValueStore, LedgerConfig, LedgerKeys, RedisStore, RedisStoreConfig,
    VoteLedgerService,
};

/// Default Redis URL.
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Default per-connection timeout in milliseconds.
const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 1000;

/// Default per-command timeout in milliseconds.
const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 1000;

/// Default scan `COUNT` hint used by the reset sweep.
const DEFAULT_SCAN_COUNT: usize = 100;

/// Default membership-key delete chunk size.
const DEFAULT_DELETE_BATCH_SIZE: usize = 500;

/// Connection mode for Redis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection every retry interval until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse connection mode from `REDIS_CONNECTION_MODE`.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive)
    /// Defaults to "retry" if not set or invalid.
    fn from_env() -> Self {
        Self::parse(&env::var("REDIS_CONNECTION_MODE").unwrap_or_else(|_| "retry".to_string()))
    }

    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid REDIS_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Which store backs the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Redis,
    /// Process-local store; state is lost on restart.
    Memory,
}

impl StoreKind {
    fn from_env() -> Result<Self, ServerError> {
        Self::parse(&env::var("LEDGER_STORE").unwrap_or_else(|_| "redis".to_string()))
    }

    fn parse(value: &str) -> Result<Self, ServerError> {
        match value.to_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(ServerError::config(format!(
                "Unknown LEDGER_STORE '{}', expected 'redis' or 'memory'",
                other
            ))),
        }
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Shared state handed to the router.
    pub state: AppState,
    /// Listener settings.
    pub server: ServerConfig,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LEDGER_STORE`: "redis" or "memory" (default: redis)
    /// - `REDIS_URL`: Redis server URL (default: redis://127.0.0.1:6379)
    /// - `REDIS_CONNECTION_MODE`: Connection mode - "fail-fast" or "retry" (default: retry)
    /// - `REDIS_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `REDIS_CONNECTION_TIMEOUT_MS`: Connection timeout (default: 1000)
    /// - `REDIS_RESPONSE_TIMEOUT_MS`: Command timeout (default: 1000)
    /// - `LEDGER_KEY_NAMESPACE`: Optional prefix for every store key
    /// - `LEDGER_SCAN_COUNT`: Scan hint used by reset (default: 100)
    /// - `LEDGER_DELETE_BATCH_SIZE`: Membership keys deleted per call during reset (default: 500)
    /// - `VOTE_LEDGER_TOKENS`: Accepted bearer tokens as `token=userId` pairs, comma-separated
    /// - `SERVER_HOST`, `SERVER_PORT`, `CORS_ALLOWED_ORIGINS`: see `ServerConfig`
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ServerError)` - If configuration is invalid or the store is unreachable in
    ///   fail-fast mode
    pub async fn new() -> Result<Self, ServerError> {
        let server = ServerConfig::from_env();
        let store_kind = StoreKind::from_env()?;
        let ledger_config = Self::ledger_config_from_env();

        info!(
            store = ?store_kind,
            catalog_key = %ledger_config.keys.catalog,
            scan_count = ledger_config.scan_count,
            delete_batch_size = ledger_config.delete_batch_size,
            "Initializing dependencies"
        );

        let store: Arc<dyn KeyValueStore> = match store_kind {
            StoreKind::Redis => Arc::new(Self::connect_from_env().await?),
            StoreKind::Memory => {
                warn!("Using in-memory store, ledger state will not survive a restart");
                Arc::new(InMemoryStore::new())
            }
        };

        let tokens = env::var("VOTE_LEDGER_TOKENS").unwrap_or_default();
        let verifier = StaticTokenVerifier::parse(&tokens)?;
        if verifier.is_empty() {
            warn!("VOTE_LEDGER_TOKENS is empty, every authenticated route will answer 401");
        } else {
            info!(tokens = verifier.len(), "Static token verifier loaded");
        }
        let verifier: Arc<dyn IdentityVerifier> = Arc::new(verifier);

        let service = Arc::new(VoteLedgerService::with_config(store, ledger_config));

        Ok(Self {
            state: AppState::new(service, verifier),
            server,
        })
    }

    fn ledger_config_from_env() -> LedgerConfig {
        let keys = match env::var("LEDGER_KEY_NAMESPACE") {
            Ok(ns) if !ns.trim().is_empty() => LedgerKeys::namespaced(ns.trim()),
            _ => LedgerKeys::default(),
        };
        let scan_count = env_parse("LEDGER_SCAN_COUNT", DEFAULT_SCAN_COUNT);
        let delete_batch_size = env_parse("LEDGER_DELETE_BATCH_SIZE", DEFAULT_DELETE_BATCH_SIZE);

        LedgerConfig::with_keys(keys)
            .scan_count(scan_count)
            .delete_batch_size(delete_batch_size)
    }

    async fn connect_from_env() -> Result<RedisStore, ServerError> {
        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());
        let connection_mode = ConnectionMode::from_env();
        let retry_interval = env_parse("REDIS_RETRY_INTERVAL_SECS", DEFAULT_RETRY_INTERVAL_SECS);
        let config = RedisStoreConfig::new(redis_url)
            .with_connection_timeout(Duration::from_millis(env_parse(
                "REDIS_CONNECTION_TIMEOUT_MS",
                DEFAULT_CONNECTION_TIMEOUT_MS,
            )))
            .with_response_timeout(Duration::from_millis(env_parse(
                "REDIS_RESPONSE_TIMEOUT_MS",
                DEFAULT_RESPONSE_TIMEOUT_MS,
            )));

        info!(
            connection_mode = ?connection_mode,
            retry_interval_secs = retry_interval,
            "Connecting to Redis"
        );

        let store =
            Self::connect_to_redis(&config, connection_mode, Duration::from_secs(retry_interval))
                .await?;

        info!("Redis connection established");
        Ok(store)
    }

    /// Connect to Redis with retry logic based on connection mode.
    async fn connect_to_redis(
        config: &RedisStoreConfig,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<RedisStore, ServerError> {
        loop {
            match Self::try_connect_redis(config).await {
                Ok(store) => return Ok(store),
                Err(e) => match mode {
                    ConnectionMode::FailFast => return Err(e),
                    ConnectionMode::Retry => {
                        warn!(
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to Redis, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }

    /// Connect and check the server answers.
    async fn try_connect_redis(config: &RedisStoreConfig) -> Result<RedisStore, ServerError> {
        let store = RedisStore::new(config).await?;
        store.ping().await?;
        Ok(store)
    }
}

/// Read and parse an env var, falling back to `default` when unset or invalid.
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or(default)
}
