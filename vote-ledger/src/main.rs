//! Vote Ledger Main Entry Point
//!
//! Serves the vote ledger HTTP API on top of Redis.

use dotenv::dotenv;
use tracing::{error, info};
use vote_ledger::config::init_logging;
use vote_ledger::server::{bind_listener, create_app, run_server};
use vote_ledger::{Dependencies, ServerError};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_logging();

    info!("Starting Vote Ledger");

    let deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let (host, port) = deps.server.bind_address();
    let listener = bind_listener(host, port).await?;
    let app = create_app(deps.state, deps.server.cors_layer());

    match run_server(app, listener).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!(error = %e, "Server failed");
            Err(e)
        }
    }
}
