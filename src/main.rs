use std::sync::Arc;

use blockmine::{router, AppContext, ServerConfig, SqliteLedger};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let ledger = match SqliteLedger::open(&config.db_path) {
        Ok(ledger) => ledger,
        Err(err) => {
            eprintln!(
                "Failed to open ledger DB at {}: {}",
                config.db_path.display(),
                err
            );
            std::process::exit(1);
        }
    };

    let app = router(Arc::new(AppContext::new(ledger)));

    tracing::info!("Starting blockmine server on {}", config.bind_addr);
    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("Failed to bind {}: {}", config.bind_addr, err);
            std::process::exit(1);
        }
    };
    if let Err(err) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", err);
        std::process::exit(1);
    }
}
