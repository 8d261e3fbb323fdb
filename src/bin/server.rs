//! Home Stock Server
//!
//! Serves the family group API: creating groups, joining them with a
//! shared password, and reading the caller's group.
//!
//! # Configuration
//!
//! Environment variables:
//! - `HOME_STOCK_CONFIG`: Path to config file (default: ~/.config/home-stock/config.yaml)
//! - `HOME_STOCK_DATABASE_PATH`: SQLite database (default: ~/.local/share/home-stock/home-stock.db)
//! - `HOME_STOCK_PORT`: Port to listen on (default: 8080)
//! - `HOME_STOCK_CODE_MAX_ATTEMPTS`: Code draws before a create gives up (default: 50)
//!
//! # Config File Format
//!
//! ```yaml
//! port: 8080
//! min_password_len: 8
//! session_expiry_minutes: 1440
//! ```

use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use home_stock::config::Config;
use home_stock::server::{self, AppState, SessionStore};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "home_stock=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(None)?;
    tracing::info!("Database: {}", config.database_path.display());

    let groups = home_stock::build_service(&config).await?;
    let state = AppState::new(groups, SessionStore::new(config.session_expiry_minutes));

    server::spawn_session_cleanup(state.sessions.clone(), Duration::from_secs(60));

    let app = server::router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
