//! Schola API Server
//!
//! Main entry point for the Schola backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schola_api::{AppState, create_router};
use schola_core::finance::FinancialSettings;
use schola_shared::AppConfig;
use schola_store::AppStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schola=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Create the application-state store
    let settings = FinancialSettings {
        probation_pct: config.finance.probation_pct,
        currency: config.finance.currency,
    };
    let store = AppStore::new(settings);
    info!(
        probation_pct = %config.finance.probation_pct,
        currency = %config.finance.currency,
        "State store initialized"
    );

    // Create application state
    let state = AppState {
        store: Arc::new(store),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
