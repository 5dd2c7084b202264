use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use common::storage::{Storage, StorageConfig};
use rental::catalog::{CatalogClient, CatalogConfig};
use rental::config::ServerConfig;
use rental::notifier::{ConsoleNotifier, EmailJsConfig, EmailJsNotifier, Notifier};
use rental::routes;
use rental::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting rental service");

    // Open the storage profile
    let storage_config = StorageConfig::from_env()?;
    let storage = Arc::new(Storage::open(&storage_config)?);

    if storage.health_check().await? {
        info!("Storage profile ready");
    } else {
        anyhow::bail!("Failed to open storage profile");
    }

    // Pick the notification sink: the HTTP gateway when configured,
    // console logging otherwise
    let notifier: Arc<dyn Notifier> = match EmailJsConfig::from_env() {
        Some(config) => Arc::new(EmailJsNotifier::new(config)),
        None => {
            info!("Email gateway not configured; notifications go to the log");
            Arc::new(ConsoleNotifier)
        }
    };

    let catalog = CatalogClient::new(&CatalogConfig::from_env());
    let app_state = AppState::new(storage, notifier, catalog);

    info!("Rental service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::from_env();
    let listener = tokio::net::TcpListener::bind(&server_config.bind_addr).await?;
    info!("Rental service listening on {}", server_config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
