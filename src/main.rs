use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sheet_sync_service::config::{redact_database_url, Config};
use sheet_sync_service::database::DatabaseManager;
use sheet_sync_service::sheets::SheetsClient;
use sheet_sync_service::SyncPipeline;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheet_sync=info,sheet_sync_service=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sheet Sync Service v0.1.0");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration loaded:");
    info!("  Database URL: {}", redact_database_url(&config.database_url));
    info!("  Credentials: {}", config.credentials_path.display());

    let database = match DatabaseManager::new(&config.database_url) {
        Ok(database) => database,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let sheets = match SheetsClient::new(&config.credentials_path, &config.sheet_url) {
        Ok(sheets) => sheets,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let pipeline = match SyncPipeline::new(database, sheets) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    match pipeline.run().await {
        Ok(report) => {
            info!(
                fetched = report.fetched,
                read = report.read,
                cleaned = report.cleaned,
                inserted = report.inserted,
                "Sync finished successfully"
            );
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
