use std::env;
use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::{ConfigLoader, ServiceConfig};
use payroll_engine::error::PayrollResult;
use payroll_engine::service::PayrollService;
use payroll_engine::store::{InMemoryStore, PayrollStore, PostgresStore};

const CONFIG_ENV: &str = "PAYROLL_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config/payroll.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config_path = env::args()
        .nth(1)
        .or_else(|| env::var(CONFIG_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    info!(path = %config_path, "Loading configuration");
    let config = ConfigLoader::load(&config_path)?.into_config();

    let store = open_store(&config).await?;
    let service = PayrollService::new(store, config.report);
    let app = create_router(AppState::new(service, config.server.max_upload_bytes));

    let listener = TcpListener::bind(&config.server.address).await?;
    info!(address = %config.server.address, "Payroll service listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn open_store(config: &ServiceConfig) -> PayrollResult<Arc<dyn PayrollStore>> {
    let rates = config.rates();
    match &config.database {
        Some(database) => {
            let store = PostgresStore::connect(database).await?;
            store.seed_rates(&rates).await?;
            Ok(Arc::new(store))
        }
        None => {
            info!("No database configured, keeping data in memory");
            Ok(Arc::new(InMemoryStore::with_rates(rates)))
        }
    }
}
