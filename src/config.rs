use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use compute::dataset::{HistoricalDataset, DEFAULT_YEARS};
use moka::future::Cache;
use sea_orm::Database;
use tracing::info;

use crate::schemas::AppState;

/// Initialize application state: database connection, the historical
/// dataset and the in-process response cache.
pub async fn initialize_app_state_with_url(database_url: &str, data_dir: &str) -> Result<AppState> {
    // Connect to database
    info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url)
        .await
        .with_context(|| format!("failed to connect to {database_url}"))?;

    // Load the historical dataset once; it is read-only for the process
    // lifetime and shared across requests.
    info!("Loading historical dataset from {}", data_dir);
    let dataset = HistoricalDataset::load(Path::new(data_dir), DEFAULT_YEARS)
        .with_context(|| format!("failed to load historical dataset from {data_dir}"))?;

    // Initialize response cache
    let cache = Cache::builder()
        .max_capacity(1000)
        .time_to_live(Duration::from_secs(300)) // 5 minutes
        .build();

    Ok(AppState {
        db,
        dataset: Arc::new(dataset),
        cache,
    })
}
