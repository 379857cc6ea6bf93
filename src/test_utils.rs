#[cfg(test)]
pub mod test_utils {
    use std::sync::Arc;

    use axum::Router;
    use compute::dataset::HistoricalDataset;
    use migration::{Migrator, MigratorTrait};
    use model::entities::region_consumption::RegionCode;
    use moka::future::Cache;
    use sea_orm::{Database, DatabaseConnection};

    use crate::router::create_router;
    use crate::schemas::AppState;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// A small three-region history: London linear, Wales flat and with a
    /// gap at 2021, Scotland a single unusable point.
    pub fn test_dataset() -> Arc<HistoricalDataset> {
        Arc::new(HistoricalDataset::from_rows(vec![
            (RegionCode::London, 2019, 38000.0),
            (RegionCode::London, 2020, 38500.0),
            (RegionCode::London, 2021, 39000.0),
            (RegionCode::Wales, 2019, 14000.0),
            (RegionCode::Wales, 2020, 14000.0),
            (RegionCode::Wales, 2022, 14000.0),
            (RegionCode::Scotland, 2020, 24000.0),
        ]))
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;
        let cache = Cache::new(100);

        AppState {
            db,
            dataset: test_dataset(),
            cache,
        }
    }

    /// Create a complete test application
    pub async fn setup_test_app() -> Router {
        let state = setup_test_app_state().await;
        create_router(state)
    }
}
