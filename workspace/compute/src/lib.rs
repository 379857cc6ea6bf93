pub mod cache;
pub mod dataset;
pub mod error;
pub mod resolver;
pub mod trend;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use cache::ConsumptionCache;
use dataset::HistoricalDataset;
use resolver::ForecastResolver;

/// Returns the default pre-configured resolver that will be used most of
/// the time: the shared historical dataset plus the durable consumption
/// cache over the given database connection.
pub fn default_resolver(
    dataset: Arc<HistoricalDataset>,
    db: DatabaseConnection,
) -> ForecastResolver {
    ForecastResolver::new(dataset, ConsumptionCache::new(db))
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use model::entities::region_consumption::{Provenance, RegionCode};

    /// End-to-end pass through the default resolver: history in,
    /// historical hit and forecast out, both persisted.
    #[tokio::test]
    async fn test_default_resolver_round_trip() {
        let db = sea_orm::Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let dataset = Arc::new(HistoricalDataset::from_rows(vec![
            (RegionCode::NorthEast, 2020, 7000.0),
            (RegionCode::NorthEast, 2021, 7100.0),
            (RegionCode::NorthEast, 2022, 7200.0),
        ]));
        let resolver = default_resolver(dataset, db);

        let observed = resolver.resolve_year(2021).await.unwrap();
        let hit = observed[&RegionCode::NorthEast].unwrap();
        assert_eq!(hit.provenance, Provenance::Historical);
        assert_eq!(hit.value, 7100.0);

        let projected = resolver.resolve_year(2024).await.unwrap();
        let forecast = projected[&RegionCode::NorthEast].unwrap();
        assert_eq!(forecast.provenance, Provenance::Forecast);
        assert!(forecast.value > 7200.0);
    }
}
