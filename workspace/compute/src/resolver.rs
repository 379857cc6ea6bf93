//! Per-year forecast resolution across the configured region set.
//!
//! For a requested year every region resolves independently to one of
//! three terminal states: an observed historical value, a trend-model
//! projection, or unresolvable (a gap inside the historical range, or a
//! region whose history cannot carry a model). Resolved values are written
//! through to the durable cache so later requests for the same
//! `(region, year)` are served without refitting.

use std::collections::BTreeMap;
use std::sync::Arc;

use sea_orm::Iterable;
use tracing::{debug, instrument, warn};

use model::entities::region_consumption::{Provenance, RegionCode};

use crate::cache::ConsumptionCache;
use crate::dataset::HistoricalDataset;
use crate::error::Result;
use crate::trend::{round2, TrendModel};

/// A resolved value for one region: the consumption figure and where it
/// came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionValue {
    pub value: f64,
    pub provenance: Provenance,
}

/// The per-region outcome of resolving one requested year. `None` marks a
/// region whose request was unresolvable; the key set always equals the
/// configured region set.
pub type YearResolution = BTreeMap<RegionCode, Option<RegionValue>>;

/// The public entry point of the forecasting core.
#[derive(Debug, Clone)]
pub struct ForecastResolver {
    dataset: Arc<HistoricalDataset>,
    cache: ConsumptionCache,
    model: TrendModel,
}

impl ForecastResolver {
    pub fn new(dataset: Arc<HistoricalDataset>, cache: ConsumptionCache) -> Self {
        Self {
            dataset,
            cache,
            model: TrendModel::default(),
        }
    }

    /// Resolves the requested year for every configured region.
    ///
    /// One region's failure never aborts the others; a region that cannot
    /// be resolved maps to `None`. Newly computed or observed values are
    /// committed per region, so earlier writes survive a failure later in
    /// the loop.
    #[instrument(skip(self))]
    pub async fn resolve_year(&self, year: i32) -> Result<YearResolution> {
        let mut resolution = YearResolution::new();

        for region in RegionCode::iter() {
            let resolved = self.resolve_region(region, year).await;
            resolution.insert(region, resolved);
        }

        Ok(resolution)
    }

    /// Resolves one `(region, year)` pair to its terminal state.
    async fn resolve_region(&self, region: RegionCode, year: i32) -> Option<RegionValue> {
        // Serve from the durable cache when the pair was resolved before;
        // a cached forecast is never refit.
        match self.cache.get(region, year).await {
            Ok(Some(row)) => {
                debug!(%region, year, "Served from cache");
                return Some(RegionValue {
                    value: row.consumption,
                    provenance: row.source,
                });
            }
            Ok(None) => {}
            Err(err) => {
                // A broken cache read degrades to recomputing the value.
                warn!(%region, year, error = %err, "Cache read failed, recomputing");
            }
        }

        let series = self.dataset.series_for(region);

        // Historical hit: the year was observed directly.
        if let Some(value) = series.value_for(year) {
            let value = round2(value);
            self.persist(region, year, value, Provenance::Historical).await;
            return Some(RegionValue {
                value,
                provenance: Provenance::Historical,
            });
        }

        // Only years strictly after the observed range are genuine
        // forecasts; gaps inside the range and regions without history
        // are unresolvable.
        match series.last_year() {
            Some(last_year) if year > last_year => {}
            _ => {
                debug!(%region, year, "Year not resolvable from history");
                return None;
            }
        }

        // Model fitting is pure CPU work; run it off the request path.
        let model = self.model;
        let series = series.clone();
        let fit_result = tokio::task::spawn_blocking(move || {
            model.fit(&series).and_then(|fitted| fitted.project(year))
        })
        .await;

        let value = match fit_result {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => {
                warn!(%region, year, error = %err, "Trend model failed for region");
                return None;
            }
            Err(err) => {
                warn!(%region, year, error = %err, "Trend model task panicked or was cancelled");
                return None;
            }
        };

        self.persist(region, year, value, Provenance::Forecast).await;
        Some(RegionValue {
            value,
            provenance: Provenance::Forecast,
        })
    }

    /// Write-through to the durable cache. Persistent failure is logged
    /// and the computed value is still served.
    async fn persist(&self, region: RegionCode, year: i32, value: f64, source: Provenance) {
        if let Err(err) = self.cache.insert_if_absent(region, year, value, source).await {
            warn!(%region, year, error = %err, "Serving value without caching it");
        }
    }
}
