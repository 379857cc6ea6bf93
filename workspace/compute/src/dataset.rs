//! Loading and normalization of the subnational electricity-consumption
//! statistics.
//!
//! One CSV is published per year. At startup every configured year file is
//! read, the ONS area codes are mapped onto [`RegionCode`]s, rows outside
//! the fixed region set are dropped, and the result is collapsed into one
//! year-sorted series per region. The dataset is immutable afterwards and
//! shared read-only across requests.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use model::entities::region_consumption::RegionCode;
use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{ComputeError, Result};

/// Years covered by the published statistics.
pub const DEFAULT_YEARS: RangeInclusive<i32> = 2005..=2023;

/// Column holding the ONS area code in the source tables.
pub const CODE_COLUMN: &str = "Code";

/// Column holding the all-meters consumption figure. The published header
/// contains literal newlines.
pub const CONSUMPTION_COLUMN: &str = "Total consumption\n(GWh):\nAll meters";

/// File name of the source table for one year.
pub fn source_file_name(year: i32) -> String {
    format!("Subnational_electricity_consumption_statistics_{year}.csv")
}

/// A year-sorted sequence of `(year, consumption)` observations for one
/// region. At most one value per year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSeries {
    points: Vec<(i32, f64)>,
}

impl RegionSeries {
    fn from_year_map(years: BTreeMap<i32, f64>) -> Self {
        Self {
            points: years.into_iter().collect(),
        }
    }

    pub fn points(&self) -> &[(i32, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent observed year, if the series has any data.
    pub fn last_year(&self) -> Option<i32> {
        self.points.last().map(|(year, _)| *year)
    }

    /// The observed value for an exact year, if present.
    pub fn value_for(&self, year: i32) -> Option<f64> {
        self.points
            .binary_search_by_key(&year, |(y, _)| *y)
            .ok()
            .map(|idx| self.points[idx].1)
    }
}

/// The normalized region-by-year consumption table, loaded once at
/// process start.
#[derive(Debug)]
pub struct HistoricalDataset {
    series: BTreeMap<RegionCode, RegionSeries>,
    empty: RegionSeries,
}

impl HistoricalDataset {
    /// Reads and normalizes one source table per year in `years`.
    ///
    /// A missing or malformed year file fails the whole load; the process
    /// must not serve forecasts from a partial dataset.
    pub fn load(data_dir: &Path, years: RangeInclusive<i32>) -> Result<Self> {
        let mut rows = Vec::new();

        for year in years {
            let path = data_dir.join(source_file_name(year));
            let year_rows = read_year_table(&path, year)?;
            debug!(year, rows = year_rows.len(), "Loaded source year table");
            rows.extend(year_rows);
        }

        let dataset = Self::from_rows(rows);
        info!(
            regions = dataset.series.len(),
            observations = dataset.observation_count(),
            "Historical dataset loaded"
        );
        Ok(dataset)
    }

    /// Builds a dataset from already-normalized `(region, year, value)`
    /// rows. Duplicate `(region, year)` rows reduce last-write-wins.
    pub fn from_rows(rows: Vec<(RegionCode, i32, f64)>) -> Self {
        let mut by_region: BTreeMap<RegionCode, BTreeMap<i32, f64>> = BTreeMap::new();

        for (region, year, value) in rows {
            if let Some(previous) = by_region.entry(region).or_default().insert(year, value) {
                warn!(
                    %region,
                    year,
                    previous,
                    value,
                    "Duplicate source row for region/year, keeping the later value"
                );
            }
        }

        let series = by_region
            .into_iter()
            .map(|(region, years)| (region, RegionSeries::from_year_map(years)))
            .collect();

        Self {
            series,
            empty: RegionSeries::default(),
        }
    }

    /// The year-sorted series for a region; empty if the region has no
    /// historical rows.
    pub fn series_for(&self, region: RegionCode) -> &RegionSeries {
        self.series.get(&region).unwrap_or(&self.empty)
    }

    /// Total number of stored (region, year) observations.
    pub fn observation_count(&self) -> usize {
        self.series.values().map(RegionSeries::len).sum()
    }
}

/// Reads one source year table and extracts the normalized rows for the
/// configured region set.
fn read_year_table(path: &PathBuf, year: i32) -> Result<Vec<(RegionCode, i32, f64)>> {
    if !path.exists() {
        return Err(ComputeError::Dataset(format!(
            "Missing source file for year {}: {}",
            year,
            path.display()
        )));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.clone()))?
        .finish()?;

    let code_col = df.column(CODE_COLUMN).map_err(|e| {
        ComputeError::Dataset(format!("{}: missing '{}' column: {}", path.display(), CODE_COLUMN, e))
    })?;
    let consumption_col = df.column(CONSUMPTION_COLUMN).map_err(|e| {
        ComputeError::Dataset(format!(
            "{}: missing consumption column: {}",
            path.display(),
            e
        ))
    })?;

    let mut rows = Vec::new();

    for i in 0..df.height() {
        let code = match code_col.get(i)? {
            AnyValue::String(s) => s.to_string(),
            AnyValue::StringOwned(s) => s.to_string(),
            // Rows without an area code (blank lines, footnotes) carry
            // nothing we can map.
            _ => continue,
        };

        let Some(region) = RegionCode::from_ons_code(code.trim()) else {
            continue;
        };

        let value = extract_consumption(consumption_col.get(i)?).ok_or_else(|| {
            ComputeError::Dataset(format!(
                "{}: unreadable consumption value for region {} (row {})",
                path.display(),
                region,
                i
            ))
        })?;

        rows.push((region, year, value));
    }

    Ok(rows)
}

/// Pulls a consumption figure out of a CSV cell. The published tables are
/// numeric, but some vintages quote the figures or include thousands
/// separators.
fn extract_consumption(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        AnyValue::StringOwned(s) => s.as_str().trim().replace(',', "").parse::<f64>().ok(),
        AnyValue::Null => None,
        other => other.try_extract::<f64>().ok(),
    }
}
