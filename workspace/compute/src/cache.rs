//! Durable write-through cache for resolved consumption values.
//!
//! Backed by the `region_consumption` table, which carries a unique
//! constraint on `(region, year)`. Writes go through an atomic
//! insert-if-absent so the first writer wins for a given key; once a value
//! is cached it is never recomputed or replaced, even when a re-run of the
//! model would produce a different number.

use model::entities::region_consumption;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use tracing::{debug, warn};

use model::entities::region_consumption::{Provenance, RegionCode};

use crate::error::Result;

/// Read/upsert access to the stored consumption values.
#[derive(Debug, Clone)]
pub struct ConsumptionCache {
    pub(crate) db: DatabaseConnection,
}

impl ConsumptionCache {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The stored value for `(region, year)`, if any.
    pub async fn get(
        &self,
        region: RegionCode,
        year: i32,
    ) -> Result<Option<region_consumption::Model>> {
        let row = region_consumption::Entity::find()
            .filter(region_consumption::Column::Region.eq(region))
            .filter(region_consumption::Column::Year.eq(year))
            .one(&self.db)
            .await?;
        Ok(row)
    }

    /// Stores a resolved value unless one already exists for the key.
    ///
    /// Returns `true` when a new row was written. Relies on the unique
    /// `(region, year)` index and `ON CONFLICT DO NOTHING`, so concurrent
    /// writers for the same key cannot duplicate rows. A transient
    /// database error is retried once; the caller degrades to serving the
    /// value uncached if the retry fails too.
    pub async fn insert_if_absent(
        &self,
        region: RegionCode,
        year: i32,
        consumption: f64,
        source: Provenance,
    ) -> Result<bool> {
        match self.try_insert(region, year, consumption, source).await {
            Ok(inserted) => Ok(inserted),
            Err(err) => {
                warn!(%region, year, error = %err, "Cache write failed, retrying once");
                Ok(self.try_insert(region, year, consumption, source).await?)
            }
        }
    }

    async fn try_insert(
        &self,
        region: RegionCode,
        year: i32,
        consumption: f64,
        source: Provenance,
    ) -> std::result::Result<bool, DbErr> {
        let row = region_consumption::ActiveModel {
            region: Set(region),
            year: Set(year),
            consumption: Set(consumption),
            source: Set(source),
            ..Default::default()
        };

        let insert = region_consumption::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    region_consumption::Column::Region,
                    region_consumption::Column::Year,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(&self.db)
            .await;

        match insert {
            Ok(_) => {
                debug!(%region, year, consumption, source = source.as_str(), "Cached resolved value");
                Ok(true)
            }
            // The key already has a row; first writer wins.
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(err) => Err(err),
        }
    }
}
