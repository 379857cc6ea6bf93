//! This file serves as the root for all SeaORM entity modules.
//! The forecasting core persists every resolved consumption value here,
//! one row per `(region, year)`.

pub mod region_consumption;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::region_consumption::Entity as RegionConsumption;
    pub use super::region_consumption::{Provenance, RegionCode};
}
