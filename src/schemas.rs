use std::collections::BTreeMap;
use std::sync::Arc;

use compute::dataset::HistoricalDataset;
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use validator::Validate;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection backing the durable consumption cache
    pub db: DatabaseConnection,
    /// Historical consumption table, loaded once at startup
    pub dataset: Arc<HistoricalDataset>,
    /// In-process cache of whole per-year responses
    pub cache: Cache<i32, ForecastResponse>,
}

/// Request body for resolving a forecast year
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct ForecastRequest {
    /// Year to resolve (historical years are served verbatim, later
    /// years are projected)
    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,
}

/// A resolved value for one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RegionForecast {
    /// Annual consumption in GWh, rounded to 2 decimal places
    pub value: f64,
    /// "historical" or "forecast"
    pub source: String,
}

/// Per-region resolution for one year; unresolvable regions map to null
pub type ForecastResponse = BTreeMap<String, Option<RegionForecast>>;

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::forecast::resolve_forecast,
    ),
    components(
        schemas(
            ApiResponse<ForecastResponse>,
            ErrorResponse,
            HealthResponse,
            ForecastRequest,
            RegionForecast,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "forecast", description = "Regional consumption forecasting")
    ),
    info(
        title = "Gridcast API",
        description = "Regional electricity-consumption forecasting service",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
