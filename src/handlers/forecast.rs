use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use tracing::{error, instrument};

use crate::schemas::{ApiResponse, AppState, ForecastRequest, ForecastResponse, RegionForecast};

/// Resolve the consumption for every configured region in one year.
///
/// Years present in the historical tables are served verbatim; years
/// beyond a region's history are projected with the trend model; anything
/// else resolves to null for that region.
#[utoipa::path(
    post,
    path = "/api/v1/forecast",
    tag = "forecast",
    request_body = ForecastRequest,
    responses(
        (status = 200, description = "Year resolved for all regions", body = ApiResponse<ForecastResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn resolve_forecast(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<ForecastRequest>>,
) -> Result<Json<ApiResponse<ForecastResponse>>, StatusCode> {
    // Check the in-process cache first
    if let Some(response) = state.cache.get(&request.year).await {
        return Ok(Json(ApiResponse {
            data: response,
            message: "Forecast retrieved from cache".to_string(),
            success: true,
        }));
    }

    let resolver = compute::default_resolver(state.dataset.clone(), state.db.clone());

    let resolution = match resolver.resolve_year(request.year).await {
        Ok(resolution) => resolution,
        Err(err) => {
            error!(year = request.year, error = %err, "Failed to resolve forecast year");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let response: ForecastResponse = resolution
        .into_iter()
        .map(|(region, resolved)| {
            let entry = resolved.map(|value| RegionForecast {
                value: value.value,
                source: value.provenance.as_str().to_string(),
            });
            (region.as_str().to_string(), entry)
        })
        .collect();

    // Cache the result
    state.cache.insert(request.year, response.clone()).await;

    Ok(Json(ApiResponse {
        data: response,
        message: "Forecast resolved successfully".to_string(),
        success: true,
    }))
}
