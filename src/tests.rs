#[cfg(test)]
mod integration_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use crate::schemas::{ApiResponse, ForecastRequest, ForecastResponse, HealthResponse};
    use crate::test_utils::test_utils::setup_test_app;

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: HealthResponse = response.json();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.database, "connected");
    }

    #[tokio::test]
    async fn test_forecast_historical_year() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/forecast")
            .json(&ForecastRequest { year: 2020 })
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ForecastResponse> = response.json();
        assert!(body.success);

        let london = body.data["UKI"].as_ref().unwrap();
        assert_eq!(london.value, 38500.0);
        assert_eq!(london.source, "historical");

        // A single observation is still a valid historical hit.
        let scotland = body.data["UKM"].as_ref().unwrap();
        assert_eq!(scotland.value, 24000.0);
        assert_eq!(scotland.source, "historical");
    }

    #[tokio::test]
    async fn test_forecast_future_year() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/forecast")
            .json(&ForecastRequest { year: 2025 })
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ForecastResponse> = response.json();

        // London grows linearly by 500 GWh/year through 2021.
        let london = body.data["UKI"].as_ref().unwrap();
        assert_eq!(london.source, "forecast");
        assert!((london.value - 41000.0).abs() < 1.0);

        // Wales is flat; the projection stays at the level.
        let wales = body.data["UKL"].as_ref().unwrap();
        assert_eq!(wales.source, "forecast");
        assert!(wales.value >= 0.0);

        // Scotland has a single observation; the model cannot fit and
        // the region resolves to null without failing the request.
        assert!(body.data["UKM"].is_none());
    }

    #[tokio::test]
    async fn test_forecast_gap_year_is_null() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/forecast")
            .json(&ForecastRequest { year: 2021 })
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ForecastResponse> = response.json();

        // 2021 sits inside Wales' range but was not observed.
        assert!(body.data["UKL"].is_none());
        // London did observe 2021.
        let london = body.data["UKI"].as_ref().unwrap();
        assert_eq!(london.value, 39000.0);
        assert_eq!(london.source, "historical");
    }

    #[tokio::test]
    async fn test_forecast_covers_exactly_the_region_set() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/forecast")
            .json(&ForecastRequest { year: 2020 })
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ForecastResponse> = response.json();

        // All eleven configured regions and nothing else.
        assert_eq!(body.data.len(), 11);
        assert!(!body.data.contains_key("UKX"));
        // Regions without any history are present but null.
        assert!(body.data["UKC"].is_none());
    }

    #[tokio::test]
    async fn test_forecast_is_idempotent() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let first: ApiResponse<ForecastResponse> = server
            .post("/api/v1/forecast")
            .json(&ForecastRequest { year: 2030 })
            .await
            .json();
        let second: ApiResponse<ForecastResponse> = server
            .post("/api/v1/forecast")
            .json(&ForecastRequest { year: 2030 })
            .await
            .json();

        assert_eq!(first.data, second.data);
    }

    #[tokio::test]
    async fn test_forecast_rejects_malformed_body() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/forecast")
            .json(&serde_json::json!({ "yr": 2020 }))
            .await;

        assert!(response.status_code().is_client_error());
    }

    #[tokio::test]
    async fn test_forecast_rejects_out_of_range_year() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/forecast")
            .json(&ForecastRequest { year: 10 })
            .await;

        assert!(response.status_code().is_client_error());
    }
}
