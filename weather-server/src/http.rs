use axum::{
    Json, Router,
    extract::{Path, State},
    http::Uri,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use weather_core::{CityEntry, WeatherResult, WeatherService};

use crate::response::{self, ApiError, Success};

/// Build the application router around a shared service.
pub fn router(service: WeatherService) -> Router {
    Router::new()
        .route("/", get(list_cities))
        .route("/api/cities", get(list_cities))
        .route("/api/weather/:city_code", get(get_weather))
        .route("/health", get(health_check))
        .fallback(fallback)
        .layer(CatchPanicLayer::custom(response::internal_error))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

async fn get_weather(
    State(service): State<WeatherService>,
    Path(city_code): Path<String>,
) -> Result<Json<Success<WeatherResult>>, ApiError> {
    let result = service.query(&city_code).await?;
    Ok(Success::new(result))
}

#[derive(Debug, Serialize)]
struct CityListing {
    cities: Vec<CityEntry>,
}

async fn list_cities(State(service): State<WeatherService>) -> Json<Success<CityListing>> {
    Success::new(CityListing { cities: service.cities() })
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn fallback(uri: Uri) -> Response {
    response::not_found(format!("No route for {}", uri.path()))
}
