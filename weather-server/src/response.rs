use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, error};
use weather_core::ForecastError;

/// Success envelope: `{ "success": true, "data": ... }`.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> Success<T> {
    pub fn new(data: T) -> Json<Self> {
        Json(Self { success: true, data })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_codes: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl ErrorBody {
    pub fn new(error: &'static str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error,
            message: message.into(),
            retryable: false,
            valid_codes: None,
            city: None,
        }
    }
}

/// Request-boundary wrapper turning a [`ForecastError`] into the JSON failure
/// contract.
#[derive(Debug)]
pub struct ApiError(pub ForecastError);

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = StatusCode::from_u16(err.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %err, "forecast request failed");
        } else {
            debug!(status = status.as_u16(), error = %err, "forecast request rejected");
        }

        let mut body = ErrorBody::new(err.category(), err.to_string());
        body.retryable = err.retryable();
        match err {
            ForecastError::InvalidCityCode { valid_codes, .. } => {
                body.valid_codes = Some(valid_codes);
            }
            ForecastError::NoDataForLocation { city_name } => body.city = Some(city_name),
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

pub fn not_found(message: impl Into<String>) -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not Found", message))).into_response()
}

/// Last-resort handler for panics inside a request.
pub fn internal_error(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(detail, "request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new("Internal Server Error", "An unexpected error occurred")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_code_body_lists_valid_codes() {
        let response = ApiError(ForecastError::InvalidCityCode {
            code: "atlantis".into(),
            valid_codes: vec!["taipei"],
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unreachable_upstream_is_flagged_retryable() {
        let response =
            ApiError(ForecastError::UpstreamUnreachable("request timed out after 10s".into()))
                .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Upstream unreachable");
        assert_eq!(body["retryable"], true);
    }

    #[tokio::test]
    async fn client_and_config_errors_are_not_retryable() {
        let invalid = ApiError(ForecastError::InvalidCityCode {
            code: "atlantis".into(),
            valid_codes: vec!["taipei"],
        })
        .into_response();
        assert_eq!(body_json(invalid).await["retryable"], false);

        let misconfigured = ApiError(ForecastError::ServerMisconfigured).into_response();
        assert_eq!(body_json(misconfigured).await["retryable"], false);
    }

    #[test]
    fn upstream_status_is_mirrored() {
        let response = ApiError(ForecastError::UpstreamError {
            status: 429,
            message: "Too Many Requests".into(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn error_body_omits_empty_extras() {
        let value = serde_json::to_value(ErrorBody::new("Not Found", "nope")).unwrap();
        assert_eq!(value["success"], false);
        assert!(value.get("validCodes").is_none());
        assert!(value.get("city").is_none());
    }

    #[test]
    fn panic_maps_to_generic_500() {
        let response = internal_error(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
