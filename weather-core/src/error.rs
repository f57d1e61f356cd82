use thiserror::Error;

/// Every way a forecast query can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    #[error("Unknown city code '{code}'. Valid codes: {}", .valid_codes.join(", "))]
    InvalidCityCode { code: String, valid_codes: Vec<&'static str> },

    #[error("Upstream API key is not configured")]
    ServerMisconfigured,

    #[error("Failed to reach the weather provider: {0}")]
    UpstreamUnreachable(String),

    #[error("{message}")]
    UpstreamError { status: u16, message: String },

    #[error("No forecast data found for {city_name}")]
    NoDataForLocation { city_name: String },

    #[error("Malformed upstream data: {0}")]
    MalformedUpstreamData(String),
}

impl ForecastError {
    /// HTTP status a caller should see for this failure.
    pub fn http_status(&self) -> u16 {
        match self {
            ForecastError::InvalidCityCode { .. } => 400,
            ForecastError::NoDataForLocation { .. } => 404,
            ForecastError::UpstreamError { status, .. } => *status,
            ForecastError::ServerMisconfigured
            | ForecastError::UpstreamUnreachable(_)
            | ForecastError::MalformedUpstreamData(_) => 500,
        }
    }

    /// Short category label used in the JSON failure body.
    pub fn category(&self) -> &'static str {
        match self {
            ForecastError::InvalidCityCode { .. } => "Invalid city code",
            ForecastError::ServerMisconfigured => "Server misconfigured",
            ForecastError::UpstreamUnreachable(_) => "Upstream unreachable",
            ForecastError::UpstreamError { .. } => "Upstream error",
            ForecastError::NoDataForLocation { .. } => "No data found",
            ForecastError::MalformedUpstreamData(_) => "Malformed upstream data",
        }
    }

    /// Whether a client may reasonably retry the same request later.
    pub fn retryable(&self) -> bool {
        match self {
            ForecastError::UpstreamUnreachable(_) => true,
            ForecastError::UpstreamError { status, .. } => {
                *status == 429 || (500..=599).contains(status)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mirrors_category() {
        let invalid = ForecastError::InvalidCityCode { code: "x".into(), valid_codes: vec![] };
        assert_eq!(invalid.http_status(), 400);
        assert_eq!(ForecastError::ServerMisconfigured.http_status(), 500);
        assert_eq!(ForecastError::UpstreamUnreachable("timeout".into()).http_status(), 500);
        assert_eq!(ForecastError::MalformedUpstreamData("bad".into()).http_status(), 500);
        assert_eq!(
            ForecastError::NoDataForLocation { city_name: "臺北市".into() }.http_status(),
            404
        );
    }

    #[test]
    fn upstream_error_passes_status_and_message_through() {
        let err = ForecastError::UpstreamError { status: 401, message: "Unauthorized".into() };
        assert_eq!(err.http_status(), 401);
        assert_eq!(err.to_string(), "Unauthorized");
        assert!(!err.retryable());
    }

    #[test]
    fn invalid_code_message_lists_valid_codes() {
        let err = ForecastError::InvalidCityCode {
            code: "atlantis".into(),
            valid_codes: vec!["taipei", "tainan"],
        };
        assert_eq!(err.to_string(), "Unknown city code 'atlantis'. Valid codes: taipei, tainan");
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(ForecastError::UpstreamUnreachable("reset".into()).retryable());
        assert!(ForecastError::UpstreamError { status: 503, message: String::new() }.retryable());
        assert!(!ForecastError::ServerMisconfigured.retryable());
        assert!(!ForecastError::MalformedUpstreamData("x".into()).retryable());
    }
}
