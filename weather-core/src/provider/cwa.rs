use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{error::ForecastError, model::ForecastPayload};

use super::ForecastSource;

/// 36-hour county/city forecast dataset.
pub const DATASET_PATH: &str = "/api/v1/rest/datastore/F-C0032-001";

/// Client for the Central Weather Administration open-data API.
#[derive(Debug, Clone)]
pub struct CwaClient {
    endpoint: String,
    timeout: Duration,
    http: Client,
}

impl CwaClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for the CWA API")?;

        Ok(Self {
            endpoint: format!("{}{DATASET_PATH}", base_url.trim_end_matches('/')),
            timeout,
            http,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CwaErrorBody {
    message: Option<String>,
}

/// Pull the provider's own `message` out of an error body, or fall back to the
/// raw text.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<CwaErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl ForecastSource for CwaClient {
    async fn fetch_forecast(
        &self,
        api_key: &str,
        location_name: &str,
    ) -> Result<ForecastPayload, ForecastError> {
        debug!(endpoint = %self.endpoint, location_name, "requesting CWA forecast");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("Authorization", api_key), ("locationName", location_name)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!("CWA request timed out after {}s", self.timeout.as_secs());
                    ForecastError::UpstreamUnreachable(format!(
                        "request timed out after {}s",
                        self.timeout.as_secs()
                    ))
                } else {
                    warn!(error = %e, "CWA request failed");
                    ForecastError::UpstreamUnreachable(e.without_url().to_string())
                }
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            ForecastError::UpstreamUnreachable(format!(
                "failed to read response body: {}",
                e.without_url()
            ))
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "CWA responded with an error");
            return Err(ForecastError::UpstreamError {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            ForecastError::MalformedUpstreamData(format!("failed to parse CWA response: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const BODY: &str = r#"{
        "success": "true",
        "records": {
            "datasetDescription": "三十六小時天氣預報",
            "location": [{
                "locationName": "臺北市",
                "weatherElement": [{
                    "elementName": "Wx",
                    "time": [{
                        "startTime": "2024-05-01 06:00:00",
                        "endTime": "2024-05-01 18:00:00",
                        "parameter": { "parameterName": "多雲", "parameterValue": "4" }
                    }]
                }]
            }]
        }
    }"#;

    fn client(url: &str) -> CwaClient {
        CwaClient::new(url, Duration::from_secs(5)).expect("client should build")
    }

    #[test]
    fn endpoint_joins_base_url_and_dataset() {
        let c = client("https://opendata.cwa.gov.tw/");
        assert_eq!(c.endpoint, "https://opendata.cwa.gov.tw/api/v1/rest/datastore/F-C0032-001");
    }

    #[tokio::test]
    async fn sends_key_and_location_as_query_params() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", DATASET_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("Authorization".into(), "CWA-KEY".into()),
                Matcher::UrlEncoded("locationName".into(), "臺北市".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .expect(1)
            .create_async()
            .await;

        let payload = client(&server.url())
            .fetch_forecast("CWA-KEY", "臺北市")
            .await
            .expect("fetch should succeed");

        mock.assert_async().await;
        assert_eq!(payload.records.dataset_description, "三十六小時天氣預報");
        assert_eq!(payload.records.location.len(), 1);
    }

    #[tokio::test]
    async fn non_success_status_carries_upstream_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", DATASET_PATH)
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"success":"false","message":"Authorization is invalid"}"#)
            .create_async()
            .await;

        let err = client(&server.url()).fetch_forecast("BAD", "臺北市").await.unwrap_err();

        assert_eq!(
            err,
            ForecastError::UpstreamError {
                status: 401,
                message: "Authorization is invalid".into()
            }
        );
    }

    #[tokio::test]
    async fn non_json_error_body_is_passed_verbatim() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", DATASET_PATH)
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("Service Unavailable")
            .create_async()
            .await;

        let err = client(&server.url()).fetch_forecast("KEY", "臺北市").await.unwrap_err();

        assert_eq!(err.http_status(), 503);
        assert_eq!(err.to_string(), "Service Unavailable");
    }

    #[tokio::test]
    async fn undecodable_body_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", DATASET_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client(&server.url()).fetch_forecast("KEY", "臺北市").await.unwrap_err();
        assert!(matches!(err, ForecastError::MalformedUpstreamData(_)));
    }

    #[tokio::test]
    async fn connection_failure_is_unreachable() {
        let err = client("http://127.0.0.1:1").fetch_forecast("KEY", "臺北市").await.unwrap_err();
        assert!(matches!(err, ForecastError::UpstreamUnreachable(_)));
    }

    #[tokio::test]
    async fn silent_upstream_times_out_as_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hold = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let slow = CwaClient::new(&format!("http://{addr}"), Duration::from_secs(1)).unwrap();
        let err = slow.fetch_forecast("KEY", "臺北市").await.unwrap_err();
        hold.abort();

        assert_eq!(err, ForecastError::UpstreamUnreachable("request timed out after 1s".into()));
        assert_eq!(err.http_status(), 500);
        assert!(err.retryable());
    }
}
