use crate::{Config, error::ForecastError, model::ForecastPayload, provider::cwa::CwaClient};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod cwa;

/// Upstream forecast source. One call per query, no retries.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    /// Fetch the raw forecast payload for a provider location name.
    async fn fetch_forecast(
        &self,
        api_key: &str,
        location_name: &str,
    ) -> Result<ForecastPayload, ForecastError>;
}

/// Construct the HTTP-backed source from config.
pub fn source_from_config(config: &Config) -> anyhow::Result<Arc<dyn ForecastSource>> {
    let client = CwaClient::new(&config.base_url, config.timeout())?;
    Ok(Arc::new(client))
}
