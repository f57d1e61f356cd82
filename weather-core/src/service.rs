use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    Config,
    city::{self, CityCode, CityEntry},
    error::ForecastError,
    model::WeatherResult,
    normalize::normalize,
    provider::ForecastSource,
};

/// Answers forecast queries by city code.
///
/// Holds only read-only state, so one instance is shared across all requests.
#[derive(Debug, Clone)]
pub struct WeatherService {
    config: Arc<Config>,
    source: Arc<dyn ForecastSource>,
}

impl WeatherService {
    pub fn new(config: Arc<Config>, source: Arc<dyn ForecastSource>) -> Self {
        Self { config, source }
    }

    /// Resolve, fetch and normalize the forecast for `code`.
    #[instrument(skip(self))]
    pub async fn query(&self, code: &str) -> Result<WeatherResult, ForecastError> {
        let city_name = city::resolve(code).map_err(|_| {
            debug!("rejecting unknown city code");
            ForecastError::InvalidCityCode {
                code: code.to_string(),
                valid_codes: city::valid_codes(),
            }
        })?;

        let api_key = self.config.api_key().ok_or_else(|| {
            warn!("{} is not configured; refusing to call upstream", crate::config::API_KEY_ENV);
            ForecastError::ServerMisconfigured
        })?;
        let payload = self.source.fetch_forecast(api_key, city_name).await?;

        // Only the first location is used; the query names exactly one.
        let records = payload.records;
        let location = records.location.first().ok_or_else(|| {
            ForecastError::NoDataForLocation { city_name: city_name.to_string() }
        })?;
        let forecasts = normalize(location)?;

        info!(city = city_name, intervals = forecasts.len(), "forecast ready");

        Ok(WeatherResult {
            city: location.location_name.clone(),
            city_code: code.to_string(),
            update_time: records.dataset_description,
            forecasts,
        })
    }

    /// Discovery listing of every supported city.
    pub fn cities(&self) -> Vec<CityEntry> {
        CityCode::all().iter().copied().map(CityEntry::from).collect()
    }
}
