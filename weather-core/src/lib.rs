//! Core library for the city-code weather facade.
//!
//! This crate defines:
//! - The fixed city-code directory
//! - Provider payload models and the forecast normalizer
//! - The upstream source abstraction and its CWA HTTP client
//! - The query service tying them together, plus configuration
//!
//! It is used by `weather-server`, but can also be reused by other binaries.

pub mod city;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod service;

pub use city::{CityCode, CityEntry, UnknownCity};
pub use config::Config;
pub use error::ForecastError;
pub use model::{ForecastInterval, ForecastPayload, WeatherResult};
pub use provider::{ForecastSource, source_from_config};
pub use service::WeatherService;
