//! Binary crate for the `weather-server` HTTP facade.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and bootstrapping logging
//! - Routing inbound requests to `weather_core::WeatherService`
//! - Mapping results and failures to the JSON response contract

use clap::Parser;

mod cli;
mod http;
mod response;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
