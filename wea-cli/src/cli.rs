use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::Password;
use tokio_util::sync::CancellationToken;
use wea_core::{
    Aggregator, Config, LocationWeatherSummary, ProviderError, SummaryService,
    provider::providers_from_config,
};

use crate::{logging, server};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wea", version, about = "Current weather and a short description for any city")]
pub struct Cli {
    /// Path to the config file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Serve `GET /city-information?name=<city>` over HTTP.
    Serve {
        /// Listen address, e.g. "127.0.0.1:8080". Overrides config and WE_SERVE_AT.
        #[arg(long)]
        addr: Option<String>,
    },

    /// Look up a single location and print the result.
    Show {
        /// Location name, e.g. "Tallinn".
        name: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(self.config),
            Command::Serve { addr } => {
                let config = load_config(self.config.as_deref())?;
                logging::init(&config.logging.level);

                let aggregator = Arc::new(build_aggregator(&config)?);
                let addr = addr.unwrap_or_else(|| config.serve_at.clone());

                let shutdown = CancellationToken::new();
                tokio::spawn(cancel_on_ctrl_c(shutdown.clone()));

                server::run(&addr, aggregator, shutdown).await
            }
            Command::Show { name } => {
                let config = load_config(self.config.as_deref())?;
                logging::init(&config.logging.level);

                let aggregator = build_aggregator(&config)?;
                let shutdown = CancellationToken::new();
                tokio::spawn(cancel_on_ctrl_c(shutdown.clone()));

                let summary = show(&aggregator, &shutdown, &name).await?;
                print!("{}", render(&name, &summary));
                Ok(())
            }
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let mut config = Config::load(path)?;
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

fn build_aggregator(config: &Config) -> anyhow::Result<Aggregator> {
    let providers = providers_from_config(config)?;
    Ok(Aggregator::from_providers(providers))
}

fn configure(path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = Config::load(path.as_deref())?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_openweather_api_key(api_key.to_string());
    let written = config.save(path.as_deref())?;
    println!("Saved configuration to {}", written.display());
    Ok(())
}

async fn show(
    summaries: &dyn SummaryService,
    cancel: &CancellationToken,
    name: &str,
) -> anyhow::Result<LocationWeatherSummary> {
    summaries
        .fetch_summary(cancel, name)
        .await
        .map_err(|err| match err {
            ProviderError::Canceled { .. } => anyhow::anyhow!("Lookup for '{name}' was interrupted"),
            other => anyhow::Error::from(other).context(format!("Lookup for '{name}' failed")),
        })
}

fn render(name: &str, summary: &LocationWeatherSummary) -> String {
    format!(
        "{name}: {:.2} °C, {}\n\n{}\n",
        summary.temperature_celsius, summary.weather_description, summary.location_description
    )
}

async fn cancel_on_ctrl_c(token: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("interrupt received, shutting down");
        token.cancel();
    }
}
