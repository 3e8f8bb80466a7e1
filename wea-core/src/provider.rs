use crate::{Config, ProviderError, WeatherSituation};
use anyhow::Context;
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use tokio_util::sync::CancellationToken;

pub mod http;
pub mod openweather;
pub mod wikipedia;

#[cfg(test)]
pub(crate) mod test_support;

pub use openweather::OpenWeatherProvider;
pub use wikipedia::WikipediaProvider;

/// Source of current weather conditions.
///
/// Implementations must return [`ProviderError::Canceled`] promptly once
/// `cancel` fires.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_situation(
        &self,
        cancel: &CancellationToken,
        location_name: &str,
    ) -> Result<WeatherSituation, ProviderError>;
}

/// Source of short encyclopedia descriptions.
///
/// Implementations must return [`ProviderError::Canceled`] promptly once
/// `cancel` fires.
#[async_trait]
pub trait EncyclopediaProvider: Send + Sync + Debug {
    async fn summarize(
        &self,
        cancel: &CancellationToken,
        topic: &str,
    ) -> Result<String, ProviderError>;
}

/// Both providers built from config, sharing one HTTP client.
#[derive(Debug, Clone)]
pub struct Providers {
    pub weather: Arc<dyn WeatherProvider>,
    pub encyclopedia: Arc<dyn EncyclopediaProvider>,
}

/// Construct the OpenWeather and Wikipedia clients from config.
pub fn providers_from_config(config: &Config) -> anyhow::Result<Providers> {
    let api_key = config.openweather_api_key()?;
    let http = http::build_client(&config.http).context("Failed to build HTTP client")?;

    let weather = OpenWeatherProvider::with_base_url(
        api_key.to_owned(),
        config.openweather.base_url.clone(),
        http.clone(),
    );
    let encyclopedia = WikipediaProvider::with_base_url(config.wikipedia.base_url.clone(), http);

    Ok(Providers {
        weather: Arc::new(weather),
        encyclopedia: Arc::new(encyclopedia),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn providers_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = providers_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
    }

    #[test]
    fn providers_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_openweather_api_key("KEY".to_string());

        let providers = providers_from_config(&cfg);
        assert!(providers.is_ok());
    }
}
