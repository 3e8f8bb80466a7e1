//! Fan-out to the weather and encyclopedia providers and join the results.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{Provider, ProviderError},
    model::LocationWeatherSummary,
    provider::{EncyclopediaProvider, Providers, WeatherProvider},
};

/// Anything able to produce a [`LocationWeatherSummary`] for a location name.
#[async_trait]
pub trait SummaryService: Send + Sync {
    async fn fetch_summary(
        &self,
        cancel: &CancellationToken,
        location_name: &str,
    ) -> Result<LocationWeatherSummary, ProviderError>;
}

/// Runs both lookups for a location concurrently and merges them.
///
/// Holds no per-request state; one instance may serve any number of
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct Aggregator {
    weather: Arc<dyn WeatherProvider>,
    encyclopedia: Arc<dyn EncyclopediaProvider>,
}

impl Aggregator {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        encyclopedia: Arc<dyn EncyclopediaProvider>,
    ) -> Self {
        Self {
            weather,
            encyclopedia,
        }
    }

    pub fn from_providers(providers: Providers) -> Self {
        Self::new(providers.weather, providers.encyclopedia)
    }

    /// Fetches the current weather and the encyclopedia extract for
    /// `location_name` and joins them.
    ///
    /// Both lookups always run to completion before any result is examined.
    /// A weather failure is reported in preference to an encyclopedia
    /// failure. Provider errors are returned as-is, so a canceled `cancel`
    /// surfaces as [`ProviderError::Canceled`].
    pub async fn fetch_summary(
        &self,
        cancel: &CancellationToken,
        location_name: &str,
    ) -> Result<LocationWeatherSummary, ProviderError> {
        let weather_task = {
            let provider = Arc::clone(&self.weather);
            let cancel = cancel.clone();
            let name = location_name.to_owned();
            tokio::spawn(async move { provider.current_situation(&cancel, &name).await })
        };

        let extract_task = {
            let provider = Arc::clone(&self.encyclopedia);
            let cancel = cancel.clone();
            let name = location_name.to_owned();
            tokio::spawn(async move { provider.summarize(&cancel, &name).await })
        };

        let (weather, extract) = tokio::join!(weather_task, extract_task);
        let weather = flatten(Provider::Weather, weather);
        let extract = flatten(Provider::Encyclopedia, extract);

        let situation = weather?;
        let location_description = extract?;

        Ok(LocationWeatherSummary {
            temperature_celsius: situation.temperature.celsius(),
            weather_description: situation.description,
            location_description,
        })
    }
}

#[async_trait]
impl SummaryService for Aggregator {
    async fn fetch_summary(
        &self,
        cancel: &CancellationToken,
        location_name: &str,
    ) -> Result<LocationWeatherSummary, ProviderError> {
        Aggregator::fetch_summary(self, cancel, location_name).await
    }
}

fn flatten<T>(
    provider: Provider,
    joined: Result<Result<T, ProviderError>, JoinError>,
) -> Result<T, ProviderError> {
    match joined {
        Ok(result) => result,
        // Only happens when the runtime is shutting down.
        Err(err) if err.is_cancelled() => Err(ProviderError::Canceled { provider }),
        Err(err) => Err(ProviderError::other(provider, join_context(provider), err)),
    }
}

fn join_context(provider: Provider) -> &'static str {
    match provider {
        Provider::Weather => "join weather task",
        Provider::Encyclopedia => "join encyclopedia task",
    }
}
