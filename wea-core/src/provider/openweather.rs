use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{Provider, ProviderError},
    model::WeatherSituation,
    provider::http::{HttpError, get_json},
    units::Kelvin,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const CONTEXT: &str = "get current weather";

/// OpenWeather current-conditions client.
///
/// No `units` parameter is sent, so temperatures arrive in Kelvin.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_base_url(api_key: String, base_url: String, http: Client) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(thiserror::Error, Debug)]
#[error("response contained no weather entries")]
struct EmptyWeather;

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_situation(
        &self,
        cancel: &CancellationToken,
        location_name: &str,
    ) -> Result<WeatherSituation, ProviderError> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let parsed: OwCurrentResponse = get_json(
            &self.http,
            cancel,
            &url,
            &[("q", location_name), ("appid", self.api_key.as_str())],
        )
        .await
        .map_err(classify)?;

        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| ProviderError::other(Provider::Weather, CONTEXT, EmptyWeather))?;

        Ok(WeatherSituation {
            temperature: Kelvin(parsed.main.temp),
            description,
        })
    }
}

fn classify(err: HttpError) -> ProviderError {
    match err {
        HttpError::Canceled => ProviderError::Canceled {
            provider: Provider::Weather,
        },
        HttpError::Status {
            status: StatusCode::NOT_FOUND,
            ..
        } => ProviderError::NotFound {
            provider: Provider::Weather,
        },
        other => ProviderError::other(Provider::Weather, CONTEXT, other),
    }
}
