use serde::{Deserialize, Serialize};

use crate::units::Kelvin;

/// Current weather at a location, as reported by a weather provider.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSituation {
    pub temperature: Kelvin,
    pub description: String,
}

/// Current weather joined with an encyclopedia description of the location.
///
/// Only built when both lookups succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationWeatherSummary {
    pub temperature_celsius: f64,
    pub weather_description: String,
    pub location_description: String,
}
