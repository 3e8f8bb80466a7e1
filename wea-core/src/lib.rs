//! Core library for the `wea` service.
//!
//! This crate defines:
//! - Weather and encyclopedia provider abstractions and their HTTP clients
//! - The aggregator joining both lookups into one summary
//! - Temperature conversion, shared models and the provider error taxonomy
//! - Configuration handling
//!
//! It is used by `wea-cli`, but can also be embedded in other services.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod units;

pub use aggregator::{Aggregator, SummaryService};
pub use config::Config;
pub use error::{ErrorKind, Provider, ProviderError};
pub use model::{LocationWeatherSummary, WeatherSituation};
pub use provider::{EncyclopediaProvider, WeatherProvider};
pub use units::Kelvin;
