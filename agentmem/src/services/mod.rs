//! REST clients for the Open-Meteo geocoding and forecast APIs (feature `services`).
//!
//! `WeatherToolSource` combines both into the `get_weather` tool.

mod error;
mod geocoding;
mod open_meteo;

pub use error::ServiceError;
pub use geocoding::{GeocodingClient, Location, GEOCODING_URL};
pub use open_meteo::{OpenMeteoClient, FORECAST_URL, HOURLY_VARIABLES};
