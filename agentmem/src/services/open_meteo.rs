use serde_json::Value;

use super::{Location, ServiceError};

pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Hourly variables requested from the forecast API.
pub const HOURLY_VARIABLES: &str =
    "apparent_temperature,relativehumidity_2m,precipitation_probability,windspeed_10m,uv_index";

/// Client for the Open-Meteo forecast API.
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoClient {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: FORECAST_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Hourly forecast for `location` as returned by the API.
    pub async fn fetch_hourly_forecast(&self, location: &Location) -> Result<Value, ServiceError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&forecast_query(location))
            .send()
            .await?
            .error_for_status()?;
        response
            .json::<Value>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

fn forecast_query(location: &Location) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", location.latitude.to_string()),
        ("longitude", location.longitude.to_string()),
        ("hourly", HOURLY_VARIABLES.to_string()),
        (
            "timezone",
            location.timezone.clone().unwrap_or_else(|| "auto".to_string()),
        ),
    ]
}
