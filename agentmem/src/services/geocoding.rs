use serde::{Deserialize, Serialize};

use super::ServiceError;

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// One geocoding result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone name; the forecast is requested in this timezone.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<Location>>,
}

/// Client for the Open-Meteo geocoding API.
///
/// **Interaction**: Used by `WeatherToolSource` to turn a city name into a `Location`.
pub struct GeocodingClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for GeocodingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeocodingClient {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: GEOCODING_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Most relevant match for `city`.
    pub async fn fetch_coordinates(&self, city: &str) -> Result<Location, ServiceError> {
        let body = self
            .client
            .get(&self.base_url)
            .query(&[
                ("name", city),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        first_location(city, &body)
    }
}

/// First result of a search response body; no results is `NotFound`.
pub(crate) fn first_location(city: &str, body: &str) -> Result<Location, ServiceError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))?;
    response
        .results
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| ServiceError::NotFound {
            city: city.to_string(),
        })
}
