use async_trait::async_trait;
use serde_json::{json, Value};

use super::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};
use crate::services::{GeocodingClient, OpenMeteoClient, ServiceError};

/// Tool name for the weather lookup.
pub const TOOL_GET_WEATHER: &str = "get_weather";

/// Tool source exposing `get_weather { city }`: geocodes the city, then fetches its
/// hourly forecast.
pub struct WeatherToolSource {
    geocoding: GeocodingClient,
    forecast: OpenMeteoClient,
}

impl Default for WeatherToolSource {
    fn default() -> Self {
        Self::new(GeocodingClient::new(), OpenMeteoClient::new())
    }
}

impl WeatherToolSource {
    pub fn new(geocoding: GeocodingClient, forecast: OpenMeteoClient) -> Self {
        Self {
            geocoding,
            forecast,
        }
    }

    fn spec() -> ToolSpec {
        ToolSpec {
            name: TOOL_GET_WEATHER.to_string(),
            description: Some(
                "Get the hourly weather forecast (feels-like temperature, humidity, \
                 precipitation probability, wind speed, UV index) for a city."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "City name, e.g. \"Oslo\"."
                    }
                },
                "required": ["city"]
            }),
        }
    }
}

fn to_tool_error(e: ServiceError) -> ToolSourceError {
    match e {
        ServiceError::NotFound { .. } => ToolSourceError::InvalidInput(e.to_string()),
        other => ToolSourceError::CallFailed(other.to_string()),
    }
}

#[async_trait]
impl ToolSource for WeatherToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(vec![Self::spec()])
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        if name != TOOL_GET_WEATHER {
            return Err(ToolSourceError::NotFound(name.to_string()));
        }
        let city = arguments
            .get("city")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing city".to_string()))?;

        let location = self
            .geocoding
            .fetch_coordinates(city)
            .await
            .map_err(to_tool_error)?;
        let forecast = self
            .forecast
            .fetch_hourly_forecast(&location)
            .await
            .map_err(to_tool_error)?;

        let text = json!({
            "location": location,
            "hourly_units": forecast.get("hourly_units").cloned().unwrap_or(Value::Null),
            "hourly": forecast.get("hourly").cloned().unwrap_or(Value::Null),
        })
        .to_string();
        Ok(ToolCallContent { text })
    }
}
