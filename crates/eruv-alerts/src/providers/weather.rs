//! OpenWeatherMap current conditions.

use serde_json::Value;
use tracing::debug;

use super::{ProviderFuture, WeatherProvider, fetch_json};

pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Client for the OpenWeatherMap current-weather endpoint (US zip codes).
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: OPENWEATHER_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl WeatherProvider for OpenWeatherClient {
    fn current_weather(&self, zip_code: &str) -> ProviderFuture<'_, Value> {
        let zip = format!("{zip_code},us");
        Box::pin(async move {
            debug!(zip = %zip, "Fetching current weather");
            let request = self
                .client
                .get(&self.base_url)
                .query(&[("zip", zip.as_str()), ("appid", self.api_key.as_str())]);
            fetch_json("openweathermap", request).await
        })
    }
}
