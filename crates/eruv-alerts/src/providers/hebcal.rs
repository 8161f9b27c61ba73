//! hebcal.com Shabbat times.

use serde_json::Value;
use tracing::debug;

use super::{LiturgicalProvider, ProviderFuture, fetch_json};

pub const HEBCAL_URL: &str = "https://www.hebcal.com/shabbat/";

/// Havdalah offset in minutes after sundown requested from hebcal.
pub const HAVDALAH_MINUTES: u32 = 50;

/// Client for the hebcal Shabbat times endpoint.
#[derive(Debug, Clone)]
pub struct HebcalClient {
    client: reqwest::Client,
    base_url: String,
}

impl HebcalClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, HEBCAL_URL)
    }

    /// Point the client at a different host (e.g. a local test server).
    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Query parameters for a zip code: JSON output, Havdalah at
    /// [`HAVDALAH_MINUTES`], Ashkenazi transliterations.
    pub fn query(zip_code: &str) -> [(&'static str, String); 4] {
        [
            ("cfg", "json".to_string()),
            ("zip", zip_code.to_string()),
            ("m", HAVDALAH_MINUTES.to_string()),
            ("a", "on".to_string()),
        ]
    }
}

impl LiturgicalProvider for HebcalClient {
    fn shabbat_times(&self, zip_code: &str) -> ProviderFuture<'_, Value> {
        let query = Self::query(zip_code);
        Box::pin(async move {
            debug!(zip = %query[1].1, "Fetching Shabbat times");
            let request = self.client.get(&self.base_url).query(&query);
            fetch_json("hebcal", request).await
        })
    }
}
