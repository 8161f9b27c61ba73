//! Upstream collaborators: liturgical times, weather, and the SMS transport.
//!
//! Each collaborator is a small object-safe trait so the runner can be
//! driven by in-memory fakes in tests:
//!
//! - [`LiturgicalProvider`]: Shabbos/holiday times for a zip code, as an
//!   untyped JSON tree ([`hebcal::HebcalClient`]).
//! - [`WeatherProvider`]: current conditions for a zip code, as an untyped
//!   JSON tree ([`weather::OpenWeatherClient`]).
//! - [`SmsSink`]: delivers one body to one number ([`twilio::TwilioSink`]).
//!
//! None of them retry. A failed call aborts the run.

pub mod hebcal;
pub mod twilio;
pub mod weather;

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{AlertError, Result};

pub use hebcal::HebcalClient;
pub use twilio::TwilioSink;
pub use weather::OpenWeatherClient;

/// Boxed future returned by collaborator calls.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Source of candle-lighting, Havdalah, and Parsha titles.
pub trait LiturgicalProvider: Send + Sync {
    fn shabbat_times(&self, zip_code: &str) -> ProviderFuture<'_, Value>;
}

/// Source of current weather conditions.
pub trait WeatherProvider: Send + Sync {
    fn current_weather(&self, zip_code: &str) -> ProviderFuture<'_, Value>;
}

/// Outbound SMS transport.
pub trait SmsSink: Send + Sync {
    /// Send `body` to the E.164 number `to`.
    fn send(&self, to: &str, body: &str) -> ProviderFuture<'_, DeliveryReceipt>;
}

/// Acknowledgement returned by the SMS transport.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeliveryReceipt {
    /// Transport-assigned message id.
    pub sid: String,
    #[serde(default)]
    pub status: String,
}

/// Build the shared HTTP client for the provider lookups.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("eruv-alerts/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Send `request`, require a 2xx status, and return the raw body.
pub(crate) async fn send_checked(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<String> {
    let start = Instant::now();
    let resp = request.send().await?;
    let status = resp.status();
    let text = resp.text().await?;

    debug!(
        "{service} response: HTTP {} in {:.1}s ({} bytes)",
        status,
        start.elapsed().as_secs_f64(),
        text.len()
    );

    if !status.is_success() {
        return Err(AlertError::Upstream {
            service,
            status: status.as_u16(),
            body: text,
        });
    }
    Ok(text)
}

/// [`send_checked`], then parse the body as a JSON tree.
pub(crate) async fn fetch_json(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<Value> {
    let text = send_checked(service, request).await?;
    Ok(serde_json::from_str(&text)?)
}
