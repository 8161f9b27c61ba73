//! Convenience re-exports for wiring a run.
//!
//! ```ignore
//! use eruv_alerts::prelude::*;
//! ```

// ── Configuration ───────────────────────────────────────────────────
pub use crate::config::{Credentials, PROVIDER_TIMEOUT, RunConfig, SMS_TIMEOUT, SmsCredentials};
pub use crate::error::{AlertError, Result};

// ── Store ───────────────────────────────────────────────────────────
pub use crate::store::{CsvStore, EruvTables, StorePaths};

// ── Collaborators ───────────────────────────────────────────────────
pub use crate::providers::{
    DeliveryReceipt, HebcalClient, LiturgicalProvider, OpenWeatherClient, ProviderFuture,
    SmsSink, TwilioSink, WeatherProvider, build_http_client,
};

// ── Orchestration ───────────────────────────────────────────────────
pub use crate::runner::{CityReport, CityRunner, RunSummary, city_listing};
