//! Eruv status alerts by SMS.
//!
//! `eruv-alerts` tells subscribers whether their city's eruv is up, together
//! with the coming Shabbos or holiday times and, when storms are forecast, a
//! wind advisory. One text is composed per city and sent to every subscriber
//! who listed that city.
//!
//! # Pipeline
//!
//! 1. [`store::CsvStore`] loads the status, zone, and subscriber tables.
//! 2. [`runner::CityRunner`] walks the cities in store order and gates each
//!    one ([`filter::CityGate`]): blacklist, whitelist, Pending status.
//! 3. The liturgical and weather providers ([`providers`]) return untyped
//!    JSON trees, read via [`extract::extract_values`] into
//!    [`facts::LiturgicalFacts`] and [`facts::WeatherFacts`].
//! 4. [`compose::compose`] renders the body and enforces the 160-character
//!    limit.
//! 5. [`filter::should_send`] picks recipients; the [`providers::SmsSink`]
//!    delivers.
//!
//! # Example
//!
//! ```ignore
//! use eruv_alerts::prelude::*;
//!
//! let config = RunConfig::default().with_test_mode(true);
//! let tables = CsvStore::new(StorePaths::in_dir("data")).load()?;
//! let http = build_http_client(PROVIDER_TIMEOUT)?;
//! let hebcal = HebcalClient::new(http);
//!
//! let summary = CityRunner::new(&config, &hebcal).run(&tables).await?;
//! for report in &summary.reports {
//!     println!("{report}");
//! }
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod extract;
pub mod facts;
pub mod filter;
pub mod model;
pub mod prelude;
pub mod providers;
pub mod runner;
pub mod store;
pub mod time;

// Re-export commonly used types
pub use compose::{MAX_MESSAGE_CHARS, compose, compose_with_rng};
pub use config::{Credentials, RunConfig, SmsCredentials};
pub use error::{AlertError, Result};
pub use extract::{extract_strings, extract_values};
pub use facts::{LiturgicalFacts, WeatherFacts};
pub use filter::{CityGate, GateDecision, SkipReason, sanitize_phone, should_send};
pub use model::{ChannelKind, CityRecord, CityStatus, ComposedMessage, SubscriberRecord};
pub use runner::{CityReport, CityRunner, RunSummary, city_listing};
pub use store::{CsvStore, EruvTables, StorePaths, ZoneRow};
pub use time::to_meridian;
