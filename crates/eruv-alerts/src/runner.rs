//! City-by-city orchestration of an alert run.
//!
//! [`CityRunner`] walks the status table in store order. For each city that
//! passes the [`CityGate`], it resolves the zip code, fetches liturgical and
//! weather facts, composes one body, and sends it to every matching
//! subscriber. Everything is sequential; the first error aborts the run.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::compose::{compose, finish};
use crate::config::RunConfig;
use crate::error::{AlertError, Result};
use crate::facts::{LiturgicalFacts, WeatherFacts};
use crate::filter::{CityGate, GateDecision, SkipReason, sanitize_phone, should_send};
use crate::model::{ChannelKind, CityRecord, SubscriberRecord};
use crate::providers::{LiturgicalProvider, SmsSink, WeatherProvider};
use crate::store::EruvTables;

/// Outcome of processing one city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityReport {
    pub city: String,
    pub body: String,
    pub recipients: usize,
    /// Test mode: nothing was actually sent.
    pub dry_run: bool,
}

impl fmt::Display for CityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.dry_run {
            "would have been notified"
        } else {
            "notified"
        };
        write!(f, "{} users {verb} in {}.", self.recipients, self.city)
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Local>,
    pub reports: Vec<CityReport>,
    pub skipped: Vec<(String, SkipReason)>,
}

impl RunSummary {
    fn new() -> Self {
        Self {
            started_at: Local::now(),
            reports: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn total_recipients(&self) -> usize {
        self.reports.iter().map(|r| r.recipients).sum()
    }

    pub fn report_for(&self, city: &str) -> Option<&CityReport> {
        self.reports.iter().find(|r| r.city == city)
    }
}

/// Drives the collaborators for one run.
pub struct CityRunner<'a> {
    config: &'a RunConfig,
    liturgical: &'a dyn LiturgicalProvider,
    weather: Option<&'a dyn WeatherProvider>,
    sms: Option<&'a dyn SmsSink>,
}

impl<'a> CityRunner<'a> {
    pub fn new(config: &'a RunConfig, liturgical: &'a dyn LiturgicalProvider) -> Self {
        Self {
            config,
            liturgical,
            weather: None,
            sms: None,
        }
    }

    /// Weather provider; ignored when the run skips weather.
    pub fn with_weather(mut self, weather: &'a dyn WeatherProvider) -> Self {
        self.weather = Some(weather);
        self
    }

    /// SMS sink; required unless the run is in test mode.
    pub fn with_sms(mut self, sms: &'a dyn SmsSink) -> Self {
        self.sms = Some(sms);
        self
    }

    fn sink(&self) -> Result<Option<&'a dyn SmsSink>> {
        match (self.config.test_mode, self.sms) {
            (true, _) => Ok(None),
            (false, Some(sms)) => Ok(Some(sms)),
            (false, None) => Err(AlertError::Config(
                "an SMS sink is required outside test mode".into(),
            )),
        }
    }

    /// Process every city in store order.
    pub async fn run(&self, tables: &EruvTables) -> Result<RunSummary> {
        let sink = self.sink()?;
        let gate = CityGate::new(self.config);
        let mut summary = RunSummary::new();

        info!(
            cities = tables.cities.len(),
            subscribers = tables.subscribers.len(),
            test_mode = self.config.test_mode,
            "Starting alert run"
        );

        for city in &tables.cities {
            if let GateDecision::Skip(reason) = gate.check(&city.name, &city.status) {
                warn!(city = %city.name, %reason, "Skipping city");
                summary.skipped.push((city.name.clone(), reason));
                continue;
            }

            let zip_code = city
                .zip_code
                .as_deref()
                .ok_or_else(|| AlertError::MissingZipCode(city.name.clone()))?;

            let report = self
                .run_city(city, zip_code, &tables.subscribers, sink)
                .await?;
            info!("{report}");
            summary.reports.push(report);
        }

        Ok(summary)
    }

    async fn run_city(
        &self,
        city: &CityRecord,
        zip_code: &str,
        subscribers: &[SubscriberRecord],
        sink: Option<&dyn SmsSink>,
    ) -> Result<CityReport> {
        debug!(city = %city.name, zip = zip_code, "Processing city");

        let times = self.liturgical.shabbat_times(zip_code).await?;
        let liturgical = LiturgicalFacts::from_response(&times)?;

        let weather = match self.weather {
            Some(provider) if !self.config.skip_weather => {
                let conditions = provider.current_weather(zip_code).await?;
                let facts = WeatherFacts::from_response(&conditions)?;
                debug!(
                    city = %city.name,
                    "Temperature: {}F, {}% humid{}",
                    facts.temperature_f,
                    facts.humidity_percent,
                    if facts.is_severe { ", severe" } else { "" }
                );
                Some(facts)
            }
            _ => None,
        };

        let mut message = compose(
            &city.name,
            &city.status,
            &liturgical,
            weather.as_ref(),
            self.config,
        )?;

        for subscriber in subscribers {
            if !should_send(&city.name, subscriber, self.config) {
                if subscriber.channel == ChannelKind::WhatsApp
                    && subscriber.city_names().any(|c| c == city.name)
                {
                    debug!(phone = %subscriber.phone, "Skipping WhatsApp subscriber");
                }
                continue;
            }
            let number = sanitize_phone(&subscriber.phone);
            self.deliver(&number, &message.body, sink).await?;
            message.recipient_count += 1;
        }

        Ok(CityReport {
            city: city.name.clone(),
            body: message.body,
            recipients: message.recipient_count,
            dry_run: self.config.test_mode,
        })
    }

    /// Send the custom message to the configured single phone and nothing
    /// else. No table is read.
    pub async fn send_single(&self) -> Result<CityReport> {
        let sink = self.sink()?;
        let (Some(phone), Some(custom)) = (&self.config.single_phone, &self.config.custom_message)
        else {
            return Err(AlertError::Config(
                "a single-phone send requires --phone and a custom message".into(),
            ));
        };

        let number = sanitize_phone(phone);
        let body = finish(&number, custom.clone(), self.config)?;
        self.deliver(&number, &body, sink).await?;

        Ok(CityReport {
            city: number,
            body,
            recipients: 1,
            dry_run: self.config.test_mode,
        })
    }

    async fn deliver(&self, number: &str, body: &str, sink: Option<&dyn SmsSink>) -> Result<()> {
        if self.config.verbose {
            info!("{number} > {body}");
        } else {
            debug!("{number} > {body}");
        }

        if let Some(sms) = sink {
            sms.send(number, body).await?;
        }

        if self.config.delayed {
            let pause = random_pause(self.config.max_send_delay);
            debug!(pause_ms = pause.as_millis() as u64, "Delaying next send");
            tokio::time::sleep(pause).await;
        }
        Ok(())
    }
}

/// A whole number of seconds between zero and `max`, inclusive.
fn random_pause(max: Duration) -> Duration {
    Duration::from_secs(rand::rng().random_range(0..=max.as_secs()))
}

/// One line per city in store order, for `--list-cities`.
pub fn city_listing(tables: &EruvTables) -> Vec<String> {
    tables
        .cities
        .iter()
        .map(|c| match &c.zip_code {
            Some(zip) => format!("{} ({zip}): {}", c.name, c.status),
            None => format!("{}: {}", c.name, c.status),
        })
        .collect()
}
