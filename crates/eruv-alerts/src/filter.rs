//! Delivery filtering at city and subscriber level.
//!
//! [`CityGate`] decides whether a whole city is processed at all
//! (blacklist, whitelist, pending status). [`should_send`] then decides per
//! subscriber within a processed city.

use std::fmt;

use crate::config::RunConfig;
use crate::model::{ChannelKind, CityStatus, SubscriberRecord};

/// Characters removed from a phone number before sending.
const PHONE_NOISE: [char; 6] = ['-', ' ', '(', ')', '.', '_'];

/// Country prefix for sanitized numbers.
const COUNTRY_PREFIX: &str = "+1";

/// Why a city was left out of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Blacklisted,
    NotWhitelisted,
    Pending,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Blacklisted => write!(f, "blacklisted"),
            SkipReason::NotWhitelisted => write!(f, "not whitelisted"),
            SkipReason::Pending => write!(f, "status is Pending"),
        }
    }
}

/// Outcome of the city-level gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Skip(SkipReason),
}

/// City-level gate built from the run's blacklist and whitelist.
#[derive(Debug, Clone, Copy)]
pub struct CityGate<'a> {
    config: &'a RunConfig,
}

impl<'a> CityGate<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    /// Blacklist first, then whitelist, then pending status.
    ///
    /// List matching is case-insensitive; an empty whitelist admits every
    /// city.
    pub fn check(&self, city: &str, status: &CityStatus) -> GateDecision {
        if contains_ignore_case(&self.config.blacklist, city) {
            return GateDecision::Skip(SkipReason::Blacklisted);
        }
        if !self.config.whitelist.is_empty() && !contains_ignore_case(&self.config.whitelist, city)
        {
            return GateDecision::Skip(SkipReason::NotWhitelisted);
        }
        if status.is_pending() {
            return GateDecision::Skip(SkipReason::Pending);
        }
        GateDecision::Proceed
    }
}

fn contains_ignore_case(list: &[String], city: &str) -> bool {
    let city = city.trim().to_lowercase();
    list.iter().any(|c| c.trim().to_lowercase() == city)
}

/// Whether `subscriber` should receive the message composed for `city`.
///
/// The subscriber must list `city` exactly (case-sensitive, after trimming
/// each list entry). WhatsApp subscribers are left out unless the run
/// includes them.
pub fn should_send(city: &str, subscriber: &SubscriberRecord, config: &RunConfig) -> bool {
    if subscriber.channel == ChannelKind::WhatsApp && !config.include_whatsapp {
        return false;
    }
    subscriber.city_names().any(|name| name == city)
}

/// Strip formatting characters and prefix the country code.
pub fn sanitize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| !PHONE_NOISE.contains(c)).collect();
    format!("{COUNTRY_PREFIX}{digits}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_matches_trimmed_entries_exactly() {
        let config = RunConfig::default();
        let sub = SubscriberRecord::new("555-0100", " Teaneck ,  Example City");
        assert!(should_send("Example City", &sub, &config));
        assert!(should_send("Teaneck", &sub, &config));
        assert!(!should_send("example city", &sub, &config));
        assert!(!should_send("Example", &sub, &config));
        assert!(!should_send("Passaic", &sub, &config));
    }

    #[test]
    fn whatsapp_excluded_by_default() {
        let config = RunConfig::default();
        let sms = SubscriberRecord::new("555-0100", "Example City");
        let whatsapp =
            SubscriberRecord::new("555-0101", "Example City").with_channel(ChannelKind::WhatsApp);

        assert!(should_send("Example City", &sms, &config));
        assert!(!should_send("Example City", &whatsapp, &config));

        let config = config.with_include_whatsapp(true);
        assert!(should_send("Example City", &whatsapp, &config));
    }

    #[test]
    fn blacklist_is_case_insensitive() {
        let config = RunConfig::default().with_blacklist(["EXAMPLE city"]);
        let gate = CityGate::new(&config);
        assert_eq!(
            gate.check("Example City", &CityStatus::Open),
            GateDecision::Skip(SkipReason::Blacklisted)
        );
        assert_eq!(gate.check("Teaneck", &CityStatus::Open), GateDecision::Proceed);
    }

    #[test]
    fn whitelist_admits_only_listed_cities() {
        let config = RunConfig::default().with_whitelist(["teaneck"]);
        let gate = CityGate::new(&config);
        assert_eq!(gate.check("Teaneck", &CityStatus::Closed), GateDecision::Proceed);
        assert_eq!(
            gate.check("Passaic", &CityStatus::Open),
            GateDecision::Skip(SkipReason::NotWhitelisted)
        );
    }

    #[test]
    fn blacklist_wins_over_whitelist() {
        let config = RunConfig::default()
            .with_whitelist(["Teaneck"])
            .with_blacklist(["teaneck"]);
        assert_eq!(
            CityGate::new(&config).check("Teaneck", &CityStatus::Open),
            GateDecision::Skip(SkipReason::Blacklisted)
        );
    }

    #[test]
    fn pending_city_is_skipped() {
        let config = RunConfig::default();
        assert_eq!(
            CityGate::new(&config).check("Teaneck", &CityStatus::Pending),
            GateDecision::Skip(SkipReason::Pending)
        );
        assert_eq!(
            CityGate::new(&config).check("Teaneck", &CityStatus::Unknown("Up".into())),
            GateDecision::Proceed
        );
    }

    #[test]
    fn phone_is_sanitized_to_e164() {
        assert_eq!(sanitize_phone("(201) 555-0100"), "+12015550100");
        assert_eq!(sanitize_phone("201.555.0100"), "+12015550100");
        assert_eq!(sanitize_phone("201_555_0100"), "+12015550100");
        assert_eq!(sanitize_phone("2015550100"), "+12015550100");
    }
}
