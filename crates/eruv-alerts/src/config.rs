//! Run configuration with sensible defaults.
//!
//! [`RunConfig`] is resolved once from the command line and then passed by
//! reference to the composer, the filter, and the runner. Nothing mutates it
//! during a run. [`Credentials`] are read from the environment, and only for
//! the collaborators a run actually uses.

use std::time::Duration;

use crate::error::{AlertError, Result};

/// City whose donation link the donation clause points at.
pub const DEFAULT_DONATION_CITY: &str = "North Miami Beach";

/// Upper bound of the random pause after each send when `delayed` is set.
pub const DEFAULT_MAX_SEND_DELAY: Duration = Duration::from_secs(2);

/// Timeout for the liturgical-times and weather lookups.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for a single SMS submission.
pub const SMS_TIMEOUT: Duration = Duration::from_secs(30);

/// Flags controlling a single alert run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Compose and count, but never call the SMS sink.
    pub test_mode: bool,
    /// Log every recipient and message body.
    pub verbose: bool,
    /// Sleep a random 0..=`max_send_delay` after each send.
    pub delayed: bool,
    pub max_send_delay: Duration,
    /// Append the donation clause for `donation_cities`.
    pub donate: bool,
    pub donation_cities: Vec<String>,
    pub skip_candlelighting: bool,
    pub skip_havdalah: bool,
    /// Do not query the weather provider at all.
    pub skip_weather: bool,
    /// Render the storm advisory regardless of the forecast.
    pub force_weather: bool,
    pub include_whatsapp: bool,
    /// Cities never processed (case-insensitive). Wins over the whitelist.
    pub blacklist: Vec<String>,
    /// When non-empty, only these cities are processed (case-insensitive).
    pub whitelist: Vec<String>,
    /// Replaces the composed body verbatim.
    pub custom_message: Option<String>,
    /// Appended after the body (and after the donation clause).
    pub append_message: Option<String>,
    /// Send `custom_message` to this one number and nothing else.
    pub single_phone: Option<String>,
    /// Print the cities and their status, then stop.
    pub list_cities: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            test_mode: false,
            verbose: false,
            delayed: false,
            max_send_delay: DEFAULT_MAX_SEND_DELAY,
            donate: false,
            donation_cities: vec![DEFAULT_DONATION_CITY.to_string()],
            skip_candlelighting: false,
            skip_havdalah: false,
            skip_weather: false,
            force_weather: false,
            include_whatsapp: false,
            blacklist: Vec::new(),
            whitelist: Vec::new(),
            custom_message: None,
            append_message: None,
            single_phone: None,
            list_cities: false,
        }
    }
}

impl RunConfig {
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn with_delayed(mut self, delayed: bool) -> Self {
        self.delayed = delayed;
        self
    }

    pub fn with_donate(mut self, donate: bool) -> Self {
        self.donate = donate;
        self
    }

    pub fn with_skip_candlelighting(mut self, skip: bool) -> Self {
        self.skip_candlelighting = skip;
        self
    }

    pub fn with_skip_havdalah(mut self, skip: bool) -> Self {
        self.skip_havdalah = skip;
        self
    }

    pub fn with_skip_weather(mut self, skip: bool) -> Self {
        self.skip_weather = skip;
        self
    }

    pub fn with_force_weather(mut self, force: bool) -> Self {
        self.force_weather = force;
        self
    }

    pub fn with_include_whatsapp(mut self, include: bool) -> Self {
        self.include_whatsapp = include;
        self
    }

    pub fn with_blacklist<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist = cities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_whitelist<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist = cities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_custom_message(mut self, message: impl Into<String>) -> Self {
        self.custom_message = Some(message.into());
        self
    }

    pub fn with_append_message(mut self, message: impl Into<String>) -> Self {
        self.append_message = Some(message.into());
        self
    }

    pub fn with_single_phone(mut self, phone: impl Into<String>) -> Self {
        self.single_phone = Some(phone.into());
        self
    }

    /// Join repeated CLI words into one message, or `None` if there were none.
    pub fn join_words(words: &[String]) -> Option<String> {
        if words.is_empty() {
            None
        } else {
            Some(words.join(" "))
        }
    }

    /// Reject option combinations that cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.single_phone.is_some() && self.custom_message.is_none() {
            return Err(AlertError::Config(
                "a single-phone send requires a custom message".into(),
            ));
        }
        if self.force_weather && self.skip_weather {
            tracing::warn!("force-weather has no effect while weather is skipped");
        }
        Ok(())
    }

    /// Whether the SMS sink is needed (and therefore its credentials).
    pub fn needs_sms(&self) -> bool {
        !self.test_mode && !self.list_cities
    }

    /// Whether the weather provider is needed.
    pub fn needs_weather(&self) -> bool {
        !self.skip_weather && !self.list_cities && self.single_phone.is_none()
    }
}

/// Twilio account credentials and sender number.
#[derive(Debug, Clone)]
pub struct SmsCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

/// Secrets read from the environment.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub sms: Option<SmsCredentials>,
    pub weather_api_key: Option<String>,
}

impl Credentials {
    pub const TWILIO_ACCOUNT_SID: &'static str = "TWILIO_ACCOUNT_SID";
    pub const TWILIO_AUTH_TOKEN: &'static str = "TWILIO_AUTH_TOKEN";
    pub const TWILIO_FROM_NUMBER: &'static str = "TWILIO_FROM_NUMBER";
    pub const OPENWEATHERMAP_API_KEY: &'static str = "OPENWEATHERMAP_API_KEY";

    /// Read the credentials `config` needs from process environment variables.
    pub fn from_env(config: &RunConfig) -> Result<Self> {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// Read the credentials `config` needs through `lookup`.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(config: &RunConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(AlertError::MissingCredential(name))
        };

        let sms = if config.needs_sms() {
            Some(SmsCredentials {
                account_sid: require(Self::TWILIO_ACCOUNT_SID)?,
                auth_token: require(Self::TWILIO_AUTH_TOKEN)?,
                from_number: require(Self::TWILIO_FROM_NUMBER)?,
            })
        } else {
            None
        };

        let weather_api_key = if config.needs_weather() {
            Some(require(Self::OPENWEATHERMAP_API_KEY)?)
        } else {
            None
        };

        Ok(Self {
            sms,
            weather_api_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| {
            owned
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn defaults_send_for_real_without_extras() {
        let config = RunConfig::default();
        assert!(!config.test_mode);
        assert!(!config.include_whatsapp);
        assert_eq!(config.donation_cities, vec![DEFAULT_DONATION_CITY]);
        assert_eq!(config.max_send_delay, Duration::from_secs(2));
        assert!(config.needs_sms());
        assert!(config.needs_weather());
    }

    #[test]
    fn single_phone_requires_custom_message() {
        let config = RunConfig::default().with_single_phone("555-0100");
        assert!(matches!(config.validate(), Err(AlertError::Config(_))));

        let config = config.with_custom_message("Eruv is down");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn join_words_joins_with_spaces() {
        let words = vec!["Eruv".to_string(), "is".into(), "down".into()];
        assert_eq!(RunConfig::join_words(&words).as_deref(), Some("Eruv is down"));
        assert_eq!(RunConfig::join_words(&[]), None);
    }

    #[test]
    fn test_mode_needs_no_sms_credentials() {
        let config = RunConfig::default()
            .with_test_mode(true)
            .with_skip_weather(true);
        let creds = Credentials::from_lookup(&config, env(&[])).unwrap();
        assert!(creds.sms.is_none());
        assert!(creds.weather_api_key.is_none());
    }

    #[test]
    fn missing_credential_is_named() {
        let config = RunConfig::default().with_skip_weather(true);
        let err = Credentials::from_lookup(
            &config,
            env(&[("TWILIO_ACCOUNT_SID", "AC123"), ("TWILIO_AUTH_TOKEN", "")]),
        )
        .unwrap_err();
        assert!(matches!(err, AlertError::MissingCredential("TWILIO_AUTH_TOKEN")));
    }

    #[test]
    fn full_credentials_are_read() {
        let config = RunConfig::default();
        let creds = Credentials::from_lookup(
            &config,
            env(&[
                ("TWILIO_ACCOUNT_SID", "AC123"),
                ("TWILIO_AUTH_TOKEN", "secret"),
                ("TWILIO_FROM_NUMBER", "+15550001111"),
                ("OPENWEATHERMAP_API_KEY", "owm"),
            ]),
        )
        .unwrap();
        let sms = creds.sms.unwrap();
        assert_eq!(sms.account_sid, "AC123");
        assert_eq!(sms.from_number, "+15550001111");
        assert_eq!(creds.weather_api_key.as_deref(), Some("owm"));
    }
}
