//! Records read from the tabular store and values produced per city.

use std::fmt;

/// Operator-maintained status of a city's eruv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityStatus {
    Open,
    Closed,
    Pending,
    /// Any other operator text, rendered verbatim.
    Unknown(String),
}

impl CityStatus {
    /// Parse a status cell. Matching is case-insensitive after trimming.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "open" => CityStatus::Open,
            "closed" => CityStatus::Closed,
            "pending" => CityStatus::Pending,
            _ => CityStatus::Unknown(trimmed.to_string()),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, CityStatus::Pending)
    }
}

impl fmt::Display for CityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CityStatus::Open => write!(f, "Open"),
            CityStatus::Closed => write!(f, "Closed"),
            CityStatus::Pending => write!(f, "Pending"),
            CityStatus::Unknown(raw) => write!(f, "{raw}"),
        }
    }
}

/// A row of the status table joined with its zone (zip code), if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityRecord {
    pub name: String,
    pub status: CityStatus,
    pub zip_code: Option<String>,
}

/// Delivery channel a subscriber signed up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelKind {
    #[default]
    Sms,
    WhatsApp,
}

impl ChannelKind {
    /// Parse a channel cell. Empty or unrecognised text means SMS.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("whatsapp") {
            ChannelKind::WhatsApp
        } else {
            ChannelKind::Sms
        }
    }
}

/// A row of the subscriber table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberRecord {
    /// Phone number as typed by the subscriber (unsanitized).
    pub phone: String,
    /// Comma-delimited list of city names.
    pub cities: String,
    pub channel: ChannelKind,
}

impl SubscriberRecord {
    pub fn new(phone: impl Into<String>, cities: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            cities: cities.into(),
            channel: ChannelKind::Sms,
        }
    }

    /// Set the channel (builder pattern).
    pub fn with_channel(mut self, channel: ChannelKind) -> Self {
        self.channel = channel;
        self
    }

    /// Trimmed entries of the city list.
    pub fn city_names(&self) -> impl Iterator<Item = &str> {
        self.cities.split(',').map(str::trim)
    }
}

/// The body composed for one city and how many subscribers received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub body: String,
    pub recipient_count: usize,
}

impl ComposedMessage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            recipient_count: 0,
        }
    }

    /// Length in characters, which is what the SMS segment limit counts.
    pub fn char_len(&self) -> usize {
        self.body.chars().count()
    }
}
