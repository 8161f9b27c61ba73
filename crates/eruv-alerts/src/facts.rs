//! Facts distilled from provider responses.
//!
//! Both providers are read through [`extract_strings`] rather than a bound
//! schema; only the weather reading (`main.temp`, `main.humidity`) is
//! decoded into a typed struct.

use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::extract::extract_strings;
use crate::time::to_meridian;

/// Opening of the holiday greeting used when no Parsha title is present.
pub const HOLIDAY_ANNOUNCEMENT: &str = "Chag Somayach!";

const CANDLE_MARKER: &str = "Candle";
const HAVDALAH_MARKER: &str = "Havdalah";
const PARSHA_MARKER: &str = "Parsha";
const SEVERE_KEYWORDS: [&str; 2] = ["thunderstorm", "tornado"];

/// Candle-lighting, Havdalah, and Parsha/holiday for the coming Shabbos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiturgicalFacts {
    /// Rendered clause, e.g. `Candle lighting: 7:05 PM`.
    pub candle_lighting: Option<String>,
    /// Rendered clause, e.g. `Havdalah (50 min): 8:10 PM`.
    pub havdalah: Option<String>,
    /// Parsha title followed by a period, or [`HOLIDAY_ANNOUNCEMENT`].
    pub parsha_or_holiday: String,
    pub is_holiday: bool,
}

impl LiturgicalFacts {
    /// Read the facts out of a hebcal-style response tree.
    ///
    /// The first title containing each marker wins. Fails only when a
    /// title's trailing time token cannot be parsed.
    pub fn from_response(response: &Value) -> Result<Self> {
        let titles = extract_strings(response, "title");
        let first_with = |marker: &str| titles.iter().copied().find(|t| t.contains(marker));

        let candle_lighting = first_with(CANDLE_MARKER).map(render_timed_title).transpose()?;
        let havdalah = first_with(HAVDALAH_MARKER).map(render_timed_title).transpose()?;

        let (parsha_or_holiday, is_holiday) = match first_with(PARSHA_MARKER) {
            Some(parsha) => (format!("{parsha}."), false),
            None => (HOLIDAY_ANNOUNCEMENT.to_string(), true),
        };

        Ok(Self {
            candle_lighting,
            havdalah,
            parsha_or_holiday,
            is_holiday,
        })
    }
}

/// Pass a title's trailing time token through [`to_meridian`].
///
/// Titles whose last word carries no digit have no time token and are
/// returned unchanged.
fn render_timed_title(title: &str) -> Result<String> {
    let title = title.trim();
    match title.rsplit_once(' ') {
        Some((head, token)) if token.bytes().any(|b| b.is_ascii_digit()) => {
            Ok(format!("{head} {}", to_meridian(token)?))
        }
        _ => Ok(title.to_string()),
    }
}

/// Current conditions at a city's zip code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherFacts {
    pub temperature_f: i64,
    pub humidity_percent: i64,
    /// A thunderstorm or tornado appears in any description.
    pub is_severe: bool,
}

#[derive(Deserialize)]
struct MainReading {
    temp: f64,
    humidity: i64,
}

impl WeatherFacts {
    /// Read the facts out of an OpenWeatherMap-style response tree.
    pub fn from_response(response: &Value) -> Result<Self> {
        let main = MainReading::deserialize(response.get("main").unwrap_or(&Value::Null))?;

        let is_severe = extract_strings(response, "description").iter().any(|d| {
            let lower = d.to_lowercase();
            SEVERE_KEYWORDS.iter().any(|k| lower.contains(k))
        });

        Ok(Self {
            temperature_f: kelvin_to_fahrenheit(main.temp),
            humidity_percent: main.humidity,
            is_severe,
        })
    }
}

/// Whole degrees Fahrenheit, truncated toward zero.
pub fn kelvin_to_fahrenheit(kelvin: f64) -> i64 {
    (1.8 * (kelvin - 273.15) + 32.0).trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlertError;
    use serde_json::json;

    fn hebcal(titles: &[&str]) -> Value {
        let items: Vec<Value> = titles
            .iter()
            .map(|t| json!({"title": t, "category": "candles"}))
            .collect();
        json!({"title": "Hebcal Teaneck January 2024", "items": items})
    }

    #[test]
    fn parsha_week() {
        let facts = LiturgicalFacts::from_response(&hebcal(&[
            "Candle lighting: 16:21",
            "Parsha Vayechi",
            "Havdalah (50 min): 17:32",
        ]))
        .unwrap();
        assert_eq!(facts.candle_lighting.as_deref(), Some("Candle lighting: 4:21 PM"));
        assert_eq!(facts.havdalah.as_deref(), Some("Havdalah (50 min): 5:32 PM"));
        assert_eq!(facts.parsha_or_holiday, "Parsha Vayechi.");
        assert!(!facts.is_holiday);
    }

    #[test]
    fn no_parsha_means_holiday() {
        let facts = LiturgicalFacts::from_response(&hebcal(&["Candle lighting: 19:05"])).unwrap();
        assert_eq!(facts.parsha_or_holiday, HOLIDAY_ANNOUNCEMENT);
        assert!(facts.is_holiday);
        assert!(facts.havdalah.is_none());
    }

    #[test]
    fn first_candle_title_wins_and_meridian_is_kept() {
        let facts = LiturgicalFacts::from_response(&hebcal(&[
            "Candle lighting: 7:05pm",
            "Candle lighting: 8:09pm",
        ]))
        .unwrap();
        assert_eq!(facts.candle_lighting.as_deref(), Some("Candle lighting: 7:05pm"));
    }

    #[test]
    fn title_without_time_is_kept_verbatim() {
        let facts = LiturgicalFacts::from_response(&hebcal(&["Candle lighting"])).unwrap();
        assert_eq!(facts.candle_lighting.as_deref(), Some("Candle lighting"));
    }

    #[test]
    fn malformed_time_token_fails() {
        let err = LiturgicalFacts::from_response(&hebcal(&["Candle lighting: 25:99"])).unwrap_err();
        assert!(matches!(err, AlertError::MalformedTime(_)));
    }

    #[test]
    fn empty_response_has_no_times() {
        let facts = LiturgicalFacts::from_response(&json!({})).unwrap();
        assert!(facts.candle_lighting.is_none());
        assert!(facts.havdalah.is_none());
        assert!(facts.is_holiday);
    }

    #[test]
    fn weather_reading_and_storm_detection() {
        let response = json!({
            "weather": [{"main": "Thunderstorm", "description": "thunderstorm with heavy rain"}],
            "main": {"temp": 300.15, "humidity": 88}
        });
        let facts = WeatherFacts::from_response(&response).unwrap();
        assert_eq!(facts.temperature_f, 80);
        assert_eq!(facts.humidity_percent, 88);
        assert!(facts.is_severe);
    }

    #[test]
    fn calm_weather_is_not_severe() {
        let response = json!({
            "weather": [{"description": "clear sky"}],
            "main": {"temp": 273.15, "humidity": 40}
        });
        let facts = WeatherFacts::from_response(&response).unwrap();
        assert_eq!(facts.temperature_f, 32);
        assert!(!facts.is_severe);
    }

    #[test]
    fn missing_main_reading_is_an_error() {
        let err = WeatherFacts::from_response(&json!({"weather": []})).unwrap_err();
        assert!(matches!(err, AlertError::Json(_)));
    }

    #[test]
    fn fahrenheit_truncates_toward_zero() {
        assert_eq!(kelvin_to_fahrenheit(294.0), 69);
        assert_eq!(kelvin_to_fahrenheit(255.0), 0);
    }
}
