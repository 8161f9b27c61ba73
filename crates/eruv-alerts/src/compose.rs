//! SMS body composition.
//!
//! A body is assembled from a fixed sequence of clauses:
//!
//! ```text
//! <parsha|holiday> <prequel><city> Eruv is <status>. [<storm advisory>. ]
//! [<candle lighting>. ][<havdalah>. ]<greeting | bare period>
//! ```
//!
//! followed by the optional donation and trailing clauses. The result must fit
//! in a single SMS segment of [`MAX_MESSAGE_CHARS`] characters. The only
//! shortening ever applied is dropping [`VERBOSE_DURATION`]; anything else
//! that is too long is an error, since cutting text could drop the storm
//! advisory or a time the recipient needs.

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::error::{AlertError, Result};
use crate::facts::{LiturgicalFacts, WeatherFacts};
use crate::model::{CityStatus, ComposedMessage};

/// Single SMS segment limit, in characters.
pub const MAX_MESSAGE_CHARS: usize = 160;

/// Duration annotation hebcal adds to Havdalah titles.
pub const VERBOSE_DURATION: &str = " (50 min)";

pub const STORM_ADVISORY: &str = "If winds exceed 35 mph, consider the Eruv down";

pub const DONATION_CLAUSE: &str = " Please visit bit.ly/nmberuv to cover the costs.";

/// Greeting variants, picked at random to vary otherwise identical texts.
pub const GREETINGS: [&str; 4] = ["a great", "a wonderful", "an amazing", "a good"];

const DEFAULT_PREQUEL: &str = "The ";
const STORM_PREQUEL: &str = "As of now, the ";

/// Compose the body for `city` using the thread RNG for the greeting.
pub fn compose(
    city: &str,
    status: &CityStatus,
    liturgical: &LiturgicalFacts,
    weather: Option<&WeatherFacts>,
    config: &RunConfig,
) -> Result<ComposedMessage> {
    compose_with_rng(city, status, liturgical, weather, config, &mut rand::rng())
}

/// Compose the body for `city`, drawing the greeting from `rng`.
pub fn compose_with_rng<R: Rng + ?Sized>(
    city: &str,
    status: &CityStatus,
    liturgical: &LiturgicalFacts,
    weather: Option<&WeatherFacts>,
    config: &RunConfig,
    rng: &mut R,
) -> Result<ComposedMessage> {
    let body = match &config.custom_message {
        Some(custom) => custom.clone(),
        None => render_status_message(city, status, liturgical, weather, config, rng),
    };
    let body = finish(city, body, config)?;
    debug!(city, chars = body.chars().count(), "Composed message");
    Ok(ComposedMessage::new(body))
}

/// Apply the donation and trailing clauses, trim, and enforce the length
/// limit on the trimmed text.
///
/// Shared by per-city composition and the single-phone send.
pub fn finish(city: &str, mut body: String, config: &RunConfig) -> Result<String> {
    if config.donate
        && config
            .donation_cities
            .iter()
            .any(|c| c.eq_ignore_ascii_case(city))
    {
        body.push_str(DONATION_CLAUSE);
    }

    if let Some(extra) = &config.append_message {
        body.push(' ');
        body.push_str(extra);
    }

    shorten(city, body.trim().to_string())
}

/// Drop [`VERBOSE_DURATION`] until the body fits, or fail.
pub fn shorten(city: &str, mut body: String) -> Result<String> {
    loop {
        let length = body.chars().count();
        if length <= MAX_MESSAGE_CHARS {
            return Ok(body);
        }
        if !body.contains(VERBOSE_DURATION) {
            return Err(AlertError::MessageTooLong {
                city: city.to_string(),
                length,
                limit: MAX_MESSAGE_CHARS,
                body,
            });
        }
        body = body.replace(VERBOSE_DURATION, "");
    }
}

/// Whether the storm advisory applies for this city.
pub fn storm_advisory_applies(weather: Option<&WeatherFacts>, config: &RunConfig) -> bool {
    !config.skip_weather && (config.force_weather || weather.is_some_and(|w| w.is_severe))
}

fn render_status_message<R: Rng + ?Sized>(
    city: &str,
    status: &CityStatus,
    liturgical: &LiturgicalFacts,
    weather: Option<&WeatherFacts>,
    config: &RunConfig,
    rng: &mut R,
) -> String {
    let storm = storm_advisory_applies(weather, config);
    let prequel = if storm { STORM_PREQUEL } else { DEFAULT_PREQUEL };

    let mut sentences = vec![format!("{prequel}{city} Eruv is {status}")];
    if storm {
        sentences.push(STORM_ADVISORY.to_string());
    }
    if !config.skip_candlelighting {
        if let Some(candles) = &liturgical.candle_lighting {
            sentences.push(candles.clone());
        }
    }
    if !config.skip_havdalah {
        match &liturgical.havdalah {
            Some(havdalah) => sentences.push(havdalah.clone()),
            None => info!(city, "No Havdalah time detected"),
        }
    }

    let mut body = format!("{} {}.", liturgical.parsha_or_holiday, sentences.join(". "));

    if !storm {
        let greeting = GREETINGS.choose(rng).copied().unwrap_or(GREETINGS[0]);
        let occasion = if liturgical.is_holiday {
            " and Yom Tov"
        } else {
            ""
        };
        body.push_str(&format!(" Have {greeting} Shabbos{occasion}!"));
    }

    body
}
