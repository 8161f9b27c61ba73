//! Error types for an alert run.
//!
//! Every variant is fatal: the run stops at the first error and the binary
//! exits non-zero. Recoverable conditions (skipped cities, WhatsApp
//! subscribers, missing Havdalah) never surface here.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the alert error type.
pub type Result<T> = std::result::Result<T, AlertError>;

/// Main error type for an alert run.
#[derive(Error, Debug)]
pub enum AlertError {
    /// A time token could not be parsed as `H:MM` or `H:MM:SS`.
    #[error("Malformed time '{0}': expected H:MM or H:MM:SS (24-hour)")]
    MalformedTime(String),

    /// The composed body is still over the SMS limit after shortening.
    #[error("Message for {city} exceeds the {limit} character limit ({length} chars): {body}")]
    MessageTooLong {
        city: String,
        length: usize,
        limit: usize,
        body: String,
    },

    /// A city that is not Pending has no zip code in the zone table.
    #[error("Invalid zip code detected for {0}")]
    MissingZipCode(String),

    /// Network failure or timeout talking to an upstream service.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// An upstream service answered with a non-success status.
    #[error("{service} HTTP {status}: {body}")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Upstream payload was not valid JSON.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A tabular store file could not be opened or parsed.
    #[error("Failed to read table {}: {source}", path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A credential required by the selected collaborators is not set.
    #[error("{0} environment variable is not set")]
    MissingCredential(&'static str),

    /// Invalid combination of run options.
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_long_message_names_city_and_length() {
        let err = AlertError::MessageTooLong {
            city: "Teaneck".into(),
            length: 171,
            limit: 160,
            body: "x".repeat(171),
        };
        let text = err.to_string();
        assert!(text.contains("Teaneck"));
        assert!(text.contains("171 chars"));
        assert!(text.contains("160 character limit"));
    }

    #[test]
    fn upstream_error_includes_service_and_status() {
        let err = AlertError::Upstream {
            service: "hebcal",
            status: 503,
            body: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "hebcal HTTP 503: unavailable");
    }
}
