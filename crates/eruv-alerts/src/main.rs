//! Send eruv status alerts to every subscriber, city by city.
//!
//! Credentials are read from the environment: `TWILIO_ACCOUNT_SID`,
//! `TWILIO_AUTH_TOKEN`, `TWILIO_FROM_NUMBER`, and `OPENWEATHERMAP_API_KEY`.
//! Only the ones the selected options need must be set.
//!
//! # Examples
//!
//! ```sh
//! # Dry run: compose and count, send nothing
//! eruv-alerts --test --verbose
//!
//! # Regular weekly run, slowly, with the donation reminder
//! eruv-alerts --delayed --donate
//!
//! # Only two cities, no weather lookup
//! eruv-alerts --whitelist Teaneck "North Miami Beach" --no-weather
//!
//! # Override the text for everyone
//! eruv-alerts --custom-message The eruv is down this Shabbos.
//!
//! # One message to one phone
//! eruv-alerts --phone "(201) 555-0100" --custom-message Testing the new number.
//! ```

use std::path::PathBuf;
use std::process;

use clap::Parser;
use eruv_alerts::config::DEFAULT_DONATION_CITY;
use eruv_alerts::prelude::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Send eruv status, candle-lighting, and storm alerts by SMS.
#[derive(Parser)]
#[command(name = "eruv-alerts", version)]
struct Cli {
    // ── Run mode ───────────────────────────────────────────────
    /// Test run without actually sending
    #[arg(long)]
    test: bool,

    /// Log every recipient and message
    #[arg(short, long)]
    verbose: bool,

    /// Pause a random 0 - 2 seconds after each SMS
    #[arg(long)]
    delayed: bool,

    /// Print the available cities with their status and exit
    #[arg(long)]
    list_cities: bool,

    // ── Message content ────────────────────────────────────────
    /// Append the donation reminder for donation cities
    #[arg(long)]
    donate: bool,

    /// City that receives the donation reminder (repeatable)
    #[arg(long = "donate-city", default_value = DEFAULT_DONATION_CITY)]
    donate_cities: Vec<String>,

    /// Skip appending candle-lighting times
    #[arg(long)]
    no_candlelighting: bool,

    /// Skip appending Havdalah times
    #[arg(long)]
    no_havdalah: bool,

    /// Skip the weather lookup and storm advisory
    #[arg(long)]
    no_weather: bool,

    /// Add the storm advisory regardless of the forecast
    #[arg(long)]
    force_weather: bool,

    /// Replace the composed message with this text
    #[arg(long, num_args = 1..)]
    custom_message: Vec<String>,

    /// Append this text to every message
    #[arg(long, num_args = 1..)]
    append_message: Vec<String>,

    // ── Recipients ─────────────────────────────────────────────
    /// Also send to WhatsApp subscribers
    #[arg(long)]
    include_whatsapp: bool,

    /// Cities to skip (case-insensitive)
    #[arg(long, num_args = 1..)]
    blacklist: Vec<String>,

    /// Only process these cities (case-insensitive)
    #[arg(long, num_args = 1..)]
    whitelist: Vec<String>,

    /// Send the custom message to this single phone number only
    #[arg(long, requires = "custom_message")]
    phone: Option<String>,

    // ── Tables ─────────────────────────────────────────────────
    /// Directory holding status.csv, rabbis.csv, and subscribers.csv
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Override the status table path
    #[arg(long)]
    status_file: Option<PathBuf>,

    /// Override the zone (rabbi) table path
    #[arg(long)]
    zones_file: Option<PathBuf>,

    /// Override the subscriber table path
    #[arg(long)]
    subscribers_file: Option<PathBuf>,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            test_mode: self.test,
            verbose: self.verbose,
            delayed: self.delayed,
            donate: self.donate,
            donation_cities: self.donate_cities.clone(),
            skip_candlelighting: self.no_candlelighting,
            skip_havdalah: self.no_havdalah,
            skip_weather: self.no_weather,
            force_weather: self.force_weather,
            include_whatsapp: self.include_whatsapp,
            blacklist: self.blacklist.clone(),
            whitelist: self.whitelist.clone(),
            custom_message: RunConfig::join_words(&self.custom_message),
            append_message: RunConfig::join_words(&self.append_message),
            single_phone: self.phone.clone(),
            list_cities: self.list_cities,
            ..RunConfig::default()
        }
    }

    fn store_paths(&self) -> StorePaths {
        let mut paths = StorePaths::in_dir(&self.data_dir);
        if let Some(p) = &self.status_file {
            paths.status = p.clone();
        }
        if let Some(p) = &self.zones_file {
            paths.zones = p.clone();
        }
        if let Some(p) = &self.subscribers_file {
            paths.subscribers = p.clone();
        }
        paths
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info,eruv_alerts=debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn run(cli: &Cli) -> Result<()> {
    let config = cli.run_config();
    config.validate()?;
    let store = CsvStore::new(cli.store_paths());

    if config.list_cities {
        let tables = store.load()?;
        for line in city_listing(&tables) {
            println!("{line}");
        }
        return Ok(());
    }

    let credentials = Credentials::from_env(&config)?;
    let http = build_http_client(PROVIDER_TIMEOUT)?;

    let hebcal = HebcalClient::new(http.clone());
    let weather = credentials
        .weather_api_key
        .map(|key| OpenWeatherClient::new(http, key));
    let sms = match credentials.sms {
        Some(creds) => Some(TwilioSink::new(build_http_client(SMS_TIMEOUT)?, creds)),
        None => None,
    };

    let mut runner = CityRunner::new(&config, &hebcal);
    if let Some(weather) = &weather {
        runner = runner.with_weather(weather);
    }
    if let Some(sms) = &sms {
        runner = runner.with_sms(sms);
    }

    if config.single_phone.is_some() {
        let report = runner.send_single().await?;
        println!("{report}");
        return Ok(());
    }

    let tables = store.load()?;
    let summary = runner.run(&tables).await?;

    for report in &summary.reports {
        println!("\n{report}");
    }
    for (city, reason) in &summary.skipped {
        println!("Skipped {city}: {reason}");
    }
    println!(
        "\n{} users in {} cities (started {}).",
        summary.total_recipients(),
        summary.reports.len(),
        summary.started_at.format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn words_are_joined_into_messages() {
        let cli = Cli::parse_from([
            "eruv-alerts",
            "--custom-message",
            "Eruv",
            "is",
            "down.",
            "--append-message",
            "Stay",
            "safe.",
            "--blacklist",
            "North Miami Beach",
            "Passaic",
        ]);
        let config = cli.run_config();
        assert_eq!(config.custom_message.as_deref(), Some("Eruv is down."));
        assert_eq!(config.append_message.as_deref(), Some("Stay safe."));
        assert_eq!(config.blacklist, vec!["North Miami Beach", "Passaic"]);
        assert_eq!(config.donation_cities, vec![DEFAULT_DONATION_CITY]);
    }

    #[test]
    fn phone_requires_custom_message() {
        assert!(Cli::try_parse_from(["eruv-alerts", "--phone", "555-0100"]).is_err());
        let cli = Cli::try_parse_from([
            "eruv-alerts",
            "--phone",
            "555-0100",
            "--custom-message",
            "hi",
        ])
        .unwrap();
        assert_eq!(cli.run_config().single_phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn table_paths_default_to_data_dir() {
        let cli = Cli::parse_from(["eruv-alerts", "--data-dir", "/srv/eruv", "--zones-file", "z.csv"]);
        let paths = cli.store_paths();
        assert_eq!(paths.status, PathBuf::from("/srv/eruv/status.csv"));
        assert_eq!(paths.zones, PathBuf::from("z.csv"));
        assert_eq!(paths.subscribers, PathBuf::from("/srv/eruv/subscribers.csv"));
    }
}
