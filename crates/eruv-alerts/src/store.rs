//! Tabular store: the status, zone, and subscriber tables.
//!
//! The operator maintains three sheets which are exported as CSV files.
//! Columns are addressed by position, not by header name:
//!
//! | file              | header | columns                              |
//! |-------------------|--------|--------------------------------------|
//! | `status.csv`      | no     | city, status                         |
//! | `rabbis.csv`      | yes    | name, email, city, zip               |
//! | `subscribers.csv` | yes    | timestamp, phone, cities, channel    |
//!
//! The channel column is optional; rows may be ragged.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::{AlertError, Result};
use crate::model::{ChannelKind, CityRecord, CityStatus, SubscriberRecord};

pub const STATUS_FILE: &str = "status.csv";
pub const ZONES_FILE: &str = "rabbis.csv";
pub const SUBSCRIBERS_FILE: &str = "subscribers.csv";

const STATUS_CITY_COL: usize = 0;
const STATUS_VALUE_COL: usize = 1;
const ZONE_CITY_COL: usize = 2;
const ZONE_ZIP_COL: usize = 3;
const SUB_PHONE_COL: usize = 1;
const SUB_CITIES_COL: usize = 2;
const SUB_CHANNEL_COL: usize = 3;

/// Locations of the three table files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub status: PathBuf,
    pub zones: PathBuf,
    pub subscribers: PathBuf,
}

impl StorePaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            status: dir.join(STATUS_FILE),
            zones: dir.join(ZONES_FILE),
            subscribers: dir.join(SUBSCRIBERS_FILE),
        }
    }
}

/// A row of the zone (rabbi) table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRow {
    pub city: String,
    pub zip_code: String,
}

impl ZoneRow {
    pub fn new(city: impl Into<String>, zip_code: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            zip_code: zip_code.into(),
        }
    }
}

/// Everything a run reads from the store, in store order.
#[derive(Debug, Clone, Default)]
pub struct EruvTables {
    pub cities: Vec<CityRecord>,
    pub subscribers: Vec<SubscriberRecord>,
}

impl EruvTables {
    /// Join status rows with their zip codes.
    ///
    /// The first zone row naming a city (exact match) supplies its zip code.
    /// Empty zip cells count as missing.
    pub fn join(
        statuses: Vec<(String, CityStatus)>,
        zones: &[ZoneRow],
        subscribers: Vec<SubscriberRecord>,
    ) -> Self {
        let cities = statuses
            .into_iter()
            .map(|(name, status)| {
                let zip_code = zones
                    .iter()
                    .find(|z| z.city == name)
                    .map(|z| z.zip_code.trim())
                    .filter(|zip| !zip.is_empty())
                    .map(str::to_string);
                CityRecord {
                    name,
                    status,
                    zip_code,
                }
            })
            .collect();
        Self {
            cities,
            subscribers,
        }
    }
}

/// Store backed by CSV exports of the operator's spreadsheet.
#[derive(Debug, Clone)]
pub struct CsvStore {
    paths: StorePaths,
}

impl CsvStore {
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    /// Read and join all three tables.
    pub fn load(&self) -> Result<EruvTables> {
        let statuses = self.load_statuses()?;
        let zones = self.load_zones()?;
        let subscribers = self.load_subscribers()?;
        debug!(
            cities = statuses.len(),
            zones = zones.len(),
            subscribers = subscribers.len(),
            "Tables loaded"
        );
        Ok(EruvTables::join(statuses, &zones, subscribers))
    }

    /// Read only the status table.
    pub fn load_statuses(&self) -> Result<Vec<(String, CityStatus)>> {
        let rows = read_rows(&self.paths.status, false)?;
        Ok(rows
            .iter()
            .filter_map(|r| {
                let city = cell(r, STATUS_CITY_COL);
                (!city.is_empty()).then(|| {
                    (
                        city.to_string(),
                        CityStatus::parse(cell(r, STATUS_VALUE_COL)),
                    )
                })
            })
            .collect())
    }

    pub fn load_zones(&self) -> Result<Vec<ZoneRow>> {
        let rows = read_rows(&self.paths.zones, true)?;
        Ok(rows
            .iter()
            .filter(|r| !cell(r, ZONE_CITY_COL).is_empty())
            .map(|r| ZoneRow::new(cell(r, ZONE_CITY_COL), cell(r, ZONE_ZIP_COL)))
            .collect())
    }

    pub fn load_subscribers(&self) -> Result<Vec<SubscriberRecord>> {
        let rows = read_rows(&self.paths.subscribers, true)?;
        let mut subscribers = Vec::with_capacity(rows.len());
        for (idx, r) in rows.iter().enumerate() {
            let phone = cell(r, SUB_PHONE_COL);
            if phone.is_empty() {
                // +2: 1-indexed, plus the header row.
                debug!(line = idx + 2, "Skipping subscriber row without a phone number");
                continue;
            }
            subscribers.push(
                SubscriberRecord::new(phone, cell(r, SUB_CITIES_COL))
                    .with_channel(ChannelKind::parse(cell(r, SUB_CHANNEL_COL))),
            );
        }
        Ok(subscribers)
    }
}

fn read_rows(path: &Path, has_headers: bool) -> Result<Vec<StringRecord>> {
    let table_err = |source| AlertError::Table {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(table_err)?;
    reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(table_err)
}

fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}
