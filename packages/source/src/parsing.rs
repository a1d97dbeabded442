//! Row parsing for the registration dataset.
//!
//! Every field is parsed tolerantly: a value that is missing, blank, or
//! not a finite number becomes `None` instead of failing the row. No row
//! is ever rejected here.

use std::collections::BTreeMap;
use std::sync::Arc;

use ev_dashboard_vehicle_models::VehicleRecord;

use crate::SourceError;
use crate::progress::ProgressCallback;

/// Column headers of the registration dataset.
pub mod columns {
    /// Manufacturer.
    pub const MAKE: &str = "Make";
    /// Model name.
    pub const MODEL: &str = "Model";
    /// Model year.
    pub const MODEL_YEAR: &str = "Model Year";
    /// Raw type label.
    pub const VEHICLE_TYPE: &str = "Electric Vehicle Type";
    /// Electric range in miles.
    pub const ELECTRIC_RANGE: &str = "Electric Range";
    /// Registration city.
    pub const CITY: &str = "City";
    /// Longitude in degrees.
    pub const LONGITUDE: &str = "Longitude";
    /// Latitude in degrees.
    pub const LATITUDE: &str = "Latitude";
}

/// How many rows to convert between progress updates.
const PROGRESS_CHUNK: usize = 10_000;

/// Returns the trimmed text, or `None` when missing or blank.
#[must_use]
pub fn parse_text(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Parses a finite float. Returns `None` if missing, unparseable, or
/// non-finite.
#[must_use]
pub fn parse_f64(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a model year. Accepts plain integers and integral floats
/// (`"2021.0"`); anything else is `None`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_year(raw: Option<&str>) -> Option<i32> {
    let trimmed = raw?.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }
    let value = parse_f64(Some(trimmed))?;
    if value.fract() == 0.0 && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
        Some(value as i32)
    } else {
        None
    }
}

/// Converts one raw row (column name → cell text) into a [`VehicleRecord`].
#[must_use]
pub fn parse_record(row: &BTreeMap<String, String>) -> VehicleRecord {
    let get = |column: &str| row.get(column).map(String::as_str);

    VehicleRecord {
        make: parse_text(get(columns::MAKE)),
        model: parse_text(get(columns::MODEL)),
        model_year: parse_year(get(columns::MODEL_YEAR)),
        vehicle_type: parse_text(get(columns::VEHICLE_TYPE)),
        electric_range: parse_f64(get(columns::ELECTRIC_RANGE)),
        city: parse_text(get(columns::CITY)),
        longitude: parse_f64(get(columns::LONGITUDE)),
        latitude: parse_f64(get(columns::LATITUDE)),
    }
}

/// Parses a whole CSV document into records.
///
/// Cells are decoded lossily so that a stray invalid byte never drops a
/// row. Short rows are padded with missing values.
///
/// # Errors
///
/// Returns [`SourceError`] if the CSV structure itself cannot be read, if
/// there is no header row, or if there are no data rows.
pub fn parse_csv(
    bytes: &[u8],
    location: &str,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<VehicleRecord>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_owned())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(SourceError::MissingHeader {
            location: location.to_owned(),
        });
    }

    let rows = reader
        .byte_records()
        .collect::<Result<Vec<_>, csv::Error>>()?;

    if rows.is_empty() {
        return Err(SourceError::EmptyDataset {
            location: location.to_owned(),
        });
    }

    progress.set_total(rows.len() as u64);
    progress.set_message(format!("Parsing {location}"));

    let mut records = Vec::with_capacity(rows.len());
    for chunk in rows.chunks(PROGRESS_CHUNK) {
        for row in chunk {
            let map: BTreeMap<String, String> = headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let value = row
                        .get(i)
                        .map(|cell| String::from_utf8_lossy(cell).into_owned())
                        .unwrap_or_default();
                    (header.clone(), value)
                })
                .collect();
            records.push(parse_record(&map));
        }
        progress.inc(chunk.len() as u64);
    }

    log::info!("Loaded {} records from {location}", records.len());
    progress.finish(format!("Loaded {} records", records.len()));

    Ok(records)
}
