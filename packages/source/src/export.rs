//! CSV export of the currently filtered rows.

use std::io::Write;

use ev_dashboard_vehicle_models::VehicleRecord;

use crate::SourceError;

/// Default cap on exported rows.
pub const DEFAULT_EXPORT_LIMIT: usize = 1000;

/// Header row of the export file.
pub const EXPORT_HEADERS: [&str; 6] = ["Make", "Model", "Year", "Type", "Range", "City"];

/// Writes the first `limit` records as CSV, in iteration order.
///
/// Missing values are written as empty cells. Returns the number of data
/// rows written.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if writing to `writer` fails.
pub fn write_export<'a, I, W>(records: I, limit: usize, writer: W) -> Result<usize, SourceError>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
    W: Write,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_HEADERS)?;

    let mut written = 0;
    for record in records.into_iter().take(limit) {
        let year = record.model_year.map(|y| y.to_string()).unwrap_or_default();
        let range = record
            .electric_range
            .map(|r| r.to_string())
            .unwrap_or_default();

        csv_writer.write_record([
            record.make.as_deref().unwrap_or_default(),
            record.model.as_deref().unwrap_or_default(),
            year.as_str(),
            record.vehicle_type.as_deref().unwrap_or_default(),
            range.as_str(),
            record.city.as_deref().unwrap_or_default(),
        ])?;
        written += 1;
    }

    csv_writer.flush()?;
    log::debug!("Exported {written} rows");

    Ok(written)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(make: &str, year: Option<i32>, range: Option<f64>) -> VehicleRecord {
        VehicleRecord {
            make: Some(make.to_string()),
            model: Some("M".to_string()),
            model_year: year,
            vehicle_type: Some("Battery Electric Vehicle (BEV)".to_string()),
            electric_range: range,
            city: None,
            ..VehicleRecord::default()
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let records = vec![
            record("TESLA", Some(2021), Some(250.0)),
            record("KIA", None, None),
        ];
        let mut out = Vec::new();
        let written = write_export(&records, DEFAULT_EXPORT_LIMIT, &mut out).unwrap();

        assert_eq!(written, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Make,Model,Year,Type,Range,City\n\
             TESLA,M,2021,Battery Electric Vehicle (BEV),250,\n\
             KIA,M,,Battery Electric Vehicle (BEV),,\n"
        );
    }

    #[test]
    fn stops_at_limit_in_input_order() {
        let records: Vec<VehicleRecord> = (0..5)
            .map(|i| record(&format!("MAKE{i}"), Some(2020), None))
            .collect();
        let mut out = Vec::new();
        let written = write_export(&records, 3, &mut out).unwrap();

        assert_eq!(written, 3);
        let text = String::from_utf8(out).unwrap();
        let makes: Vec<&str> = text
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(makes, vec!["MAKE0", "MAKE1", "MAKE2"]);
    }

    #[test]
    fn quotes_cells_containing_commas() {
        let mut r = record("TESLA", Some(2020), None);
        r.city = Some("Seattle, WA".to_string());
        let mut out = Vec::new();
        write_export([&r], 10, &mut out).unwrap();

        assert!(String::from_utf8(out).unwrap().contains("\"Seattle, WA\""));
    }
}
