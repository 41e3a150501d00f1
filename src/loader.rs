use crate::cleaner;
use crate::error::{ReportError, ReportResult};
use crate::types::{DeliveryRecord, RawRow, REQUIRED_COLUMNS};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Diagnostics printed after a load: how much came in and how much of it
/// carried the missing-value sentinel.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub missing_age: usize,
    pub missing_rating: usize,
    pub missing_traffic: usize,
    pub missing_weather: usize,
    pub missing_city: usize,
    pub missing_multiple_deliveries: usize,
}

impl LoadReport {
    pub fn from_records(records: &[DeliveryRecord]) -> Self {
        let count = |f: fn(&DeliveryRecord) -> bool| records.iter().filter(|r| f(r)).count();
        LoadReport {
            total_rows: records.len(),
            first_date: records.iter().map(|r| r.order_date).min(),
            last_date: records.iter().map(|r| r.order_date).max(),
            missing_age: count(|r| r.courier_age.is_none()),
            missing_rating: count(|r| r.courier_rating.is_none()),
            missing_traffic: count(|r| r.traffic.is_none()),
            missing_weather: count(|r| r.weather.is_none()),
            missing_city: count(|r| r.city.is_none()),
            missing_multiple_deliveries: count(|r| r.multiple_deliveries.is_none()),
        }
    }
}

/// Read the delivery CSV, clean it and summarise what was loaded.
pub fn load_and_clean(path: &Path) -> ReportResult<(Vec<DeliveryRecord>, LoadReport)> {
    let raw = load_raw(path)?;
    let data = cleaner::clean(&raw)?;
    let report = LoadReport::from_records(&data);
    info!(
        path = %path.display(),
        rows = report.total_rows,
        first_date = ?report.first_date,
        last_date = ?report.last_date,
        "dataset loaded"
    );
    Ok((data, report))
}

pub fn load_raw(path: &Path) -> ReportResult<Vec<RawRow>> {
    let file = std::fs::File::open(path)?;
    read_raw(file)
}

/// Parse raw rows from any reader after checking that every expected
/// column is present in the header.
pub fn read_raw<R: Read>(reader: R) -> ReportResult<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);
    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ReportError::Schema {
                column: column.to_string(),
            });
        }
    }
    let rows = rdr
        .deserialize::<RawRow>()
        .collect::<Result<Vec<_>, csv::Error>>()?;
    Ok(rows)
}
