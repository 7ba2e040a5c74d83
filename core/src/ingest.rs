//! CSV ingest for the fraud-detection transaction export.
//!
//! Column order (header row is skipped):
//!   transaction_id, timestamp, sender_account, receiver_account, amount,
//!   transaction_type, merchant_category, location, device_used, is_fraud,
//!   fraud_type, time_since_last_transaction, spending_deviation_score,
//!   velocity_score, geo_anomaly_score, payment_channel, ip_address,
//!   device_hash
//!
//! Malformed numbers become 0.0 and malformed flags become false.
//! Cells that are not valid UTF-8 are decoded lossily (U+FFFD).
//! Rows with fewer than `MIN_COLUMNS` cells are skipped.

use crate::{error::ScopeResult, record::Record};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

pub const MIN_COLUMNS: usize = 18;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Data rows seen (header excluded).
    pub rows:       usize,
    pub parsed:     usize,
    pub short_rows: usize,
    /// Rows kept after replacing invalid UTF-8.
    pub lossy_rows: usize,
}

pub fn load_path(path: impl AsRef<Path>) -> ScopeResult<(Vec<Record>, IngestReport)> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let result = read_records(file)?;
    log::info!(
        "ingested {} of {} rows from {} ({} short, {} lossy)",
        result.1.parsed,
        result.1.rows,
        path.display(),
        result.1.short_rows,
        result.1.lossy_rows
    );
    Ok(result)
}

pub fn read_records<R: Read>(reader: R) -> ScopeResult<(Vec<Record>, IngestReport)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut report = IngestReport::default();

    for row in csv_reader.byte_records() {
        let row = row?;
        report.rows += 1;
        match parse_row(&row) {
            Some(record) => {
                if std::str::from_utf8(row.as_slice()).is_err() {
                    report.lossy_rows += 1;
                    log::warn!("row {} ({}) has invalid UTF-8; kept lossily", report.rows, record.transaction_id);
                }
                records.push(record);
                report.parsed += 1;
            }
            None => {
                report.short_rows += 1;
                log::warn!("skipping short row {} ({} columns)", report.rows, row.len());
            }
        }
    }
    Ok((records, report))
}

/// Build a record from one CSV row, or `None` if the row is short.
pub fn parse_row(row: &csv::ByteRecord) -> Option<Record> {
    if row.len() < MIN_COLUMNS {
        return None;
    }
    let text = |i: usize| String::from_utf8_lossy(row.get(i).unwrap_or_default()).into_owned();
    let number = |i: usize| parse_number(&text(i));

    Some(Record {
        transaction_id:              text(0),
        timestamp:                   text(1),
        sender_account:              text(2),
        receiver_account:            text(3),
        amount:                      number(4),
        transaction_type:            text(5),
        merchant_category:           text(6),
        location:                    text(7),
        device_used:                 text(8),
        is_fraud:                    parse_flag(&text(9)),
        fraud_type:                  text(10),
        time_since_last_transaction: text(11),
        spending_deviation_score:    text(12),
        velocity_score:              number(13),
        geo_anomaly_score:           number(14),
        payment_channel:             text(15),
        ip_address:                  text(16),
        device_hash:                 text(17),
    })
}

/// Finite decimal, or 0.0.
pub fn parse_number(cell: &str) -> f64 {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Case-insensitive "true", anything else false.
pub fn parse_flag(cell: &str) -> bool {
    cell.trim().eq_ignore_ascii_case("true")
}
