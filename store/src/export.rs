use crate::{CollectionRecord, StoreError};

use chrono::{TimeZone, Utc};
use serde::Serialize;

use std::io;

const HEADER: [&str; 8] = [
    "id",
    "date",
    "session",
    "quantity_litres",
    "fat_percentage",
    "price_per_litre",
    "total_amount",
    "payment_status",
];

/// Field order must match `HEADER`.
#[derive(Serialize)]
struct CsvRow {
    id: Option<u64>,
    date: String,
    session: String,
    quantity_litres: f64,
    fat_percentage: f64,
    price_per_litre: f64,
    total_amount: f64,
    payment_status: String,
}

impl From<&CollectionRecord> for CsvRow {
    fn from(record: &CollectionRecord) -> Self {
        let date = Utc
            .timestamp_millis_opt(record.timestamp as i64)
            .single()
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| record.timestamp.to_string());

        Self {
            id: record.id.map(|id| id.0),
            date,
            session: record.session.to_string(),
            quantity_litres: record.quantity_litres,
            fat_percentage: record.fat_percentage,
            price_per_litre: record.price_per_litre,
            total_amount: record.total_amount(),
            payment_status: record.payment_status.to_string(),
        }
    }
}

/// Writes the records as CSV in the order given. The header row is always
/// written, so an empty slice still yields a valid file.
pub fn write_csv<W: io::Write>(records: &[CollectionRecord], writer: W) -> Result<(), StoreError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(HEADER)?;
    for record in records {
        csv.serialize(CsvRow::from(record))?;
    }
    csv.flush()?;
    Ok(())
}
