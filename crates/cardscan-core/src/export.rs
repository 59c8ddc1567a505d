//! Spreadsheet export and import of contact records.
//!
//! The table has one header row and one row per contact, with one column
//! per field in [`ContactField::ALL`] order.

use std::io::{Read, Write};

use crate::error::ExportError;
use crate::models::contact::{ContactField, ContactRecord};

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Header row in column order.
pub fn header() -> [&'static str; 6] {
    ContactField::ALL.map(|f| f.as_str())
}

/// Write a header and one row per record.
pub fn write_csv_rows<W: Write>(writer: W, records: &[ContactRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header())?;
    for record in records {
        wtr.write_record(record.values())?;
    }
    wtr.flush().map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(())
}

/// Write a single-row table.
pub fn write_csv<W: Write>(writer: W, record: &ContactRecord) -> Result<()> {
    write_csv_rows(writer, std::slice::from_ref(record))
}

/// Serialize one record as a single-row CSV table.
pub fn to_csv_string(record: &ContactRecord) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, record)?;
    Ok(String::from_utf8(buf)?)
}

/// Read every row of a table written by [`write_csv_rows`].
///
/// Columns are matched by header name, so column order and extra columns
/// do not matter. Missing columns are an error.
pub fn read_csv_rows<R: Read>(reader: R) -> Result<Vec<ContactRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut columns = Vec::with_capacity(ContactField::ALL.len());
    for field in ContactField::ALL {
        let idx = headers
            .iter()
            .position(|h| ContactField::from_column(h) == Some(field))
            .ok_or_else(|| ExportError::MissingColumn(field.as_str().to_string()))?;
        columns.push((field, idx));
    }

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let mut record = ContactRecord::new();
        for (field, idx) in &columns {
            record.set(*field, row.get(*idx).unwrap_or_default());
        }
        records.push(record);
    }

    Ok(records)
}

/// Read the first data row of a table.
pub fn read_csv<R: Read>(reader: R) -> Result<ContactRecord> {
    read_csv_rows(reader)?
        .into_iter()
        .next()
        .ok_or(ExportError::MissingRow)
}

/// Parse a single-row CSV table from a string.
pub fn from_csv_str(data: &str) -> Result<ContactRecord> {
    read_csv(data.as_bytes())
}

/// Serialize a record as pretty JSON.
pub fn to_json(record: &ContactRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}
