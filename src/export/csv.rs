//! CSV rendering of a record set.

use std::io::Write;

use mongodb::bson::Bson;

use crate::error::Result;
use crate::export::RecordSet;

/// Write `records` as CSV: a header of the columns, then one line per row.
///
/// Missing cells are empty fields. Returns the number of data rows written;
/// a record set without columns writes nothing.
pub fn write_csv<W: Write>(records: &RecordSet, writer: W) -> Result<u64> {
    if records.num_columns() == 0 {
        return Ok(0);
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(records.columns())?;

    let mut count = 0u64;
    for row in records.rows() {
        let fields: Vec<String> =
            row.iter().map(|(_, cell)| cell.map(render_cell).unwrap_or_default()).collect();
        csv_writer.write_record(&fields)?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}

/// Text for a present cell. Native `null` renders as `null` so it stays
/// distinguishable from a missing cell, which is an empty field.
pub fn render_cell(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        Bson::Null => "null".to_string(),
        Bson::Boolean(b) => b.to_string(),
        Bson::Int32(n) => n.to_string(),
        Bson::Int64(n) => n.to_string(),
        Bson::Double(n) => n.to_string(),
        Bson::Decimal128(d) => d.to_string(),
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::DateTime(dt) => dt.try_to_rfc3339_string().unwrap_or_else(|_| dt.to_string()),
        // Arrays, documents and the rarer types go out as relaxed Extended JSON
        other => serde_json::to_string(&other.clone().into_relaxed_extjson()).unwrap_or_default(),
    }
}
