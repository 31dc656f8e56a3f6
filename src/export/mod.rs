//! Collection export: full-collection reads turned into cleansed record sets.

pub mod csv;
pub mod exporter;
pub mod table;

pub use exporter::CollectionExporter;
pub use table::{IDENTIFIER_COLUMN, MISSING_SENTINEL, RecordSet, Row};
