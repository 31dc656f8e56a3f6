//! Column-oriented record set built from schemaless documents.

use std::collections::HashSet;

use mongodb::bson::{Bson, Document};

/// Column dropped from the unified column set when present.
///
/// This is a field literally named `id`; the store's own `_id` key is kept.
pub const IDENTIFIER_COLUMN: &str = "id";

/// String value that source data uses to mean "no value".
pub const MISSING_SENTINEL: &str = "na";

/// Tabular view of a fetched collection.
///
/// Cells are `Option<Bson>`: `None` is the missing marker, used both for the
/// `"na"` sentinel and for documents that lack a column. Native BSON `null`
/// stays `Some(Bson::Null)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    columns: Vec<String>,
    /// One vector per column, each `row_count` long
    values: Vec<Vec<Option<Bson>>>,
    row_count: usize,
}

impl RecordSet {
    /// Build the record set for `docs`, keeping fetch order.
    ///
    /// Columns are the first-seen-order union of top-level field names, minus
    /// [`IDENTIFIER_COLUMN`]. Top-level string values equal to
    /// [`MISSING_SENTINEL`] become missing; everything else passes through untouched.
    pub fn from_documents(docs: Vec<Document>) -> Self {
        let mut columns = collect_columns(&docs);
        if let Some(pos) = columns.iter().position(|c| c == IDENTIFIER_COLUMN) {
            columns.remove(pos);
            log::debug!("Dropped identifier column '{IDENTIFIER_COLUMN}'");
        }

        let row_count = docs.len();
        let mut values: Vec<Vec<Option<Bson>>> =
            columns.iter().map(|_| Vec::with_capacity(row_count)).collect();
        let mut sentinels = 0usize;

        for mut doc in docs {
            for (column, cells) in columns.iter().zip(values.iter_mut()) {
                let cell = match doc.remove(column) {
                    Some(Bson::String(s)) if s == MISSING_SENTINEL => {
                        sentinels += 1;
                        None
                    }
                    other => other,
                };
                cells.push(cell);
            }
        }

        if sentinels > 0 {
            log::debug!("Replaced {sentinels} '{MISSING_SENTINEL}' values with missing");
        }

        Self { columns, values, row_count }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn num_rows(&self) -> usize {
        self.row_count
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of one column, in row order.
    pub fn column(&self, name: &str) -> Option<&[Option<Bson>]> {
        self.column_index(name).map(|idx| self.values[idx].as_slice())
    }

    /// Value at (`row`, `column`). `None` when missing, or when out of range.
    pub fn value(&self, row: usize, column: &str) -> Option<&Bson> {
        self.column(column)?.get(row)?.as_ref()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.row_count).then_some(Row { set: self, index })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.row_count).map(move |index| Row { set: self, index })
    }
}

/// Borrowed view of one row.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    set: &'a RecordSet,
    index: usize,
}

impl<'a> Row<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, column: &str) -> Option<&'a Bson> {
        self.set.value(self.index, column)
    }

    /// (column, cell) pairs in column order, missing cells included.
    pub fn iter(self) -> impl Iterator<Item = (&'a str, Option<&'a Bson>)> + 'a {
        let index = self.index;
        self.set
            .columns
            .iter()
            .zip(self.set.values.iter())
            .map(move |(column, cells)| (column.as_str(), cells[index].as_ref()))
    }
}

/// Union of top-level field names, in order of first appearance.
pub fn collect_columns(docs: &[Document]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();

    for doc in docs {
        for key in doc.keys() {
            if seen.insert(key.as_str()) {
                order.push(key.clone());
            }
        }
    }

    order
}
