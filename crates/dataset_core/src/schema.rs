//! The reconciled dataset schema.

use crate::Column;
use serde::Serialize;

/// The single logical schema of a dataset.
///
/// Columns keep the order in which they were first seen; lookups are by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LogicalSchema {
    columns: Vec<Column>,
}

impl LogicalSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schema seeded with the given columns.
    pub fn from_columns(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Returns the column with the given name.
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the position of the column with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Appends a column.
    pub fn push(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Replaces the column at `index`, e.g. after a widening.
    pub fn replace(&mut self, index: usize, column: Column) {
        self.columns[index] = column;
    }

    /// Returns an iterator over the columns.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Returns the column names in schema order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogicalType;

    #[test]
    fn test_lookup_and_replace() {
        let mut schema = LogicalSchema::from_columns(vec![
            Column::nullable("id", LogicalType::Int32),
            Column::nullable("v", LogicalType::Float64),
        ]);
        assert_eq!(schema.position("v"), Some(1));
        assert!(schema.get("missing").is_none());

        schema.replace(0, Column::nullable("id", LogicalType::Int64));
        assert_eq!(schema.get("id").unwrap().data_type, LogicalType::Int64);

        schema.push(Column::nullable("extra", LogicalType::Utf8));
        assert_eq!(schema.names(), vec!["id", "v", "extra"]);
    }
}
