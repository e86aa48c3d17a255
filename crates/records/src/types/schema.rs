//! Table schema types (tables and columns)

use super::column::{ColumnId, ColumnMapping, ColumnName};
use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;
use tabula_value::{DataType, Row, Value};

/// A table schema: its name and ordered columns. Only built through
/// `Table::new`, which checks the primary key and column uniqueness.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Table {
    /// The table name. Can't be empty.
    pub name: String,
    /// The primary key column index, if the table has one.
    pub primary_key: Option<usize>,
    /// The table's columns in storage order.
    pub columns: Vec<Column>,
}

impl Table {
    /// Creates a new table schema.
    pub fn new<S: Into<String>>(name: S, columns: Vec<Column>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidValue("Table name cannot be empty".into()));
        }

        let mut names = HashSet::new();
        let mut ids = HashSet::new();
        for column in &columns {
            if !names.insert(&column.name) {
                return Err(Error::InvalidValue(format!(
                    "Duplicate column name: {}",
                    column.name
                )));
            }
            if !ids.insert(column.id) {
                return Err(Error::InvalidValue(format!(
                    "Duplicate column id: {}",
                    column.id
                )));
            }
        }

        let primary_keys: Vec<_> = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.primary_key)
            .map(|(i, _)| i)
            .collect();

        let primary_key = match primary_keys.as_slice() {
            [] => None,
            [pk] => Some(*pk),
            _ => {
                return Err(Error::InvalidValue(
                    "Table can only have one primary key".into(),
                ));
            }
        };

        Ok(Table {
            name,
            primary_key,
            columns,
        })
    }

    /// Validates a row against this table's schema.
    pub fn validate_row(&self, row: &Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::InvalidValue(format!(
                "Row has {} columns, table {} has {}",
                row.len(),
                self.name,
                self.columns.len()
            )));
        }

        for (column, value) in self.columns.iter().zip(row.iter()) {
            if value.is_null() && !column.nullable {
                return Err(Error::NotNullViolation {
                    table: self.name.clone(),
                    column: column.name.to_string(),
                });
            }

            if !value.is_null() && value.data_type() != column.datatype {
                return Err(Error::TypeMismatch {
                    expected: column.datatype.to_string(),
                    found: format!("{} in column {}", value.data_type(), column.name),
                });
            }
        }

        Ok(())
    }

    /// Returns the column with the given name, if it exists.
    pub fn get_column(&self, name: &str) -> Option<(usize, &Column)> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, c)| c.name.as_str() == name)
    }

    /// Column names in storage order
    pub fn column_names(&self) -> Vec<ColumnName> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// The id to name mapping of this table's columns
    pub fn column_mapping(&self) -> Result<ColumnMapping> {
        ColumnMapping::from_pairs(self.columns.iter().map(|c| (c.id, c.name.clone())))
    }

    /// Build a full row from named values, filling unnamed columns with NULL
    pub fn row_from_named<'a, I>(&self, values: I) -> Result<Row>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let mut row = vec![Value::Null; self.columns.len()];
        for (name, value) in values {
            let (index, _) = self
                .get_column(name)
                .ok_or_else(|| Error::ReferencedColumnsDontExist(vec![name.to_string()]))?;
            row[index] = value;
        }
        Ok(row)
    }
}

/// A table column.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Column {
    /// Stable external id.
    pub id: ColumnId,
    /// Internal column name. Can't be empty.
    pub name: ColumnName,
    /// Column datatype.
    pub datatype: DataType,
    /// Whether this is the primary key column.
    pub primary_key: bool,
    /// Whether the column allows null values. Not legal for primary keys.
    pub nullable: bool,
}

impl Column {
    /// Creates a new nullable column.
    pub fn new<N: Into<ColumnName>>(id: u64, name: N, datatype: DataType) -> Self {
        Column {
            id: ColumnId(id),
            name: name.into(),
            datatype,
            primary_key: false,
            nullable: true,
        }
    }

    /// Sets this column as the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Sets whether this column is nullable.
    pub fn nullable(mut self, nullable: bool) -> Self {
        if self.primary_key && nullable {
            // Primary keys can't be nullable, ignore
            return self;
        }
        self.nullable = nullable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patents() -> Table {
        Table::new(
            "patents",
            vec![
                Column::new(1, "id", DataType::I64).primary_key(),
                Column::new(2, "Center", DataType::Str),
                Column::new(3, "Case Number", DataType::Str).nullable(false),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_primary_key_detected() {
        assert_eq!(patents().primary_key, Some(0));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = Table::new(
            "t",
            vec![
                Column::new(1, "a", DataType::I64),
                Column::new(2, "a", DataType::Str),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_row_not_null() {
        let table = patents();
        let row = table
            .row_from_named([("id", Value::integer(1)), ("Center", Value::string("Ames"))])
            .unwrap();
        assert_eq!(
            table.validate_row(&row).unwrap_err(),
            Error::NotNullViolation {
                table: "patents".into(),
                column: "Case Number".into(),
            }
        );
    }

    #[test]
    fn test_validate_row_type() {
        let table = patents();
        let row = vec![Value::string("1"), Value::Null, Value::string("X")];
        assert!(matches!(
            table.validate_row(&row),
            Err(Error::TypeMismatch { .. })
        ));
    }
}
