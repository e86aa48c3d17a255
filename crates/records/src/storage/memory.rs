//! In-memory table storage

use super::{ColumnIdentifiers, TableDescriptor};
use crate::error::Result;
use crate::execution::Executor;
use crate::planning::{CountQuery, ExecutableQuery};
use crate::types::{ColumnMapping, ColumnName, Record, Row, Table, Value};
use parking_lot::RwLock;
use std::sync::Arc;

/// A table held in memory.
///
/// Readers share the row lock, writers serialize on it. Queries run against
/// a consistent snapshot of the rows for their duration.
pub struct MemoryTable {
    schema: Table,
    mapping: ColumnMapping,
    rows: RwLock<Vec<Row>>,
}

impl MemoryTable {
    /// Create an empty table
    pub fn new(schema: Table) -> Result<Self> {
        let mapping = schema.column_mapping()?;
        Ok(Self {
            schema,
            mapping,
            rows: RwLock::new(Vec::new()),
        })
    }

    /// Insert a full row, validated against the schema
    pub fn insert(&self, row: Row) -> Result<()> {
        self.schema.validate_row(&row)?;
        self.rows.write().push(row);
        Ok(())
    }

    /// Insert a row from named values; unnamed columns are NULL
    pub fn insert_named<'a, I>(&self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let row = self.schema.row_from_named(values)?;
        self.insert(row)
    }

    /// Remove every row matching a predicate, returning how many were removed
    pub fn delete_where<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&Row) -> bool,
    {
        let mut rows = self.rows.write();
        let before = rows.len();
        rows.retain(|row| !predicate(row));
        before - rows.len()
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

impl TableDescriptor for MemoryTable {
    fn schema(&self) -> &Table {
        &self.schema
    }

    fn execute(&self, query: &ExecutableQuery) -> Result<Vec<Record>> {
        let rows = self.rows.read();
        let plan = query.plan();
        let result = Executor::new(&self.schema.name, &rows).collect(&plan)?;

        tracing::debug!(
            "Executed query on {}: {} of {} rows",
            self.schema.name,
            result.len(),
            rows.len()
        );

        let columns: Arc<[ColumnName]> = query.columns.as_slice().into();
        Ok(result
            .into_iter()
            .map(|values| Record::new(columns.clone(), values))
            .collect())
    }

    fn count(&self, query: &CountQuery) -> Result<u64> {
        let rows = self.rows.read();
        Executor::new(&self.schema.name, &rows).count(&query.source)
    }
}

impl ColumnIdentifiers for MemoryTable {
    fn column_id_to_name(&self) -> Result<ColumnMapping> {
        Ok(self.mapping.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::planning::{QuerySpec, compile};
    use crate::types::{Column, DataType};

    fn table() -> MemoryTable {
        let schema = Table::new(
            "patents",
            vec![
                Column::new(1, "id", DataType::I64).primary_key(),
                Column::new(2, "Center", DataType::Str).nullable(false),
            ],
        )
        .unwrap();
        MemoryTable::new(schema).unwrap()
    }

    #[test]
    fn test_insert_validates() {
        let table = table();
        table
            .insert_named([("id", Value::integer(1)), ("Center", Value::string("Ames"))])
            .unwrap();
        assert_eq!(
            table.insert_named([("id", Value::integer(2))]).unwrap_err(),
            Error::NotNullViolation {
                table: "patents".into(),
                column: "Center".into(),
            }
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_execute_and_count() {
        let table = table();
        for (id, center) in [(3, "Kennedy"), (1, "Ames"), (2, "Ames")] {
            table
                .insert_named([("id", Value::integer(id)), ("Center", Value::string(center))])
                .unwrap();
        }

        let query = compile(
            table.schema(),
            &QuerySpec {
                limit: Some(2),
                ..Default::default()
            },
        )
        .unwrap();

        // Ordered by the primary key tiebreaker
        let records = table.execute(&query).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("id"), Some(&Value::integer(1)));
        assert_eq!(records[1].get("id"), Some(&Value::integer(2)));
        assert_eq!(table.count(&query.count_query()).unwrap(), 3);

        assert_eq!(table.delete_where(|row| row[1] == Value::string("Ames")), 2);
        assert_eq!(table.count(&query.count_query()).unwrap(), 1);
    }
}
