//! Row count caching
//!
//! Counting the full filtered result is the most expensive part of serving a
//! page and is repeated for every page of the same listing. `CountCache`
//! remembers counts keyed by table and count-plan fingerprint. It is never
//! invalidated implicitly: whoever changes a table's rows or structure calls
//! `invalidate` for it.

use super::{ColumnIdentifiers, TableDescriptor};
use crate::error::Result;
use crate::planning::{CountQuery, ExecutableQuery};
use crate::types::{ColumnMapping, Record, Table};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Counts keyed by (table name, count plan fingerprint)
#[derive(Debug, Default)]
pub struct CountCache {
    entries: Mutex<HashMap<(String, u64), u64>>,
}

impl CountCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, query: &CountQuery) -> Option<u64> {
        self.entries
            .lock()
            .get(&(query.table.clone(), query.fingerprint()))
            .copied()
    }

    pub fn insert(&self, query: &CountQuery, count: u64) {
        self.entries
            .lock()
            .insert((query.table.clone(), query.fingerprint()), count);
    }

    /// Drop every cached count of a table
    pub fn invalidate(&self, table: &str) {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(name, _), _| name != table);
        tracing::debug!(
            "Invalidated {} cached counts for {}",
            before - entries.len(),
            table
        );
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// A table descriptor whose counts go through a shared `CountCache`
pub struct CachedTable<T> {
    inner: T,
    cache: Arc<CountCache>,
}

impl<T> CachedTable<T> {
    pub fn new(inner: T, cache: Arc<CountCache>) -> Self {
        Self { inner, cache }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn cache(&self) -> &Arc<CountCache> {
        &self.cache
    }
}

impl<T: TableDescriptor> CachedTable<T> {
    /// Invalidate this table's cached counts
    pub fn invalidate(&self) {
        self.cache.invalidate(&self.inner.schema().name);
    }
}

impl<T: TableDescriptor> TableDescriptor for CachedTable<T> {
    fn schema(&self) -> &Table {
        self.inner.schema()
    }

    fn execute(&self, query: &ExecutableQuery) -> Result<Vec<Record>> {
        self.inner.execute(query)
    }

    fn count(&self, query: &CountQuery) -> Result<u64> {
        if let Some(count) = self.cache.get(query) {
            tracing::debug!("Count cache hit for {}", query.table);
            return Ok(count);
        }
        let count = self.inner.count(query)?;
        self.cache.insert(query, count);
        Ok(count)
    }
}

impl<T: ColumnIdentifiers> ColumnIdentifiers for CachedTable<T> {
    fn column_id_to_name(&self) -> Result<ColumnMapping> {
        self.inner.column_id_to_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Expression;
    use crate::planning::{QuerySpec, compile};
    use crate::storage::MemoryTable;
    use crate::types::{Column, DataType, Value};

    fn table() -> CachedTable<MemoryTable> {
        let schema = Table::new(
            "patents",
            vec![
                Column::new(1, "id", DataType::I64).primary_key(),
                Column::new(2, "Center", DataType::Str),
            ],
        )
        .unwrap();
        let table = MemoryTable::new(schema).unwrap();
        for (id, center) in [(1, "Ames"), (2, "Kennedy"), (3, "Ames")] {
            table
                .insert_named([("id", Value::integer(id)), ("Center", Value::string(center))])
                .unwrap();
        }
        CachedTable::new(table, Arc::new(CountCache::new()))
    }

    fn ames_only() -> QuerySpec {
        QuerySpec {
            filter: Some(Expression::call(
                "equal",
                vec![
                    Expression::column_name("Center"),
                    Expression::literal(Value::string("Ames")),
                ],
            )),
            ..Default::default()
        }
    }

    #[test]
    fn test_count_cached_until_invalidated() {
        let table = table();
        let query = compile(table.schema(), &ames_only()).unwrap().count_query();

        assert_eq!(table.count(&query).unwrap(), 2);
        assert_eq!(table.cache().len(), 1);

        // A write without invalidation serves the stale count
        table
            .inner()
            .insert_named([("id", Value::integer(4)), ("Center", Value::string("Ames"))])
            .unwrap();
        assert_eq!(table.count(&query).unwrap(), 2);

        table.invalidate();
        assert!(table.cache().is_empty());
        assert_eq!(table.count(&query).unwrap(), 3);
    }

    #[test]
    fn test_window_does_not_change_key() {
        let table = table();
        let first = compile(
            table.schema(),
            &QuerySpec {
                limit: Some(1),
                ..ames_only()
            },
        )
        .unwrap();
        let second = first.with_window(1, Some(1));
        assert_eq!(
            first.count_query().fingerprint(),
            second.count_query().fingerprint()
        );

        let all = compile(table.schema(), &QuerySpec::default()).unwrap();
        assert_ne!(
            first.count_query().fingerprint(),
            all.count_query().fingerprint()
        );
    }
}
