//! Records returned by the storage engine

use super::column::ColumnName;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;
use tabula_value::Value;

/// An ordered mapping of column name to value.
///
/// Records produced by one query share their column list.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Arc<[ColumnName]>,
    values: Vec<Value>,
}

impl Record {
    pub fn new(columns: Arc<[ColumnName]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Build a record from owned (name, value) pairs
    pub fn from_pairs<I, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, Value)>,
        N: Into<ColumnName>,
    {
        let (columns, values): (Vec<ColumnName>, Vec<Value>) =
            pairs.into_iter().map(|(n, v)| (n.into(), v)).unzip();
        Self::new(columns.into(), values)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c.as_str() == name)
            .map(|i| &self.values[i])
    }

    pub fn columns(&self) -> &[ColumnName] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnName, &Value)> {
        self.columns.iter().zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name.as_str(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_preserves_column_order() {
        let record = Record::from_pairs([
            ("id", Value::integer(2)),
            ("Center", Value::string("NASA Ames Research Center")),
            ("Patent Number", Value::Null),
        ]);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"id":2,"Center":"NASA Ames Research Center","Patent Number":null}"#
        );
        assert_eq!(record.get("id"), Some(&Value::integer(2)));
        assert_eq!(record.get("missing"), None);
    }
}
