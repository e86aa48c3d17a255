//! Column identifiers
//!
//! Columns are referenced two ways at the boundary: by a stable external
//! numeric id, and by their internal name. The two are kept as distinct
//! newtypes so that a field never silently holds either kind.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable external identifier of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnId(pub u64);

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Internal name of a column
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnName(String);

impl ColumnName {
    pub fn new<S: Into<String>>(name: S) -> Self {
        ColumnName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnName {
    fn from(name: &str) -> Self {
        ColumnName(name.to_string())
    }
}

impl From<String> for ColumnName {
    fn from(name: String) -> Self {
        ColumnName(name)
    }
}

impl AsRef<str> for ColumnName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A column reference inside an expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnRef {
    /// External id, must be rewritten before compilation
    Id(ColumnId),
    /// Internal name, resolvable against a table schema
    Name(ColumnName),
}

/// Request-scoped bijective mapping between column ids and names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMapping {
    id_to_name: HashMap<ColumnId, ColumnName>,
    name_to_id: HashMap<ColumnName, ColumnId>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair. Fails if either side is already mapped to something else.
    pub fn insert(&mut self, id: ColumnId, name: ColumnName) -> Result<()> {
        match (self.id_to_name.get(&id), self.name_to_id.get(&name)) {
            (Some(existing), _) if *existing != name => Err(Error::InvalidValue(format!(
                "Column id {} is already mapped to {}",
                id, existing
            ))),
            (_, Some(existing)) if *existing != id => Err(Error::InvalidValue(format!(
                "Column {} is already mapped to id {}",
                name, existing
            ))),
            _ => {
                self.id_to_name.insert(id, name.clone());
                self.name_to_id.insert(name, id);
                Ok(())
            }
        }
    }

    /// Build a mapping from (id, name) pairs
    pub fn from_pairs<I, N>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (ColumnId, N)>,
        N: Into<ColumnName>,
    {
        let mut mapping = Self::new();
        for (id, name) in pairs {
            mapping.insert(id, name.into())?;
        }
        Ok(mapping)
    }

    pub fn name_of(&self, id: ColumnId) -> Option<&ColumnName> {
        self.id_to_name.get(&id)
    }

    pub fn id_of(&self, name: &ColumnName) -> Option<ColumnId> {
        self.name_to_id.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }
}
