//! Sort and grouping directives

use super::column::ColumnName;
use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;

/// Sort direction for ORDER BY directives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    fn parse(direction: &str) -> Option<Direction> {
        match direction.to_lowercase().as_str() {
            "asc" | "ascending" => Some(Direction::Ascending),
            "desc" | "descending" => Some(Direction::Descending),
            _ => None,
        }
    }
}

/// One key of a multi-key sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    pub field: ColumnName,
    pub direction: Direction,
}

impl SortDirective {
    pub fn new<N: Into<ColumnName>>(field: N, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc<N: Into<ColumnName>>(field: N) -> Self {
        Self::new(field, Direction::Ascending)
    }

    pub fn desc<N: Into<ColumnName>>(field: N) -> Self {
        Self::new(field, Direction::Descending)
    }

    /// Decode `[{"field": "...", "direction": "asc" | "desc"}, ...]`.
    ///
    /// The direction may be omitted and defaults to ascending.
    pub fn from_spec(spec: &serde_json::Value) -> Result<Vec<SortDirective>> {
        let items = spec
            .as_array()
            .ok_or_else(|| Error::BadSortFormat("order_by must be a list".into()))?;

        items
            .iter()
            .map(|item| {
                let object = item.as_object().ok_or_else(|| {
                    Error::BadSortFormat(format!("sort directive must be an object: {}", item))
                })?;

                if let Some(key) = object.keys().find(|k| *k != "field" && *k != "direction") {
                    return Err(Error::BadSortFormat(format!("unexpected key: {}", key)));
                }

                let field = object
                    .get("field")
                    .and_then(|f| f.as_str())
                    .ok_or_else(|| Error::BadSortFormat(format!("missing field in {}", item)))?;

                let direction = match object.get("direction") {
                    None | Some(serde_json::Value::Null) => Direction::Ascending,
                    Some(serde_json::Value::String(d)) => Direction::parse(d).ok_or_else(|| {
                        Error::BadSortFormat(format!("invalid direction: {}", d))
                    })?,
                    Some(other) => {
                        return Err(Error::BadSortFormat(format!(
                            "invalid direction: {}",
                            other
                        )));
                    }
                };

                Ok(SortDirective::new(field, direction))
            })
            .collect()
    }
}

/// How rows of a page are partitioned into groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupMode {
    /// One group per distinct value tuple
    Distinct,
    /// Distinct value tuples split into rank buckets
    Percentile { num_groups: usize },
}

impl GroupMode {
    pub fn name(&self) -> &'static str {
        match self {
            GroupMode::Distinct => "distinct",
            GroupMode::Percentile { .. } => "percentile",
        }
    }

    /// True when group boundaries are value ranges rather than exact values
    pub fn ranged(&self) -> bool {
        matches!(self, GroupMode::Percentile { .. })
    }
}

/// A validated grouping request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpecification {
    columns: Vec<ColumnName>,
    mode: GroupMode,
}

impl GroupSpecification {
    pub fn new(columns: Vec<ColumnName>, mode: GroupMode) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::BadGroupFormat("columns must not be empty".into()));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = columns.iter().find(|c| !seen.insert(*c)) {
            return Err(Error::BadGroupFormat(format!("column {} listed twice", dup)));
        }

        if let GroupMode::Percentile { num_groups: 0 } = mode {
            return Err(Error::BadGroupFormat("num_groups must be positive".into()));
        }

        Ok(Self { columns, mode })
    }

    pub fn distinct<I, N>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<ColumnName>,
    {
        Self::new(columns.into_iter().map(Into::into).collect(), GroupMode::Distinct)
    }

    pub fn percentile<I, N>(columns: I, num_groups: usize) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<ColumnName>,
    {
        Self::new(
            columns.into_iter().map(Into::into).collect(),
            GroupMode::Percentile { num_groups },
        )
    }

    pub fn columns(&self) -> &[ColumnName] {
        &self.columns
    }

    pub fn mode(&self) -> GroupMode {
        self.mode
    }

    /// Decode `{"columns": [...], "mode": "distinct" | "percentile", "num_groups": n}`.
    ///
    /// `mode` defaults to distinct. A percentile request without `num_groups`
    /// uses `default_num_groups`.
    pub fn from_spec(spec: &serde_json::Value, default_num_groups: usize) -> Result<Self> {
        let object = spec
            .as_object()
            .ok_or_else(|| Error::BadGroupFormat("grouping must be an object".into()))?;

        if let Some(key) = object
            .keys()
            .find(|k| !matches!(k.as_str(), "columns" | "mode" | "num_groups"))
        {
            return Err(Error::BadGroupFormat(format!("unexpected key: {}", key)));
        }

        let columns = object
            .get("columns")
            .and_then(|c| c.as_array())
            .ok_or_else(|| Error::BadGroupFormat("columns must be a list".into()))?
            .iter()
            .map(|c| {
                c.as_str().map(ColumnName::from).ok_or_else(|| {
                    Error::BadGroupFormat(format!("column must be a string: {}", c))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if object.get("mode").is_some_and(|m| !m.is_string() && !m.is_null()) {
            return Err(Error::BadGroupFormat("mode must be a string".into()));
        }

        let mode = match object.get("mode").and_then(|m| m.as_str()) {
            None | Some("distinct") => GroupMode::Distinct,
            Some("percentile") => GroupMode::Percentile {
                num_groups: match object.get("num_groups") {
                    None | Some(serde_json::Value::Null) => default_num_groups,
                    Some(n) => n
                        .as_u64()
                        .filter(|n| *n > 0)
                        .and_then(|n| usize::try_from(n).ok())
                        .ok_or_else(|| {
                            Error::BadGroupFormat(format!(
                                "num_groups must be a positive integer: {}",
                                n
                            ))
                        })?,
                },
            },
            Some(other) => {
                return Err(Error::BadGroupFormat(format!("unknown mode: {}", other)));
            }
        };

        Self::new(columns, mode)
    }
}
