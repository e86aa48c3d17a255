//! Grouping of a result page
//!
//! Partitions the records of a page into groups, either by exact value tuple
//! (distinct) or by rank bucket of the value tuple (percentile). Statistics
//! are page-local: counts and indices refer to positions within the page.
//!
//! Percentile buckets are placed over a domain of sorted distinct tuples. The
//! paginator supplies the domain of the whole filtered result so bucket
//! boundaries do not move between pages; without one the page itself is used.

use crate::error::{Error, Result};
use crate::types::{ColumnName, GroupMode, GroupSpecification, Record, Row, Value};
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use std::collections::HashMap;
use std::sync::Arc;

/// One group of a page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupResult {
    /// Number of page rows in the group, at least one
    pub count: usize,
    /// Lowest tuple of the group, keyed by group column
    pub first_value: Record,
    /// Highest tuple of the group, keyed by group column
    pub last_value: Record,
    /// Ascending page positions of the group's rows
    pub result_indices: Vec<usize>,
}

/// Grouping metadata attached to a page
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
    pub columns: Vec<ColumnName>,
    pub mode: GroupMode,
    /// Number of non-empty groups on the page
    pub num_groups: usize,
    /// True when groups are value ranges rather than exact values
    pub ranged: bool,
    pub groups: Vec<GroupResult>,
}

impl Serialize for Grouping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Grouping", 5)?;
        state.serialize_field("columns", &self.columns)?;
        state.serialize_field("mode", self.mode.name())?;
        state.serialize_field("num_groups", &self.num_groups)?;
        state.serialize_field("ranged", &self.ranged)?;
        state.serialize_field("groups", &self.groups)?;
        state.end()
    }
}

/// Group a page, placing percentile buckets over the page's own tuples
pub fn group(records: &[Record], spec: &GroupSpecification) -> Result<Grouping> {
    group_with_domain(records, spec, None)
}

/// Group a page.
///
/// `domain` holds the distinct group tuples of the full result set and is
/// only used in percentile mode.
pub fn group_with_domain(
    records: &[Record],
    spec: &GroupSpecification,
    domain: Option<&[Row]>,
) -> Result<Grouping> {
    let tuples = records
        .iter()
        .map(|record| tuple_of(record, spec.columns()))
        .collect::<Result<Vec<_>>>()?;

    let names: Arc<[ColumnName]> = spec.columns().into();

    let groups = match spec.mode() {
        GroupMode::Distinct => group_distinct(&tuples, &names),
        GroupMode::Percentile { num_groups } => {
            check_orderable(&tuples, spec.columns())?;
            let mut domain = match domain {
                Some(domain) => domain.to_vec(),
                None => tuples.clone(),
            };
            domain.sort();
            domain.dedup();
            group_percentile(&tuples, &domain, num_groups, &names)
        }
    };

    tracing::debug!(
        "Grouped {} records into {} {} groups",
        records.len(),
        groups.len(),
        spec.mode().name()
    );

    Ok(Grouping {
        columns: spec.columns().to_vec(),
        mode: spec.mode(),
        num_groups: groups.len(),
        ranged: spec.mode().ranged(),
        groups,
    })
}

fn tuple_of(record: &Record, columns: &[ColumnName]) -> Result<Row> {
    columns
        .iter()
        .map(|column| {
            record
                .get(column.as_str())
                .cloned()
                .ok_or_else(|| Error::GroupFieldNotFound(column.to_string()))
        })
        .collect()
}

fn check_orderable(tuples: &[Row], columns: &[ColumnName]) -> Result<()> {
    for tuple in tuples {
        for (value, column) in tuple.iter().zip(columns) {
            let data_type = value.data_type();
            if !data_type.is_orderable() {
                return Err(Error::InvalidGroupType {
                    column: column.to_string(),
                    data_type,
                });
            }
        }
    }
    Ok(())
}

/// Groups in the order their tuple first appears on the page
fn group_distinct(tuples: &[Row], names: &Arc<[ColumnName]>) -> Vec<GroupResult> {
    let mut lookup: HashMap<&Row, usize> = HashMap::new();
    let mut groups: Vec<(&Row, Vec<usize>)> = Vec::new();

    for (index, tuple) in tuples.iter().enumerate() {
        match lookup.get(tuple) {
            Some(&group) => groups[group].1.push(index),
            None => {
                lookup.insert(tuple, groups.len());
                groups.push((tuple, vec![index]));
            }
        }
    }

    groups
        .into_iter()
        .map(|(tuple, result_indices)| {
            let value = Record::new(names.clone(), tuple.clone());
            GroupResult {
                count: result_indices.len(),
                first_value: value.clone(),
                last_value: value,
                result_indices,
            }
        })
        .collect()
}

/// Bucket of the tuple ranked `rank` among `size` sorted distinct tuples.
///
/// Bucket sizes differ by at most one and the last bucket is never larger
/// than an earlier one. Equal tuples share a rank, hence a bucket.
fn bucket_of(rank: usize, size: usize, num_groups: usize) -> usize {
    (rank * num_groups / size.max(1)).min(num_groups - 1)
}

/// First and last rank that land in a bucket
fn bucket_bounds(bucket: usize, size: usize, num_groups: usize) -> (usize, usize) {
    let first = (bucket * size).div_ceil(num_groups);
    let end = ((bucket + 1) * size).div_ceil(num_groups);
    (first, end.saturating_sub(1).max(first))
}

/// Groups in the order their first member appears on the page
fn group_percentile(
    tuples: &[Row],
    domain: &[Row],
    num_groups: usize,
    names: &Arc<[ColumnName]>,
) -> Vec<GroupResult> {
    // Past one bucket per tuple, more buckets split nothing further
    let num_groups = num_groups.min(domain.len().max(1));
    let mut lookup: HashMap<usize, usize> = HashMap::new();
    let mut buckets: Vec<(usize, Vec<usize>)> = Vec::new();

    for (index, tuple) in tuples.iter().enumerate() {
        // A tuple missing from the domain (a concurrent write) ranks where it would sort
        let rank = domain.partition_point(|t| t < tuple);
        let bucket = bucket_of(rank, domain.len(), num_groups);
        match lookup.get(&bucket) {
            Some(&group) => buckets[group].1.push(index),
            None => {
                lookup.insert(bucket, buckets.len());
                buckets.push((bucket, vec![index]));
            }
        }
    }

    buckets
        .into_iter()
        .map(|(bucket, result_indices)| {
            let (first, last) = bucket_bounds(bucket, domain.len(), num_groups);
            let value_at = |rank: usize| -> Row {
                domain
                    .get(rank)
                    .cloned()
                    .unwrap_or_else(|| vec![Value::Null; names.len()])
            };
            GroupResult {
                count: result_indices.len(),
                first_value: Record::new(names.clone(), value_at(first)),
                last_value: Record::new(names.clone(), value_at(last)),
                result_indices,
            }
        })
        .collect()
}
