//! Plan executor over in-memory rows
//!
//! Executes Node trees recursively. Streaming nodes (filter, projection,
//! window) stay lazy; duplicate-only and order must see every row first.

use super::expression::{evaluate, matches};
use crate::error::{Error, Result};
use crate::planning::plan::{Direction, Node};
use crate::types::{Row, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Iterator over result rows
pub type Rows<'a> = Box<dyn Iterator<Item = Result<Row>> + 'a>;

/// Executes plans against the rows of a single table
pub struct Executor<'a> {
    table: &'a str,
    rows: &'a [Row],
}

impl<'a> Executor<'a> {
    pub fn new(table: &'a str, rows: &'a [Row]) -> Self {
        Self { table, rows }
    }

    /// Execute a plan and collect its rows
    pub fn collect(&self, node: &Node) -> Result<Vec<Row>> {
        self.execute(node)?.collect()
    }

    /// Execute a plan and count its rows
    pub fn count(&self, node: &Node) -> Result<u64> {
        let mut count = 0;
        for row in self.execute(node)? {
            row?;
            count += 1;
        }
        Ok(count)
    }

    /// Execute a plan node
    pub fn execute<'n>(&self, node: &'n Node) -> Result<Rows<'n>>
    where
        'a: 'n,
    {
        match node {
            Node::Scan { table } => {
                if table != self.table {
                    return Err(Error::Storage(format!(
                        "table {} is not available to this executor",
                        table
                    )));
                }
                let rows: &'n [Row] = self.rows;
                Ok(Box::new(rows.iter().cloned().map(Ok)))
            }

            Node::Filter { source, predicate } => {
                let rows = self.execute(source)?;
                Ok(Box::new(rows.filter_map(move |row| match row {
                    Ok(row) => match matches(predicate, &row) {
                        Ok(true) => Some(Ok(row)),
                        Ok(false) => None,
                        Err(e) => Some(Err(e)),
                    },
                    Err(e) => Some(Err(e)),
                })))
            }

            Node::Projection {
                source,
                expressions,
                ..
            } => {
                let rows = self.execute(source)?;
                Ok(Box::new(rows.map(move |row| {
                    let row = row?;
                    expressions
                        .iter()
                        .map(|expr| evaluate(expr, &row))
                        .collect::<Result<Row>>()
                })))
            }

            // Needs the whole input to know which tuples repeat
            Node::DuplicateOnly { source, columns } => {
                let collected = self.collect(source)?;

                let key = |row: &Row| -> Vec<Value> {
                    columns.iter().map(|&i| row[i].clone()).collect()
                };
                let mut occurrences: HashMap<Vec<Value>, usize> = HashMap::new();
                for row in &collected {
                    *occurrences.entry(key(row)).or_default() += 1;
                }

                let kept: Vec<Row> = collected
                    .into_iter()
                    .filter(|row| occurrences.get(&key(row)).is_some_and(|n| *n > 1))
                    .collect();
                Ok(Box::new(kept.into_iter().map(Ok)))
            }

            Node::Distinct { source } => {
                let rows = self.execute(source)?;
                let mut seen = HashSet::new();
                Ok(Box::new(rows.filter(move |row| match row {
                    Ok(row) => seen.insert(row.clone()),
                    Err(_) => true,
                })))
            }

            // Order requires full materialization to sort
            Node::Order { source, order_by } => {
                let mut collected = self.collect(source)?;

                // Stable, so ties keep their source order
                collected.sort_by(|a, b| {
                    for (i, direction) in order_by {
                        let cmp = a[*i].cmp(&b[*i]);
                        if cmp != Ordering::Equal {
                            return match direction {
                                Direction::Ascending => cmp,
                                Direction::Descending => cmp.reverse(),
                            };
                        }
                    }
                    Ordering::Equal
                });

                Ok(Box::new(collected.into_iter().map(Ok)))
            }

            // Limit and Offset are trivial with iterators
            Node::Offset { source, offset } => Ok(Box::new(self.execute(source)?.skip(*offset))),

            Node::Limit { source, limit } => Ok(Box::new(self.execute(source)?.take(*limit))),
        }
    }
}
