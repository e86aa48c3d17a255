//! Execution plan representation
//!
//! Plan nodes form a tree that is executed recursively. Each node pulls
//! from its child and processes the rows. A compiled query keeps the
//! unwindowed source separately so the count query and the percentile
//! domain query can be derived from it.

use crate::error::{Error, Result};
use crate::functions::DbFunction;
use crate::types::{ColumnName, GroupSpecification, Value};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

pub use crate::types::Direction;

/// A registry function bound at compile time
#[derive(Clone, Copy)]
pub struct FunctionRef(pub &'static dyn DbFunction);

impl FunctionRef {
    pub fn id(&self) -> &'static str {
        self.0.signature().id
    }
}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl PartialEq for FunctionRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for FunctionRef {}

impl Hash for FunctionRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

/// An expression resolved against a row layout
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompiledExpression {
    /// A constant value, already coerced to the type it is compared with
    Constant(Value),
    /// The value at a row position
    Column(usize),
    /// A registry function applied to its arguments
    Call {
        function: FunctionRef,
        args: Vec<CompiledExpression>,
    },
}

/// Execution node in the plan tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// Table scan, yields rows in storage order
    Scan { table: String },

    /// Keep rows where the predicate is TRUE
    Filter {
        source: Box<Node>,
        predicate: CompiledExpression,
    },

    /// Replace each row with the evaluated expressions
    Projection {
        source: Box<Node>,
        expressions: Vec<CompiledExpression>,
        labels: Vec<ColumnName>,
    },

    /// Keep rows whose tuple on the given positions occurs more than once
    DuplicateOnly {
        source: Box<Node>,
        columns: Vec<usize>,
    },

    /// Collapse identical rows to their first occurrence
    Distinct { source: Box<Node> },

    /// Stable multi-key sort
    Order {
        source: Box<Node>,
        order_by: Vec<(usize, Direction)>,
    },

    /// Skip rows
    Offset { source: Box<Node>, offset: usize },

    /// Limit rows
    Limit { source: Box<Node>, limit: usize },
}

impl Node {
    /// The table this plan reads from
    pub fn table(&self) -> &str {
        match self {
            Node::Scan { table } => table,
            Node::Filter { source, .. }
            | Node::Projection { source, .. }
            | Node::DuplicateOnly { source, .. }
            | Node::Distinct { source }
            | Node::Order { source, .. }
            | Node::Offset { source, .. }
            | Node::Limit { source, .. } => source.table(),
        }
    }
}

/// A compiled, validated query against one table
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutableQuery {
    /// Table the query reads
    pub table: String,
    /// Output column names, in order
    pub columns: Vec<ColumnName>,
    /// Filter, projection, duplicate-only and dedupe, without order or window
    pub source: Node,
    /// Sort keys as output positions, tiebreaker included
    pub order_by: Vec<(usize, Direction)>,
    pub offset: usize,
    pub limit: Option<usize>,
    /// Validated grouping request, applied by the caller after execution
    pub grouping: Option<GroupSpecification>,
}

impl ExecutableQuery {
    /// The full plan: source, order, then window
    pub fn plan(&self) -> Node {
        let mut node = self.source.clone();

        if !self.order_by.is_empty() {
            node = Node::Order {
                source: Box::new(node),
                order_by: self.order_by.clone(),
            };
        }

        if self.offset > 0 {
            node = Node::Offset {
                source: Box::new(node),
                offset: self.offset,
            };
        }

        if let Some(limit) = self.limit {
            node = Node::Limit {
                source: Box::new(node),
                limit,
            };
        }

        node
    }

    /// The unwindowed row count of this query
    pub fn count_query(&self) -> CountQuery {
        CountQuery {
            table: self.table.clone(),
            source: self.source.clone(),
        }
    }

    /// The same query with a different window
    pub fn with_window(&self, offset: usize, limit: Option<usize>) -> ExecutableQuery {
        ExecutableQuery {
            offset,
            limit,
            ..self.clone()
        }
    }

    /// Distinct tuples of the given output columns over the whole unwindowed
    /// result, sorted ascending. Used to place percentile bucket boundaries.
    pub fn domain_query(&self, columns: &[ColumnName]) -> Result<ExecutableQuery> {
        let positions = columns
            .iter()
            .map(|name| {
                self.columns
                    .iter()
                    .position(|c| c == name)
                    .ok_or_else(|| Error::GroupFieldNotFound(name.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let source = Node::Distinct {
            source: Box::new(Node::Projection {
                source: Box::new(self.source.clone()),
                expressions: positions
                    .into_iter()
                    .map(CompiledExpression::Column)
                    .collect(),
                labels: columns.to_vec(),
            }),
        };

        Ok(ExecutableQuery {
            table: self.table.clone(),
            columns: columns.to_vec(),
            source,
            order_by: (0..columns.len()).map(|i| (i, Direction::Ascending)).collect(),
            offset: 0,
            limit: None,
            grouping: None,
        })
    }
}

/// Counts the rows of a query's unwindowed source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountQuery {
    pub table: String,
    pub source: Node,
}

impl CountQuery {
    /// Stable key for this count within one process.
    ///
    /// Covers filter, function, duplicate-only and dedupe since all of them
    /// are part of the source tree.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.source.hash(&mut hasher);
        hasher.finish()
    }
}
