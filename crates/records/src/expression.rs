//! DB function expressions
//!
//! Filters and column transforms arrive as JSON trees where every node is a
//! single-key object mapping a function id to its argument list:
//!
//! ```json
//! {"and": [
//!     {"equal": [{"column_id": [3]}, {"literal": ["NASA Ames Research Center"]}]},
//!     {"not": [{"empty": [{"column_name": ["Case Number"]}]}]}
//! ]}
//! ```
//!
//! `column_id`, `column_name` and `literal` are leaves. Every other id is a
//! call into the function registry, checked when the tree is compiled.

use crate::error::{Error, Result};
use crate::types::{ColumnId, ColumnMapping, ColumnName, ColumnRef, Value};
use std::collections::BTreeSet;

const COLUMN_ID: &str = "column_id";
const COLUMN_NAME: &str = "column_name";
const LITERAL: &str = "literal";

/// An expression tree
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expression {
    /// A constant value.
    Literal(Value),
    /// A column reference, by external id or internal name.
    Column(ColumnRef),
    /// A registry function applied to ordered arguments.
    Call { id: String, args: Vec<Expression> },
}

impl Expression {
    pub fn literal<V: Into<Value>>(value: V) -> Self {
        Expression::Literal(value.into())
    }

    pub fn column_id(id: u64) -> Self {
        Expression::Column(ColumnRef::Id(ColumnId(id)))
    }

    pub fn column_name<N: Into<ColumnName>>(name: N) -> Self {
        Expression::Column(ColumnRef::Name(name.into()))
    }

    pub fn call<S: Into<String>>(id: S, args: Vec<Expression>) -> Self {
        Expression::Call {
            id: id.into(),
            args,
        }
    }

    /// Decode the JSON wire form
    pub fn from_spec(spec: &serde_json::Value) -> Result<Self> {
        let object = spec
            .as_object()
            .ok_or_else(|| Error::BadFunctionFormat(format!("expected an object, got {}", spec)))?;

        let mut entries = object.iter();
        let (id, args) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(Error::BadFunctionFormat(format!(
                    "expected exactly one function id, got {}",
                    spec
                )));
            }
        };

        let args = args.as_array().ok_or_else(|| {
            Error::BadFunctionFormat(format!("arguments of {} must be a list", id))
        })?;

        match id.as_str() {
            LITERAL => match args.as_slice() {
                [value] => Ok(Expression::Literal(Value::from_json(value))),
                _ => Err(Error::BadFunctionFormat(
                    "literal takes exactly one argument".into(),
                )),
            },
            COLUMN_ID => match args.as_slice() {
                [id] => id
                    .as_u64()
                    .map(Expression::column_id)
                    .ok_or_else(|| Error::BadFunctionFormat(format!("invalid column id: {}", id))),
                _ => Err(Error::BadFunctionFormat(
                    "column_id takes exactly one argument".into(),
                )),
            },
            COLUMN_NAME => match args.as_slice() {
                [name] => name
                    .as_str()
                    .map(Expression::column_name)
                    .ok_or_else(|| {
                        Error::BadFunctionFormat(format!("invalid column name: {}", name))
                    }),
                _ => Err(Error::BadFunctionFormat(
                    "column_name takes exactly one argument".into(),
                )),
            },
            _ => Ok(Expression::Call {
                id: id.clone(),
                args: args
                    .iter()
                    .map(Expression::from_spec)
                    .collect::<Result<Vec<_>>>()?,
            }),
        }
    }

    /// Encode back to the JSON wire form
    pub fn to_spec(&self) -> serde_json::Value {
        let (id, args) = match self {
            Expression::Literal(value) => (
                LITERAL,
                vec![serde_json::to_value(value).unwrap_or(serde_json::Value::Null)],
            ),
            Expression::Column(ColumnRef::Id(id)) => (COLUMN_ID, vec![serde_json::json!(id.0)]),
            Expression::Column(ColumnRef::Name(name)) => {
                (COLUMN_NAME, vec![serde_json::json!(name.as_str())])
            }
            Expression::Call { id, args } => {
                let mut object = serde_json::Map::new();
                object.insert(
                    id.clone(),
                    serde_json::Value::Array(args.iter().map(Expression::to_spec).collect()),
                );
                return serde_json::Value::Object(object);
            }
        };
        serde_json::json!({ id: args })
    }

    /// Replace every external column id with the internal name it maps to.
    ///
    /// Returns a new tree and leaves `self` untouched. Fails without producing
    /// any output if an id is missing from the mapping, reporting all of them.
    pub fn rewrite(&self, mapping: &ColumnMapping) -> Result<Expression> {
        let missing: Vec<ColumnId> = self
            .column_ids()
            .into_iter()
            .filter(|id| mapping.name_of(*id).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(Error::UnresolvedColumn(missing));
        }
        Ok(self.rewritten(mapping))
    }

    fn rewritten(&self, mapping: &ColumnMapping) -> Expression {
        match self {
            Expression::Column(ColumnRef::Id(id)) => match mapping.name_of(*id) {
                Some(name) => Expression::Column(ColumnRef::Name(name.clone())),
                None => self.clone(),
            },
            Expression::Call { id, args } => Expression::Call {
                id: id.clone(),
                args: args.iter().map(|arg| arg.rewritten(mapping)).collect(),
            },
            other => other.clone(),
        }
    }

    /// External column ids referenced anywhere in the tree, sorted
    pub fn column_ids(&self) -> BTreeSet<ColumnId> {
        let mut ids = BTreeSet::new();
        self.walk(&mut |expr| {
            if let Expression::Column(ColumnRef::Id(id)) = expr {
                ids.insert(*id);
            }
        });
        ids
    }

    /// Internal column names referenced anywhere in the tree, sorted
    pub fn column_names(&self) -> BTreeSet<ColumnName> {
        let mut names = BTreeSet::new();
        self.walk(&mut |expr| {
            if let Expression::Column(ColumnRef::Name(name)) = expr {
                names.insert(name.clone());
            }
        });
        names
    }

    /// Visit every node, parents before children
    pub fn walk<F: FnMut(&Expression)>(&self, visit: &mut F) {
        visit(self);
        if let Expression::Call { args, .. } = self {
            for arg in args {
                arg.walk(visit);
            }
        }
    }

    /// Output column name when this expression is used as a projection.
    ///
    /// A bare column, or a passthrough of one, keeps the column's name.
    pub fn label(&self) -> String {
        match self {
            Expression::Column(ColumnRef::Name(name)) => name.to_string(),
            Expression::Column(ColumnRef::Id(id)) => format!("column_{}", id),
            Expression::Literal(_) => LITERAL.to_string(),
            Expression::Call { id, args } if id == "identity" && args.len() == 1 => {
                args[0].label()
            }
            Expression::Call { id, .. } => id.clone(),
        }
    }
}
