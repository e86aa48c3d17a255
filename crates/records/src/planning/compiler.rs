//! Query compiler
//!
//! Resolves a request's filter, function, sort, duplicate-only and grouping
//! directives against a table schema and emits one `ExecutableQuery`. Every
//! validation happens here, so a query that reaches storage is always valid.

use super::plan::{CompiledExpression, ExecutableQuery, FunctionRef, Node};
use crate::error::{Error, Parameter, Result};
use crate::expression::Expression;
use crate::functions;
use crate::types::{
    ColumnName, ColumnRef, DataType, Direction, GroupMode, GroupSpecification, SortDirective,
    Table,
};
use std::collections::HashSet;
use tabula_value::coercion::can_coerce;

/// The typed inputs of one query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    /// Boolean predicate over the table's columns
    pub filter: Option<Expression>,
    /// Column transform, replaces the output with a single column
    pub function: Option<Expression>,
    pub order_by: Vec<SortDirective>,
    pub grouping: Option<GroupSpecification>,
    pub duplicate_only: Option<Vec<ColumnName>>,
    pub deduplicate: bool,
    pub limit: Option<usize>,
    pub offset: usize,
}

/// Output columns visible at some point of the plan, with their types
struct Scope {
    columns: Vec<(ColumnName, DataType)>,
}

impl Scope {
    fn of_table(table: &Table) -> Self {
        Self {
            columns: table
                .columns
                .iter()
                .map(|c| (c.name.clone(), c.datatype))
                .collect(),
        }
    }

    fn resolve(&self, name: &ColumnName) -> Option<(usize, DataType)> {
        self.columns
            .iter()
            .position(|(n, _)| n == name)
            .map(|i| (i, self.columns[i].1))
    }

    fn names(&self) -> Vec<ColumnName> {
        self.columns.iter().map(|(n, _)| n.clone()).collect()
    }
}

/// Compile a query against a table schema
pub fn compile(table: &Table, spec: &QuerySpec) -> Result<ExecutableQuery> {
    let mut scope = Scope::of_table(table);
    let mut source = Node::Scan {
        table: table.name.clone(),
    };

    if let Some(filter) = &spec.filter {
        let (predicate, data_type) =
            compile_expression(filter, &scope).map_err(|e| e.at(Parameter::Filter))?;
        if !matches!(data_type, DataType::Bool | DataType::Null) {
            return Err(Error::TypeMismatch {
                expected: DataType::Bool.to_string(),
                found: data_type.to_string(),
            }
            .at(Parameter::Filter));
        }
        source = Node::Filter {
            source: Box::new(source),
            predicate,
        };
    }

    if let Some(function) = &spec.function {
        let (expression, data_type) =
            compile_expression(function, &scope).map_err(|e| e.at(Parameter::Function))?;
        let label = ColumnName::new(function.label());
        source = Node::Projection {
            source: Box::new(source),
            expressions: vec![expression],
            labels: vec![label.clone()],
        };
        scope = Scope {
            columns: vec![(label, data_type)],
        };
    }

    if let Some(columns) = &spec.duplicate_only {
        let positions =
            resolve_duplicate_only(columns, &scope).map_err(|e| e.at(Parameter::DuplicateOnly))?;
        source = Node::DuplicateOnly {
            source: Box::new(source),
            columns: positions,
        };
    }

    if spec.deduplicate {
        source = Node::Distinct {
            source: Box::new(source),
        };
    }

    let order_by = resolve_order_by(table, &spec.order_by, &scope, spec.function.is_some())
        .map_err(|e| e.at(Parameter::OrderBy))?;

    if let Some(grouping) = &spec.grouping {
        validate_grouping(grouping, &scope).map_err(|e| e.at(Parameter::Grouping))?;
    }

    tracing::debug!(
        "Compiled query on {}: {} output columns, {} sort keys",
        table.name,
        scope.columns.len(),
        order_by.len()
    );

    Ok(ExecutableQuery {
        table: table.name.clone(),
        columns: scope.names(),
        source,
        order_by,
        offset: spec.offset,
        limit: spec.limit,
        grouping: spec.grouping.clone(),
    })
}

/// Resolve an expression tree against a scope, returning it with its type
fn compile_expression(
    expression: &Expression,
    scope: &Scope,
) -> Result<(CompiledExpression, DataType)> {
    let unresolved: Vec<_> = expression.column_ids().into_iter().collect();
    if !unresolved.is_empty() {
        return Err(Error::UnresolvedColumn(unresolved));
    }

    let missing: Vec<String> = expression
        .column_names()
        .into_iter()
        .filter(|name| scope.resolve(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::ReferencedColumnsDontExist(missing));
    }

    resolve_expression(expression, scope)
}

fn resolve_expression(
    expression: &Expression,
    scope: &Scope,
) -> Result<(CompiledExpression, DataType)> {
    match expression {
        Expression::Literal(value) => {
            Ok((CompiledExpression::Constant(value.clone()), value.data_type()))
        }

        Expression::Column(ColumnRef::Name(name)) => scope
            .resolve(name)
            .map(|(index, data_type)| (CompiledExpression::Column(index), data_type))
            .ok_or_else(|| Error::ReferencedColumnsDontExist(vec![name.to_string()])),

        Expression::Column(ColumnRef::Id(id)) => Err(Error::UnresolvedColumn(vec![*id])),

        Expression::Call { id, args } => {
            let function = functions::resolve(id)?;

            let mut resolved = args
                .iter()
                .map(|arg| resolve_expression(arg, scope))
                .collect::<Result<Vec<_>>>()?;

            if function.signature().coerce_literals {
                coerce_literals(&mut resolved)?;
            }

            let arg_types: Vec<DataType> = resolved.iter().map(|(_, t)| *t).collect();
            let data_type = functions::validate_call(function, &arg_types)?;

            Ok((
                CompiledExpression::Call {
                    function: FunctionRef(function),
                    args: resolved.into_iter().map(|(e, _)| e).collect(),
                },
                data_type,
            ))
        }
    }
}

/// Convert literal arguments to the type of the first non-literal argument,
/// so comparisons follow the column's native collation.
fn coerce_literals(args: &mut [(CompiledExpression, DataType)]) -> Result<()> {
    let target = args
        .iter()
        .find(|(e, _)| !matches!(e, CompiledExpression::Constant(_)))
        .map(|(_, t)| *t);

    let Some(target) = target else {
        return Ok(());
    };

    for (expression, data_type) in args.iter_mut() {
        if let CompiledExpression::Constant(value) = expression
            && *data_type != target
            && can_coerce(data_type, &target)
        {
            let coerced = value.coerce_to(&target)?;
            *data_type = coerced.data_type();
            *value = coerced;
        }
    }

    Ok(())
}

fn resolve_duplicate_only(columns: &[ColumnName], scope: &Scope) -> Result<Vec<usize>> {
    if columns.is_empty() {
        return Err(Error::BadDuplicateOnlyFormat(
            "duplicate_only needs at least one column".into(),
        ));
    }

    let missing: Vec<String> = columns
        .iter()
        .filter(|name| scope.resolve(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::ReferencedColumnsDontExist(missing));
    }

    Ok(columns
        .iter()
        .filter_map(|name| scope.resolve(name).map(|(i, _)| i))
        .collect())
}

/// Resolve sort directives to output positions.
///
/// The primary key is appended as a final ascending key when it is part of
/// the output and not sorted on already, so windows are reproducible.
fn resolve_order_by(
    table: &Table,
    order_by: &[SortDirective],
    scope: &Scope,
    projected: bool,
) -> Result<Vec<(usize, Direction)>> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::with_capacity(order_by.len() + 1);

    for directive in order_by {
        if !seen.insert(&directive.field) {
            return Err(Error::BadSortFormat(format!(
                "field {} is sorted on more than once",
                directive.field
            )));
        }
        let (index, _) = scope
            .resolve(&directive.field)
            .ok_or_else(|| Error::SortFieldNotFound(directive.field.to_string()))?;
        resolved.push((index, directive.direction));
    }

    if !projected
        && let Some(pk) = table.primary_key
        && let Some(pk_column) = table.columns.get(pk)
        && !seen.contains(&pk_column.name)
    {
        resolved.push((pk, Direction::Ascending));
    }

    Ok(resolved)
}

fn validate_grouping(grouping: &GroupSpecification, scope: &Scope) -> Result<()> {
    for column in grouping.columns() {
        let (_, data_type) = scope
            .resolve(column)
            .ok_or_else(|| Error::GroupFieldNotFound(column.to_string()))?;

        if let GroupMode::Percentile { .. } = grouping.mode()
            && !data_type.is_orderable()
        {
            return Err(Error::InvalidGroupType {
                column: column.to_string(),
                data_type,
            });
        }
    }
    Ok(())
}
