//! Pagination controller
//!
//! One call turns a `PageRequest` into a `Page`: rewrite column ids, compile,
//! count, fetch the window, group the window. The paginator keeps no state
//! between calls beyond its configuration.
//!
//! The count and the window are two separate storage calls and are not
//! read atomically. A write landing between them can leave `count` out of
//! step with the rows returned until the next request.

use crate::config::PaginationConfig;
use crate::error::{Parameter, Result};
use crate::grouping::{self, Grouping};
use crate::planning::{QuerySpec, compile};
use crate::request::PageRequest;
use crate::storage::{ColumnIdentifiers, TableDescriptor};
use crate::types::{GroupMode, Record, Row};
use serde::Serialize;

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Rows matching filter, function and dedupe, ignoring the window
    pub count: u64,
    /// Groups of the returned rows, absent when not requested or the page is empty
    pub grouping: Option<Grouping>,
    pub results: Vec<Record>,
}

/// Builds pages from listing requests
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    config: PaginationConfig,
}

impl Paginator {
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Serve one page of a table
    pub fn paginate<T>(&self, table: &T, request: &PageRequest) -> Result<Page>
    where
        T: TableDescriptor + ColumnIdentifiers + ?Sized,
    {
        let limit = self.config.clamp_limit(request.limit);
        let offset = self.config.clamp_offset(request.offset);

        // Only fetch the id mapping when there is something to rewrite
        let (filter, function) = if request.filter.is_some() || request.function.is_some() {
            let mapping = table.column_id_to_name()?;
            let filter = request
                .filter
                .as_ref()
                .map(|f| f.rewrite(&mapping))
                .transpose()
                .map_err(|e| e.at(Parameter::Filter))?;
            let function = request
                .function
                .as_ref()
                .map(|f| f.rewrite(&mapping))
                .transpose()
                .map_err(|e| e.at(Parameter::Function))?;
            (filter, function)
        } else {
            (None, None)
        };

        let spec = QuerySpec {
            filter,
            function,
            order_by: request.order_by.clone(),
            grouping: request.grouping.clone(),
            duplicate_only: request.duplicate_only.clone(),
            deduplicate: request.deduplicate,
            limit: Some(limit),
            offset,
        };
        let query = compile(table.schema(), &spec)?;

        let count = table.count(&query.count_query())?;
        let results = table.execute(&query)?;

        let grouping = match &query.grouping {
            Some(spec) if !results.is_empty() => {
                let domain: Option<Vec<Row>> = match spec.mode() {
                    GroupMode::Percentile { .. } => Some(
                        table
                            .execute(&query.domain_query(spec.columns())?)?
                            .into_iter()
                            .map(|record| record.values().to_vec())
                            .collect(),
                    ),
                    GroupMode::Distinct => None,
                };
                Some(
                    grouping::group_with_domain(&results, spec, domain.as_deref())
                        .map_err(|e| e.at(Parameter::Grouping))?,
                )
            }
            _ => None,
        };

        tracing::debug!(
            "Paginated {}: count={} limit={} offset={} returned={} groups={:?}",
            table.schema().name,
            count,
            limit,
            offset,
            results.len(),
            grouping.as_ref().map(|g| g.num_groups)
        );

        Ok(Page {
            count,
            grouping,
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Expression;
    use crate::storage::MemoryTable;
    use crate::types::{Column, DataType, GroupSpecification, SortDirective, Table, Value};

    fn table() -> MemoryTable {
        let schema = Table::new(
            "patents",
            vec![
                Column::new(1, "id", DataType::I64).primary_key(),
                Column::new(2, "Center", DataType::Str),
            ],
        )
        .unwrap();
        let table = MemoryTable::new(schema).unwrap();
        for (id, center) in [(1, "Kennedy"), (2, "Ames"), (3, "Ames"), (4, "Glenn")] {
            table
                .insert_named([("id", Value::integer(id)), ("Center", Value::string(center))])
                .unwrap();
        }
        table
    }

    #[test]
    fn test_limit_clamped() {
        let paginator = Paginator::new(PaginationConfig::default().with_max_limit(2));
        let page = paginator
            .paginate(&table(), &PageRequest::new().window(100, -3))
            .unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.count, 4);
    }

    #[test]
    fn test_filter_by_column_id() {
        let request = PageRequest::new().filter(Expression::call(
            "equal",
            vec![
                Expression::column_id(2),
                Expression::literal(Value::string("Ames")),
            ],
        ));
        let page = Paginator::default().paginate(&table(), &request).unwrap();
        assert_eq!(page.count, 2);
        assert!(page.grouping.is_none());
    }

    #[test]
    fn test_unresolved_id_tagged() {
        let request =
            PageRequest::new().function(Expression::call("identity", vec![Expression::column_id(9)]));
        let err = Paginator::default().paginate(&table(), &request).unwrap_err();
        assert_eq!(err.parameter(), Some(Parameter::Function));
        assert_eq!(err.code(), "unresolved_column");
    }

    #[test]
    fn test_grouping_page_local() {
        let request = PageRequest::new()
            .order_by(vec![SortDirective::asc("id")])
            .grouping(GroupSpecification::distinct(["Center"]).unwrap())
            .window(3, 0);
        let page = Paginator::default().paginate(&table(), &request).unwrap();
        let grouping = page.grouping.unwrap();
        assert_eq!(grouping.num_groups, 2);
        assert_eq!(grouping.groups[1].result_indices, vec![1, 2]);
    }

    #[test]
    fn test_empty_window_has_no_grouping() {
        let request = PageRequest::new()
            .grouping(GroupSpecification::distinct(["Center"]).unwrap())
            .window(10, 50);
        let page = Paginator::default().paginate(&table(), &request).unwrap();
        assert!(page.results.is_empty());
        assert!(page.grouping.is_none());
        assert_eq!(page.count, 4);
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            serde_json::json!({"count": 4, "grouping": null, "results": []})
        );
    }
}
