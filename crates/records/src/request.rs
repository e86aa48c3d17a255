//! Listing requests
//!
//! Decodes raw query parameters into a typed `PageRequest`. Structured
//! parameters arrive as JSON-encoded strings:
//!
//! ```text
//! filter=        {"equal": [{"column_id": [2]}, {"literal": ["NASA Ames Research Center"]}]}
//! db_function=   {"to_lowercase": [{"column_id": [2]}]}
//! order_by=      [{"field": "Center", "direction": "desc"}]
//! grouping=      {"columns": ["Center"], "mode": "percentile", "num_groups": 4}
//! duplicate_only=["Center", "Status"]
//! deduplicate=   true
//! limit=         50
//! offset=        100
//! ```

use crate::config::PaginationConfig;
use crate::error::{Error, Parameter, Result};
use crate::expression::Expression;
use crate::types::{ColumnName, GroupSpecification, SortDirective};
use std::collections::HashMap;

/// A decoded listing request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRequest {
    pub filter: Option<Expression>,
    pub function: Option<Expression>,
    pub order_by: Vec<SortDirective>,
    pub grouping: Option<GroupSpecification>,
    pub duplicate_only: Option<Vec<ColumnName>>,
    pub deduplicate: bool,
    /// Requested page size, clamped by the paginator
    pub limit: Option<i64>,
    /// Requested offset, clamped by the paginator
    pub offset: Option<i64>,
}

impl PageRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Expression) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn function(mut self, function: Expression) -> Self {
        self.function = Some(function);
        self
    }

    pub fn order_by(mut self, order_by: Vec<SortDirective>) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn grouping(mut self, grouping: GroupSpecification) -> Self {
        self.grouping = Some(grouping);
        self
    }

    pub fn duplicate_only<I, N>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<ColumnName>,
    {
        self.duplicate_only = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    pub fn window(mut self, limit: i64, offset: i64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// Decode raw parameters with the default configuration
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self> {
        Self::from_params_with(params, &PaginationConfig::default())
    }

    /// Decode raw parameters.
    ///
    /// Each failure is tagged with the parameter it came from. Limit and
    /// offset never fail: unreadable values are treated as absent.
    pub fn from_params_with(
        params: &HashMap<String, String>,
        config: &PaginationConfig,
    ) -> Result<Self> {
        let filter = json_param(params, Parameter::Filter, Error::BadFunctionFormat)?
            .map(|spec| Expression::from_spec(&spec))
            .transpose()
            .map_err(|e| e.at(Parameter::Filter))?;

        let function = json_param(params, Parameter::Function, Error::BadFunctionFormat)?
            .map(|spec| Expression::from_spec(&spec))
            .transpose()
            .map_err(|e| e.at(Parameter::Function))?;

        let order_by = json_param(params, Parameter::OrderBy, Error::BadSortFormat)?
            .map(|spec| SortDirective::from_spec(&spec))
            .transpose()
            .map_err(|e| e.at(Parameter::OrderBy))?
            .unwrap_or_default();

        let grouping = json_param(params, Parameter::Grouping, Error::BadGroupFormat)?
            .map(|spec| GroupSpecification::from_spec(&spec, config.default_num_groups))
            .transpose()
            .map_err(|e| e.at(Parameter::Grouping))?;

        let duplicate_only =
            json_param(params, Parameter::DuplicateOnly, Error::BadDuplicateOnlyFormat)?
                .map(|spec| decode_columns(&spec))
                .transpose()
                .map_err(|e| e.at(Parameter::DuplicateOnly))?;

        let deduplicate = match raw_param(params, Parameter::Deduplicate) {
            None => false,
            Some(raw) => parse_bool(raw).ok_or_else(|| {
                Error::InvalidValue(format!("expected a boolean, got {}", raw))
                    .at(Parameter::Deduplicate)
            })?,
        };

        Ok(Self {
            filter,
            function,
            order_by,
            grouping,
            duplicate_only,
            deduplicate,
            limit: int_param(params, Parameter::Limit),
            offset: int_param(params, Parameter::Offset),
        })
    }
}

/// A parameter's raw value; empty values count as absent
fn raw_param(params: &HashMap<String, String>, parameter: Parameter) -> Option<&str> {
    params
        .get(parameter.name())
        .map(|raw| raw.trim())
        .filter(|raw| !raw.is_empty())
}

/// Decode a JSON parameter, `null` counts as absent
fn json_param(
    params: &HashMap<String, String>,
    parameter: Parameter,
    malformed: fn(String) -> Error,
) -> Result<Option<serde_json::Value>> {
    let Some(raw) = raw_param(params, parameter) else {
        return Ok(None);
    };
    match serde_json::from_str(raw) {
        Ok(serde_json::Value::Null) => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(e) => Err(malformed(format!("invalid JSON: {}", e)).at(parameter)),
    }
}

fn int_param(params: &HashMap<String, String>, parameter: Parameter) -> Option<i64> {
    raw_param(params, parameter).and_then(|raw| raw.parse().ok())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn decode_columns(spec: &serde_json::Value) -> Result<Vec<ColumnName>> {
    spec.as_array()
        .ok_or_else(|| Error::BadDuplicateOnlyFormat("expected a list of column names".into()))?
        .iter()
        .map(|column| {
            column.as_str().map(ColumnName::from).ok_or_else(|| {
                Error::BadDuplicateOnlyFormat(format!("column must be a string: {}", column))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GroupMode;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_decode_all() {
        let request = PageRequest::from_params(&params(&[
            ("filter", r#"{"equal": [{"column_id": [2]}, {"literal": ["Ames"]}]}"#),
            ("db_function", r#"{"identity": [{"column_id": [2]}]}"#),
            ("order_by", r#"[{"field": "Center", "direction": "desc"}]"#),
            ("grouping", r#"{"columns": ["Center"], "mode": "percentile"}"#),
            ("duplicate_only", r#"["Center"]"#),
            ("deduplicate", "True"),
            ("limit", "20"),
            ("offset", "40"),
        ]))
        .unwrap();

        assert!(request.filter.is_some());
        assert!(request.function.is_some());
        assert_eq!(request.order_by, vec![SortDirective::desc("Center")]);
        assert_eq!(
            request.grouping.unwrap().mode(),
            GroupMode::Percentile { num_groups: 5 }
        );
        assert_eq!(request.duplicate_only, Some(vec![ColumnName::from("Center")]));
        assert!(request.deduplicate);
        assert_eq!(request.limit, Some(20));
        assert_eq!(request.offset, Some(40));
    }

    #[test]
    fn test_empty_and_null_are_absent() {
        let request =
            PageRequest::from_params(&params(&[("filter", "null"), ("order_by", "  ")])).unwrap();
        assert_eq!(request, PageRequest::default());
    }

    #[test]
    fn test_errors_carry_parameter() {
        let cases = [
            ("filter", "{not json", Parameter::Filter, "bad_db_function_format"),
            ("filter", r#"{"literal": [1, 2]}"#, Parameter::Filter, "bad_db_function_format"),
            ("db_function", "[]", Parameter::Function, "bad_db_function_format"),
            ("order_by", r#"[{"field": 3}]"#, Parameter::OrderBy, "bad_sort_format"),
            ("grouping", r#"{"columns": []}"#, Parameter::Grouping, "bad_group_format"),
            ("duplicate_only", r#""Center""#, Parameter::DuplicateOnly, "bad_duplicate_only_format"),
            ("deduplicate", "maybe", Parameter::Deduplicate, "invalid_value"),
        ];

        for (name, value, parameter, code) in cases {
            let err = PageRequest::from_params(&params(&[(name, value)])).unwrap_err();
            assert_eq!(err.parameter(), Some(parameter), "{}={}", name, value);
            assert_eq!(err.code(), code, "{}={}", name, value);
        }
    }

    #[test]
    fn test_unreadable_window_is_absent() {
        let request =
            PageRequest::from_params(&params(&[("limit", "lots"), ("offset", "-5")])).unwrap();
        assert_eq!(request.limit, None);
        assert_eq!(request.offset, Some(-5));
    }
}
