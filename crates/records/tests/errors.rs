//! Rejected requests: every failure names its parameter and never reaches storage

mod common;

use common::{SpyTable, params, patents, request};
use tabula_records::{Error, PageRequest, Parameter, Paginator, Value};

fn rejected(table: &SpyTable, pairs: &[(&str, &str)]) -> Error {
    let request = PageRequest::from_params(&params(pairs)).unwrap();
    let err = Paginator::default().paginate(table, &request).unwrap_err();
    assert_eq!(table.storage_calls(), 0, "{:?} reached storage", pairs);
    err
}

#[test]
fn test_unknown_function_never_reaches_storage() {
    let table = SpyTable::new(patents());
    let err = rejected(
        &table,
        &[(
            "filter",
            r#"{"bogus_op": [{"column_id": [2]}, {"literal": ["x"]}]}"#,
        )],
    );
    assert_eq!(err.parameter(), Some(Parameter::Filter));
    assert_eq!(err.kind(), &Error::UnknownOperator("bogus_op".into()));
    assert_eq!(err.code(), "unknown_db_function_id");
}

#[test]
fn test_compile_errors_carry_parameter() {
    let cases: &[(&str, &str, Parameter, &str)] = &[
        (
            "filter",
            r#"{"equal": [{"column_id": [99]}, {"literal": ["x"]}]}"#,
            Parameter::Filter,
            "unresolved_column",
        ),
        (
            "filter",
            r#"{"empty": [{"column_name": ["Centre"]}]}"#,
            Parameter::Filter,
            "referenced_columns_dont_exist",
        ),
        (
            "filter",
            r#"{"to_lowercase": [{"column_id": [2]}]}"#,
            Parameter::Filter,
            "type_mismatch",
        ),
        (
            "filter",
            r#"{"not": [{"literal": [true]}, {"literal": [false]}]}"#,
            Parameter::Filter,
            "bad_db_function_format",
        ),
        (
            "db_function",
            r#"{"identity": [{"column_id": [42]}]}"#,
            Parameter::Function,
            "unresolved_column",
        ),
        (
            "order_by",
            r#"[{"field": "Inventor"}]"#,
            Parameter::OrderBy,
            "sort_field_not_found",
        ),
        (
            "order_by",
            r#"[{"field": "Center"}, {"field": "Center", "direction": "desc"}]"#,
            Parameter::OrderBy,
            "bad_sort_format",
        ),
        (
            "grouping",
            r#"{"columns": ["Inventor"]}"#,
            Parameter::Grouping,
            "group_field_not_found",
        ),
        (
            "duplicate_only",
            r#"["Centre"]"#,
            Parameter::DuplicateOnly,
            "referenced_columns_dont_exist",
        ),
    ];

    for (name, value, parameter, code) in cases {
        let table = SpyTable::new(patents());
        let err = rejected(&table, &[(*name, *value)]);
        assert_eq!(err.parameter(), Some(*parameter), "{}={}", name, value);
        assert_eq!(err.code(), *code, "{}={}", name, value);
    }
}

#[test]
fn test_sort_scope_follows_function() {
    // Once a function is applied only its output column can be sorted on
    let table = SpyTable::new(patents());
    let err = rejected(
        &table,
        &[
            ("db_function", r#"{"to_lowercase": [{"column_id": [3]}]}"#),
            ("order_by", r#"[{"field": "Center"}]"#),
        ],
    );
    assert_eq!(err.parameter(), Some(Parameter::OrderBy));
    assert_eq!(err.kind(), &Error::SortFieldNotFound("Center".into()));
}

#[test]
fn test_malformed_parameters_rejected_on_decode() {
    let err = PageRequest::from_params(&params(&[(
        "grouping",
        r#"{"columns": ["Center"], "mode": "median"}"#,
    )]))
    .unwrap_err();
    assert_eq!(err.parameter(), Some(Parameter::Grouping));
    assert_eq!(err.code(), "bad_group_format");

    let err = PageRequest::from_params(&params(&[("order_by", "[{")])).unwrap_err();
    assert_eq!(err.parameter(), Some(Parameter::OrderBy));
    assert!(err.to_string().starts_with("Invalid order_by"));
}

#[test]
fn test_valid_request_touches_storage() {
    let table = SpyTable::new(patents());
    let page = Paginator::default()
        .paginate(&table, &request(&[("limit", "2")]))
        .unwrap();
    assert_eq!(page.count, 12);
    assert_eq!(table.counts.get(), 1);
    assert_eq!(table.executes.get(), 1);
}

#[test]
fn test_not_null_violation() {
    let table = patents();
    let err = table
        .insert_named([
            ("id", Value::integer(13)),
            ("Status", Value::string("Issued")),
        ])
        .unwrap_err();
    assert_eq!(
        err,
        Error::NotNullViolation {
            table: "patents".into(),
            column: "Center".into(),
        }
    );
    assert_eq!(err.code(), "not_null_violation");
    assert_eq!(table.len(), 12);
}

#[test]
fn test_insert_type_mismatch() {
    let table = patents();
    let err = table
        .insert_named([
            ("id", Value::integer(13)),
            ("Center", Value::string("NASA Glenn Research Center")),
            ("Patent Expiration Date", Value::string("soon")),
        ])
        .unwrap_err();
    assert_eq!(err.code(), "type_mismatch");
}
