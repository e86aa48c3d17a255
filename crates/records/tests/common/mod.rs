//! Common test utilities for record listing integration tests
#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::Cell;
use std::collections::HashMap;
use tabula_records::planning::{CountQuery, ExecutableQuery};
use tabula_records::{
    Column, ColumnIdentifiers, ColumnMapping, DataType, MemoryTable, Page, PageRequest,
    Paginator, Record, Result, Table, TableDescriptor, Value,
};

/// (id, Center, Status, Case Number, Patent Expiration Date)
const PATENTS: &[(i64, &str, &str, &str, Option<&str>)] = &[
    (1, "NASA Kennedy Space Center", "Application", "KSC-12871", None),
    (2, "NASA Ames Research Center", "Issued", "ARC-14048-1", Some("2025-05-02")),
    (3, "NASA Ames Research Center", "Issued", "ARC-14231-1", Some("2026-12-27")),
    (4, "NASA Ames Research Center", "Application", "ARC-14231-2DIV", None),
    (5, "NASA Kennedy Space Center", "Issued", "KSC-12573", Some("2024-02-15")),
    (6, "NASA Glenn Research Center", "Issued", "LEW-18466-1", Some("2031-06-30")),
    (7, "NASA Langley Research Center", "Issued", "LAR-17623-1", Some("2029-11-10")),
    (8, "NASA Ames Research Center", "Issued", "ARC-15385-1", Some("2030-08-02")),
    (9, "NASA Glenn Research Center", "Application", "LEW-19050-1", None),
    (10, "NASA Kennedy Space Center", "Issued", "KSC-13032", Some("2027-09-17")),
    (11, "NASA Langley Research Center", "Application", "LAR-18501-1", None),
    (12, "NASA Ames Research Center", "Issued", "ARC-16170-1", Some("2032-01-04")),
];

pub fn date(s: &str) -> Value {
    Value::Date(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
}

/// Patents table schema. External column ids are 1..=5 in column order.
pub fn patents_schema() -> Table {
    Table::new(
        "patents",
        vec![
            Column::new(1, "id", DataType::I64).primary_key(),
            Column::new(2, "Center", DataType::Str).nullable(false),
            Column::new(3, "Status", DataType::Str),
            Column::new(4, "Case Number", DataType::Str),
            Column::new(5, "Patent Expiration Date", DataType::Date),
        ],
    )
    .unwrap()
}

/// Patents table with twelve rows
pub fn patents() -> MemoryTable {
    let table = MemoryTable::new(patents_schema()).unwrap();
    for (id, center, status, case_number, expires) in PATENTS {
        table
            .insert_named([
                ("id", Value::integer(*id)),
                ("Center", Value::string(*center)),
                ("Status", Value::string(*status)),
                ("Case Number", Value::string(*case_number)),
                (
                    "Patent Expiration Date",
                    expires.map(date).unwrap_or(Value::Null),
                ),
            ])
            .unwrap();
    }
    table
}

/// Single-column table without a primary key
pub fn letters(values: &[&str]) -> MemoryTable {
    let schema = Table::new("letters", vec![Column::new(1, "letter", DataType::Str)]).unwrap();
    let table = MemoryTable::new(schema).unwrap();
    for value in values {
        table.insert(vec![Value::string(*value)]).unwrap();
    }
    table
}

/// Float column `x` keyed by `id`, ids counting from 1
pub fn floats(values: &[f64]) -> MemoryTable {
    let schema = Table::new(
        "measurements",
        vec![
            Column::new(1, "id", DataType::I64).primary_key(),
            Column::new(2, "x", DataType::F64),
        ],
    )
    .unwrap();
    let table = MemoryTable::new(schema).unwrap();
    for (i, value) in values.iter().enumerate() {
        table
            .insert(vec![Value::integer(i as i64 + 1), Value::float(*value)])
            .unwrap();
    }
    table
}

/// The `x` of every record, in order
pub fn xs(records: &[Record]) -> Vec<f64> {
    records
        .iter()
        .map(|r| match r.get("x") {
            Some(Value::F64(x)) => *x,
            other => panic!("record without float x: {:?}", other),
        })
        .collect()
}

/// Serve a page with the default paginator
pub fn paginate<T: TableDescriptor + ColumnIdentifiers>(table: &T, request: &PageRequest) -> Page {
    Paginator::default().paginate(table, request).unwrap()
}

/// Decode raw parameters
pub fn request(pairs: &[(&str, &str)]) -> PageRequest {
    PageRequest::from_params(&params(pairs)).unwrap()
}

pub fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// The `id` of every record, in order
pub fn ids(records: &[Record]) -> Vec<i64> {
    records
        .iter()
        .map(|r| match r.get("id") {
            Some(Value::I64(id)) => *id,
            other => panic!("record without integer id: {:?}", other),
        })
        .collect()
}

/// A table descriptor that records every storage call
pub struct SpyTable {
    pub inner: MemoryTable,
    pub executes: Cell<usize>,
    pub counts: Cell<usize>,
}

impl SpyTable {
    pub fn new(inner: MemoryTable) -> Self {
        Self {
            inner,
            executes: Cell::new(0),
            counts: Cell::new(0),
        }
    }

    pub fn storage_calls(&self) -> usize {
        self.executes.get() + self.counts.get()
    }
}

impl TableDescriptor for SpyTable {
    fn schema(&self) -> &Table {
        self.inner.schema()
    }

    fn execute(&self, query: &ExecutableQuery) -> Result<Vec<Record>> {
        self.executes.set(self.executes.get() + 1);
        self.inner.execute(query)
    }

    fn count(&self, query: &CountQuery) -> Result<u64> {
        self.counts.set(self.counts.get() + 1);
        self.inner.count(query)
    }
}

impl ColumnIdentifiers for SpyTable {
    fn column_id_to_name(&self) -> Result<ColumnMapping> {
        self.inner.column_id_to_name()
    }
}
