//! Store contract consumed by the listing layer.
//!
//! A store can look up one record by key and scan a table with an optional
//! conjunctive equality filter. The scan limit bounds the records examined,
//! not the records returned; the filter runs afterwards.

mod memory;

pub use memory::MemoryStore;

use crate::errors::StoreError;
use crate::types::Record;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Store-native position to resume a scan after. Opaque to everything but
/// cursor codecs and store backends.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumePoint(Map<String, Value>);

impl ResumePoint {
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    #[must_use]
    pub fn from_keys(partition_field: &str, partition: &str, sort_field: &str, sort: &str) -> Self {
        let mut m = Map::new();
        m.insert(partition_field.to_string(), Value::String(partition.to_string()));
        m.insert(sort_field.to_string(), Value::String(sort.to_string()));
        Self(m)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: String,
    pub value: Value,
}

/// Conjunctive equality filter with the placeholder bindings an
/// expression-based backend needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpr {
    pub predicates: Vec<Predicate>,
}

impl FilterExpr {
    #[must_use]
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self { predicates }
    }

    /// `#f0 = :v0 AND #f1 = :v1 ...`; empty when there are no predicates.
    #[must_use]
    pub fn expression(&self) -> String {
        (0..self.predicates.len())
            .map(|i| format!("#f{i} = :v{i}"))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    #[must_use]
    pub fn attribute_names(&self) -> BTreeMap<String, String> {
        self.predicates
            .iter()
            .enumerate()
            .map(|(i, p)| (format!("#f{i}"), p.field.clone()))
            .collect()
    }

    #[must_use]
    pub fn attribute_values(&self) -> BTreeMap<String, Value> {
        self.predicates
            .iter()
            .enumerate()
            .map(|(i, p)| (format!(":v{i}"), p.value.clone()))
            .collect()
    }

    /// True when every predicate holds. A missing field never matches.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.predicates.iter().all(|p| record.get(&p.field) == Some(&p.value))
    }
}

/// One scan call.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    pub table: String,
    pub filter: FilterExpr,
    pub limit: usize,
    pub exclusive_start: Option<ResumePoint>,
}

/// Result of one scan call. `continuation` is present iff records remain
/// beyond the last examined one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPage {
    pub items: Vec<Record>,
    pub continuation: Option<ResumePoint>,
    pub scanned_count: usize,
}

#[async_trait]
pub trait ScanStore: Send + Sync {
    async fn scan(&self, request: &ScanRequest) -> Result<ScanPage, StoreError>;

    async fn get_by_key(
        &self,
        table: &str,
        partition_key: &str,
        sort_key: &str,
    ) -> Result<Option<Record>, StoreError>;
}
