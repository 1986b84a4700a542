use crate::store::{FilterExpr, Predicate};
use crate::types::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_OVERFETCH_FACTOR: usize = 3;
/// Per-call scan limit in aggregate mode: as much as the store will hand back.
pub const AGGREGATE_SCAN_LIMIT: usize = 1_000;
pub const MAX_SCAN_CALLS: usize = 10_000;
pub(crate) const MAX_CURSOR_LEN: usize = 4096;

/// Conjunctive equality filter: a mandatory discriminator plus at most one
/// caller-supplied predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    discriminator: Predicate,
    extra: Option<Predicate>,
}

impl FilterSpec {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { discriminator: Predicate { field: field.into(), value: value.into() }, extra: None }
    }

    /// Adds (or replaces) the caller equality predicate.
    #[must_use]
    pub fn with_equals(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra = Some(Predicate { field: field.into(), value: value.into() });
        self
    }

    pub fn discriminator(&self) -> &Predicate {
        &self.discriminator
    }

    pub fn extra(&self) -> Option<&Predicate> {
        self.extra.as_ref()
    }

    /// Predicates in evaluation order.
    pub fn predicates(&self) -> impl Iterator<Item = &Predicate> {
        std::iter::once(&self.discriminator).chain(self.extra.iter())
    }

    #[must_use]
    pub fn to_expr(&self) -> FilterExpr {
        FilterExpr::new(self.predicates().cloned().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingRequest {
    pub page_size: usize,
    pub cursor: Option<String>,
    pub aggregate_all: bool,
}

impl Default for PagingRequest {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE, cursor: None, aggregate_all: false }
    }
}

impl PagingRequest {
    #[must_use]
    pub fn page(page_size: usize) -> Self {
        Self { page_size, ..Self::default() }
    }

    #[must_use]
    pub fn all() -> Self {
        Self { aggregate_all: true, ..Self::default() }
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor;
        self
    }

    /// Coerces raw request text. `limit` must parse as a positive integer or
    /// `default_page_size` is used; `all` is true only for exactly `"true"`;
    /// an empty cursor is absent.
    #[must_use]
    pub fn from_params(params: &PagingParams, default_page_size: usize) -> Self {
        let page_size = params
            .limit
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(default_page_size);
        let cursor = params.cursor.as_deref().map(str::trim).filter(|s| !s.is_empty());
        Self {
            page_size,
            cursor: cursor.map(str::to_string),
            aggregate_all: params.all.as_deref() == Some("true"),
        }
    }
}

/// Paging inputs as text, exactly as a request layer received them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingParams {
    pub limit: Option<String>,
    pub cursor: Option<String>,
    pub all: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResult {
    pub items: Vec<Record>,
    pub count: usize,
    pub next_cursor: Option<String>,
    /// Matching items collected by this call before slicing; not a global count.
    pub total_count: usize,
    pub has_more: bool,
}
