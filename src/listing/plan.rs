use crate::config::ListingConfig;
use crate::store::{ResumePoint, ScanRequest};

use super::types::FilterSpec;

/// Builds one scan request per step of a listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPlanner {
    table: String,
    overfetch_factor: usize,
    aggregate_scan_limit: usize,
}

impl ScanPlanner {
    #[must_use]
    pub fn new(table: &str, overfetch_factor: usize, aggregate_scan_limit: usize) -> Self {
        Self {
            table: table.to_string(),
            overfetch_factor: overfetch_factor.max(1),
            aggregate_scan_limit: aggregate_scan_limit.max(1),
        }
    }

    #[must_use]
    pub fn from_config(cfg: &ListingConfig) -> Self {
        Self::new(&cfg.table_name, cfg.overfetch_factor, cfg.aggregate_scan_limit)
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Per-call scan limit. The store limits before filtering, so a page is
    /// over-fetched by `overfetch_factor`; aggregation ignores `target`.
    #[must_use]
    pub fn scan_limit(&self, target: usize, aggregate: bool) -> usize {
        if aggregate {
            self.aggregate_scan_limit
        } else {
            target.saturating_mul(self.overfetch_factor).max(1)
        }
    }

    #[must_use]
    pub fn plan(
        &self,
        filter: &FilterSpec,
        resume: Option<ResumePoint>,
        target: usize,
        aggregate: bool,
    ) -> ScanRequest {
        ScanRequest {
            table: self.table.clone(),
            filter: filter.to_expr(),
            limit: self.scan_limit(target, aggregate),
            exclusive_start: resume,
        }
    }
}
