use crate::config::{FillStrategy, ListingConfig};
use crate::errors::ListError;
use crate::store::{ResumePoint, ScanStore};
use crate::types::Record;

use super::cursor::CursorCodec;
use super::plan::ScanPlanner;
use super::telemetry;
use super::types::{FilterSpec, ListingResult};

/// Field that orders listing output, with an optional legacy name consulted
/// when the primary one holds no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingField {
    primary: String,
    legacy: Option<String>,
}

impl RankingField {
    #[must_use]
    pub fn new(primary: &str, legacy: Option<&str>) -> Self {
        Self { primary: primary.to_string(), legacy: legacy.map(str::to_string) }
    }

    #[must_use]
    pub fn from_config(cfg: &ListingConfig) -> Self {
        Self::new(&cfg.ranking_field, cfg.legacy_ranking_field.as_deref())
    }

    /// The ranking value of `record`: a non-empty string under the primary
    /// name, else under the legacy name.
    #[must_use]
    pub fn value<'r>(&self, record: &'r Record) -> Option<&'r str> {
        let get = |name: &str| record.get(name).and_then(|v| v.as_str()).filter(|s| !s.is_empty());
        get(&self.primary).or_else(|| self.legacy.as_deref().and_then(get))
    }
}

/// Orders ranked records by descending byte order of their ranking value,
/// stable among equal values. Records without a ranking value stay at their
/// input positions; ranked records fill the remaining positions.
pub fn rank_records(records: &mut [Record], ranking: &RankingField) {
    let slots: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| ranking.value(r).is_some())
        .map(|(i, _)| i)
        .collect();
    if slots.len() < 2 {
        return;
    }
    let mut ranked: Vec<Record> = slots.iter().map(|&i| std::mem::take(&mut records[i])).collect();
    ranked.sort_by(|a, b| ranking.value(b).cmp(&ranking.value(a)));
    for (slot, record) in slots.into_iter().zip(ranked) {
        records[slot] = record;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOutcome {
    pub result: ListingResult,
    pub scan_calls: usize,
}

/// Drives the scans of one listing call. Holds no state between calls; the
/// accumulation buffer lives inside `run`.
pub struct PageAggregator<'a> {
    pub store: &'a dyn ScanStore,
    pub planner: &'a ScanPlanner,
    pub codec: &'a dyn CursorCodec,
    pub ranking: &'a RankingField,
    pub fill: FillStrategy,
    pub max_scan_calls: usize,
}

impl PageAggregator<'_> {
    /// Scans, ranks, slices and derives the next cursor.
    ///
    /// # Errors
    /// `ScanFailed` if any scan fails. In aggregate mode, `ScanBudgetExceeded`
    /// if the store is still reporting more data after `max_scan_calls` scans.
    /// Either way no partial result is returned. A single page that reaches
    /// the budget is returned short instead.
    pub async fn run(
        &self,
        filter: &FilterSpec,
        resume: Option<ResumePoint>,
        page_size: usize,
        aggregate: bool,
    ) -> Result<AggregateOutcome, ListError> {
        let page_size = page_size.max(1);
        let mut request = self.planner.plan(filter, resume, page_size, aggregate);
        let mut buffer: Vec<Record> = Vec::new();
        let mut calls = 0usize;
        loop {
            calls += 1;
            telemetry::record_scan();
            let page = match self.store.scan(&request).await {
                Ok(p) => p,
                Err(e) => {
                    telemetry::record_scan_failure();
                    log::error!("scan {calls} on '{}' failed: {e}", request.table);
                    return Err(ListError::ScanFailed(e));
                }
            };
            log::debug!(
                "scan {calls} on '{}': limit={} scanned={} matched={} more={}",
                request.table,
                request.limit,
                page.scanned_count,
                page.items.len(),
                page.continuation.is_some()
            );
            buffer.extend(page.items);
            let keep_going =
                aggregate || (self.fill == FillStrategy::Adaptive && buffer.len() <= page_size);
            let Some(next) = page.continuation.filter(|_| keep_going) else {
                break;
            };
            if calls >= self.max_scan_calls {
                if aggregate {
                    log::warn!(
                        "listing on '{}' exceeded the scan budget of {} calls",
                        request.table,
                        self.max_scan_calls
                    );
                    return Err(ListError::ScanBudgetExceeded { calls });
                }
                log::warn!(
                    "page on '{}' left short after {calls} scan calls",
                    request.table
                );
                break;
            }
            request.exclusive_start = Some(next);
        }

        rank_records(&mut buffer, self.ranking);
        let total_count = buffer.len();
        let has_more = !aggregate && buffer.len() > page_size;
        if !aggregate {
            buffer.truncate(page_size);
        }
        let next_cursor = if has_more {
            let token = buffer
                .last()
                .and_then(|r| self.codec.resume_after(r))
                .map(|r| self.codec.encode(&r));
            if token.is_none() {
                log::warn!("last item of a non-final page on '{}' has no key fields", request.table);
            }
            token
        } else {
            None
        };
        Ok(AggregateOutcome {
            result: ListingResult {
                count: buffer.len(),
                items: buffer,
                next_cursor,
                total_count,
                has_more,
            },
            scan_calls: calls,
        })
    }
}
