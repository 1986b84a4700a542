use crate::config::ListingConfig;
use crate::errors::ListError;
use crate::store::{ResumePoint, ScanStore};
use std::sync::Arc;
use std::time::Instant;

use super::aggregate::{PageAggregator, RankingField};
use super::cursor::{CursorCodec, KeyPairCodec};
use super::plan::ScanPlanner;
use super::telemetry;
use super::types::{FilterSpec, ListingResult, PagingParams, PagingRequest};

/// Public entry point of the listing layer.
pub struct Lister {
    store: Arc<dyn ScanStore>,
    config: ListingConfig,
    planner: ScanPlanner,
    ranking: RankingField,
    codec: Arc<dyn CursorCodec>,
}

impl Lister {
    #[must_use]
    pub fn new(store: Arc<dyn ScanStore>, config: ListingConfig) -> Self {
        let codec = Arc::new(KeyPairCodec::new(&config.partition_key, &config.sort_key));
        Self {
            store,
            planner: ScanPlanner::from_config(&config),
            ranking: RankingField::from_config(&config),
            codec,
            config,
        }
    }

    /// Replaces the key-pair cursor codec, e.g. for a backend with native
    /// continuation tokens.
    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn CursorCodec>) -> Self {
        self.codec = codec;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    #[must_use]
    pub fn codec(&self) -> &dyn CursorCodec {
        self.codec.as_ref()
    }

    /// The discriminator-only filter: primary records, no sub-records.
    #[must_use]
    pub fn base_filter(&self) -> FilterSpec {
        FilterSpec::new(&self.config.discriminator_field, self.config.discriminator_value.as_str())
    }

    /// Lists one page (or everything, in aggregate mode).
    ///
    /// An unusable cursor restarts from the first page instead of failing.
    ///
    /// # Errors
    /// `ListError::ScanFailed` when the store fails and
    /// `ListError::ScanBudgetExceeded` when an aggregating call reaches
    /// `max_scan_calls` and the store still reports more data.
    pub async fn list(
        &self,
        filter: &FilterSpec,
        paging: &PagingRequest,
    ) -> Result<ListingResult, ListError> {
        let start = Instant::now();
        let page_size = self.effective_page_size(paging.page_size);
        let resume = paging.cursor.as_deref().and_then(|t| self.decode_or_restart(t));
        let aggregator = PageAggregator {
            store: self.store.as_ref(),
            planner: &self.planner,
            codec: self.codec.as_ref(),
            ranking: &self.ranking,
            fill: self.config.fill_strategy,
            max_scan_calls: self.config.max_scan_calls,
        };
        let outcome = aggregator.run(filter, resume, page_size, paging.aggregate_all).await?;
        let elapsed = start.elapsed().as_millis();
        let filter_dbg = format!("{filter:?}");
        telemetry::log_list(
            self.planner.table(),
            &filter_dbg,
            elapsed,
            paging.aggregate_all,
            outcome.scan_calls,
            outcome.result.count,
        );
        crate::dev6!(
            "{{\"bench\":\"listing\",\"op\":\"list\",\"table\":\"{}\",\"duration_ms\":{},\"scan_calls\":{},\"result_count\":{},\"aggregate\":{}}}",
            self.planner.table(),
            crate::utils::num::u128_to_u64_saturating(elapsed),
            crate::utils::num::usize_to_u64(outcome.scan_calls),
            crate::utils::num::usize_to_u64(outcome.result.count),
            paging.aggregate_all
        );
        Ok(outcome.result)
    }

    /// Coerces raw request text (see [`PagingRequest::from_params`]) and lists.
    ///
    /// # Errors
    /// Same as [`Lister::list`].
    pub async fn list_params(
        &self,
        filter: &FilterSpec,
        params: &PagingParams,
    ) -> Result<ListingResult, ListError> {
        let paging = PagingRequest::from_params(params, self.config.default_page_size);
        self.list(filter, &paging).await
    }

    fn effective_page_size(&self, requested: usize) -> usize {
        if requested == 0 {
            return self.config.default_page_size;
        }
        if requested > self.config.max_page_size {
            log::warn!("page size {requested} clamped to {}", self.config.max_page_size);
            return self.config.max_page_size;
        }
        requested
    }

    fn decode_or_restart(&self, token: &str) -> Option<ResumePoint> {
        if token.trim().is_empty() {
            return None;
        }
        match self.codec.decode(token) {
            Ok(r) => Some(r),
            Err(e) => {
                telemetry::record_invalid_cursor();
                log::warn!("ignoring cursor on '{}': {e}", self.planner.table());
                None
            }
        }
    }
}
