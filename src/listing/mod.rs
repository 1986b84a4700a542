// Telemetry is a submodule of listing
pub mod telemetry;

// Submodules for separation of concerns
mod aggregate;
mod cursor;
mod facade;
mod plan;
mod types;

pub use aggregate::{AggregateOutcome, PageAggregator, RankingField, rank_records};
pub use cursor::{CursorCodec, KeyPairCodec};
pub use facade::Lister;
pub use plan::ScanPlanner;
pub use types::{
    AGGREGATE_SCAN_LIMIT, DEFAULT_OVERFETCH_FACTOR, DEFAULT_PAGE_SIZE, FilterSpec, ListingResult,
    MAX_SCAN_CALLS, PagingParams, PagingRequest,
};
