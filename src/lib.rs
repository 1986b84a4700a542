//! Cursor-paginated, filterable, ranked listings over scan-only key-value
//! stores.
//!
//! The store can only scan a table with a pre-filter limit and resume after
//! a key. [`Lister`] turns that into stable pages: it over-fetches, keeps
//! scanning until a page can be filled, ranks by a timestamp-like field and
//! hands back an opaque URL-safe cursor for the next page.

pub mod config;
pub mod errors;
pub mod listing;
pub mod logger;
pub mod store;
pub mod types;
pub mod utils;

pub use config::{FillStrategy, ListingConfig};
pub use errors::{ListError, StoreError};
pub use listing::{
    CursorCodec, FilterSpec, KeyPairCodec, Lister, ListingResult, PagingParams, PagingRequest,
    RankingField,
};
pub use store::{MemoryStore, ResumePoint, ScanStore};
pub use types::Record;

/// Initializes logging from `SCANPAGE_LOG_*` environment variables.
///
/// # Errors
/// Returns an error if the log directory or files cannot be created.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    logger::configure_from_env()
}
