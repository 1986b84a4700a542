//! Listing configuration.
//!
//! A `ListingConfig` is built once and injected into the planner and the
//! facade. Precedence when loading: defaults < TOML file < environment.

use crate::errors::ListError;
use crate::listing::{
    AGGREGATE_SCAN_LIMIT, DEFAULT_OVERFETCH_FACTOR, DEFAULT_PAGE_SIZE, MAX_SCAN_CALLS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a non-aggregating page is filled when the store's pre-filter limit
/// leaves it short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStrategy {
    /// One scan per page, over-fetching by `overfetch_factor`.
    Fixed,
    /// Keep following the store continuation until the page can be filled.
    #[default]
    Adaptive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub table_name: String,
    pub partition_key: String,
    pub sort_key: String,
    pub discriminator_field: String,
    pub discriminator_value: String,
    pub ranking_field: String,
    pub legacy_ranking_field: Option<String>,
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub overfetch_factor: usize,
    pub aggregate_scan_limit: usize,
    pub max_scan_calls: usize,
    pub fill_strategy: FillStrategy,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            table_name: "events".to_string(),
            partition_key: "PK".to_string(),
            sort_key: "SK".to_string(),
            discriminator_field: "SK".to_string(),
            discriminator_value: "METADATA".to_string(),
            ranking_field: "created_at".to_string(),
            legacy_ranking_field: Some("createdAt".to_string()),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: 10_000,
            overfetch_factor: DEFAULT_OVERFETCH_FACTOR,
            aggregate_scan_limit: AGGREGATE_SCAN_LIMIT,
            max_scan_calls: MAX_SCAN_CALLS,
            fill_strategy: FillStrategy::Adaptive,
        }
    }
}

impl ListingConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    ///
    /// # Errors
    /// `ListError::Toml` for malformed TOML and `ListError::Config` if the
    /// result fails [`ListingConfig::validate`].
    pub fn from_toml_str(s: &str) -> Result<Self, ListError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Loads configuration from `path`, or from `SCANPAGE_CONFIG`, or from
    /// `./scanpage.toml` when present, then applies environment overrides.
    ///
    /// # Errors
    /// Returns an error if an explicitly named file cannot be read, if the file
    /// is not valid TOML, or if the result fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ListError> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("SCANPAGE_CONFIG").ok().map(PathBuf::from));
        let candidate = match explicit {
            Some(p) => Some((p, true)),
            None => std::env::current_dir().ok().map(|d| (d.join("scanpage.toml"), false)),
        };
        let mut cfg = match candidate {
            Some((p, required)) if required || p.exists() => {
                let s = std::fs::read_to_string(&p).map_err(|e| {
                    ListError::Io(format!("failed to read config {}: {e}", p.display()))
                })?;
                log::debug!("loaded listing config from {}", p.display());
                toml::from_str::<Self>(&s)?
            }
            _ => Self::default(),
        };
        cfg.apply_env();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Applies `SCANPAGE_TABLE`, `SCANPAGE_PAGE_SIZE`, `SCANPAGE_OVERFETCH` and
    /// `SCANPAGE_MAX_SCAN_CALLS`. Unparseable numbers are ignored.
    pub fn apply_env(&mut self) {
        if let Ok(s) = std::env::var("SCANPAGE_TABLE")
            && !s.trim().is_empty()
        {
            self.table_name = s.trim().to_string();
        }
        if let Some(n) = env_usize("SCANPAGE_PAGE_SIZE") {
            self.default_page_size = n;
        }
        if let Some(n) = env_usize("SCANPAGE_OVERFETCH") {
            self.overfetch_factor = n;
        }
        if let Some(n) = env_usize("SCANPAGE_MAX_SCAN_CALLS") {
            self.max_scan_calls = n;
        }
    }

    /// # Errors
    /// `ListError::Config` for empty names, identical key fields, zero sizes,
    /// or a default page size above the maximum.
    pub fn validate(&self) -> Result<(), ListError> {
        let names = [
            ("table_name", &self.table_name),
            ("partition_key", &self.partition_key),
            ("sort_key", &self.sort_key),
            ("discriminator_field", &self.discriminator_field),
            ("ranking_field", &self.ranking_field),
        ];
        for (what, v) in names {
            if v.trim().is_empty() {
                return Err(ListError::Config(format!("{what} must not be empty")));
            }
        }
        if self.partition_key == self.sort_key {
            return Err(ListError::Config(format!(
                "partition_key and sort_key must differ (both '{}')",
                self.partition_key
            )));
        }
        let sizes = [
            ("default_page_size", self.default_page_size),
            ("max_page_size", self.max_page_size),
            ("overfetch_factor", self.overfetch_factor),
            ("aggregate_scan_limit", self.aggregate_scan_limit),
            ("max_scan_calls", self.max_scan_calls),
        ];
        for (what, v) in sizes {
            if v == 0 {
                return Err(ListError::Config(format!("{what} must be positive")));
            }
        }
        if self.default_page_size > self.max_page_size {
            return Err(ListError::Config(format!(
                "default_page_size {} exceeds max_page_size {}",
                self.default_page_size, self.max_page_size
            )));
        }
        Ok(())
    }
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|s| s.trim().parse::<usize>().ok())
}
