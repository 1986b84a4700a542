#![allow(dead_code)]

use async_trait::async_trait;
use scanpage::store::{ScanPage, ScanRequest};
use scanpage::{ListingConfig, MemoryStore, Record, ResumePoint, ScanStore, StoreError};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const TABLE: &str = "events";

pub fn store() -> MemoryStore {
    let s = MemoryStore::new("PK", "SK");
    s.create_table(TABLE);
    s
}

pub fn partition(seq: usize) -> String {
    // Key order runs opposite to `seq`, so scans visit the newest first.
    format!("EVENT#{:04}", 10_000 - seq)
}

pub fn created_at(seq: usize) -> String {
    let day = 1 + (seq - 1) / 24;
    let hour = (seq - 1) % 24;
    format!("2025-{:02}-{:02}T{hour:02}:00:00.000+09:00", 1 + (day - 1) / 28, 1 + (day - 1) % 28)
}

/// Primary record number `seq` (1-based; larger is newer).
pub fn event(seq: usize) -> Record {
    json!({
        "PK": partition(seq),
        "SK": "METADATA",
        "seq": seq,
        "created_at": created_at(seq),
        "homepage": if seq % 2 == 0 { "seoul" } else { "busan" },
    })
    .as_object()
    .cloned()
    .unwrap()
}

pub fn detail(seq: usize, n: usize) -> Record {
    json!({
        "PK": partition(seq),
        "SK": format!("DETAIL#{n}"),
        "seq": seq,
        "created_at": created_at(seq),
    })
    .as_object()
    .cloned()
    .unwrap()
}

/// Seeds primaries `1..=n`, each with `details` sub-records.
pub fn seed(store: &MemoryStore, n: usize, details: usize) {
    for seq in 1..=n {
        store.put(TABLE, event(seq)).unwrap();
        for d in 0..details {
            store.put(TABLE, detail(seq, d)).unwrap();
        }
    }
}

pub fn seeded(n: usize, details: usize) -> Arc<MemoryStore> {
    let s = store();
    seed(&s, n, details);
    Arc::new(s)
}

pub fn seqs(items: &[Record]) -> Vec<usize> {
    items.iter().map(|r| r["seq"].as_u64().unwrap() as usize).collect()
}

pub fn config() -> ListingConfig {
    ListingConfig::default()
}

/// Delegates to a store and fails the `fail_on`-th scan (1-based).
pub struct FlakyStore {
    inner: Arc<dyn ScanStore>,
    fail_on: usize,
    calls: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: Arc<dyn ScanStore>, fail_on: usize) -> Self {
        Self { inner, fail_on, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScanStore for FlakyStore {
    async fn scan(&self, request: &ScanRequest) -> Result<ScanPage, StoreError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n == self.fail_on {
            return Err(StoreError::Unavailable(format!("injected failure on scan {n}")));
        }
        self.inner.scan(request).await
    }

    async fn get_by_key(
        &self,
        table: &str,
        partition_key: &str,
        sort_key: &str,
    ) -> Result<Option<Record>, StoreError> {
        self.inner.get_by_key(table, partition_key, sort_key).await
    }
}

/// Never reports exhaustion: every scan is empty and carries a continuation.
#[derive(Default)]
pub struct EndlessStore {
    calls: AtomicUsize,
}

impl EndlessStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScanStore for EndlessStore {
    async fn scan(&self, _request: &ScanRequest) -> Result<ScanPage, StoreError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ScanPage {
            items: Vec::new(),
            continuation: Some(ResumePoint::from_keys("PK", &format!("P#{n}"), "SK", "METADATA")),
            scanned_count: 0,
        })
    }

    async fn get_by_key(&self, _: &str, _: &str, _: &str) -> Result<Option<Record>, StoreError> {
        Ok(None)
    }
}
