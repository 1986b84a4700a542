mod _support;

use _support::{TABLE, event, seeded, store};
use scanpage::listing::FilterSpec;
use scanpage::store::ScanRequest;
use scanpage::{MemoryStore, Record, ResumePoint, ScanStore, StoreError};
use serde_json::json;
use std::sync::Arc;

fn request(filter: &FilterSpec, limit: usize, start: Option<ResumePoint>) -> ScanRequest {
    ScanRequest { table: TABLE.into(), filter: filter.to_expr(), limit, exclusive_start: start }
}

fn primaries() -> FilterSpec {
    FilterSpec::new("SK", "METADATA")
}

#[tokio::test]
async fn scan_through_trait_object_walks_every_row() {
    let s: Arc<dyn ScanStore> = seeded(7, 2);
    let mut start = None;
    let mut scanned = 0;
    let mut matched = 0;
    let mut calls = 0;
    loop {
        let page = s.scan(&request(&primaries(), 4, start)).await.unwrap();
        calls += 1;
        scanned += page.scanned_count;
        matched += page.items.len();
        match page.continuation {
            Some(c) => start = Some(c),
            None => break,
        }
    }
    assert_eq!(scanned, 21);
    assert_eq!(matched, 7);
    assert_eq!(calls, 6);
}

#[tokio::test]
async fn limit_counts_examined_rows_not_matches() {
    let s = seeded(5, 3);
    let page = s.scan(&request(&primaries(), 6, None)).await.unwrap();
    assert_eq!(page.scanned_count, 6);
    // Four rows per partition: one full partition plus two sub-records.
    assert_eq!(page.items.len(), 1);
    assert!(page.continuation.is_some());
}

#[tokio::test]
async fn continuation_is_absent_once_rows_run_out() {
    let s = seeded(3, 0);
    let page = s.scan(&request(&primaries(), 3, None)).await.unwrap();
    assert_eq!(page.items.len(), 3);
    assert!(page.continuation.is_none());
}

#[tokio::test]
async fn resume_point_missing_key_fields_is_rejected() {
    let s = seeded(3, 0);
    let mut m = serde_json::Map::new();
    m.insert("PK".into(), json!("EVENT#1"));
    let err = s.scan(&request(&primaries(), 3, Some(ResumePoint::new(m)))).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidKey(_)));
}

#[tokio::test]
async fn get_by_key_finds_exact_rows() {
    let s = seeded(3, 1);
    let hit = s.get_by_key(TABLE, &_support::partition(2), "METADATA").await.unwrap();
    assert_eq!(hit.unwrap()["seq"], 2);
    let miss = s.get_by_key(TABLE, &_support::partition(2), "NOPE").await.unwrap();
    assert!(miss.is_none());
    let err = s.get_by_key("nope", "a", "b").await.unwrap_err();
    assert_eq!(err, StoreError::NoSuchTable("nope".into()));
}

#[test]
fn tables_are_created_once() {
    let s = MemoryStore::new("PK", "SK");
    assert!(s.create_table("a"));
    assert!(!s.create_table("a"));
    assert!(s.create_table("b"));
    assert_eq!(s.table_names(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(s.len("a"), Some(0));
    assert_eq!(s.len("zzz"), None);
}

#[test]
fn put_overwrites_same_key() {
    let s = store();
    s.put(TABLE, event(1)).unwrap();
    let mut newer = event(1);
    newer.insert("title".into(), json!("renamed"));
    s.put(TABLE, newer).unwrap();
    assert_eq!(s.len(TABLE), Some(1));
}

#[test]
fn put_requires_string_keys() {
    let s = store();
    let rec: Record = json!({"PK": 5, "SK": "METADATA"}).as_object().cloned().unwrap();
    assert!(matches!(s.put(TABLE, rec), Err(StoreError::InvalidKey(_))));
    assert!(matches!(s.put("missing", event(1)), Err(StoreError::NoSuchTable(_))));
}

#[tokio::test]
async fn update_fields_merges_and_stamps() {
    let s = seeded(2, 0);
    let pk = _support::partition(1);
    let fields: Record = json!({"title": "new", "ignored": null}).as_object().cloned().unwrap();
    let updated = s.update_fields(TABLE, &pk, "METADATA", fields).unwrap();
    assert_eq!(updated["title"], "new");
    assert!(updated.get("ignored").is_none());
    let stamp = updated["updated_at"].as_str().unwrap();
    assert!(stamp.ends_with("+09:00"), "{stamp}");
    let stored = s.get_by_key(TABLE, &pk, "METADATA").await.unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[test]
fn update_fields_errors() {
    let s = seeded(1, 0);
    let pk = _support::partition(1);
    let only_null: Record = json!({"x": null}).as_object().cloned().unwrap();
    assert_eq!(
        s.update_fields(TABLE, &pk, "METADATA", only_null),
        Err(StoreError::NoFieldsToUpdate)
    );
    let key_change: Record = json!({"SK": "OTHER"}).as_object().cloned().unwrap();
    assert!(matches!(
        s.update_fields(TABLE, &pk, "METADATA", key_change),
        Err(StoreError::InvalidKey(_))
    ));
    let fields: Record = json!({"x": 1}).as_object().cloned().unwrap();
    assert!(matches!(
        s.update_fields(TABLE, "EVENT#none", "METADATA", fields),
        Err(StoreError::NoSuchRecord(_))
    ));
}

#[test]
fn delete_reports_whether_row_existed() {
    let s = seeded(1, 0);
    let pk = _support::partition(1);
    assert!(s.delete(TABLE, &pk, "METADATA").unwrap());
    assert!(!s.delete(TABLE, &pk, "METADATA").unwrap());
}
