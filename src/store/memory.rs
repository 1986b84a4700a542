use super::{ResumePoint, ScanPage, ScanRequest, ScanStore};
use crate::errors::StoreError;
use crate::types::Record;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

type RowKey = (String, String);

/// In-process partition store. Rows are kept in `(partition, sort)` key order
/// and scans walk that order.
pub struct MemoryStore {
    partition_key: String,
    sort_key: String,
    tables: RwLock<HashMap<String, BTreeMap<RowKey, Record>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(partition_key: &str, sort_key: &str) -> Self {
        Self {
            partition_key: partition_key.to_string(),
            sort_key: sort_key.to_string(),
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Creates `name` if missing. Returns true if the table was created.
    pub fn create_table(&self, name: &str) -> bool {
        let mut g = self.tables.write();
        if g.contains_key(name) {
            return false;
        }
        g.insert(name.to_string(), BTreeMap::new());
        true
    }

    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of records in `table`, or `None` if the table does not exist.
    #[must_use]
    pub fn len(&self, table: &str) -> Option<usize> {
        self.tables.read().get(table).map(BTreeMap::len)
    }

    /// Inserts or overwrites a record. Both key fields must be strings.
    ///
    /// # Errors
    /// `StoreError::InvalidKey` if a key field is missing or not a string,
    /// `StoreError::NoSuchTable` if `table` does not exist.
    pub fn put(&self, table: &str, record: Record) -> Result<(), StoreError> {
        let key = self.row_key(&record)?;
        let mut g = self.tables.write();
        let rows = g.get_mut(table).ok_or_else(|| StoreError::NoSuchTable(table.to_string()))?;
        rows.insert(key, record);
        Ok(())
    }

    /// Removes a record. Returns true if it existed.
    ///
    /// # Errors
    /// `StoreError::NoSuchTable` if `table` does not exist.
    pub fn delete(&self, table: &str, partition: &str, sort: &str) -> Result<bool, StoreError> {
        let mut g = self.tables.write();
        let rows = g.get_mut(table).ok_or_else(|| StoreError::NoSuchTable(table.to_string()))?;
        Ok(rows.remove(&(partition.to_string(), sort.to_string())).is_some())
    }

    /// Merges the non-null `fields` into an existing record and returns the
    /// whole updated record. `updated_at` is stamped unless supplied.
    ///
    /// # Errors
    /// `NoFieldsToUpdate` when every field is null, `InvalidKey` when a key
    /// field is among them, `NoSuchTable` or `NoSuchRecord` when the target
    /// is missing.
    pub fn update_fields(
        &self,
        table: &str,
        partition: &str,
        sort: &str,
        fields: Record,
    ) -> Result<Record, StoreError> {
        let mut changes: Vec<(String, Value)> =
            fields.into_iter().filter(|(_, v)| !v.is_null()).collect();
        if changes.is_empty() {
            return Err(StoreError::NoFieldsToUpdate);
        }
        if let Some((k, _)) =
            changes.iter().find(|(k, _)| *k == self.partition_key || *k == self.sort_key)
        {
            return Err(StoreError::InvalidKey(format!("key field '{k}' cannot be updated")));
        }
        if !changes.iter().any(|(k, _)| k == "updated_at") {
            changes.push((
                "updated_at".to_string(),
                Value::String(crate::utils::time::kst_now_iso_string()),
            ));
        }
        let mut g = self.tables.write();
        let rows = g.get_mut(table).ok_or_else(|| StoreError::NoSuchTable(table.to_string()))?;
        let row = rows
            .get_mut(&(partition.to_string(), sort.to_string()))
            .ok_or_else(|| StoreError::NoSuchRecord(format!("{partition}/{sort}")))?;
        for (k, v) in changes {
            row.insert(k, v);
        }
        Ok(row.clone())
    }

    fn row_key(&self, record: &Record) -> Result<RowKey, StoreError> {
        let field = |name: &str| {
            record.get(name).and_then(Value::as_str).map(str::to_string).ok_or_else(|| {
                StoreError::InvalidKey(format!("record is missing string key field '{name}'"))
            })
        };
        Ok((field(&self.partition_key)?, field(&self.sort_key)?))
    }

    fn resume_key(&self, resume: &ResumePoint) -> Result<RowKey, StoreError> {
        match (resume.get_str(&self.partition_key), resume.get_str(&self.sort_key)) {
            (Some(p), Some(s)) => Ok((p.to_string(), s.to_string())),
            _ => Err(StoreError::InvalidKey(format!(
                "resume point must carry string '{}' and '{}'",
                self.partition_key, self.sort_key
            ))),
        }
    }
}

#[async_trait]
impl ScanStore for MemoryStore {
    async fn scan(&self, request: &ScanRequest) -> Result<ScanPage, StoreError> {
        let start = match &request.exclusive_start {
            Some(r) => Bound::Excluded(self.resume_key(r)?),
            None => Bound::Unbounded,
        };
        let g = self.tables.read();
        let rows = g
            .get(&request.table)
            .ok_or_else(|| StoreError::NoSuchTable(request.table.clone()))?;
        let limit = request.limit.max(1);
        let mut iter = rows.range((start, Bound::Unbounded));
        let mut page = ScanPage::default();
        let mut last: Option<&RowKey> = None;
        for (key, record) in iter.by_ref().take(limit) {
            page.scanned_count += 1;
            last = Some(key);
            if request.filter.matches(record) {
                page.items.push(record.clone());
            }
        }
        if iter.next().is_some()
            && let Some((p, s)) = last
        {
            page.continuation =
                Some(ResumePoint::from_keys(&self.partition_key, p, &self.sort_key, s));
        }
        Ok(page)
    }

    async fn get_by_key(
        &self,
        table: &str,
        partition_key: &str,
        sort_key: &str,
    ) -> Result<Option<Record>, StoreError> {
        let g = self.tables.read();
        let rows = g.get(table).ok_or_else(|| StoreError::NoSuchTable(table.to_string()))?;
        Ok(rows.get(&(partition_key.to_string(), sort_key.to_string())).cloned())
    }
}
