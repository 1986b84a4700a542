use crate::errors::ListError;
use crate::store::ResumePoint;
use crate::types::Record;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use serde_json::{Map, Value};

use super::types::MAX_CURSOR_LEN;

/// Translates between store resume points and public cursor tokens.
///
/// `resume_after` reconstructs a resume point from a returned record, so a
/// backend with native continuation tokens can supply its own codec without
/// changing the listing contract.
pub trait CursorCodec: Send + Sync {
    fn encode(&self, resume: &ResumePoint) -> String;

    /// # Errors
    /// `ListError::InvalidCursor` for anything this codec did not produce.
    fn decode(&self, token: &str) -> Result<ResumePoint, ListError>;

    fn resume_after(&self, record: &Record) -> Option<ResumePoint>;
}

/// Cursor format: base64url(`{"<pk>":"..","<sk>":".."}`), no padding.
///
/// The token holds the keys of the last item of a ranked page and the next
/// scan resumes after those keys. Pages are gap- and duplicate-free only when
/// the store's key order matches descending ranking order; otherwise the next
/// page can repeat items and skip others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPairCodec {
    partition_key: String,
    sort_key: String,
}

impl KeyPairCodec {
    #[must_use]
    pub fn new(partition_key: &str, sort_key: &str) -> Self {
        Self { partition_key: partition_key.to_string(), sort_key: sort_key.to_string() }
    }

    fn decode_bytes(token: &str) -> Option<Vec<u8>> {
        [&URL_SAFE_NO_PAD, &URL_SAFE, &STANDARD, &STANDARD_NO_PAD]
            .into_iter()
            .find_map(|engine| engine.decode(token).ok())
    }
}

impl CursorCodec for KeyPairCodec {
    fn encode(&self, resume: &ResumePoint) -> String {
        let mut m = Map::new();
        for field in [&self.partition_key, &self.sort_key] {
            if let Some(v) = resume.get(field) {
                m.insert(field.clone(), v.clone());
            }
        }
        URL_SAFE_NO_PAD.encode(Value::Object(m).to_string())
    }

    fn decode(&self, token: &str) -> Result<ResumePoint, ListError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ListError::InvalidCursor("empty".into()));
        }
        if token.len() > MAX_CURSOR_LEN {
            return Err(ListError::InvalidCursor(format!("longer than {MAX_CURSOR_LEN} chars")));
        }
        let bytes = Self::decode_bytes(token)
            .ok_or_else(|| ListError::InvalidCursor("base64 decode failed".into()))?;
        let text = String::from_utf8(bytes)
            .map_err(|_| ListError::InvalidCursor("UTF-8 decode failed".into()))?;
        let map = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(m)) => m,
            Ok(_) => return Err(ListError::InvalidCursor("not a JSON object".into())),
            Err(e) => return Err(ListError::InvalidCursor(format!("JSON decode failed: {e}"))),
        };
        if map.len() != 2 {
            return Err(ListError::InvalidCursor(format!("expected 2 key fields, found {}", map.len())));
        }
        for field in [&self.partition_key, &self.sort_key] {
            match map.get(field) {
                Some(Value::String(_)) => {}
                Some(_) => {
                    return Err(ListError::InvalidCursor(format!("key field '{field}' is not a string")));
                }
                None => return Err(ListError::InvalidCursor(format!("missing key field '{field}'"))),
            }
        }
        Ok(ResumePoint::new(map))
    }

    fn resume_after(&self, record: &Record) -> Option<ResumePoint> {
        let pk = record.get(&self.partition_key)?.as_str()?;
        let sk = record.get(&self.sort_key)?.as_str()?;
        Some(ResumePoint::from_keys(&self.partition_key, pk, &self.sort_key, sk))
    }
}
