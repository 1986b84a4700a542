use serde_json::{Map, Value};

/// A raw store record: any JSON object. Only the key fields and the ranking
/// field mean anything to the listing layer.
pub type Record = Map<String, Value>;
