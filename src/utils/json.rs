use crate::errors::ListError;
use crate::types::Record;
use serde_json::Value;
use std::io::{BufRead, BufReader, Read};

/// Reads records from either a top-level JSON array or NDJSON (one object
/// per line, blank lines skipped). Every element must be a JSON object.
///
/// # Errors
/// `ListError::Io` on read failures or non-object elements,
/// `ListError::Json` on malformed JSON.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>, ListError> {
    let mut br = BufReader::new(reader);
    let head = br.fill_buf().map_err(|e| ListError::Io(e.to_string()))?;
    let is_array = String::from_utf8_lossy(head).trim_start().starts_with('[');
    if is_array {
        let mut s = String::new();
        br.read_to_string(&mut s).map_err(|e| ListError::Io(e.to_string()))?;
        let val: Value = serde_json::from_str(&s)?;
        let Value::Array(items) = val else {
            return Err(ListError::Io("expected JSON array".into()));
        };
        return items.into_iter().enumerate().map(|(i, v)| into_record(v, i + 1)).collect();
    }
    let mut out = Vec::new();
    let mut buf = String::with_capacity(8 * 1024);
    let mut line_no: usize = 0;
    loop {
        buf.clear();
        let n = br.read_line(&mut buf).map_err(|e| ListError::Io(e.to_string()))?;
        if n == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }
        out.push(into_record(serde_json::from_str(line)?, line_no)?);
    }
    Ok(out)
}

fn into_record(v: Value, position: usize) -> Result<Record, ListError> {
    match v {
        Value::Object(m) => Ok(m),
        _ => Err(ListError::Io(format!("record {position} is not a JSON object"))),
    }
}
