// Pull the record array out of a `var x = [...]` style data file.

use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use serde_json::{Map, Value};

/// One entry of a data file, keys as they appear upstream.
pub type Record = Map<String, Value>;

const ARRAY_MARKER: &str = "[{";

/// Slice from the first `[{` to the end of `raw`, if the marker exists.
pub fn extract_array(raw: &str) -> Option<&str> {
    raw.find(ARRAY_MARKER).map(|start| &raw[start..])
}

/// Strip a JavaScript assignment or JSONP wrapper and return the text
/// starting at the embedded JSON value.
///
/// Tried in order: bare JSON, an `[var|let|const] name =` / `name(` prefix,
/// then the first `[{` in the text.
pub fn unwrap_payload(raw: &str) -> Result<&str> {
    let trimmed = raw.trim_start_matches('\u{feff}').trim_start();
    if starts_json(trimmed) {
        return Ok(trimmed);
    }

    let prefix_re = Regex::new(r"^(?:(?:var|let|const)\s+)?[A-Za-z_$][\w$.]*\s*(?:=|\()\s*")?;
    if let Some(m) = prefix_re.find(trimmed) {
        let rest = &trimmed[m.end()..];
        if starts_json(rest) {
            return Ok(rest);
        }
    }

    extract_array(trimmed).ok_or_else(|| anyhow!("no JSON array found in payload"))
}

fn starts_json(s: &str) -> bool {
    s.starts_with('[') || s.starts_with('{')
}

/// Parse one JSON array of objects from the start of `json`.
///
/// Whatever follows the array may only be wrapper residue (`)`, `;`, whitespace).
pub fn parse_records(json: &str) -> Result<Vec<Record>> {
    let mut stream = serde_json::Deserializer::from_str(json).into_iter::<Value>();
    let value = match stream.next() {
        Some(v) => v.context("payload is not valid JSON")?,
        None => bail!("payload is empty"),
    };

    let end = stream.byte_offset();
    let residue_re = Regex::new(r"^\s*\)?\s*;?\s*$")?;
    if !residue_re.is_match(&json[end..]) {
        bail!("unexpected content after JSON value at byte {end}");
    }

    let items = match value {
        Value::Array(items) => items,
        other => bail!("expected a JSON array of records, found {}", kind(&other)),
    };

    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(obj) => records.push(obj),
            other => bail!("record {idx} is {}, not an object", kind(&other)),
        }
    }
    Ok(records)
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
