use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::SidecarError;

/// Values taken from one Google Photos JSON sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarRecord {
    /// When the photo was taken (epoch seconds, UTC).
    pub photo_taken_time: i64,
    /// When the photo was uploaded (epoch seconds, UTC).
    pub creation_time: i64,
    /// Names from the `people` list, in document order.
    pub people: Vec<String>,
}

/// `{"timestamp": "1700000000", "formatted": "..."}`
#[derive(Deserialize)]
struct TimeField {
    timestamp: Timestamp,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Timestamp {
    Text(String),
    Number(i64),
}

#[derive(Deserialize)]
struct Person {
    name: String,
}

/// Read and parse a sidecar file.
pub fn read_sidecar(path: &Path) -> Result<SidecarRecord, SidecarError> {
    let bytes = fs::read(path)?;
    parse_sidecar(&bytes)
}

/// Parse Google's JSON metadata.
///
/// Both timestamps are required; `people` is optional and entries without a
/// string `name` are dropped. A leading UTF-8 byte order mark is ignored.
pub fn parse_sidecar(json_bytes: &[u8]) -> Result<SidecarRecord, SidecarError> {
    let json_bytes = json_bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(json_bytes);
    let data: Value = serde_json::from_slice(json_bytes)?;

    let photo_taken_time = required_timestamp(&data, "photoTakenTime")?;
    let creation_time = required_timestamp(&data, "creationTime")?;

    let people = match data.get("people") {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|p| Person::deserialize(p).ok())
            .map(|p| p.name)
            .collect(),
        _ => Vec::new(),
    };

    Ok(SidecarRecord {
        photo_taken_time,
        creation_time,
        people,
    })
}

fn required_timestamp(data: &Value, field: &'static str) -> Result<i64, SidecarError> {
    let raw = data
        .get(field)
        .ok_or_else(|| SidecarError::schema(field, "is missing"))?;
    let time = TimeField::deserialize(raw)
        .map_err(|e| SidecarError::schema(field, format!("has no usable timestamp ({e})")))?;

    match time.timestamp {
        Timestamp::Number(epoch) => Ok(epoch),
        Timestamp::Text(s) => s
            .parse::<i64>()
            .map_err(|_| SidecarError::schema(field, format!("timestamp {s:?} is not an integer"))),
    }
}
