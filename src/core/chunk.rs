//! Chunk and metadata records
//!
//! The index stores untyped metadata maps; everything above it works with the
//! fixed-shape records defined here.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

pub const DEFAULT_VERSION_TAG: &str = "v1.0";
pub const DEFAULT_SECURITY_TAG: &str = "Public";

pub const KEY_DATE: &str = "date";
pub const KEY_VERSION_TAG: &str = "version_tag";
pub const KEY_SECURITY_TAG: &str = "security_tag";
pub const KEY_SOURCE: &str = "source";

/// Caller-supplied metadata; any field may be left out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_tag: Option<String>,
}

impl MetadataInput {
    /// Fill in defaults, stamping a missing date with `now`
    pub fn resolve(self, now: NaiveDateTime) -> DocumentMetadata {
        DocumentMetadata {
            date: self.date.unwrap_or_else(|| format_iso(now)),
            version_tag: self
                .version_tag
                .unwrap_or_else(|| DEFAULT_VERSION_TAG.to_string()),
            security_tag: self
                .security_tag
                .unwrap_or_else(|| DEFAULT_SECURITY_TAG.to_string()),
        }
    }
}

/// Resolved per-document metadata record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub date: String,
    pub version_tag: String,
    pub security_tag: String,
}

impl DocumentMetadata {
    pub fn for_chunk(&self, source: &str) -> ChunkMetadata {
        ChunkMetadata {
            date: self.date.clone(),
            version_tag: self.version_tag.clone(),
            security_tag: self.security_tag.clone(),
            source: source.to_string(),
            extra: Map::new(),
        }
    }
}

/// Metadata carried by every stored chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub date: String,
    pub version_tag: String,
    pub security_tag: String,
    pub source: String,
    /// Keys beyond the four required ones, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChunkMetadata {
    pub fn into_map(self) -> Map<String, Value> {
        let mut map = self.extra;
        map.insert(KEY_DATE.to_string(), Value::String(self.date));
        map.insert(KEY_VERSION_TAG.to_string(), Value::String(self.version_tag));
        map.insert(KEY_SECURITY_TAG.to_string(), Value::String(self.security_tag));
        map.insert(KEY_SOURCE.to_string(), Value::String(self.source));
        map
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}

/// Chunk as the vector index holds it
#[derive(Debug, Clone, PartialEq)]
pub struct StoredChunk {
    pub content: String,
    pub metadata: Map<String, Value>,
}

impl TryFrom<StoredChunk> for Chunk {
    type Error = StoreError;

    fn try_from(stored: StoredChunk) -> Result<Self, Self::Error> {
        let mut extra = stored.metadata;
        let date = take_string(&mut extra, KEY_DATE)?;
        let security_tag = take_string(&mut extra, KEY_SECURITY_TAG)?;
        let version_tag = take_string(&mut extra, KEY_VERSION_TAG)?;
        // the ranker never reads `source`; a chunk without one still ranks
        let source = match extra.remove(KEY_SOURCE) {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        Ok(Chunk {
            content: stored.content,
            metadata: ChunkMetadata {
                date,
                version_tag,
                security_tag,
                source,
                extra,
            },
        })
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Result<String, StoreError> {
    match map.remove(key) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(StoreError::MalformedCandidate(format!(
            "metadata key '{}' is not a string: {}",
            key, other
        ))),
        None => Err(StoreError::MalformedCandidate(format!(
            "missing metadata key '{}'",
            key
        ))),
    }
}

/// Render a timestamp the way stored dates are written (microsecond precision)
pub fn format_iso(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Parse an ISO-8601 date or date/time.
///
/// Values with an offset are normalized to UTC; naive values are returned as
/// written. A bare date means midnight.
pub fn parse_iso_datetime(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(expanded) = expand_compact_form(s) {
        return parse_iso_datetime(&expanded);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    const OFFSET_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%d %H:%M%:z",
    ];
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Rewrite basic-format (`20230106`, `20230106T120000`) and hour-only
/// (`2023-01-06T12`) values into the extended forms parsed above
fn expand_compact_form(s: &str) -> Option<String> {
    if !s.is_ascii() {
        return None;
    }
    let digits = |range: std::ops::Range<usize>| s[range].bytes().all(|b| b.is_ascii_digit());
    let bytes = s.as_bytes();

    match s.len() {
        8 if digits(0..8) => Some(format!("{}-{}-{}", &s[0..4], &s[4..6], &s[6..8])),
        15 if digits(0..8) && bytes[8] == b'T' && digits(9..15) => Some(format!(
            "{}-{}-{}T{}:{}:{}",
            &s[0..4],
            &s[4..6],
            &s[6..8],
            &s[9..11],
            &s[11..13],
            &s[13..15]
        )),
        13 if digits(0..4) && matches!(bytes[10], b'T' | b' ') && digits(11..13) => {
            Some(format!("{}:00", s))
        }
        _ => None,
    }
}

/// Whole days between two instants.
///
/// The signed difference is floored before taking the absolute value, so an
/// instant half a day before the target counts as one day away.
pub fn day_distance(candidate: NaiveDateTime, target: NaiveDateTime) -> i64 {
    let delta = candidate - target;
    let mut days = delta.num_days();
    // num_days truncates toward zero; any negative remainder floors one further
    if delta < Duration::days(days) {
        days -= 1;
    }
    days.abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(s: &str) -> NaiveDateTime {
        parse_iso_datetime(s).unwrap()
    }

    #[test]
    fn test_resolve_defaults() {
        let now = at("2024-03-05T10:11:12.000345");
        let resolved = MetadataInput::default().resolve(now);
        assert_eq!(resolved.date, "2024-03-05T10:11:12.000345");
        assert_eq!(resolved.version_tag, "v1.0");
        assert_eq!(resolved.security_tag, "Public");
    }

    #[test]
    fn test_resolve_keeps_supplied_fields() {
        let input = MetadataInput {
            date: Some("2023-01-01".to_string()),
            version_tag: None,
            security_tag: Some("Restricted".to_string()),
        };
        let resolved = input.resolve(at("2024-01-01"));
        assert_eq!(resolved.date, "2023-01-01");
        assert_eq!(resolved.version_tag, "v1.0");
        assert_eq!(resolved.security_tag, "Restricted");
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(at("2023-01-06"), at("2023-01-06T00:00:00"));
        assert_eq!(at("2023-01-06T12:30"), at("2023-01-06 12:30:00"));
        assert_eq!(at("2023-01-06T12:30:00.250000"), at("2023-01-06T12:30:00.25"));
        assert_eq!(at("2023-01-06T12:00:00+02:00"), at("2023-01-06T10:00:00"));
        assert_eq!(at("2023-01-06T12:00:00Z"), at("2023-01-06T12:00:00"));
        assert_eq!(at("2023-01-06T12"), at("2023-01-06T12:00:00"));
        assert_eq!(at("2023-01-06 12"), at("2023-01-06T12:00:00"));
        assert_eq!(at("20230106"), at("2023-01-06"));
        assert_eq!(at("20230106T123045"), at("2023-01-06T12:30:45"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_iso_datetime("").is_none());
        assert!(parse_iso_datetime("yesterday").is_none());
        assert!(parse_iso_datetime("2023-13-01").is_none());
        assert!(parse_iso_datetime("01/06/2023").is_none());
        assert!(parse_iso_datetime("20231301").is_none());
        assert!(parse_iso_datetime("2023-01-06T25").is_none());
    }

    #[test]
    fn test_day_distance() {
        let target = at("2023-01-06");
        assert_eq!(day_distance(at("2023-01-05"), target), 1);
        assert_eq!(day_distance(at("2023-01-10"), target), 4);
        assert_eq!(day_distance(at("2023-01-01"), target), 5);
        assert_eq!(day_distance(at("2023-01-06T23:59:59"), target), 0);
        // floored, not truncated
        assert_eq!(day_distance(at("2023-01-05T12:00:00"), target), 1);
        // sub-second differences floor too
        assert_eq!(day_distance(target, at("2023-01-06T00:00:00.5")), 1);
        assert_eq!(day_distance(at("2023-01-06T00:00:00.5"), target), 0);
        assert_eq!(day_distance(at("2023-01-04T23:59:59.999999"), target), 2);
    }

    #[test]
    fn test_try_from_preserves_extra_keys() {
        let stored = StoredChunk {
            content: "text".to_string(),
            metadata: json!({
                "date": "2023-01-01",
                "version_tag": "v2.0",
                "security_tag": "Public",
                "source": "report.pdf",
                "page": 3
            })
            .as_object()
            .cloned()
            .unwrap(),
        };
        let chunk = Chunk::try_from(stored.clone()).unwrap();
        assert_eq!(chunk.metadata.version_tag, "v2.0");
        assert_eq!(chunk.metadata.extra.get("page"), Some(&json!(3)));
        assert_eq!(chunk.metadata.into_map(), stored.metadata);
    }

    #[test]
    fn test_try_from_missing_source() {
        let mut metadata = DocumentMetadata {
            date: "2023-01-01".to_string(),
            version_tag: "v1.0".to_string(),
            security_tag: "Public".to_string(),
        }
        .for_chunk("a.pdf")
        .into_map();
        metadata.remove(KEY_SOURCE);

        let chunk = Chunk::try_from(StoredChunk {
            content: String::new(),
            metadata,
        })
        .unwrap();
        assert_eq!(chunk.metadata.source, "");
        assert_eq!(chunk.metadata.date, "2023-01-01");
    }

    #[test]
    fn test_try_from_missing_key() {
        for key in [KEY_DATE, KEY_SECURITY_TAG, KEY_VERSION_TAG] {
            let mut metadata = DocumentMetadata {
                date: "2023-01-01".to_string(),
                version_tag: "v1.0".to_string(),
                security_tag: "Public".to_string(),
            }
            .for_chunk("a.pdf")
            .into_map();
            metadata.remove(key);

            let err = Chunk::try_from(StoredChunk {
                content: String::new(),
                metadata,
            })
            .unwrap_err();
            assert!(matches!(err, StoreError::MalformedCandidate(ref m) if m.contains(key)));
        }
    }
}
