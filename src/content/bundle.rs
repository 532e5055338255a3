//! Bundle catalog and bundle file parsing.

use anyhow::{anyhow, Result};
use serde_json::Value;

/// A named pool of candidate text segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentBundle {
    pub id: String,
    pub segments: Vec<String>,
}

impl ContentBundle {
    pub fn new(id: impl Into<String>, segments: Vec<String>) -> Self {
        Self {
            id: id.into(),
            segments,
        }
    }
}

/// Catalog entry for a rotating bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleInfo {
    pub id: &'static str,
    pub file: &'static str,
    pub label: &'static str,
}

/// Bundle that always serves plays 1-10.
pub const DEFAULT_BUNDLE_ID: &str = "memil";

/// Fixed pool for round 1 (short sentences).
pub const MINDSET_FILE: &str = "mindset.json";

/// Fixed pool for round 2 (longer sentences).
pub const DIGITAL_FILE: &str = "digital.json";

/// Rotating bundles feeding round 3, in catalog order.
pub const TEXT_BUNDLES: [BundleInfo; 11] = [
    BundleInfo { id: "memil", file: "memil.json", label: "메밀꽃 필 무렵" },
    BundleInfo { id: "camellia", file: "camellia.json", label: "동백꽃" },
    BundleInfo { id: "cheongsando", file: "cheongsando.json", label: "청산도" },
    BundleInfo { id: "dulsaram_eol", file: "dulsaram_eol.json", label: "둘사람의 얼" },
    BundleInfo { id: "hangeul_day_love", file: "hangeul_day_love.json", label: "한글날 사랑" },
    BundleInfo { id: "last", file: "last.json", label: "라스트" },
    BundleInfo { id: "rain_shower", file: "rain_shower.json", label: "소나기" },
    BundleInfo {
        id: "richman_and_donkey_split",
        file: "richman_and_donkey_split.json",
        label: "부자와 나귀",
    },
    BundleInfo { id: "starnight", file: "starnight.json", label: "별밤" },
    BundleInfo { id: "the_little_prince", file: "the_little_prince.json", label: "어린왕자" },
    BundleInfo { id: "the_star_short", file: "the_star_short.json", label: "별 이야기" },
];

/// Generic sentences used whenever a pool cannot be loaded.
const FALLBACK_SENTENCES: [&str; 5] = [
    "디지털 전환은 도구보다 사고방식의 변화가 더 중요합니다.",
    "작은 자동화가 모여서 퇴근 시간을 앞당깁니다.",
    "반복되는 업무일수록 컴퓨터에게 맡길 수 있습니다.",
    "복붙이 안 되는 순간이 진짜 디지털 노동의 지옥입니다.",
    "한 번 자동화된 작업은 다시는 사람이 하지 않아도 됩니다.",
];

pub fn fallback_segments() -> Vec<String> {
    FALLBACK_SENTENCES.iter().map(|s| s.to_string()).collect()
}

/// All rotating bundle ids in catalog order.
pub fn bundle_ids() -> Vec<&'static str> {
    TEXT_BUNDLES.iter().map(|b| b.id).collect()
}

/// Looks up a catalog entry. Unknown ids resolve to the first entry.
pub fn find_bundle(id: &str) -> &'static BundleInfo {
    TEXT_BUNDLES
        .iter()
        .find(|b| b.id == id)
        .unwrap_or(&TEXT_BUNDLES[0])
}

/// Extracts the segment list from a bundle file.
///
/// Accepted shapes: a bare array, `{ "segments": [...] }` or `{ "items": [...] }`.
/// Non-string entries are kept in their JSON text form. Any other shape yields
/// an empty list.
pub fn parse_segments(json: &str) -> Result<Vec<String>> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| anyhow!("Invalid bundle JSON: {}", e))?;

    let items = match &value {
        Value::Array(items) => Some(items),
        Value::Object(map) => map
            .get("segments")
            .and_then(Value::as_array)
            .or_else(|| map.get("items").and_then(Value::as_array)),
        _ => None,
    };

    Ok(items
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let segments = parse_segments(r#"["가나다", "라마바"]"#).unwrap();
        assert_eq!(segments, vec!["가나다", "라마바"]);
    }

    #[test]
    fn test_parse_segments_and_items_objects() {
        let segments = parse_segments(r#"{ "segments": ["하나"] }"#).unwrap();
        assert_eq!(segments, vec!["하나"]);

        let items = parse_segments(r#"{ "title": "x", "items": ["둘", 3] }"#).unwrap();
        assert_eq!(items, vec!["둘", "3"]);
    }

    #[test]
    fn test_parse_unknown_shape_is_empty() {
        assert!(parse_segments(r#"{ "lines": ["x"] }"#).unwrap().is_empty());
        assert!(parse_segments("42").unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_json_errors() {
        assert!(parse_segments("[1, 2").is_err());
    }

    #[test]
    fn test_find_bundle_unknown_resolves_to_first() {
        assert_eq!(find_bundle("starnight").label, "별밤");
        assert_eq!(find_bundle("nope").id, DEFAULT_BUNDLE_ID);
    }

    #[test]
    fn test_catalog_ids_unique() {
        let mut ids = bundle_ids();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), TEXT_BUNDLES.len());
    }
}
