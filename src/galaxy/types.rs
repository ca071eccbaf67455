use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A parsed MISP galaxy cluster file.
///
/// Only the fields the discerner reads are modeled; everything else rides
/// along in `extra` and is written back out unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Galaxy {
    /// Taxonomy type used in tag strings, e.g. "malpedia".
    #[serde(rename = "type")]
    pub galaxy_type: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub values: Vec<ClusterEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One canonical item within a galaxy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterEntry {
    /// Display name, possibly carrying a bracketed qualifier like
    /// "BlackMatter (Windows)". Unique within one galaxy.
    pub value: String,

    #[serde(default)]
    pub meta: ClusterMeta,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Entry metadata. Absent synonym lists deserialize to empty; anything
/// beyond synonyms is opaque to the discerner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterMeta {
    #[serde(default)]
    pub synonyms: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_meta_and_synonyms_default_empty() {
        let galaxy: Galaxy = serde_json::from_value(json!({
            "type": "malpedia",
            "values": [
                {"value": "FastCash"},
                {"value": "Kinsing", "meta": {"refs": ["https://example.com"]}},
            ],
        }))
        .unwrap();
        assert_eq!(galaxy.values.len(), 2);
        assert!(galaxy.values[0].meta.synonyms.is_empty());
        assert!(galaxy.values[1].meta.synonyms.is_empty());
        assert!(galaxy.values[1].meta.extra.contains_key("refs"));
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let raw = json!({
            "type": "malpedia",
            "name": "Malpedia",
            "uuid": "5fc98d08-90a4-498a-ad2e-0edf50ef374e",
            "values": [
                {"value": "888 RAT", "uuid": "abc", "meta": {"synonyms": ["888 ROT"]}},
            ],
        });
        let galaxy: Galaxy = serde_json::from_value(raw).unwrap();
        assert_eq!(galaxy.extra["uuid"], "5fc98d08-90a4-498a-ad2e-0edf50ef374e");
        assert_eq!(galaxy.values[0].extra["uuid"], "abc");
        assert_eq!(galaxy.values[0].meta.synonyms, vec!["888 ROT"]);

        let back = serde_json::to_value(&galaxy).unwrap();
        assert_eq!(back["values"][0]["uuid"], "abc");
    }
}
