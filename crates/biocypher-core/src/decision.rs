//! Extraction-approach recommendations from a description of the source data.
//!
//! The rules are independent: each one that matches contributes a
//! recommendation, in the order the rules are declared here.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{keyed_map, Keyed};

/// Flags describing the shape of a dataset.
///
/// Parsing is lenient: unknown keys are ignored and a value of the wrong
/// type reads as absent, so no input is ever rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DataCharacteristics {
    /// Overall layout of the records, e.g. "flat" or "nested"
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub structure_type: Option<String>,
    /// The data is split over several files, pages or endpoints sharing one layout
    #[serde(default, deserialize_with = "lenient_flag", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<bool>")]
    pub has_multiple_resources: Option<bool>,
    /// Records contain nested objects or parent/child structures
    #[serde(default, deserialize_with = "lenient_flag", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<bool>")]
    pub has_hierarchy: Option<bool>,
    /// Field names or layout vary between records
    #[serde(default, deserialize_with = "lenient_flag", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<bool>")]
    pub has_irregular_structure: Option<bool>,
    /// Records carry timestamps or versions
    #[serde(default, deserialize_with = "lenient_flag", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<bool>")]
    pub has_temporal_data: Option<bool>,
    /// Records reference each other
    #[serde(default, deserialize_with = "lenient_flag", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<bool>")]
    pub has_relationships: Option<bool>,
    /// Some fields are mandatory for every record
    #[serde(default, deserialize_with = "lenient_flag", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<bool>")]
    pub has_required_fields: Option<bool>,
}

impl DataCharacteristics {
    /// Read the recognized flags out of an arbitrary JSON value.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value.clone()).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    fn is_flat(&self) -> bool {
        self.structure_type.as_deref() == Some("flat")
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => Some(b),
        _ => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    pub approach: &'static str,
    pub reason: &'static str,
    pub implementation: &'static str,
}

/// One row of the decision-framework reference table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecisionCategory {
    #[serde(skip)]
    pub key: &'static str,
    pub approach: &'static str,
    pub when_to_use: &'static str,
    pub strategy: &'static str,
}

impl Keyed for DecisionCategory {
    fn key(&self) -> &'static str {
        self.key
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionGuidance {
    /// The input, unchanged.
    pub data_characteristics: Value,
    pub recommendations: Vec<Recommendation>,
    #[serde(serialize_with = "keyed_map")]
    pub decision_framework: &'static [DecisionCategory],
}

struct Rule {
    applies: fn(&DataCharacteristics) -> bool,
    recommendation: Recommendation,
}

static RULES: [Rule; 4] = [
    Rule {
        applies: DataCharacteristics::is_flat,
        recommendation: Recommendation {
            approach: "Simple Extraction",
            reason: "Flat structure with consistent field names",
            implementation: "Iterate over records and map fields directly to node and edge \
                properties with a single field-mapping table.",
        },
    },
    Rule {
        applies: |c| c.has_multiple_resources == Some(true),
        recommendation: Recommendation {
            approach: "Series Extraction",
            reason: "Multiple resources with shared structure",
            implementation: "Write one extraction routine for the shared layout and run it over \
                every resource, merging the results and deduplicating identifiers.",
        },
    },
    Rule {
        applies: |c| c.has_hierarchy == Some(true),
        recommendation: Recommendation {
            approach: "Hierarchical Extraction",
            reason: "Nested data structures require recursive traversal",
            implementation: "Traverse the structure recursively, emitting a node per level and \
                an edge from each child to its parent.",
        },
    },
    Rule {
        applies: |c| c.has_irregular_structure == Some(true),
        recommendation: Recommendation {
            approach: "Custom Extraction",
            reason: "Irregular data structures need source-specific handling",
            implementation: "Combine conditional extraction and progressive fallback patterns, \
                and log records that match no extraction path.",
        },
    },
];

pub static DECISION_FRAMEWORK: [DecisionCategory; 4] = [
    DecisionCategory {
        key: "simple_extraction",
        approach: "Simple Extraction",
        when_to_use: "Flat, tabular data with consistent field names (CSV, TSV, flat JSON).",
        strategy: "Direct field mapping from records to schema properties.",
    },
    DecisionCategory {
        key: "series_extraction",
        approach: "Series Extraction",
        when_to_use: "Many resources sharing one layout (paged APIs, file series, per-release dumps).",
        strategy: "One routine applied across the series, with merging and identifier deduplication.",
    },
    DecisionCategory {
        key: "hierarchical_extraction",
        approach: "Hierarchical Extraction",
        when_to_use: "Nested documents, ontologies or trees (XML, nested JSON, OBO).",
        strategy: "Recursive traversal producing nodes per level and parent/child edges.",
    },
    DecisionCategory {
        key: "custom_extraction",
        approach: "Custom Extraction",
        when_to_use: "Irregular or inconsistent data where no single layout holds.",
        strategy: "Conditional rules and ordered fallbacks tailored to the source.",
    },
];

/// Evaluate every rule against `input` and collect the recommendations of those that hold.
pub fn decision_guidance(input: Value) -> DecisionGuidance {
    let characteristics = DataCharacteristics::from_value(&input);
    let recommendations: Vec<Recommendation> = RULES
        .iter()
        .filter(|rule| (rule.applies)(&characteristics))
        .map(|rule| rule.recommendation)
        .collect();
    tracing::debug!(matched = recommendations.len(), "evaluated decision rules");
    DecisionGuidance {
        data_characteristics: input,
        recommendations,
        decision_framework: &DECISION_FRAMEWORK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn approaches(guidance: &DecisionGuidance) -> Vec<&'static str> {
        guidance.recommendations.iter().map(|r| r.approach).collect()
    }

    #[test]
    fn test_each_flag_alone_fires_one_rule() {
        let cases = [
            (json!({"structure_type": "flat"}), "Simple Extraction"),
            (json!({"has_multiple_resources": true}), "Series Extraction"),
            (json!({"has_hierarchy": true}), "Hierarchical Extraction"),
            (json!({"has_irregular_structure": true}), "Custom Extraction"),
        ];
        for (input, expected) in cases {
            let guidance = decision_guidance(input.clone());
            assert_eq!(approaches(&guidance), vec![expected], "input {}", input);
        }
    }

    #[test]
    fn test_reasons() {
        let g = decision_guidance(json!({"structure_type": "flat"}));
        assert!(g.recommendations[0].reason.contains("Flat structure with consistent field names"));
        let g = decision_guidance(json!({"has_multiple_resources": true}));
        assert!(g.recommendations[0].reason.contains("Multiple resources with shared structure"));
        let g = decision_guidance(json!({"has_hierarchy": true}));
        assert!(g.recommendations[0].reason.contains("Nested data structures"));
        let g = decision_guidance(json!({"has_irregular_structure": true}));
        assert!(g.recommendations[0].reason.contains("Irregular data structures"));
    }

    #[test]
    fn test_all_flags_follow_declared_order() {
        let input: Value = serde_json::from_str(
            r#"{
                "has_irregular_structure": true,
                "has_hierarchy": true,
                "structure_type": "flat",
                "has_multiple_resources": true
            }"#,
        )
        .unwrap();
        let guidance = decision_guidance(input);
        assert_eq!(
            approaches(&guidance),
            vec![
                "Simple Extraction",
                "Series Extraction",
                "Hierarchical Extraction",
                "Custom Extraction",
            ]
        );
    }

    #[test]
    fn test_empty_input_keeps_full_framework() {
        let guidance = decision_guidance(json!({}));
        assert!(guidance.recommendations.is_empty());
        assert_eq!(guidance.decision_framework.len(), 4);

        let out = serde_json::to_value(&guidance).unwrap();
        for key in [
            "simple_extraction",
            "series_extraction",
            "hierarchical_extraction",
            "custom_extraction",
        ] {
            assert!(out["decision_framework"].get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_false_and_malformed_flags_are_falsy() {
        let input = json!({
            "structure_type": "nested",
            "has_multiple_resources": false,
            "has_hierarchy": "yes",
            "has_irregular_structure": 1,
            "unknown_flag": true
        });
        assert!(decision_guidance(input).recommendations.is_empty());
        assert!(decision_guidance(json!(["flat"])).recommendations.is_empty());
        assert!(decision_guidance(Value::Null).recommendations.is_empty());
    }

    #[test]
    fn test_input_is_echoed() {
        let input = json!({"has_hierarchy": true, "source": "uniprot"});
        let guidance = decision_guidance(input.clone());
        assert_eq!(guidance.data_characteristics, input);
    }

    #[test]
    fn test_lenient_parse_keeps_recognized_values() {
        let c = DataCharacteristics::from_value(&json!({
            "structure_type": 3,
            "has_temporal_data": true,
            "has_relationships": "no"
        }));
        assert_eq!(c.structure_type, None);
        assert_eq!(c.has_temporal_data, Some(true));
        assert_eq!(c.has_relationships, None);
    }
}
