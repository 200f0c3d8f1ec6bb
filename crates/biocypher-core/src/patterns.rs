use serde::{Serialize, Serializer};

use crate::{keyed_map, pair_map, Keyed, NotFound};

/// A reusable extraction recipe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pattern {
    #[serde(skip)]
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub use_case: &'static str,
    pub code: &'static str,
    /// Worked example for the pattern, as input/output pairs.
    #[serde(rename = "example_mapping", serialize_with = "pair_map")]
    pub example: &'static [(&'static str, &'static str)],
}

impl Keyed for Pattern {
    fn key(&self) -> &'static str {
        self.key
    }
}

/// Every pattern, serialized as an object keyed by pattern name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternCatalog(pub &'static [Pattern]);

impl Serialize for PatternCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        keyed_map(&self.0, serializer)
    }
}

static PATTERNS: [Pattern; 3] = [
    Pattern {
        key: "field_mapping",
        name: "Field Mapping Pattern",
        description: "Map data fields to schema properties through a declarative table \
            instead of hand-written accessors.",
        use_case: "Sources whose field names differ from the schema but are consistent \
            across records.",
        code: r#"def map_fields_to_schema(record, field_mapping):
    """Translate source field names to schema property names."""
    properties = {}
    for source_field, schema_property in field_mapping.items():
        value = record.get(source_field)
        if value is not None and value != "":
            properties[schema_property] = value
    return properties"#,
        example: &[
            ("protein_name", "name"),
            ("organism_name", "organism"),
            ("seq_length", "length"),
        ],
    },
    Pattern {
        key: "conditional_extraction",
        name: "Conditional Extraction Pattern",
        description: "Apply conditional rules to decide how, or whether, a record is extracted.",
        use_case: "Mixed sources where record type or available fields decide the node label \
            and properties.",
        code: r#"def extract_with_conditions(record, rules):
    """Apply the first rule whose condition matches the record."""
    for condition, extractor in rules:
        if condition(record):
            return extractor(record)
    return None"#,
        example: &[
            ("record['type'] == 'protein'", "extract_protein(record)"),
            ("'gene_id' in record", "extract_gene(record)"),
            ("otherwise", "skip and log the record"),
        ],
    },
    Pattern {
        key: "progressive_fallback",
        name: "Progressive Fallback Pattern",
        description: "Try multiple extraction methods in order until one yields a value.",
        use_case: "Fields that appear under different names or formats across versions of \
            the source.",
        code: r#"def extract_with_fallbacks(record, extractors, default=None):
    """Return the first non-empty value produced by the extractors."""
    for extractor in extractors:
        try:
            value = extractor(record)
        except (KeyError, ValueError, TypeError):
            continue
        if value not in (None, ""):
            return value
    return default"#,
        example: &[
            ("1", "record['accession']"),
            ("2", "record['ids']['uniprot']"),
            ("3", "parse_accession(record['name'])"),
        ],
    },
];

/// All patterns in declared order.
pub fn patterns() -> PatternCatalog {
    PatternCatalog(&PATTERNS)
}

/// Find a pattern by exact name.
pub fn pattern(name: &str) -> Result<&'static Pattern, NotFound<String>> {
    PATTERNS.iter().find(|p| p.key == name).ok_or_else(|| {
        tracing::debug!(name, "unknown pattern");
        NotFound::new(
            format!("Pattern '{}' not found", name),
            name.to_string(),
            "available_patterns",
            PATTERNS.iter().map(|p| p.key.to_string()).collect(),
        )
    })
}
