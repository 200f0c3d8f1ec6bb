use serde::Serialize;

use crate::{pair_map, NotFound};

/// Detailed guidance for one phase of the adapter-creation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseGuidance {
    pub phase: u32,
    pub phase_name: &'static str,
    pub detailed_instructions: &'static [&'static str],
    /// Named snippets, in presentation order.
    #[serde(serialize_with = "pair_map")]
    pub code_examples: &'static [(&'static str, &'static str)],
    pub outputs_expected: &'static [&'static str],
    pub next_step: &'static str,
}

static GUIDANCE: [PhaseGuidance; 5] = [
    PhaseGuidance {
        phase: 1,
        phase_name: "Data Analysis and Understanding",
        detailed_instructions: &[
            "Resource Structure Analysis: list every file, table or endpoint in the source, \
             note its format and size, and whether several resources share one layout.",
            "Field Inventory: for each resource, record every field, its type, how often it is \
             populated, and example values.",
            "Entity Identification: decide which records become nodes and what identifies them \
             (prefer CURIEs such as 'uniprot:P12345').",
            "Relationship Identification: find fields that reference other records; these \
             become edges.",
            "Data Quality Assessment: look for missing identifiers, duplicates, inconsistent \
             casing and mixed types before designing the adapter.",
        ],
        code_examples: &[
            (
                "analyze_resource_structure",
                r#"def analyze_resource_structure(records):
    """Summarise field presence and types across records."""
    fields = {}
    for record in records:
        for key, value in record.items():
            info = fields.setdefault(key, {"count": 0, "types": set()})
            info["count"] += 1
            info["types"].add(type(value).__name__)
    total = len(records)
    return {
        key: {"coverage": info["count"] / total, "types": sorted(info["types"])}
        for key, info in fields.items()
    }"#,
            ),
            (
                "detect_hierarchy",
                r#"def detect_hierarchy(record, depth=0):
    """Return the maximum nesting depth of a record."""
    if isinstance(record, dict):
        return max((detect_hierarchy(v, depth + 1) for v in record.values()), default=depth)
    if isinstance(record, list):
        return max((detect_hierarchy(v, depth + 1) for v in record), default=depth)
    return depth"#,
            ),
        ],
        outputs_expected: &[
            "Resource inventory",
            "Field catalog with types and coverage",
            "Entity-relationship sketch",
            "List of data quality issues",
        ],
        next_step: "Call get_decision_guidance with the data characteristics you found, then \
            get_phase_guidance with phase_number 2.",
    },
    PhaseGuidance {
        phase: 2,
        phase_name: "Implementation Strategy Design",
        detailed_instructions: &[
            "Adapter Architecture Decision: pick simple, series, hierarchical or custom \
             extraction from the phase 1 findings (get_decision_guidance helps here).",
            "Schema Mapping: map each entity type to a node label and each relationship to an \
             edge label in schema_config.yaml, reusing Biolink model classes where they fit.",
            "Identifier Strategy: choose how node ids are built and normalised so that edges \
             from different resources meet the same nodes.",
            "Error Handling Strategy: decide which malformed records are skipped, repaired or \
             reported.",
        ],
        code_examples: &[
            (
                "schema_config",
                r#"protein:
  represented_as: node
  preferred_id: uniprot
  input_label: uniprot_protein
  properties:
    name: str
    organism: str

protein protein interaction:
  is_a: pairwise molecular interaction
  represented_as: edge
  input_label: interacts_with
  properties:
    score: float"#,
            ),
            (
                "adapter_skeleton",
                r#"from enum import Enum, auto

class NodeType(Enum):
    PROTEIN = auto()

class EdgeType(Enum):
    INTERACTS_WITH = auto()

class AdaptiveAdapter:
    def __init__(self, node_types=None, edge_types=None):
        self.node_types = node_types or list(NodeType)
        self.edge_types = edge_types or list(EdgeType)

    def get_nodes(self):
        raise NotImplementedError

    def get_edges(self):
        raise NotImplementedError"#,
            ),
        ],
        outputs_expected: &[
            "Chosen extraction approach",
            "schema_config.yaml draft",
            "Field-to-property mapping table",
        ],
        next_step: "Call get_phase_guidance with phase_number 3.",
    },
    PhaseGuidance {
        phase: 3,
        phase_name: "Implementation",
        detailed_instructions: &[
            "Node Generators: implement get_nodes() yielding (id, label, properties) tuples.",
            "Edge Generators: implement get_edges() yielding (id, source, target, label, \
             properties) tuples; the id may be None.",
            "Apply Patterns: use field mapping, conditional extraction and progressive fallback \
             (get_implementation_patterns) instead of ad-hoc parsing.",
            "Wire the Adapter: instantiate it in create_knowledge_graph.py and pass its \
             generators to BioCypher's write_nodes and write_edges.",
        ],
        code_examples: &[
            (
                "node_generator",
                r#"def get_nodes(self):
    for record in self._records():
        node_id = normalize_curie("uniprot", record["accession"])
        properties = map_fields_to_schema(record, self.field_mapping)
        yield (node_id, "uniprot_protein", properties)"#,
            ),
            (
                "edge_generator",
                r#"def get_edges(self):
    for record in self._interactions():
        yield (
            None,
            normalize_curie("uniprot", record["source"]),
            normalize_curie("uniprot", record["target"]),
            "interacts_with",
            {"score": float(record.get("score", 0))},
        )"#,
            ),
            (
                "create_knowledge_graph",
                r#"from biocypher import BioCypher
from my_project.adapters.protein_adapter import AdaptiveAdapter

bc = BioCypher()
adapter = AdaptiveAdapter()
bc.write_nodes(adapter.get_nodes())
bc.write_edges(adapter.get_edges())
bc.write_import_call()
bc.summary()"#,
            ),
        ],
        outputs_expected: &[
            "Adapter module",
            "Updated schema configuration",
            "create_knowledge_graph.py wiring",
        ],
        next_step: "Call get_phase_guidance with phase_number 4.",
    },
    PhaseGuidance {
        phase: 4,
        phase_name: "Quality Assurance",
        detailed_instructions: &[
            "Generator Tests: test get_nodes() and get_edges() on small fixtures, including \
             malformed records.",
            "Schema Validation: run BioCypher on a sample and check that every emitted label \
             is declared in schema_config.yaml.",
            "Completeness Checks: compare node and edge counts against the source record counts.",
            "Performance: run on the full dataset and confirm generators stream instead of \
             loading everything into memory.",
        ],
        code_examples: &[(
            "generator_test",
            r#"def test_nodes_have_valid_ids():
    adapter = AdaptiveAdapter()
    nodes = list(adapter.get_nodes())
    assert nodes
    for node_id, label, properties in nodes:
        assert node_id.startswith("uniprot:")
        assert label == "uniprot_protein"
        assert isinstance(properties, dict)"#,
        )],
        outputs_expected: &["Test suite", "Validation report", "Known limitations list"],
        next_step: "Call get_phase_guidance with phase_number 5.",
    },
    PhaseGuidance {
        phase: 5,
        phase_name: "Documentation and Maintenance",
        detailed_instructions: &[
            "Usage Documentation: describe how to obtain the source data and run the adapter.",
            "Mapping Documentation: document which source fields map to which schema properties \
             and why.",
            "Source Versioning: record the source data version the adapter was built against.",
            "Maintenance Plan: note which upstream changes would break the adapter and how to \
             detect them.",
        ],
        code_examples: &[(
            "readme_section",
            r#"## Protein adapter

Source: UniProt (release 2024_05), downloaded with `scripts/download.sh`.

| source field | schema property |
|--------------|-----------------|
| accession    | node id         |
| protein_name | name            |
| organism     | organism        |"#,
        )],
        outputs_expected: &["README with usage", "Mapping documentation", "Changelog"],
        next_step: "The adapter is complete. Revisit phase 1 when the source data changes.",
    },
];

pub fn all_phase_guidance() -> &'static [PhaseGuidance] {
    &GUIDANCE
}

/// Guidance for adapter-creation phase `number`.
pub fn phase_guidance(number: i64) -> Result<&'static PhaseGuidance, NotFound<i64>> {
    GUIDANCE
        .iter()
        .find(|g| i64::from(g.phase) == number)
        .ok_or_else(|| {
            tracing::debug!(number, "unknown phase");
            NotFound::new(
                format!("Phase {} not found", number),
                number,
                "available_phases",
                GUIDANCE.iter().map(|g| i64::from(g.phase)).collect(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::adapter_creation_workflow;

    #[test]
    fn test_valid_phases_return_their_number() {
        for n in 1..=5 {
            let guidance = phase_guidance(n).unwrap();
            assert_eq!(i64::from(guidance.phase), n);
            assert!(!guidance.detailed_instructions.is_empty());
            assert!(!guidance.code_examples.is_empty());
            assert!(!guidance.outputs_expected.is_empty());
        }
    }

    #[test]
    fn test_out_of_range_lists_valid_phases() {
        for n in [0, 6, 99, -1, i64::MAX] {
            let err = phase_guidance(n).unwrap_err();
            assert_eq!(err.requested, n);
            assert_eq!(err.available, vec![1, 2, 3, 4, 5]);
        }
    }

    #[test]
    fn test_unknown_phase_serializes_available_phases() {
        let json = serde_json::to_value(phase_guidance(99).unwrap_err()).unwrap();
        assert_eq!(json["error"], "Phase 99 not found");
        assert_eq!(json["available_phases"], serde_json::json!([1, 2, 3, 4, 5]));
    }

    #[test]
    fn test_phase_content() {
        let first = phase_guidance(1).unwrap();
        assert_eq!(first.phase_name, "Data Analysis and Understanding");
        assert!(first.detailed_instructions[0].contains("Resource Structure Analysis"));

        let second = phase_guidance(2).unwrap();
        assert_eq!(second.phase_name, "Implementation Strategy Design");
        assert!(second.detailed_instructions[0].contains("Adapter Architecture Decision"));
    }

    #[test]
    fn test_guidance_matches_workflow_phases() {
        let workflow = adapter_creation_workflow();
        assert_eq!(workflow.phases.len(), all_phase_guidance().len());
        for (phase, guidance) in workflow.phases.iter().zip(all_phase_guidance()) {
            assert_eq!(phase.phase, guidance.phase);
            assert_eq!(phase.name, guidance.phase_name);
        }
    }

    #[test]
    fn test_code_examples_serialize_as_object() {
        let json = serde_json::to_value(phase_guidance(1).unwrap()).unwrap();
        let examples = json["code_examples"].as_object().unwrap();
        assert!(examples["analyze_resource_structure"]
            .as_str()
            .unwrap()
            .contains("def analyze_resource_structure"));
        assert!(examples.values().all(|v| !v.as_str().unwrap().is_empty()));
    }
}
