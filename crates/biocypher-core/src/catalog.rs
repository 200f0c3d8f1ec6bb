use serde::Serialize;

use crate::decision::{DecisionCategory, DECISION_FRAMEWORK};
use crate::{is_empty, keyed_map, NotFound};

// --- Types ---

/// One numbered step of a workflow.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Phase {
    pub phase: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub key_activities: &'static [&'static str],
    pub outputs: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Workflow {
    pub id: &'static str,
    /// Short name used in the catalog listing.
    pub name: &'static str,
    /// Full title used when the workflow itself is requested.
    pub title: &'static str,
    /// One-line summary for the catalog listing.
    pub summary: &'static str,
    pub description: &'static str,
    /// Tool that opens this workflow, when there is a single entry point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<&'static str>,
    /// Tools the workflow is carried out with.
    #[serde(skip_serializing_if = "is_empty")]
    pub tools: &'static [&'static str],
    pub phases: &'static [Phase],
}

/// Catalog listing entry for a workflow.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorkflowSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<&'static str>,
    #[serde(skip_serializing_if = "is_empty")]
    pub tools: &'static [&'static str],
    #[serde(skip_serializing_if = "is_empty")]
    pub supporting_tools: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ToolRef {
    pub tool: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct FrameworkOverview {
    pub name: &'static str,
    pub description: &'static str,
    pub core_principles: &'static [&'static str],
}

/// Entry point of the catalog: what workflows exist and which tools support them.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AvailableWorkflows {
    pub workflows: Vec<WorkflowSummary>,
    pub framework_overview: FrameworkOverview,
    pub supporting_tools: &'static [ToolRef],
    pub navigation: &'static str,
}

/// The adapter-creation workflow together with the decision-framework table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdapterWorkflow {
    pub workflow_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub phases: &'static [Phase],
    #[serde(serialize_with = "keyed_map")]
    pub decision_framework: &'static [DecisionCategory],
    pub next_step: &'static str,
}

// --- Content ---

pub const ADAPTER_CREATION_ID: &str = "adapter_creation";
pub const PROJECT_CREATION_ID: &str = "project_creation";

static ADAPTER_PHASES: [Phase; 5] = [
    Phase {
        phase: 1,
        name: "Data Analysis and Understanding",
        description: "Inspect the source data before writing any adapter code: its format, \
            how it is split into resources, which fields are present, and how entities relate.",
        key_activities: &[
            "Resource structure analysis",
            "Field inventory and type profiling",
            "Entity and relationship identification",
            "Data quality assessment",
        ],
        outputs: &[
            "Resource inventory",
            "Field catalog with types and coverage",
            "Entity-relationship sketch",
            "List of data quality issues",
        ],
    },
    Phase {
        phase: 2,
        name: "Implementation Strategy Design",
        description: "Choose an extraction approach that fits the data shape and map the \
            discovered entities onto the BioCypher schema.",
        key_activities: &[
            "Adapter architecture decision",
            "Schema mapping design",
            "Identifier strategy",
            "Error handling strategy",
        ],
        outputs: &[
            "Chosen extraction approach",
            "schema_config.yaml draft",
            "Field-to-property mapping table",
        ],
    },
    Phase {
        phase: 3,
        name: "Implementation",
        description: "Write the adapter: node and edge generators that yield BioCypher \
            tuples, built from the chosen patterns.",
        key_activities: &[
            "Adapter class skeleton",
            "Node generator implementation",
            "Edge generator implementation",
            "Pattern application (mapping, conditions, fallbacks)",
        ],
        outputs: &[
            "Adapter module",
            "Updated schema configuration",
            "create_knowledge_graph.py wiring",
        ],
    },
    Phase {
        phase: 4,
        name: "Quality Assurance",
        description: "Verify that the adapter produces a correct and complete graph, and \
            that it behaves on malformed input.",
        key_activities: &[
            "Unit tests for generators",
            "Schema validation",
            "Output completeness checks",
            "Performance check on full data",
        ],
        outputs: &["Test suite", "Validation report", "Known limitations list"],
    },
    Phase {
        phase: 5,
        name: "Documentation and Maintenance",
        description: "Document the adapter so others can run and extend it, and plan for \
            upstream data changes.",
        key_activities: &[
            "Usage documentation",
            "Schema and mapping documentation",
            "Versioning of the source data",
            "Maintenance plan",
        ],
        outputs: &["README with usage", "Mapping documentation", "Changelog"],
    },
];

static PROJECT_PHASES: [Phase; 3] = [
    Phase {
        phase: 1,
        name: "Project Check",
        description: "Check whether a BioCypher project already exists at the target path.",
        key_activities: &["Run check_project_exists", "Compare against expected structure"],
        outputs: &["Existence report with missing entries"],
    },
    Phase {
        phase: 2,
        name: "Project Generation",
        description: "Generate the project from the BioCypher cookiecutter template.",
        key_activities: &["Install cookiecutter", "Run the template", "Answer template prompts"],
        outputs: &["New project directory"],
    },
    Phase {
        phase: 3,
        name: "Project Verification",
        description: "Confirm the generated project has the expected layout before adding adapters.",
        key_activities: &["Re-run check_project_exists", "Install project dependencies"],
        outputs: &["Verified project ready for adapter creation"],
    },
];

static WORKFLOWS: [Workflow; 2] = [
    Workflow {
        id: ADAPTER_CREATION_ID,
        name: "BioCypher Adapter Creation",
        title: "BioCypher Adapter Creation Workflow",
        summary: "A 5-phase workflow for creating a BioCypher adapter from any data source, \
            from data analysis to documentation.",
        description: "Complete workflow for creating BioCypher adapters: analyse the data, \
            design an extraction strategy, implement it, assure its quality and document it.",
        tool: Some("get_adapter_creation_workflow"),
        tools: &[],
        phases: &ADAPTER_PHASES,
    },
    Workflow {
        id: PROJECT_CREATION_ID,
        name: "BioCypher Project Creation",
        title: "BioCypher Project Creation Workflow",
        summary: "Create a new BioCypher project from the official cookiecutter template.",
        description: "Check for an existing BioCypher project and, if there is none, generate \
            one with the cookiecutter template before creating adapters in it.",
        tool: None,
        tools: &["check_project_exists", "get_cookiecutter_instructions"],
        phases: &PROJECT_PHASES,
    },
];

static ADAPTER_SUPPORTING_TOOLS: [&str; 3] = [
    "get_phase_guidance",
    "get_implementation_patterns",
    "get_decision_guidance",
];

static SUPPORTING_TOOLS: [ToolRef; 4] = [
    ToolRef {
        tool: "get_phase_guidance",
        description: "Detailed instructions and code examples for one adapter-creation phase",
    },
    ToolRef {
        tool: "get_implementation_patterns",
        description: "Reusable extraction patterns: field mapping, conditional extraction, \
            progressive fallback",
    },
    ToolRef {
        tool: "get_decision_guidance",
        description: "Recommended extraction approaches for a set of data characteristics",
    },
    ToolRef {
        tool: "get_adapter_framework",
        description: "The full BioCypher Adapter Creation Framework guide as markdown",
    },
];

static FRAMEWORK_OVERVIEW: FrameworkOverview = FrameworkOverview {
    name: "BioCypher Adapter Creation Framework",
    description: "Generalized framework for creating BioCypher adapters from any data \
        source, with adaptive analysis and implementation strategies.",
    core_principles: &[
        "Data-First Approach",
        "Schema-Driven Development",
        "Iterative Refinement",
    ],
};

const NAVIGATION: &str = "Start with get_adapter_creation_workflow for the phase overview, \
    then get_phase_guidance for each phase in order. Use get_decision_guidance during phase 2 \
    and get_implementation_patterns during phase 3.";

const ADAPTER_NEXT_STEP: &str = "Call get_phase_guidance with phase_number 1 to begin.";

// --- Lookups ---

pub fn workflows() -> &'static [Workflow] {
    &WORKFLOWS
}

pub fn available_workflows() -> AvailableWorkflows {
    let workflows = WORKFLOWS
        .iter()
        .map(|w| WorkflowSummary {
            id: w.id,
            name: w.name,
            description: w.summary,
            tool: w.tool,
            tools: w.tools,
            supporting_tools: if w.id == ADAPTER_CREATION_ID {
                &ADAPTER_SUPPORTING_TOOLS
            } else {
                &[]
            },
        })
        .collect();
    AvailableWorkflows {
        workflows,
        framework_overview: FRAMEWORK_OVERVIEW,
        supporting_tools: &SUPPORTING_TOOLS,
        navigation: NAVIGATION,
    }
}

/// Find a workflow by id.
pub fn workflow(id: &str) -> Result<&'static Workflow, NotFound<String>> {
    WORKFLOWS.iter().find(|w| w.id == id).ok_or_else(|| {
        NotFound::new(
            format!("Workflow '{}' not found", id),
            id.to_string(),
            "available_workflows",
            WORKFLOWS.iter().map(|w| w.id.to_string()).collect(),
        )
    })
}

pub fn adapter_creation_workflow() -> AdapterWorkflow {
    let w = &WORKFLOWS[0];
    AdapterWorkflow {
        workflow_id: w.id,
        name: w.title,
        description: w.description,
        phases: w.phases,
        decision_framework: &DECISION_FRAMEWORK,
        next_step: ADAPTER_NEXT_STEP,
    }
}
