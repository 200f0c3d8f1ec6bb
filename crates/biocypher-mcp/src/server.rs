use std::path::Path;
use std::sync::Arc;

use biocypher_core::{FrameworkDocument, FrameworkResource, NotFound};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::{Deserialize, Serialize};

// --- Request types ---

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct GetWorkflowsRequest {
    /// Workflow id, e.g. "adapter_creation" or "project_creation". Omit to list every workflow.
    workflow_id: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct GetPhaseGuidanceRequest {
    /// Phase number of the adapter-creation workflow (1-5)
    phase_number: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct GetPatternsRequest {
    /// Pattern name: "field_mapping", "conditional_extraction" or "progressive_fallback". Omit to get every pattern.
    pattern_type: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct GetDecisionGuidanceRequest {
    /// Characteristics of the source data. Recognized flags: structure_type ("flat", "nested", ...), has_multiple_resources, has_hierarchy, has_irregular_structure, has_temporal_data, has_relationships, has_required_fields. Other keys are ignored.
    #[schemars(with = "biocypher_core::DataCharacteristics")]
    data_characteristics: serde_json::Value,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct CheckProjectRequest {
    /// Directory to check. Default: the current directory.
    project_path: Option<String>,
}

// --- Server ---

#[derive(Clone)]
pub struct BiocypherServer {
    tool_router: ToolRouter<Self>,
    framework: Arc<FrameworkDocument>,
}

#[tool_router]
impl BiocypherServer {
    pub fn new(framework: FrameworkDocument) -> Self {
        Self {
            tool_router: Self::tool_router(),
            framework: Arc::new(framework),
        }
    }

    #[tool(
        description = "Entry point. Lists the available BioCypher workflows (adapter creation, project creation), the framework's core principles, and the supporting tools. Start here. Pass workflow_id to get one workflow with its numbered phases."
    )]
    fn get_available_workflows(
        &self,
        Parameters(req): Parameters<GetWorkflowsRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(workflow_id = ?req.workflow_id, "get_available_workflows");
        match req.workflow_id.as_deref() {
            None => json_result(&biocypher_core::available_workflows()),
            Some(id) => match biocypher_core::workflow(id) {
                Ok(workflow) => json_result(workflow),
                Err(e) => not_found(&e),
            },
        }
    }

    #[tool(
        description = "Get the 5-phase BioCypher adapter creation workflow: every phase with key activities and outputs, plus the decision framework of extraction approaches. Follow with get_phase_guidance for each phase."
    )]
    fn get_adapter_creation_workflow(&self) -> Result<CallToolResult, McpError> {
        tracing::debug!("get_adapter_creation_workflow");
        json_result(&biocypher_core::adapter_creation_workflow())
    }

    #[tool(
        description = "Get detailed instructions, code examples and expected outputs for one phase (1-5) of the adapter creation workflow. Unknown phase numbers return an error listing the valid phases."
    )]
    fn get_phase_guidance(
        &self,
        Parameters(req): Parameters<GetPhaseGuidanceRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(phase_number = req.phase_number, "get_phase_guidance");
        match biocypher_core::phase_guidance(req.phase_number) {
            Ok(guidance) => json_result(guidance),
            Err(e) => not_found(&e),
        }
    }

    #[tool(
        description = "Get reusable adapter implementation patterns (field_mapping, conditional_extraction, progressive_fallback) with code. Pass pattern_type for a single pattern; omit it for all of them."
    )]
    fn get_implementation_patterns(
        &self,
        Parameters(req): Parameters<GetPatternsRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(pattern_type = ?req.pattern_type, "get_implementation_patterns");
        match req.pattern_type.as_deref() {
            None => json_result(&biocypher_core::patterns()),
            Some(name) => match biocypher_core::pattern(name) {
                Ok(pattern) => json_result(pattern),
                Err(e) => not_found(&e),
            },
        }
    }

    #[tool(
        description = "Recommend extraction approaches for a dataset. Pass the characteristics found during phase 1; every matching rule adds one recommendation, in a fixed order. Also returns the full decision framework."
    )]
    fn get_decision_guidance(
        &self,
        Parameters(req): Parameters<GetDecisionGuidanceRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!("get_decision_guidance");
        json_result(&biocypher_core::decision_guidance(req.data_characteristics))
    }

    #[tool(
        description = "Check whether a BioCypher project exists at a path. Returns the expected project structure, which entries are present or missing, and what to do if the project does not exist. Call this before creating adapters."
    )]
    fn check_project_exists(
        &self,
        Parameters(req): Parameters<CheckProjectRequest>,
    ) -> Result<CallToolResult, McpError> {
        let path = req.project_path.as_deref().unwrap_or(".");
        tracing::debug!(path, "check_project_exists");
        json_result(&biocypher_core::check_project(Path::new(path)))
    }

    #[tool(
        description = "Get instructions for creating a new BioCypher project with the cookiecutter template: installation, usage, expected output and notes."
    )]
    fn get_cookiecutter_instructions(&self) -> Result<CallToolResult, McpError> {
        tracing::debug!("get_cookiecutter_instructions");
        json_result(biocypher_core::cookiecutter_instructions())
    }

    #[tool(
        description = "Get the full BioCypher Adapter Creation Framework guide as markdown: principles, the adaptive implementation process, patterns and example workflows. A second content item carries the guide's descriptor (uri, title, mime type, annotations)."
    )]
    fn get_adapter_framework(&self) -> Result<CallToolResult, McpError> {
        tracing::debug!(placeholder = self.framework.is_placeholder(), "get_adapter_framework");
        let descriptor = serde_json::to_string_pretty(&FrameworkResource::descriptor())
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![
            Content::text(self.framework.content.clone()),
            Content::text(descriptor),
        ]))
    }
}

#[tool_handler]
impl ServerHandler for BiocypherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// --- Helpers ---

fn json_result<T: Serialize + ?Sized>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Unknown keys are a tool error carrying the valid keys, not a protocol error.
fn not_found<K: Serialize>(e: &NotFound<K>) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(e)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::error(vec![Content::text(json)]))
}

const INSTRUCTIONS: &str = r#"BioCypher MCP server: step-by-step guidance for creating BioCypher knowledge-graph adapters.

## Navigation
1. `get_available_workflows` to see what is available.
2. For a new project, `check_project_exists` first. If the project does not exist, follow `get_cookiecutter_instructions`; never create the project structure by hand.
3. `get_adapter_creation_workflow` for the five phases.
4. `get_phase_guidance` for each phase, in order, 1 to 5.
5. During phase 2, describe the data to `get_decision_guidance` to choose an extraction approach.
6. During phase 3, use `get_implementation_patterns` for field mapping, conditional extraction and progressive fallback code.

`get_adapter_framework` returns the complete guide as one markdown document when the overview is needed in full."#;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn server() -> BiocypherServer {
        BiocypherServer::new(FrameworkDocument::placeholder())
    }

    fn text(result: &CallToolResult) -> &str {
        text_at(result, 0)
    }

    fn text_at(result: &CallToolResult, index: usize) -> &str {
        result.content[index]
            .as_text()
            .map(|t| t.text.as_str())
            .expect("text content")
    }

    fn json_of(result: &CallToolResult) -> Value {
        serde_json::from_str(text(result)).unwrap()
    }

    fn is_error(result: &CallToolResult) -> bool {
        result.is_error == Some(true)
    }

    #[test]
    fn test_available_workflows() {
        let result = server()
            .get_available_workflows(Parameters(GetWorkflowsRequest { workflow_id: None }))
            .unwrap();
        assert!(!is_error(&result));
        let json = json_of(&result);
        assert_eq!(json["workflows"][0]["id"], "adapter_creation");
        assert!(!json["supporting_tools"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_phase_guidance_tool() {
        let s = server();
        let ok = s
            .get_phase_guidance(Parameters(GetPhaseGuidanceRequest { phase_number: 3 }))
            .unwrap();
        assert!(!is_error(&ok));
        assert_eq!(json_of(&ok)["phase"], 3);

        let missing = s
            .get_phase_guidance(Parameters(GetPhaseGuidanceRequest { phase_number: 99 }))
            .unwrap();
        assert!(is_error(&missing));
        let json = json_of(&missing);
        assert_eq!(json["error"], "Phase 99 not found");
        assert_eq!(json["available_phases"], json!([1, 2, 3, 4, 5]));
    }

    #[test]
    fn test_patterns_tool() {
        let s = server();
        let all = s
            .get_implementation_patterns(Parameters(GetPatternsRequest { pattern_type: None }))
            .unwrap();
        let json = json_of(&all);
        assert!(json.get("field_mapping").is_some());
        assert!(json.get("conditional_extraction").is_some());
        assert!(json.get("progressive_fallback").is_some());

        let missing = s
            .get_implementation_patterns(Parameters(GetPatternsRequest {
                pattern_type: Some("invalid_pattern".into()),
            }))
            .unwrap();
        assert!(is_error(&missing));
        assert_eq!(
            json_of(&missing)["available_patterns"],
            json!(["field_mapping", "conditional_extraction", "progressive_fallback"])
        );

        let one = s
            .get_implementation_patterns(Parameters(GetPatternsRequest {
                pattern_type: Some("field_mapping".into()),
            }))
            .unwrap();
        assert!(json_of(&one).get("example_mapping").is_some());
    }

    #[test]
    fn test_workflow_tool() {
        let s = server();
        let ok = s
            .get_available_workflows(Parameters(GetWorkflowsRequest {
                workflow_id: Some("project_creation".into()),
            }))
            .unwrap();
        assert_eq!(json_of(&ok)["id"], "project_creation");

        let missing = s
            .get_available_workflows(Parameters(GetWorkflowsRequest {
                workflow_id: Some("nope".into()),
            }))
            .unwrap();
        assert!(is_error(&missing));
        let json = json_of(&missing);
        assert_eq!(json["requested"], "nope");
        assert_eq!(
            json["available_workflows"],
            json!(["adapter_creation", "project_creation"])
        );
    }

    #[test]
    fn test_decision_guidance_tool_echoes_input() {
        let input = json!({"has_hierarchy": true, "has_multiple_resources": true});
        let result = server()
            .get_decision_guidance(Parameters(GetDecisionGuidanceRequest {
                data_characteristics: input.clone(),
            }))
            .unwrap();
        let json = json_of(&result);
        assert_eq!(json["data_characteristics"], input);
        let approaches: Vec<&str> = json["recommendations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["approach"].as_str().unwrap())
            .collect();
        assert_eq!(approaches, vec!["Series Extraction", "Hierarchical Extraction"]);
    }

    #[test]
    fn test_check_project_tool() {
        let dir = tempfile::tempdir().unwrap();
        let result = server()
            .check_project_exists(Parameters(CheckProjectRequest {
                project_path: Some(dir.path().to_string_lossy().to_string()),
            }))
            .unwrap();
        let json = json_of(&result);
        assert_eq!(json["exists"], false);
        assert!(json["instruction_if_not_exists"]
            .as_str()
            .unwrap()
            .contains("MUST"));
    }

    #[test]
    fn test_framework_tool_returns_guide_and_descriptor() {
        let doc = server().get_adapter_framework().unwrap();
        assert_eq!(doc.content.len(), 2);
        assert_eq!(text(&doc), biocypher_core::framework::PLACEHOLDER);

        let descriptor: Value = serde_json::from_str(text_at(&doc, 1)).unwrap();
        assert_eq!(descriptor["mimeType"], "text/markdown");
        assert_eq!(descriptor["annotations"]["audience"], json!(["user", "assistant"]));
    }

    #[test]
    fn test_cookiecutter_tool() {
        let json = json_of(&server().get_cookiecutter_instructions().unwrap());
        assert_eq!(json["installation"]["methods"][0]["method"], "pip");
    }

    #[test]
    fn test_router_lists_eight_tools() {
        let mut names: Vec<String> = server()
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "check_project_exists",
                "get_adapter_creation_workflow",
                "get_adapter_framework",
                "get_available_workflows",
                "get_cookiecutter_instructions",
                "get_decision_guidance",
                "get_implementation_patterns",
                "get_phase_guidance",
            ]
        );
    }

    #[test]
    fn test_server_info_has_instructions() {
        let info = server().get_info();
        assert!(info.instructions.unwrap().contains("get_available_workflows"));
    }
}
