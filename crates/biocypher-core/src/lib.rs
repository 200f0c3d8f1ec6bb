pub mod catalog;
pub mod decision;
pub mod framework;
pub mod patterns;
pub mod phases;
pub mod project;

use serde::ser::{Serialize, SerializeMap, Serializer};

pub use catalog::{
    adapter_creation_workflow, available_workflows, workflow, AdapterWorkflow, AvailableWorkflows,
    Phase, Workflow,
};
pub use decision::{decision_guidance, DataCharacteristics, DecisionGuidance, Recommendation};
pub use framework::{FrameworkDocument, FrameworkResource};
pub use patterns::{pattern, patterns, Pattern, PatternCatalog};
pub use phases::{phase_guidance, PhaseGuidance};
pub use project::{check_project, cookiecutter_instructions, CookiecutterInstructions, ProjectCheck};

/// Returned when a lookup key is not in the catalog.
///
/// Carries the requested key and every valid key, so a caller can retry
/// without a second round trip. The valid keys serialize under
/// `available_key` (`available_phases`, `available_patterns`, ...).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct NotFound<K> {
    pub error: String,
    pub requested: K,
    pub available_key: &'static str,
    pub available: Vec<K>,
}

impl<K> NotFound<K> {
    pub fn new(
        error: impl Into<String>,
        requested: K,
        available_key: &'static str,
        available: Vec<K>,
    ) -> Self {
        Self {
            error: error.into(),
            requested,
            available_key,
            available,
        }
    }
}

impl<K: Serialize> Serialize for NotFound<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("error", &self.error)?;
        map.serialize_entry("requested", &self.requested)?;
        map.serialize_entry(self.available_key, &self.available)?;
        map.end()
    }
}

/// Items that serialize as one entry of a JSON object keyed by `key()`.
pub trait Keyed {
    fn key(&self) -> &'static str;
}

/// Serialize a slice of keyed items as an object, in slice order.
pub(crate) fn keyed_map<T, S>(items: &&[T], serializer: S) -> Result<S::Ok, S::Error>
where
    T: Keyed + Serialize,
    S: Serializer,
{
    serializer.collect_map(items.iter().map(|item| (item.key(), item)))
}

/// Serialize `(name, text)` pairs as an object, in slice order.
pub(crate) fn pair_map<S>(pairs: &&[(&str, &str)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(pairs.iter().map(|(k, v)| (*k, *v)))
}

pub(crate) fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}
