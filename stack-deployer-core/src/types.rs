//! Result types returned by the deployer

use serde::Serialize;
use serde_json::{Map, Value};

/// Flat mapping from stack output key to output value, in the order the
/// service listed the outputs. Values are always JSON strings.
pub type StackOutputs = Map<String, Value>;

/// One entry of a stack's output list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackOutput {
    pub output_key: Option<String>,
    pub output_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// What `ValidateTemplate` reported about a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared parameter keys, in template order.
    pub parameters: Vec<String>,
    /// Capabilities the template requires (e.g. `CAPABILITY_IAM`).
    pub capabilities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities_reason: Option<String>,
}

/// Which path a deployment took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "Outcome")]
pub enum DeployOutcome {
    Created {
        #[serde(rename = "StackId")]
        stack_id: Option<String>,
    },
    Updated {
        #[serde(rename = "StackId")]
        stack_id: Option<String>,
    },
    /// The stack already matched the requested template and parameters.
    NoChanges,
}
