use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named prompt template loaded from the prompts directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub template: String,
    /// Default values for `{variable}` placeholders, applied when the
    /// caller does not pass explicit ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}
