use crate::parser::SiteFiles;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sidecar metadata persisted as `metadata.json` in the environment
/// root. The format is additive; readers must tolerate extra fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteMetadata {
    pub user_prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_type: Option<String>,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

/// A generated site before deployment: the parsed files, their
/// provenance, and the untouched model response for debugging.
#[derive(Debug)]
pub struct SiteBundle {
    pub files: SiteFiles,
    pub metadata: SiteMetadata,
    pub raw_response: String,
}

/// Everything a caller needs after a successful generate-and-deploy.
#[derive(Debug)]
pub struct DeploymentResult {
    pub bundle: SiteBundle,
    pub server_url: String,
    pub environment_name: String,
    pub success: bool,
}

/// Parameters for one generate-and-deploy run.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub user_prompt: String,
    pub additional_requirements: Option<String>,
    /// Feeds environment-name synthesis when `env_name` is unset.
    pub merchant_type: Option<String>,
    pub env_name: Option<String>,
    pub port: Option<u16>,
}
