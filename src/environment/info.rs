use serde::Serialize;
use std::path::PathBuf;

/// Snapshot of one environment: where it lives, whether a server is
/// currently registered for it, and everything inside it.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentInfo {
    pub name: String,
    pub path: PathBuf,
    pub exists: bool,
    pub server_running: bool,
    pub server_url: Option<String>,
    /// Relative paths of every file under the root, sorted.
    pub files: Vec<String>,
}
