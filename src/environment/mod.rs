mod error;
mod info;

#[cfg(test)]
mod tests;

pub use error::StoreError;
pub use info::EnvironmentInfo;

use crate::parser::SiteFiles;
use crate::security::PathSanitizer;
use crate::server::ServerManager;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Subdirectories every environment gets at creation time, whether or
/// not the generated file set ever references them.
pub const SKELETON_DIRS: [&str; 6] = ["static", "templates", "assets", "css", "js", "images"];

/// Owns the base directory under which all generated environments live.
///
/// Purely filesystem-facing: server state belongs to [`ServerManager`],
/// which is passed in explicitly where the two concerns meet
/// ([`info`](Self::info), [`cleanup`](Self::cleanup)).
pub struct EnvironmentStore {
    base_dir: PathBuf,
}

impl EnvironmentStore {
    /// Create a store rooted at `base_dir`, creating the directory if
    /// it does not exist yet.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|e| StoreError::io(&base_dir, e))?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn env_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Create an environment directory with the fixed skeleton.
    ///
    /// With `clean` set, a pre-existing directory of the same name is
    /// removed first; otherwise creation is idempotent over whatever is
    /// already there.
    pub fn create(&self, name: &str, clean: bool) -> Result<PathBuf, StoreError> {
        PathSanitizer::validate_name(name)?;
        let root = self.env_path(name);

        if clean && root.exists() {
            fs::remove_dir_all(&root).map_err(|e| StoreError::io(&root, e))?;
        }

        fs::create_dir_all(&root).map_err(|e| StoreError::io(&root, e))?;
        for dir in SKELETON_DIRS {
            let sub = root.join(dir);
            fs::create_dir_all(&sub).map_err(|e| StoreError::io(&sub, e))?;
        }

        debug!(env = name, path = %root.display(), "environment created");
        Ok(root)
    }

    /// Write a parsed file set into an environment root.
    ///
    /// All keys are sanitized up front: a traversal or absolute key
    /// fails the whole call before anything is written. Empty keys (a
    /// marker line with no name after it) are filtered out with a
    /// warning rather than failing the deployment. Existing files are
    /// overwritten.
    pub fn write_files(&self, root: &Path, files: &SiteFiles) -> Result<(), StoreError> {
        let mut sanitized: Vec<(String, &str)> = Vec::with_capacity(files.len());
        for (raw_path, content) in files {
            if raw_path.trim().is_empty() {
                warn!("skipping file-set entry with empty name");
                continue;
            }
            sanitized.push((PathSanitizer::sanitize(raw_path)?, content.as_str()));
        }

        for (rel_path, content) in sanitized {
            let file_path = root.join(&rel_path);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
            fs::write(&file_path, content).map_err(|e| StoreError::io(&file_path, e))?;
        }

        Ok(())
    }

    /// Names of all environments currently on disk. Order is whatever
    /// the directory iteration yields.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = fs::read_dir(&self.base_dir).map_err(|e| StoreError::io(&self.base_dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.base_dir, e))?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    /// Describe one environment, including its server status.
    pub async fn info(
        &self,
        name: &str,
        servers: &ServerManager,
    ) -> Result<EnvironmentInfo, StoreError> {
        let root = self.env_path(name);
        if !root.is_dir() {
            return Err(StoreError::NotFound(name.to_string()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&root).into_iter().filter_map(Result::ok) {
            if entry.file_type().is_file() {
                if let Ok(rel) = entry.path().strip_prefix(&root) {
                    files.push(rel.to_string_lossy().into_owned());
                }
            }
        }
        files.sort();

        let server_url = servers.url_for(name).await;
        Ok(EnvironmentInfo {
            name: name.to_string(),
            path: root,
            exists: true,
            server_running: server_url.is_some(),
            server_url,
            files,
        })
    }

    /// Stop any running server for `name`, then delete its directory.
    /// Idempotent: a missing environment or absent server is a no-op.
    pub async fn cleanup(&self, name: &str, servers: &ServerManager) -> Result<(), StoreError> {
        servers.stop(name).await;
        self.remove(name)
    }

    /// Delete an environment directory if present. Idempotent.
    pub fn remove(&self, name: &str) -> Result<(), StoreError> {
        let root = self.env_path(name);
        if root.exists() {
            fs::remove_dir_all(&root).map_err(|e| StoreError::io(&root, e))?;
            debug!(env = name, "environment removed");
        }
        Ok(())
    }
}
