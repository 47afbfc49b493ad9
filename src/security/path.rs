use crate::environment::StoreError;
use std::path::{Component, Path};

pub struct PathSanitizer;

impl PathSanitizer {
    /// Sanitize a file-set key before it is joined to an environment root.
    ///
    /// Keys come straight out of a model response, so they are treated as
    /// hostile: absolute paths, `..` traversal and non-UTF-8 components
    /// are rejected, `.` markers are dropped.
    ///
    /// Returns the normalized relative path with forward slashes.
    pub fn sanitize(raw_path: &str) -> Result<String, StoreError> {
        if raw_path.trim().is_empty() {
            return Err(StoreError::InvalidPath("empty path".to_string()));
        }

        let path = Path::new(raw_path);
        let mut components = Vec::new();

        for component in path.components() {
            match component {
                Component::Prefix(_) | Component::RootDir => {
                    return Err(StoreError::InvalidPath(format!(
                        "absolute path not allowed: {}",
                        raw_path
                    )));
                }
                Component::ParentDir => {
                    return Err(StoreError::InvalidPath(format!(
                        "parent directory traversal not allowed: {}",
                        raw_path
                    )));
                }
                Component::CurDir => continue,
                Component::Normal(part) => {
                    let part_str = part.to_str().ok_or_else(|| {
                        StoreError::InvalidPath(format!("invalid UTF-8 in path: {:?}", part))
                    })?;
                    components.push(part_str);
                }
            }
        }

        if components.is_empty() {
            return Err(StoreError::InvalidPath(format!(
                "no valid components: {}",
                raw_path
            )));
        }

        Ok(components.join("/"))
    }

    /// Check that an environment name is a single normal path component,
    /// usable both as a directory name and as a registry key.
    pub fn validate_name(name: &str) -> Result<(), StoreError> {
        match Self::sanitize(name) {
            Ok(sanitized) if sanitized == name && !name.contains('/') && !name.contains('\\') => {
                Ok(())
            }
            _ => Err(StoreError::InvalidName(name.to_string())),
        }
    }
}
