mod template;

#[cfg(test)]
mod tests;

pub use template::PromptTemplate;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("prompt '{name}' not found (available: {available:?})")]
    NotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("unsupported prompt file format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to parse {path}: {reason}")]
    ParseFailed { path: PathBuf, reason: String },

    #[error("missing variable for template substitution: {0}")]
    MissingVariable(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

const SUPPORTED_EXTENSIONS: [&str; 4] = ["json", "yaml", "yml", "txt"];

/// Loads and renders prompt templates from a directory of JSON, YAML
/// and plain-text files.
pub struct PromptStore {
    dir: PathBuf,
}

impl PromptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load a single template file, dispatching on extension. A `.txt`
    /// file becomes a template named after its stem.
    pub fn load_file(path: &Path) -> Result<PromptTemplate, PromptError> {
        let read = |p: &Path| {
            std::fs::read_to_string(p).map_err(|source| PromptError::Io {
                path: p.to_path_buf(),
                source,
            })
        };
        let parse_failed = |reason: String| PromptError::ParseFailed {
            path: path.to_path_buf(),
            reason,
        };

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "json" => {
                serde_json::from_str(&read(path)?).map_err(|e| parse_failed(e.to_string()))
            }
            "yaml" | "yml" => {
                serde_yaml::from_str(&read(path)?).map_err(|e| parse_failed(e.to_string()))
            }
            "txt" => {
                let content = read(path)?;
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unnamed")
                    .to_string();
                let file_name = path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unnamed")
                    .to_string();
                Ok(PromptTemplate {
                    name: stem,
                    description: Some(format!("Prompt from {}", file_name)),
                    template: content.trim().to_string(),
                    variables: None,
                    metadata: None,
                })
            }
            other => Err(PromptError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Load every template in the directory, keyed by name.
    ///
    /// Best-effort: unreadable or malformed files are logged and
    /// skipped, and a missing directory yields an empty map: the
    /// store is optional at runtime, callers carry built-in defaults.
    pub fn load_all(&self) -> HashMap<String, PromptTemplate> {
        let mut prompts = HashMap::new();

        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return prompts,
        };

        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            let supported = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                .unwrap_or(false);
            if !path.is_file() || !supported {
                continue;
            }

            match Self::load_file(&path) {
                Ok(template) => {
                    prompts.insert(template.name.clone(), template);
                }
                Err(e) => {
                    warn!(path = %path.display(), "failed to load prompt: {}", e);
                }
            }
        }

        prompts
    }

    /// Persist a template as pretty-printed JSON into the store
    /// directory, creating the directory on first use. Returns the
    /// written path.
    pub fn save(&self, template: &PromptTemplate) -> Result<PathBuf, PromptError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| PromptError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(format!("{}.json", template.name));
        let json = serde_json::to_string_pretty(template).map_err(|e| PromptError::ParseFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|source| PromptError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Replace `{key}` placeholders with the given values.
    ///
    /// Any `{identifier}` left over afterwards means the caller forgot
    /// a variable; other brace usage (CSS, JS, JSON examples inside a
    /// template) passes through untouched.
    pub fn substitute(
        template: &str,
        variables: &HashMap<String, String>,
    ) -> Result<String, PromptError> {
        let mut rendered = template.to_string();
        for (key, value) in variables {
            rendered = rendered.replace(&format!("{{{}}}", key), value);
        }

        if let Some(missing) = find_placeholder(&rendered) {
            return Err(PromptError::MissingVariable(missing));
        }
        Ok(rendered)
    }

    /// Render a prompt by name. Explicit variables win over the
    /// template's defaults; with neither, the template text is returned
    /// verbatim.
    pub fn get(
        &self,
        name: &str,
        variables: Option<&HashMap<String, String>>,
    ) -> Result<String, PromptError> {
        let prompts = self.load_all();

        let template = prompts.get(name).ok_or_else(|| {
            let mut available: Vec<String> = prompts.keys().cloned().collect();
            available.sort();
            PromptError::NotFound {
                name: name.to_string(),
                available,
            }
        })?;

        match (variables, &template.variables) {
            (Some(explicit), _) => Self::substitute(&template.template, explicit),
            (None, Some(defaults)) => Self::substitute(&template.template, defaults),
            (None, None) => Ok(template.template.clone()),
        }
    }
}

/// First `{identifier}` placeholder in the text, if any. Identifiers
/// are ASCII alphanumerics and underscores, at least one character.
fn find_placeholder(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                end += 1;
            }
            if end > start && end < bytes.len() && bytes[end] == b'}' {
                return Some(text[start..end].to_string());
            }
        }
        i += 1;
    }
    None
}
