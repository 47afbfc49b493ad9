mod types;


pub use types::{DeploymentResult, GenerateRequest, SiteBundle, SiteMetadata};

use crate::environment::{EnvironmentStore, StoreError};
use crate::llm::{LlmError, TextGenerator};
use crate::parser::parse_response;
use crate::prompts::PromptStore;
use crate::server::{ServerError, ServerManager};
use chrono::Utc;
use rand::Rng;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Template name looked up before falling back to the built-in system
/// prompt.
pub const SYSTEM_PROMPT_NAME: &str = "flexible_website_generator";

const GENERATION_TEMPERATURE: f32 = 0.7;
const GENERATION_MAX_TOKENS: u32 = 4000;

const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an expert web developer specializing in creating realistic e-commerce websites for testing purposes.

Your task is to generate complete, functional websites with the following characteristics:
- Realistic product listings and data
- Professional styling and layout
- Implement specified anti-crawler methods effectively
- Include multiple pages (home, products, about, contact)
- Use modern web technologies (HTML5, CSS3, JavaScript)
- Make the website look and feel like a real merchant site

Anti-crawler methods to implement when requested:
- rate_limiting: Add JavaScript to track request frequency
- user_agent_detection: Check for common bot user agents
- javascript_rendering: Require JS to load content
- captcha_challenges: Add CAPTCHA-like challenges
- dynamic_content_loading: Load content dynamically with AJAX
- session_tracking: Track user sessions
- ip_blocking: Simulate IP-based blocking
- honeypot_links: Add hidden links to catch bots

Return the complete code for each file clearly separated and labeled.";

const GENERATION_INSTRUCTIONS: &str = "\
Please generate a complete, functional website based on the user's request. Include:
1. HTML files (at minimum index.html, plus any other pages that make sense)
2. CSS file for styling
3. JavaScript file for functionality
4. Any data files (JSON/XML) if needed for content
5. robots.txt if appropriate

Make the website realistic and functional for testing purposes.";

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("website generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("failed to encode metadata: {0}")]
    MetadataEncode(#[from] serde_json::Error),

    #[error("failed to write metadata to {path}: {source}")]
    MetadataWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Composes the whole pipeline: prompt construction, backend call,
/// response parsing, environment population and server start.
///
/// The store and server manager are passed into the deploy operations
/// by reference, so one generator can target any base directory and
/// the server registry stays a single owned component.
pub struct SiteGenerator {
    backend: Box<dyn TextGenerator>,
    prompts: PromptStore,
}

impl SiteGenerator {
    pub fn new(backend: Box<dyn TextGenerator>, prompts: PromptStore) -> Self {
        Self { backend, prompts }
    }

    /// Generate a site from a natural-language request.
    ///
    /// A backend failure propagates before anything touches the
    /// filesystem. A response without recognizable file markers still
    /// succeeds via the parser's default-site fallback.
    pub async fn generate_site(
        &self,
        user_prompt: &str,
        additional_requirements: Option<&str>,
        merchant_type: Option<&str>,
    ) -> Result<SiteBundle, GeneratorError> {
        let full_prompt = build_full_prompt(user_prompt, additional_requirements);
        let system_prompt = self.system_prompt();

        let raw_response = self
            .backend
            .generate(
                &full_prompt,
                Some(&system_prompt),
                GENERATION_TEMPERATURE,
                Some(GENERATION_MAX_TOKENS),
            )
            .await?;

        Ok(self.bundle_response(raw_response, user_prompt, additional_requirements, merchant_type))
    }

    /// Streaming variant of [`generate_site`](Self::generate_site):
    /// fragments are forwarded to `on_fragment` as they arrive.
    pub async fn generate_site_streaming(
        &self,
        user_prompt: &str,
        additional_requirements: Option<&str>,
        merchant_type: Option<&str>,
        on_fragment: &mut (dyn FnMut(&str) + Send),
    ) -> Result<SiteBundle, GeneratorError> {
        let full_prompt = build_full_prompt(user_prompt, additional_requirements);
        let system_prompt = self.system_prompt();

        let raw_response = self
            .backend
            .generate_streaming(
                &full_prompt,
                Some(&system_prompt),
                GENERATION_TEMPERATURE,
                Some(GENERATION_MAX_TOKENS),
                on_fragment,
            )
            .await?;

        Ok(self.bundle_response(raw_response, user_prompt, additional_requirements, merchant_type))
    }

    /// Materialize a bundle on disk and serve it.
    ///
    /// The environment is created clean, so repeated deployments to the
    /// same name replace the previous site. Failures after creation
    /// leave the partially-written environment in place for inspection;
    /// there is no rollback.
    pub async fn deploy(
        &self,
        bundle: SiteBundle,
        env_name: Option<String>,
        port: Option<u16>,
        store: &EnvironmentStore,
        servers: &ServerManager,
    ) -> Result<DeploymentResult, GeneratorError> {
        let env_name = env_name.unwrap_or_else(|| synthesize_env_name(&bundle.metadata));

        let root = store.create(&env_name, true)?;
        store.write_files(&root, &bundle.files)?;
        write_metadata(&root, &bundle.metadata)?;

        let server_url = servers.start(&env_name, port).await?;

        info!(env = %env_name, url = %server_url, files = bundle.files.len(), "site deployed");
        Ok(DeploymentResult {
            bundle,
            server_url,
            environment_name: env_name,
            success: true,
        })
    }

    /// Generate and deploy in one step.
    pub async fn generate_and_deploy(
        &self,
        request: GenerateRequest,
        store: &EnvironmentStore,
        servers: &ServerManager,
    ) -> Result<DeploymentResult, GeneratorError> {
        let bundle = self
            .generate_site(
                &request.user_prompt,
                request.additional_requirements.as_deref(),
                request.merchant_type.as_deref(),
            )
            .await?;

        self.deploy(bundle, request.env_name, request.port, store, servers)
            .await
    }

    fn bundle_response(
        &self,
        raw_response: String,
        user_prompt: &str,
        additional_requirements: Option<&str>,
        merchant_type: Option<&str>,
    ) -> SiteBundle {
        let files = parse_response(&raw_response);
        debug!(files = files.len(), "parsed model response");

        SiteBundle {
            files,
            metadata: SiteMetadata {
                user_prompt: user_prompt.to_string(),
                additional_requirements: additional_requirements.map(str::to_string),
                merchant_type: merchant_type.map(str::to_string),
                model: self.backend.model_name().to_string(),
                generated_at: Utc::now(),
            },
            raw_response,
        }
    }

    fn system_prompt(&self) -> String {
        self.prompts
            .get(SYSTEM_PROMPT_NAME, None)
            .unwrap_or_else(|_| DEFAULT_SYSTEM_PROMPT.to_string())
    }
}

/// User request plus the fixed generation instructions the backend is
/// always given.
fn build_full_prompt(user_prompt: &str, additional_requirements: Option<&str>) -> String {
    let mut prompt = format!("User Request: {}", user_prompt);
    if let Some(requirements) = additional_requirements {
        prompt.push_str(&format!("\n\nAdditional Requirements: {}", requirements));
    }
    prompt.push_str("\n\n");
    prompt.push_str(GENERATION_INSTRUCTIONS);
    prompt
}

/// `<merchant_type>_test_<suffix>` with a random numeric suffix, so
/// successive unnamed runs do not collide.
fn synthesize_env_name(metadata: &SiteMetadata) -> String {
    let merchant_type = metadata.merchant_type.as_deref().unwrap_or("merchant");
    let suffix: u16 = rand::thread_rng().gen_range(1000..10000);
    format!("{}_test_{}", merchant_type, suffix)
}

fn write_metadata(root: &Path, metadata: &SiteMetadata) -> Result<(), GeneratorError> {
    let path = root.join("metadata.json");
    let json = serde_json::to_string_pretty(metadata)?;
    std::fs::write(&path, json).map_err(|source| GeneratorError::MetadataWrite { path, source })
}
