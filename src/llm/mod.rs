mod client;
mod config;
mod types;


pub use client::{ChatStream, LlmClient, LlmError};
pub use config::{LlmConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

use async_trait::async_trait;

/// The seam the orchestrator generates text through.
///
/// Implemented by [`LlmClient`] for real runs and by in-memory mocks in
/// tests, so the whole generate-and-deploy pipeline can be exercised
/// without a network.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Identifier of the underlying model, recorded in deployment
    /// metadata.
    fn model_name(&self) -> &str {
        "unknown"
    }

    /// One-shot generation: returns the full response text.
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<String, LlmError>;

    /// Streaming generation: emits incremental fragments through
    /// `on_fragment` and returns the accumulated text.
    ///
    /// The default implementation degrades to one-shot generation with
    /// a single fragment, which is all a mock needs.
    async fn generate_streaming(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        temperature: f32,
        max_tokens: Option<u32>,
        on_fragment: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String, LlmError> {
        let text = self
            .generate(prompt, system_prompt, temperature, max_tokens)
            .await?;
        on_fragment(&text);
        Ok(text)
    }
}
