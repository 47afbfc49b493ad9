use super::config::LlmConfig;
use super::types::{ChatChunk, ChatMessage, ChatRequest, ChatResponse};
use super::TextGenerator;
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OPENAI_API_KEY is not set; export it or configure an explicit key")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("backend returned error status {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("backend returned no choices")]
    NoChoices,
}

/// Client for an OpenAI-compatible chat-completions backend.
pub struct LlmClient {
    http: Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self { http, config }
    }

    /// Build a client from environment configuration.
    pub fn from_env() -> Result<Self, LlmError> {
        Ok(Self::new(LlmConfig::from_env()?))
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_request(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        temperature: f32,
        max_tokens: Option<u32>,
        stream: bool,
    ) -> ChatRequest {
        let mut messages = Vec::new();
        if let Some(system) = system_prompt {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature,
            max_tokens,
            stream,
        }
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<reqwest::Response, LlmError> {
        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// One-shot generation.
    pub async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<String, LlmError> {
        let request = self.build_request(prompt, system_prompt, temperature, max_tokens, false);
        let response = self.post_chat(&request).await?;
        let parsed: ChatResponse = response.json().await?;

        let choice = parsed.choices.into_iter().next().ok_or(LlmError::NoChoices)?;
        Ok(choice.message.content)
    }

    /// Streaming generation: returns a pull-based fragment reader over
    /// the server-sent event stream.
    pub async fn generate_stream(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<ChatStream, LlmError> {
        let request = self.build_request(prompt, system_prompt, temperature, max_tokens, true);
        let response = self.post_chat(&request).await?;
        Ok(ChatStream::new(response))
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<String, LlmError> {
        LlmClient::generate(self, prompt, system_prompt, temperature, max_tokens).await
    }

    async fn generate_streaming(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        temperature: f32,
        max_tokens: Option<u32>,
        on_fragment: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String, LlmError> {
        let mut stream = self
            .generate_stream(prompt, system_prompt, temperature, max_tokens)
            .await?;

        let mut accumulated = String::new();
        while let Some(fragment) = stream.next_fragment().await? {
            on_fragment(&fragment);
            accumulated.push_str(&fragment);
        }
        Ok(accumulated)
    }
}

/// Incremental reader over a chat-completions SSE response.
///
/// Buffers raw bytes, splits them on line boundaries, and decodes each
/// `data:` payload into a content delta. `[DONE]` or end of body ends
/// the stream.
pub struct ChatStream {
    response: reqwest::Response,
    buffer: String,
    done: bool,
}

impl ChatStream {
    fn new(response: reqwest::Response) -> Self {
        Self {
            response,
            buffer: String::new(),
            done: false,
        }
    }

    /// Next non-empty text fragment, or None once the stream is over.
    pub async fn next_fragment(&mut self) -> Result<Option<String>, LlmError> {
        loop {
            // Drain complete lines already buffered.
            while let Some(newline) = self.buffer.find('\n') {
                let line = self.buffer[..newline].trim().to_string();
                self.buffer.drain(..=newline);

                if let Some(payload) = line.strip_prefix("data:") {
                    let payload = payload.trim();
                    if payload == "[DONE]" {
                        self.done = true;
                        return Ok(None);
                    }
                    if let Ok(chunk) = serde_json::from_str::<ChatChunk>(payload) {
                        if let Some(text) = chunk
                            .choices
                            .into_iter()
                            .next()
                            .and_then(|choice| choice.delta.content)
                        {
                            if !text.is_empty() {
                                return Ok(Some(text));
                            }
                        }
                    }
                }
            }

            if self.done {
                return Ok(None);
            }

            match self.response.chunk().await? {
                Some(bytes) => self.buffer.push_str(&String::from_utf8_lossy(&bytes)),
                None => {
                    self.done = true;
                    return Ok(None);
                }
            }
        }
    }
}
