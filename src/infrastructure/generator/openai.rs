//! OpenAI chat-completions SQL generator

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::generator::SqlGenerator;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You translate natural-language questions into SQL for a read-only \
reporting database. Respond with a single SELECT statement and nothing else: no commentary, \
no explanation. Prefer explicit column lists and include a LIMIT clause unless the question \
asks for an aggregate.";

/// SQL generator backed by the OpenAI chat completions API
#[derive(Debug)]
pub struct OpenAiSqlGenerator<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> OpenAiSqlGenerator<C> {
    /// Create a new generator against the public OpenAI API
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    /// Create a new generator with custom base URL
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
            model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }

    /// Override the chat model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, question: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": question },
            ],
            "temperature": 0.0,
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<String, DomainError> {
        let response: OpenAiChatResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("openai", "No choices in response"))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl<C: HttpClientTrait> SqlGenerator for OpenAiSqlGenerator<C> {
    async fn generate(&self, question: &str) -> Result<String, DomainError> {
        let url = self.chat_completions_url();
        let body = self.build_request(question);

        debug!("Requesting SQL generation with model {}", self.model);

        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

// OpenAI API types for chat completions

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChatChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChatChoice {
    message: OpenAiChatMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiChatMessage {
    content: Option<String>,
}
