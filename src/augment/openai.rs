//! Blocking OpenAI chat-completions client.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{AugmentError, ContentGenerator};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A [`ContentGenerator`] that sends each prompt as one user message.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(api_key: impl Into<String>) -> Result<Self, AugmentError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| AugmentError::Config(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    /// Configure from `OPENAI_API_KEY` and, optionally, `OPENAI_BASE_URL`.
    pub fn from_env() -> Result<Self, AugmentError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AugmentError::Config("OPENAI_API_KEY is not set".to_string()))?;
        let mut generator = Self::new(api_key)?;
        if let Some(base_url) = std::env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|url| !url.is_empty())
        {
            generator.base_url = base_url;
        }
        Ok(generator)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl ContentGenerator for OpenAiGenerator {
    fn generate(&self, prompt: &str) -> Result<String, AugmentError> {
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        log::debug!("Sending {} byte prompt to {}", prompt.len(), self.model);
        let response: ChatResponse = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| AugmentError::Request(e.to_string()))?
            .json()
            .map_err(|e| AugmentError::InvalidResponse(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AugmentError::InvalidResponse("no message in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let mut generator = OpenAiGenerator::new("key").unwrap();
        assert_eq!(generator.endpoint(), "https://api.openai.com/v1/chat/completions");
        generator.base_url = "http://localhost:8080/v1/".to_string();
        assert_eq!(generator.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_request_body() {
        let body = ChatRequest {
            model: DEFAULT_MODEL,
            temperature: DEFAULT_TEMPERATURE,
            messages: [ChatMessage {
                role: "user",
                content: "Hi",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["content"], "Hi");
    }
}
