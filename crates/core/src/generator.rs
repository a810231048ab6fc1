use crate::Turn;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Message,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub content: String,
}

// The `Generator` trait is the contract for the generative-text collaborator:
// given a system prompt, the candidate's latest message, and the prior turns,
// produce the interviewer's reply. The session orchestrator depends on this
// abstraction rather than a concrete client, so unit tests drive it with
// `mockall`'s `MockGenerator` instead of live network calls, and the HTTP
// backend can be swapped without touching any session logic.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Generator {
    async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
        history: &[Turn],
    ) -> Result<String>;
}

/// HTTP client for the Mistral chat-completions API.
pub struct MistralClient {
    client: Client,
    api_key: String,
    model: String,
}

const CHAT_COMPLETIONS_URL: &str = "https://api.mistral.ai/v1/chat/completions";

impl MistralClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl Generator for MistralClient {
    async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
        history: &[Turn],
    ) -> Result<String> {
        // The API only takes role and content; timestamps stay server-side.
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(serde_json::json!({ "role": "system", "content": system_prompt }));
        for turn in history {
            messages.push(serde_json::json!({
                "role": turn.role.as_str(),
                "content": turn.content,
            }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": user_message }));

        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": 0.7,
            "max_tokens": 1000,
        });

        let resp = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to reach the Mistral API")?
            .json::<LlmResponse>()
            .await
            .context("Failed to parse the Mistral API response")?;

        let reply = &resp
            .choices
            .first()
            .ok_or_else(|| anyhow!("No response from LLM"))?
            .message
            .content;
        Ok(reply.clone())
    }
}
