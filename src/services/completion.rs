// src/services/completion.rs

use async_trait::async_trait;
use serde_json::Value;

use crate::common::error::AppError;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: Option<&str>, prompt: &str) -> Result<String, AppError>;
}

pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(client: reqwest::Client, api_key: Option<String>, model: String) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            model,
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }
}

/// Texto de `choices[0].message.content`; resposta sem ele é erro do provedor
fn extract_content(result: &Value) -> Result<String, AppError> {
    result["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::Upstream {
            status: 502,
            message: "Resposta da IA sem conteúdo.".into(),
        })
}

fn build_messages(system: Option<&str>, prompt: &str) -> Vec<Value> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system.filter(|s| !s.trim().is_empty()) {
        messages.push(serde_json::json!({"role": "system", "content": system}));
    }
    messages.push(serde_json::json!({"role": "user", "content": prompt}));
    messages
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, system: Option<&str>, prompt: &str) -> Result<String, AppError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::ServiceUnavailable("IA não configurada: defina OPENAI_API_KEY.".into())
        })?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "messages": build_messages(system, prompt),
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream { status: status.as_u16(), message });
        }

        let result: Value = response.json().await?;
        extract_content(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completion_without_key_fails_fast() {
        let client = OpenAiClient::new(reqwest::Client::new(), Some(String::new()), "gpt-4o-mini".into());

        let result = client.complete(None, "Olá").await;

        assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
    }

    #[test]
    fn content_is_read_from_first_choice() {
        let result = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "Abrimos às 8h." } }]
        });
        assert_eq!(extract_content(&result).unwrap(), "Abrimos às 8h.");
    }

    #[test]
    fn response_without_content_is_an_upstream_error() {
        for result in [
            serde_json::json!({ "choices": [] }),
            serde_json::json!({ "choices": [{ "message": { "role": "assistant" } }] }),
            serde_json::json!({ "choices": [{ "message": { "content": null } }] }),
            serde_json::json!({ "error": { "message": "overloaded" } }),
        ] {
            assert!(matches!(
                extract_content(&result),
                Err(AppError::Upstream { status: 502, .. })
            ));
        }
    }

    #[test]
    fn system_message_comes_first_when_present() {
        let messages = build_messages(Some("Você é atendente do pet shop"), "Qual o horário?");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["content"], "Qual o horário?");

        assert_eq!(build_messages(Some("  "), "Oi").len(), 1);
    }
}
