use super::LlmProvider;
use crate::config::{LlmConfig, ProviderKind};
use crate::llm::{ChatMessage, UpstreamError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::debug;
use url::Url;

/// Provider speaking the OpenAI chat-completions wire format.
///
/// Both OpenRouter and GigaChat expose this shape; they differ only in base
/// URL, credential and a couple of headers.
#[derive(Debug)]
pub struct OpenAiCompatibleProvider {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    kind: ProviderKind,
}

impl OpenAiCompatibleProvider {
    /// Creates a provider from the LLM section of the application config.
    ///
    /// # Returns
    /// * `Result<Self, crate::errors::Error>` - Provider or a configuration error
    pub fn from_config(config: &LlmConfig) -> Result<Self, crate::errors::Error> {
        let mut base_url = config.base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = Url::parse(&base_url)
            .map_err(|e| crate::errors::Error::Config(format!("invalid base_url: {}", e)))?;
        let endpoint = base
            .join("chat/completions")
            .map_err(|e| crate::errors::Error::Config(format!("invalid base_url: {}", e)))?;

        let client = Client::builder()
            .timeout(config.request_timeout()?)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| crate::errors::Error::Config(format!("http client: {}", e)))?;

        Ok(OpenAiCompatibleProvider {
            client,
            endpoint,
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            kind: config.provider,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    async fn call_llm_api(&self, messages: Vec<ChatMessage>) -> Result<String, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| UpstreamError::Auth("no credential configured".to_string()))?;

        let request_body = json!({
          "model": self.model,
          "messages": messages,
          "temperature": self.temperature,
          "max_tokens": self.max_tokens
        });

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(&request_body);
        if self.kind == ProviderKind::OpenRouter {
            request = request
                .header("HTTP-Referer", "https://alfapilot.bot")
                .header("X-Title", "Alfapilot AI Assistant");
        }

        debug!(provider = ?self.kind, model = %self.model, "sending chat completion");
        let res = request.send().await?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UpstreamError::Auth(text),
                StatusCode::TOO_MANY_REQUESTS => UpstreamError::RateLimited(text),
                _ => UpstreamError::Status {
                    status: status.as_u16(),
                    message: text,
                },
            });
        }

        let json_resp: serde_json::Value = res.json().await?;
        extract_content(&json_resp)
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Pulls `choices[0].message.content` out of a chat-completion envelope.
pub(crate) fn extract_content(envelope: &serde_json::Value) -> Result<String, UpstreamError> {
    envelope["choices"][0]["message"]["content"]
        .as_str()
        .map(|content| content.trim().to_string())
        .ok_or_else(|| UpstreamError::MalformedEnvelope("no choices[0].message.content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content() {
        let envelope = json!({
            "choices": [{"message": {"role": "assistant", "content": "  hello \n"}}]
        });
        assert_eq!(extract_content(&envelope).unwrap(), "hello");
    }

    #[test]
    fn test_extract_content_malformed() {
        let envelope = json!({"error": {"message": "nope"}});
        assert!(matches!(
            extract_content(&envelope),
            Err(UpstreamError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let config = LlmConfig {
            base_url: "https://openrouter.ai/api/v1/".to_string(),
            ..LlmConfig::default()
        };
        let provider = OpenAiCompatibleProvider::from_config(&config).unwrap();
        assert_eq!(
            provider.endpoint().as_str(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let config = LlmConfig {
            base_url: "https://gigachat.devices.sberbank.ru/api/v1".to_string(),
            ..LlmConfig::default()
        };
        let provider = OpenAiCompatibleProvider::from_config(&config).unwrap();
        assert_eq!(
            provider.endpoint().as_str(),
            "https://gigachat.devices.sberbank.ru/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = LlmConfig {
            api_key: Some("   ".to_string()),
            ..LlmConfig::default()
        };
        let provider = OpenAiCompatibleProvider::from_config(&config).unwrap();
        assert!(!provider.has_credential());
    }
}
