use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::error::ServiceError;
use crate::providers::traits::CompletionProvider;
use crate::providers::utils::{check_status, transport_error};

const SERVICE: &str = "nebius";

/// OpenAI-compatible chat completions endpoint hosted by Nebius AI Studio.
#[derive(Clone)]
pub struct NebiusProvider {
    api_key: String,
    api_url: String,
    client: Client,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl NebiusProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| transport_error(SERVICE, e))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl CompletionProvider for NebiusProvider {
    async fn complete(&self, system_message: &str, prompt: &str) -> Result<String, ServiceError> {
        log::debug!("Sending completion request to {} ({})", self.api_url, self.model);

        let response = self.client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "system",
                        "content": system_message
                    },
                    {
                        "role": "user",
                        "content": prompt
                    }
                ],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens
            }))
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        let response = check_status(SERVICE, response).await?;

        let response_json: Value = response.json().await.map_err(|e| ServiceError::Malformed {
            service: SERVICE,
            detail: format!("response body is not JSON: {}", e),
        })?;

        // Some gateways report failures with a 200 and an error object
        if let Some(error) = response_json.get("error") {
            return Err(ServiceError::Status {
                service: SERVICE,
                status: 502,
                detail: error.to_string(),
            });
        }

        response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ServiceError::Malformed {
                service: SERVICE,
                detail: "no choices[0].message.content in completion".to_string(),
            })
    }

    fn name(&self) -> &'static str {
        SERVICE
    }

    fn get_model_info(&self) -> String {
        self.model.clone()
    }
}
