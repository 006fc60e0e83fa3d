use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Provider;
use crate::error::GatewayError;
use crate::sanitizer::{sanitize_serialized, ApiSource, SanitizerConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelListResponse {
    pub object: String,
    pub data: Vec<Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    #[serde(default = "default_model_object")]
    pub object: String,
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub owned_by: String,
}

fn default_model_object() -> String {
    "model".to_string()
}

/// Upstream reply to a non-streaming chat completion call.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Value,
}

pub struct OpenAiProvider;

impl OpenAiProvider {
    /// Forwards a chat completion body. The serialized payload passes through
    /// the transport-level sanitizer hook right before the POST; headers,
    /// method and URL are never touched by it.
    pub async fn chat_completions(
        base_url: &str,
        api_key: &str,
        request: &Value,
        source: &ApiSource,
        sanitizer: &SanitizerConfig,
    ) -> Result<UpstreamResponse, GatewayError> {
        let payload = transport_payload(request, source, sanitizer)?;
        let client = reqwest::Client::new();
        let url = format!("{}/v1/chat/completions", base_url.trim_end_matches('/'));

        let response = client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .body(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.json::<Value>().await?;
        Ok(UpstreamResponse { status, body })
    }

    /// Like `chat_completions`, but hands back the raw upstream response so
    /// the caller can forward the SSE byte stream without re-framing it.
    pub async fn chat_completions_stream(
        base_url: &str,
        api_key: &str,
        request: &Value,
        source: &ApiSource,
        sanitizer: &SanitizerConfig,
    ) -> Result<reqwest::Response, GatewayError> {
        let payload = transport_payload(request, source, sanitizer)?;
        let client = reqwest::Client::new();
        let url = format!("{}/v1/chat/completions", base_url.trim_end_matches('/'));

        let response = client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .body(payload)
            .send()
            .await?;

        Ok(response)
    }

    pub async fn list_models(
        base_url: &str,
        api_key: &str,
    ) -> Result<ModelListResponse, GatewayError> {
        let url = format!("{}/v1/models", base_url.trim_end_matches('/'));
        Self::list_models_from(&url, api_key).await
    }

    pub async fn list_models_from(
        url: &str,
        api_key: &str,
    ) -> Result<ModelListResponse, GatewayError> {
        let client = reqwest::Client::new();

        let response = client
            .get(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .send()
            .await?;

        Ok(response.json::<ModelListResponse>().await?)
    }
}

/// Model listing for one configured provider, honoring a custom models
/// endpoint when the upstream is not `/v1/models`-shaped.
pub async fn fetch_provider_models(
    provider: &Provider,
    api_key: &str,
) -> Result<Vec<Model>, GatewayError> {
    if let Some(models_endpoint) = &provider.models_endpoint {
        let url = format!(
            "{}{}",
            provider.base_url.trim_end_matches('/'),
            models_endpoint
        );
        let response = OpenAiProvider::list_models_from(&url, api_key).await?;
        Ok(response.data)
    } else {
        let response = OpenAiProvider::list_models(&provider.base_url, api_key).await?;
        Ok(response.data)
    }
}

fn transport_payload(
    request: &Value,
    source: &ApiSource,
    config: &SanitizerConfig,
) -> Result<Vec<u8>, GatewayError> {
    let bytes = serde_json::to_vec(request)?;
    Ok(sanitize_serialized(bytes, source, config))
}
