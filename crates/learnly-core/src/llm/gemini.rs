use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use super::gateway::{ContentGateway, GatewayError, GatewayFuture};
use super::wire::{GenerateContentRequest, GenerateContentResponse};
use crate::config::{ConfigError, GeminiGatewayConfig};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// [`ContentGateway`] over the hosted generative-language REST API.
#[derive(Clone)]
pub struct GeminiGateway {
    client: reqwest::Client,
    config: GeminiGatewayConfig,
}

impl GeminiGateway {
    pub fn new(config: GeminiGatewayConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ConfigError::HttpClient(err.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint_for(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent",
            self.config.api_base_url.trim_end_matches('/')
        )
    }

    async fn send_once(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GatewayError> {
        let response = self
            .client
            .post(self.endpoint_for(model))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ProviderFailure("request_unavailable".to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            if err.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::InvalidProviderPayload("response_body_read_failed".to_string())
            }
        })?;

        if !status.is_success() {
            return Err(GatewayError::ProviderFailure(format!(
                "status={} status_text={}",
                status.as_u16(),
                parse_provider_status(status, &body)
            )));
        }

        serde_json::from_str::<GenerateContentResponse>(&body).map_err(|_| {
            GatewayError::InvalidProviderPayload("response_json_parse_failed".to_string())
        })
    }
}

impl ContentGateway for GeminiGateway {
    fn generate_content<'a>(
        &'a self,
        model: &'a str,
        request: GenerateContentRequest,
    ) -> GatewayFuture<'a> {
        Box::pin(async move { self.send_once(model, &request).await })
    }
}

fn parse_provider_status(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ProviderErrorEnvelope {
        error: Option<ProviderErrorDetails>,
    }

    #[derive(Deserialize)]
    struct ProviderErrorDetails {
        status: Option<Value>,
    }

    let parsed = serde_json::from_str::<ProviderErrorEnvelope>(body).ok();
    match parsed
        .and_then(|envelope| envelope.error)
        .and_then(|details| details.status)
    {
        Some(Value::String(provider_status)) => provider_status,
        Some(Value::Number(provider_status)) => provider_status.to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("unknown")
            .to_ascii_uppercase()
            .replace(' ', "_"),
    }
}
