use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use super::wire::{GenerateContentRequest, GenerateContentResponse};

pub type GatewayFuture<'a> =
    Pin<Box<dyn Future<Output = Result<GenerateContentResponse, GatewayError>> + Send + 'a>>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("ai provider request timed out")]
    Timeout,
    #[error("ai provider request failed: {0}")]
    ProviderFailure(String),
    #[error("ai provider returned an invalid payload: {0}")]
    InvalidProviderPayload(String),
}

impl GatewayError {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::ProviderFailure(_) => "provider_failure",
            Self::InvalidProviderPayload(_) => "invalid_provider_payload",
        }
    }
}

/// Transport to a generative model. One call, one response.
pub trait ContentGateway: Send + Sync {
    fn generate_content<'a>(
        &'a self,
        model: &'a str,
        request: GenerateContentRequest,
    ) -> GatewayFuture<'a>;
}
