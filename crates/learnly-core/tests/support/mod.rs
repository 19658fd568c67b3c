#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use learnly_core::image::{FetchedImage, ImageFetchError, ImageFetchFuture, ImageFetcher};
use learnly_core::llm::wire::{GenerateContentRequest, GenerateContentResponse};
use learnly_core::llm::{AssistantClient, ContentGateway, GatewayError, GatewayFuture};
use learnly_core::{Dashboard, DashboardOptions};
use serde_json::json;
use tokio::sync::Notify;

pub const SOURCE_IMAGE_BYTES: &[u8] = b"original-thumbnail";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub request: GenerateContentRequest,
}

/// In-memory gateway that answers from a queue and records every request.
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<GenerateContentResponse, GatewayError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    hold: Option<Arc<Notify>>,
}

impl ScriptedGateway {
    pub fn with_replies(replies: Vec<Result<GenerateContentResponse, GatewayError>>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(replies)),
            requests: Mutex::new(Vec::new()),
            hold: None,
        }
    }

    /// Every call waits for a notification before answering.
    pub fn held(
        replies: Vec<Result<GenerateContentResponse, GatewayError>>,
        release: Arc<Notify>,
    ) -> Self {
        Self {
            hold: Some(release),
            ..Self::with_replies(replies)
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl ContentGateway for ScriptedGateway {
    fn generate_content<'a>(
        &'a self,
        model: &'a str,
        request: GenerateContentRequest,
    ) -> GatewayFuture<'a> {
        Box::pin(async move {
            self.requests
                .lock()
                .expect("requests lock")
                .push(RecordedRequest {
                    model: model.to_string(),
                    request,
                });

            if let Some(release) = &self.hold {
                release.notified().await;
            }

            self.replies
                .lock()
                .expect("replies lock")
                .pop_front()
                .unwrap_or_else(|| {
                    Err(GatewayError::ProviderFailure(
                        "exhausted_test_replies".to_string(),
                    ))
                })
        })
    }
}

/// Serves fixed bytes for any locator, or a fixed failure.
pub struct StaticImageFetcher {
    outcome: Result<FetchedImage, ImageFetchError>,
    locators: Mutex<Vec<String>>,
}

impl StaticImageFetcher {
    pub fn serving_jpeg() -> Self {
        Self {
            outcome: Ok(FetchedImage {
                mime_type: "image/jpeg".to_string(),
                bytes: SOURCE_IMAGE_BYTES.to_vec(),
            }),
            locators: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ImageFetchError) -> Self {
        Self {
            outcome: Err(error),
            locators: Mutex::new(Vec::new()),
        }
    }

    pub fn locators(&self) -> Vec<String> {
        self.locators.lock().expect("locators lock").clone()
    }
}

impl ImageFetcher for StaticImageFetcher {
    fn fetch<'a>(&'a self, locator: &'a str) -> ImageFetchFuture<'a> {
        Box::pin(async move {
            self.locators
                .lock()
                .expect("locators lock")
                .push(locator.to_string());
            self.outcome.clone()
        })
    }
}

pub fn dashboard_with(
    gateway: Arc<ScriptedGateway>,
    fetcher: Arc<StaticImageFetcher>,
    options: DashboardOptions,
) -> Dashboard {
    Dashboard::new(AssistantClient::new(gateway), fetcher, options)
}

pub fn text_response(text: &str) -> GenerateContentResponse {
    serde_json::from_value(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    }))
    .expect("text response should parse")
}

pub fn empty_response() -> GenerateContentResponse {
    serde_json::from_value(json!({ "candidates": [] })).expect("empty response should parse")
}

pub fn image_response(base64_data: &str) -> GenerateContentResponse {
    serde_json::from_value(json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    { "text": "Here is your edited image." },
                    { "inlineData": { "mimeType": "image/png", "data": base64_data } }
                ]
            }
        }]
    }))
    .expect("image response should parse")
}

pub fn grounded_response(text: &str, sources: &[(&str, &str)]) -> GenerateContentResponse {
    let chunks = sources
        .iter()
        .map(|(uri, title)| json!({ "web": { "uri": uri, "title": title } }))
        .collect::<Vec<_>>();

    serde_json::from_value(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "groundingMetadata": { "groundingChunks": chunks }
        }]
    }))
    .expect("grounded response should parse")
}
