use std::sync::Arc;
use std::time::Instant;

use super::gateway::{ContentGateway, GatewayError};
use super::gemini::GeminiGateway;
use super::observability::{AssistantOperation, OperationTelemetry, log_telemetry};
use super::policy::{FailurePolicies, FailurePolicy};
use super::prompts::{
    CHAT_EMPTY_REPLY, CHAT_FALLBACK_REPLY, CHAT_SYSTEM_INSTRUCTION, EDIT_IMAGE_MIME_TYPE,
    MAX_THINKING_BUDGET, PLAN_EMPTY_REPLY, SEARCH_EMPTY_REPLY, SEARCH_FALLBACK_REPLY,
    image_edit_prompt, search_prompt, study_plan_prompt,
};
use super::wire::{
    Content, GenerateContentRequest, GenerationConfig, Part, ThinkingConfig, Tool, WireRole,
};
use crate::config::{ConfigError, LearnlyConfig, ModelRoutes};
use crate::image::{strip_data_uri_prefix, to_png_data_uri};
use crate::models::{ChatTurn, GroundingSource, SearchResult};

/// The four AI operations the dashboard offers, each shaped for its model and
/// resolved through its own [`FailurePolicy`].
#[derive(Clone)]
pub struct AssistantClient {
    gateway: Arc<dyn ContentGateway>,
    models: ModelRoutes,
    policies: FailurePolicies,
    thinking_budget: u32,
}

impl AssistantClient {
    pub fn new(gateway: Arc<dyn ContentGateway>) -> Self {
        Self {
            gateway,
            models: ModelRoutes::default(),
            policies: FailurePolicies::default(),
            thinking_budget: MAX_THINKING_BUDGET,
        }
    }

    pub fn from_config(config: &LearnlyConfig) -> Result<Self, ConfigError> {
        let gateway = GeminiGateway::new(config.gateway.clone())?;
        Ok(Self::new(Arc::new(gateway))
            .with_models(config.models.clone())
            .with_thinking_budget(config.thinking_budget))
    }

    pub fn with_models(mut self, models: ModelRoutes) -> Self {
        self.models = models;
        self
    }

    pub fn with_policies(mut self, policies: FailurePolicies) -> Self {
        self.policies = policies;
        self
    }

    /// Budgets above the model maximum are clamped.
    pub fn with_thinking_budget(mut self, thinking_budget: u32) -> Self {
        self.thinking_budget = thinking_budget.min(MAX_THINKING_BUDGET);
        self
    }

    pub async fn send_chat_turn(
        &self,
        history: &[ChatTurn],
        new_message: &str,
    ) -> Result<String, GatewayError> {
        let mut contents = history.iter().map(ChatTurn::to_content).collect::<Vec<_>>();
        contents.push(Content::with_role(WireRole::User, new_message));
        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(Content::instruction(CHAT_SYSTEM_INSTRUCTION)),
            ..GenerateContentRequest::default()
        };

        let started_at = Instant::now();
        let result = self
            .gateway
            .generate_content(&self.models.chat, request)
            .await
            .map(|response| {
                response
                    .text()
                    .unwrap_or_else(|| CHAT_EMPTY_REPLY.to_string())
            });

        self.resolve(
            AssistantOperation::Chat,
            &self.models.chat,
            self.policies.chat,
            started_at,
            result,
            || CHAT_FALLBACK_REPLY.to_string(),
        )
    }

    pub async fn generate_plan(&self, goal: &str) -> Result<String, GatewayError> {
        let mut request = GenerateContentRequest::from_prompt(study_plan_prompt(goal));
        request.generation_config = Some(GenerationConfig {
            thinking_config: Some(ThinkingConfig {
                thinking_budget: self.thinking_budget,
            }),
        });

        let started_at = Instant::now();
        let result = self
            .gateway
            .generate_content(&self.models.plan, request)
            .await
            .map(|response| {
                response
                    .text()
                    .unwrap_or_else(|| PLAN_EMPTY_REPLY.to_string())
            });

        self.resolve(
            AssistantOperation::StudyPlan,
            &self.models.plan,
            self.policies.plan,
            started_at,
            result,
            || PLAN_EMPTY_REPLY.to_string(),
        )
    }

    pub async fn search_topic(&self, query: &str) -> Result<SearchResult, GatewayError> {
        let mut request = GenerateContentRequest::from_prompt(search_prompt(query));
        request.tools.push(Tool::google_search());

        let started_at = Instant::now();
        let result = self
            .gateway
            .generate_content(&self.models.search, request)
            .await
            .map(|response| {
                let sources = response
                    .grounding_chunks()
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref())
                    .filter_map(|web| {
                        let uri = web.uri.as_deref()?.trim();
                        if uri.is_empty() {
                            return None;
                        }
                        Some(GroundingSource {
                            uri: uri.to_string(),
                            title: web
                                .title
                                .as_deref()
                                .map(str::trim)
                                .filter(|title| !title.is_empty())
                                .map(ToString::to_string),
                        })
                    })
                    .collect();

                SearchResult {
                    text: response
                        .text()
                        .unwrap_or_else(|| SEARCH_EMPTY_REPLY.to_string()),
                    sources,
                }
            });

        self.resolve(
            AssistantOperation::Search,
            &self.models.search,
            self.policies.search,
            started_at,
            result,
            || SearchResult::text_only(SEARCH_FALLBACK_REPLY),
        )
    }

    /// Returns the edited image as a png data uri, or `None` when the model
    /// answered without image data.
    pub async fn edit_image(
        &self,
        encoded_image: &str,
        prompt: &str,
    ) -> Result<Option<String>, GatewayError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::inline_data(EDIT_IMAGE_MIME_TYPE, strip_data_uri_prefix(encoded_image)),
                Part::text(image_edit_prompt(prompt)),
            ])],
            ..GenerateContentRequest::default()
        };

        let started_at = Instant::now();
        let result = self
            .gateway
            .generate_content(&self.models.image_edit, request)
            .await
            .map(|response| {
                response
                    .first_inline_data()
                    .map(|inline| to_png_data_uri(&inline.data))
            });

        self.resolve(
            AssistantOperation::ImageEdit,
            &self.models.image_edit,
            self.policies.image_edit,
            started_at,
            result,
            || None,
        )
    }

    fn resolve<T>(
        &self,
        operation: AssistantOperation,
        model: &str,
        policy: FailurePolicy,
        started_at: Instant,
        result: Result<T, GatewayError>,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, GatewayError> {
        let error = result.as_ref().err().cloned();
        let (resolved, outcome) = policy.apply(result, fallback);
        log_telemetry(&OperationTelemetry::new(
            operation,
            model,
            started_at,
            outcome,
            error.as_ref(),
        ));
        resolved
    }
}
