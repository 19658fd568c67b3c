use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{CatalogError, CourseCatalog};
use crate::config::{ConfigError, LearnlyConfig};
use crate::image::{HttpImageFetcher, ImageFetcher};
use crate::llm::AssistantClient;
use crate::models::{ChatTurn, Course, SearchResult};
use crate::orchestrator::{
    ChatError, ConversationManager, GreetingPolicy, ImageEditError, ImageEditor,
    PlanOrchestrator, RunError, SearchOrchestrator,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardOptions {
    pub greeting_policy: GreetingPolicy,
}

/// Everything the presentation shell renders from, in one serializable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub chat_transcript: Vec<ChatTurn>,
    pub plan: Option<String>,
    pub search: Option<SearchResult>,
    pub editing_course_id: Option<String>,
    pub image_candidate: Option<String>,
    pub courses: Vec<Course>,
    pub chat_busy: bool,
    pub plan_busy: bool,
    pub search_busy: bool,
    pub image_edit_busy: bool,
}

/// Context object owned by the presentation shell. Each UI action maps to one
/// method; the orchestrators behind them share no state.
pub struct Dashboard {
    catalog: CourseCatalog,
    chat: ConversationManager,
    plan: PlanOrchestrator,
    search: SearchOrchestrator,
    image_editor: ImageEditor,
}

impl Dashboard {
    pub fn new(
        client: AssistantClient,
        fetcher: Arc<dyn ImageFetcher>,
        options: DashboardOptions,
    ) -> Self {
        Self {
            catalog: CourseCatalog::seeded(),
            chat: ConversationManager::new(client.clone(), options.greeting_policy),
            plan: PlanOrchestrator::new(client.clone()),
            search: SearchOrchestrator::new(client.clone()),
            image_editor: ImageEditor::new(client, fetcher),
        }
    }

    pub fn from_config(config: &LearnlyConfig) -> Result<Self, ConfigError> {
        let client = AssistantClient::from_config(config)?;
        let fetcher = HttpImageFetcher::new(config.gateway.request_timeout())?;
        Ok(Self::new(
            client,
            Arc::new(fetcher),
            DashboardOptions {
                greeting_policy: GreetingPolicy::from_include_flag(
                    config.include_greeting_in_history,
                ),
            },
        ))
    }

    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    pub fn chat(&self) -> &ConversationManager {
        &self.chat
    }

    pub fn plan(&self) -> &PlanOrchestrator {
        &self.plan
    }

    pub fn search(&self) -> &SearchOrchestrator {
        &self.search
    }

    pub fn image_editor(&self) -> &ImageEditor {
        &self.image_editor
    }

    pub async fn submit_chat(&self, text: &str) -> Result<ChatTurn, ChatError> {
        self.chat.submit(text).await
    }

    pub async fn request_plan(&self) -> Result<String, RunError> {
        self.plan.run_default().await
    }

    pub fn dismiss_plan(&self) {
        self.plan.dismiss();
    }

    pub async fn submit_search(&self, query: &str) -> Result<SearchResult, RunError> {
        self.search.run(query).await
    }

    pub fn dismiss_search(&self) {
        self.search.dismiss();
    }

    pub fn open_image_editor(&self, course_id: &str) -> Result<(), ImageEditError> {
        let course = self
            .catalog
            .get(course_id)
            .ok_or_else(|| CatalogError::UnknownCourse(course_id.to_string()))?;
        self.image_editor.open(&course);
        Ok(())
    }

    pub async fn submit_image_edit(&self, prompt: &str) -> Result<String, ImageEditError> {
        self.image_editor.generate(prompt).await
    }

    pub fn apply_image_candidate(&self) -> Result<Course, ImageEditError> {
        self.image_editor.apply(&self.catalog)
    }

    pub fn close_image_editor(&self) {
        self.image_editor.close();
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let session = self.image_editor.session();
        DashboardSnapshot {
            chat_transcript: self.chat.transcript(),
            plan: self.plan.current(),
            search: self.search.current(),
            editing_course_id: session.as_ref().map(|session| session.course_id.clone()),
            image_candidate: session.and_then(|session| session.candidate),
            courses: self.catalog.courses(),
            chat_busy: self.chat.is_busy(),
            plan_busy: self.plan.is_busy(),
            search_busy: self.search.is_busy(),
            image_edit_busy: self.image_editor.is_busy(),
        }
    }
}
