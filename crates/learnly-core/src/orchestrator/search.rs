use tracing::warn;

use super::slot::{ResultSlot, RunError};
use crate::llm::AssistantClient;
use crate::llm::prompts::SEARCH_FALLBACK_REPLY;
use crate::models::SearchResult;

/// Grounded topic search. Starting a new search hides the previous result.
pub struct SearchOrchestrator {
    client: AssistantClient,
    slot: ResultSlot<SearchResult>,
}

impl SearchOrchestrator {
    pub fn new(client: AssistantClient) -> Self {
        Self {
            client,
            slot: ResultSlot::default(),
        }
    }

    pub fn current(&self) -> Option<SearchResult> {
        self.slot.current()
    }

    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    pub fn dismiss(&self) {
        self.slot.dismiss();
    }

    pub async fn run(&self, query: &str) -> Result<SearchResult, RunError> {
        if query.trim().is_empty() {
            return Err(RunError::EmptyInput);
        }
        let _guard = self.slot.begin()?;
        self.slot.dismiss();

        let result = match self.client.search_topic(query).await {
            Ok(result) => result,
            Err(err) => {
                warn!("topic search failed: {err}");
                SearchResult::text_only(SEARCH_FALLBACK_REPLY)
            }
        };

        self.slot.replace(result.clone());
        Ok(result)
    }
}
