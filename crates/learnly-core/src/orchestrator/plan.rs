use tracing::warn;

use super::slot::{ResultSlot, RunError};
use crate::llm::AssistantClient;
use crate::llm::prompts::{DEFAULT_STUDY_GOAL, PLAN_FAILED_REPLY};

/// Study plan generation. A failed generation is shown as a failure notice in
/// place of the plan.
pub struct PlanOrchestrator {
    client: AssistantClient,
    slot: ResultSlot<String>,
}

impl PlanOrchestrator {
    pub fn new(client: AssistantClient) -> Self {
        Self {
            client,
            slot: ResultSlot::default(),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.slot.current()
    }

    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    pub fn dismiss(&self) {
        self.slot.dismiss();
    }

    pub async fn run_default(&self) -> Result<String, RunError> {
        self.run(DEFAULT_STUDY_GOAL).await
    }

    pub async fn run(&self, goal: &str) -> Result<String, RunError> {
        if goal.trim().is_empty() {
            return Err(RunError::EmptyInput);
        }
        let _guard = self.slot.begin()?;

        let plan = match self.client.generate_plan(goal).await {
            Ok(plan) => plan,
            Err(err) => {
                warn!("study plan generation failed: {err}");
                PLAN_FAILED_REPLY.to_string()
            }
        };

        self.slot.replace(plan.clone());
        Ok(plan)
    }
}
