use learnly_core::orchestrator::{ChatError, ImageEditError, RunError};
use learnly_core::{Dashboard, DashboardSnapshot};
use thiserror::Error;
use tracing::info;

use crate::cli::Command;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("chat rejected: {0}")]
    Chat(#[from] ChatError),
    #[error("request rejected: {0}")]
    Run(#[from] RunError),
    #[error("image edit failed: {0}")]
    ImageEdit(#[from] ImageEditError),
}

impl ActionError {
    /// User-facing alert text for failures the image editor surfaces.
    pub fn alert(&self) -> Option<&'static str> {
        match self {
            Self::ImageEdit(err) => err.alert_message(),
            _ => None,
        }
    }
}

pub async fn run_command(
    dashboard: &Dashboard,
    command: &Command,
) -> Result<DashboardSnapshot, ActionError> {
    info!(command = command.as_str(), "running dashboard action");

    match command {
        Command::Chat { messages } => {
            for message in messages {
                dashboard.submit_chat(message).await?;
            }
        }
        Command::Plan { goal: Some(goal) } => {
            dashboard.plan().run(goal).await?;
        }
        Command::Plan { goal: None } => {
            dashboard.request_plan().await?;
        }
        Command::Search { query } => {
            dashboard.submit_search(query).await?;
        }
        Command::EditImage {
            course_id,
            prompt,
            apply,
        } => {
            dashboard.open_image_editor(course_id)?;
            dashboard.submit_image_edit(prompt).await?;
            if *apply {
                dashboard.apply_image_candidate()?;
            }
        }
        Command::Courses => {}
    }

    Ok(dashboard.snapshot())
}
