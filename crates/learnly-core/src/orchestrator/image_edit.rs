use std::sync::{Arc, Mutex};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::busy::BusyGate;
use super::lock_state;
use crate::catalog::{CatalogError, CourseCatalog};
use crate::image::{ImageFetchError, ImageFetcher};
use crate::llm::prompts::IMAGE_EDIT_ALERT;
use crate::llm::{AssistantClient, GatewayError};
use crate::models::Course;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageEditError {
    #[error("no image editor session is open")]
    NoSession,
    #[error("image edit prompt is empty")]
    EmptyPrompt,
    #[error("an image edit is already in flight")]
    Busy,
    #[error("failed to load source image: {0}")]
    Fetch(#[from] ImageFetchError),
    #[error("image edit request failed: {0}")]
    Gateway(#[from] GatewayError),
    #[error("image edit response contained no image")]
    NoImageReturned,
    #[error("there is no edited image to apply")]
    NoCandidate,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl ImageEditError {
    /// Failures that reached the source or the model and should be shown to
    /// the user as an alert.
    pub fn is_alert(&self) -> bool {
        matches!(
            self,
            Self::Fetch(_) | Self::Gateway(_) | Self::NoImageReturned
        )
    }

    pub fn alert_message(&self) -> Option<&'static str> {
        self.is_alert().then_some(IMAGE_EDIT_ALERT)
    }
}

/// Editor state for one course thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageEditSession {
    /// Fresh on every open, so a reopened course is a different session.
    pub session_id: Uuid,
    pub course_id: String,
    pub source: String,
    pub prompt: String,
    pub candidate: Option<String>,
}

/// Produces candidate thumbnails without touching the catalog until
/// [`ImageEditor::apply`] is called.
pub struct ImageEditor {
    client: AssistantClient,
    fetcher: Arc<dyn ImageFetcher>,
    session: Mutex<Option<ImageEditSession>>,
    busy: BusyGate,
}

impl ImageEditor {
    pub fn new(client: AssistantClient, fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            client,
            fetcher,
            session: Mutex::new(None),
            busy: BusyGate::new(),
        }
    }

    /// Starts editing `course`, discarding any other open session.
    pub fn open(&self, course: &Course) {
        *lock_state(&self.session) = Some(ImageEditSession {
            session_id: Uuid::new_v4(),
            course_id: course.id.clone(),
            source: course.image.clone(),
            prompt: String::new(),
            candidate: None,
        });
    }

    /// Discards the candidate and the typed prompt.
    pub fn close(&self) {
        *lock_state(&self.session) = None;
    }

    pub fn session(&self) -> Option<ImageEditSession> {
        lock_state(&self.session).clone()
    }

    pub fn candidate(&self) -> Option<String> {
        lock_state(&self.session)
            .as_ref()
            .and_then(|session| session.candidate.clone())
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Fetches the source image afresh, sends it with `prompt` and keeps the
    /// returned image as the session candidate.
    pub async fn generate(&self, prompt: &str) -> Result<String, ImageEditError> {
        if prompt.trim().is_empty() {
            return Err(ImageEditError::EmptyPrompt);
        }
        let _guard = self.busy.try_acquire().ok_or(ImageEditError::Busy)?;

        let (session_id, course_id, source) = {
            let mut session = lock_state(&self.session);
            let session = session.as_mut().ok_or(ImageEditError::NoSession)?;
            session.prompt = prompt.to_string();
            (
                session.session_id,
                session.course_id.clone(),
                session.source.clone(),
            )
        };

        let outcome = self.request_candidate(&source, prompt).await;

        let mut session = lock_state(&self.session);
        let Some(session) = session
            .as_mut()
            .filter(|session| session.session_id == session_id)
        else {
            return Err(ImageEditError::NoSession);
        };

        match outcome {
            Ok(candidate) => {
                info!(course_id = %course_id, "image edit candidate ready");
                session.candidate = Some(candidate.clone());
                Ok(candidate)
            }
            Err(err) => {
                warn!(course_id = %course_id, "image edit failed: {err}");
                session.candidate = None;
                Err(err)
            }
        }
    }

    /// Replaces the course thumbnail with the candidate and closes the session.
    pub fn apply(&self, catalog: &CourseCatalog) -> Result<Course, ImageEditError> {
        let mut session = lock_state(&self.session);
        let open = session.as_ref().ok_or(ImageEditError::NoSession)?;
        let candidate = open
            .candidate
            .clone()
            .ok_or(ImageEditError::NoCandidate)?;

        let course = catalog.replace_image(&open.course_id, candidate)?;
        *session = None;
        Ok(course)
    }

    async fn request_candidate(&self, source: &str, prompt: &str) -> Result<String, ImageEditError> {
        let fetched = self.fetcher.fetch(source).await?;
        self.client
            .edit_image(&fetched.to_data_uri(), prompt)
            .await?
            .ok_or(ImageEditError::NoImageReturned)
    }
}
