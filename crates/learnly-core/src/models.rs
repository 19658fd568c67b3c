use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm::wire::{Content, WireRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    const fn wire_role(self) -> WireRole {
        match self {
            Self::User => WireRole::User,
            Self::Model => WireRole::Model,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Model, text)
    }

    pub fn to_content(&self) -> Content {
        Content::with_role(self.role.wire_role(), self.text.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub uri: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl GroundingSource {
    /// Title when present, otherwise the uri.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.uri)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub text: String,
    pub sources: Vec<GroundingSource>,
}

impl SearchResult {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
        }
    }
}

/// Serialized as the tag shown on the course card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseCategory {
    #[serde(rename = "FRONTEND")]
    Frontend,
    #[serde(rename = "UI/UX DESIGN")]
    UiUxDesign,
    #[serde(rename = "BRANDING")]
    Branding,
    #[serde(rename = "BACK END")]
    BackEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub category: CourseCategory,
    pub title: String,
    pub author: String,
    /// Remote url for seeded thumbnails, `data:` uri once an edit is applied.
    pub image: String,
}
