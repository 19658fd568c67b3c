use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, warn};

use super::busy::BusyGate;
use super::lock_state;
use crate::llm::AssistantClient;
use crate::llm::prompts::{CHAT_FALLBACK_REPLY, CHAT_GREETING};
use crate::models::ChatTurn;

/// Whether the synthetic greeting that opens every transcript is replayed to
/// the model as part of the outbound history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GreetingPolicy {
    #[default]
    Include,
    Exclude,
}

impl GreetingPolicy {
    pub fn from_include_flag(include: bool) -> Self {
        if include { Self::Include } else { Self::Exclude }
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("chat message is empty")]
    EmptyMessage,
    #[error("a chat reply is already in flight")]
    Busy,
}

/// Owns the chat transcript. The first turn is always the model greeting and
/// turns are only ever appended.
pub struct ConversationManager {
    client: AssistantClient,
    greeting_policy: GreetingPolicy,
    history: Mutex<Vec<ChatTurn>>,
    busy: BusyGate,
}

impl ConversationManager {
    pub fn new(client: AssistantClient, greeting_policy: GreetingPolicy) -> Self {
        Self {
            client,
            greeting_policy,
            history: Mutex::new(vec![ChatTurn::model(CHAT_GREETING)]),
            busy: BusyGate::new(),
        }
    }

    pub fn transcript(&self) -> Vec<ChatTurn> {
        lock_state(&self.history).clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Appends the user's turn right away, asks the model, then appends exactly
    /// one model turn holding the reply or the connection fallback.
    pub async fn submit(&self, message: &str) -> Result<ChatTurn, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let _guard = self.busy.try_acquire().ok_or(ChatError::Busy)?;

        let outbound = {
            let mut history = lock_state(&self.history);
            let outbound = self.outbound_history(&history);
            history.push(ChatTurn::user(message));
            outbound
        };
        debug!(
            history_turns = outbound.len(),
            "sending chat turn with prior history"
        );

        let reply = match self.client.send_chat_turn(&outbound, message).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!("chat reply failed, showing fallback: {err}");
                CHAT_FALLBACK_REPLY.to_string()
            }
        };

        let turn = ChatTurn::model(reply);
        lock_state(&self.history).push(turn.clone());
        Ok(turn)
    }

    fn outbound_history(&self, history: &[ChatTurn]) -> Vec<ChatTurn> {
        match self.greeting_policy {
            GreetingPolicy::Include => history.to_vec(),
            GreetingPolicy::Exclude => history.iter().skip(1).cloned().collect(),
        }
    }
}
