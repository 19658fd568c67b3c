//! Orchestrators sequence one AI call per UI action and write the result, or
//! a fallback, into state the presentation shell can observe.
//!
//! Each orchestrator owns disjoint state and a [`BusyGate`]; a call made while
//! the gate is held is rejected, never queued.

mod busy;
pub mod conversation;
pub mod image_edit;
pub mod plan;
pub mod search;
mod slot;

use std::sync::{Mutex, MutexGuard};

pub use busy::{BusyGate, BusyGuard};
pub use conversation::{ChatError, ConversationManager, GreetingPolicy};
pub use image_edit::{ImageEditError, ImageEditSession, ImageEditor};
pub use plan::PlanOrchestrator;
pub use search::SearchOrchestrator;
pub use slot::{ResultSlot, RunError};

pub(crate) fn lock_state<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
