use std::sync::Mutex;

use thiserror::Error;

use super::busy::{BusyGate, BusyGuard};
use super::lock_state;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("input is empty")]
    EmptyInput,
    #[error("a request is already in flight")]
    Busy,
}

/// A displayed result that is replaced wholesale and can be dismissed.
#[derive(Debug)]
pub struct ResultSlot<T> {
    value: Mutex<Option<T>>,
    busy: BusyGate,
}

impl<T> Default for ResultSlot<T> {
    fn default() -> Self {
        Self {
            value: Mutex::new(None),
            busy: BusyGate::new(),
        }
    }
}

impl<T: Clone> ResultSlot<T> {
    pub fn current(&self) -> Option<T> {
        lock_state(&self.value).clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn dismiss(&self) {
        *lock_state(&self.value) = None;
    }

    pub(crate) fn begin(&self) -> Result<BusyGuard<'_>, RunError> {
        self.busy.try_acquire().ok_or(RunError::Busy)
    }

    pub(crate) fn replace(&self, value: T) {
        *lock_state(&self.value) = Some(value);
    }
}
