use super::gateway::GatewayError;
use super::observability::OperationOutcome;

/// What an operation does with a transport or provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Swallow the error and answer with the operation's fallback value.
    Fallback,
    /// Hand the error to the caller.
    Propagate,
}

impl FailurePolicy {
    pub(crate) fn apply<T>(
        self,
        result: Result<T, GatewayError>,
        fallback: impl FnOnce() -> T,
    ) -> (Result<T, GatewayError>, OperationOutcome) {
        match (result, self) {
            (Ok(value), _) => (Ok(value), OperationOutcome::Success),
            (Err(_), Self::Fallback) => (Ok(fallback()), OperationOutcome::Fallback),
            (Err(err), Self::Propagate) => (Err(err), OperationOutcome::Failure),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailurePolicies {
    pub chat: FailurePolicy,
    pub plan: FailurePolicy,
    pub search: FailurePolicy,
    pub image_edit: FailurePolicy,
}

impl Default for FailurePolicies {
    fn default() -> Self {
        Self {
            chat: FailurePolicy::Fallback,
            plan: FailurePolicy::Propagate,
            search: FailurePolicy::Fallback,
            image_edit: FailurePolicy::Propagate,
        }
    }
}
