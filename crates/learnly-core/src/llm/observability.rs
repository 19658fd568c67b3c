use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::gateway::GatewayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantOperation {
    Chat,
    StudyPlan,
    Search,
    ImageEdit,
}

impl AssistantOperation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::StudyPlan => "study_plan",
            Self::Search => "search",
            Self::ImageEdit => "image_edit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    Success,
    Fallback,
    Failure,
}

impl OperationOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Fallback => "fallback",
            Self::Failure => "failure",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OperationTelemetry {
    pub operation: &'static str,
    pub model: String,
    pub outcome: &'static str,
    pub latency_ms: u64,
    pub error_type: Option<&'static str>,
    pub error_message: Option<String>,
}

impl OperationTelemetry {
    pub(crate) fn new(
        operation: AssistantOperation,
        model: &str,
        started_at: Instant,
        outcome: OperationOutcome,
        error: Option<&GatewayError>,
    ) -> Self {
        Self {
            operation: operation.as_str(),
            model: model.to_string(),
            outcome: outcome.as_str(),
            latency_ms: duration_to_millis(started_at.elapsed()),
            error_type: error.map(GatewayError::kind),
            error_message: error.map(ToString::to_string),
        }
    }
}

pub fn log_telemetry(telemetry: &OperationTelemetry) {
    match telemetry.error_type {
        None => info!(
            operation = telemetry.operation,
            model = %telemetry.model,
            outcome = telemetry.outcome,
            latency_ms = telemetry.latency_ms,
            "ai operation completed"
        ),
        Some(error_type) => warn!(
            operation = telemetry.operation,
            model = %telemetry.model,
            outcome = telemetry.outcome,
            latency_ms = telemetry.latency_ms,
            error_type,
            error = telemetry.error_message.as_deref().unwrap_or_default(),
            "ai operation failed"
        ),
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    duration.as_millis().min(u128::from(u64::MAX)) as u64
}
