pub mod client;
pub mod gateway;
pub mod gemini;
pub mod observability;
pub mod policy;
pub mod prompts;
pub mod wire;

pub use client::AssistantClient;
pub use gateway::{ContentGateway, GatewayError, GatewayFuture};
pub use gemini::GeminiGateway;
pub use observability::{AssistantOperation, OperationOutcome, OperationTelemetry};
pub use policy::{FailurePolicies, FailurePolicy};
