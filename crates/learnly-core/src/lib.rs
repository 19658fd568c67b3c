pub mod catalog;
pub mod config;
mod config_env;
pub mod dashboard;
pub mod image;
pub mod llm;
pub mod models;
pub mod orchestrator;

pub use catalog::CourseCatalog;
pub use config::LearnlyConfig;
pub use dashboard::{Dashboard, DashboardOptions, DashboardSnapshot};
