pub mod alerts;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod i18n;
pub mod machine;
pub mod models;
pub mod navigation;
pub mod origin;
pub mod queue;
pub mod render;
pub mod templates;
pub mod tracing_setup;

// Re-export the types a host needs to drive a confirmation flow
pub use config::{CoreConfig, EnvironmentType};
pub use error::CoreError;
pub use machine::{Completion, ConfirmationMachine, LoadIssue};
pub use models::{Alert, PendingRequest, Section, Severity, TemplateState};
