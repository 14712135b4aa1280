//! Application layer for Podsmith.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldService, ConfigService, ...)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ConfigService, CreateReport, CreateRequest, MaterializeReport, PushPlan, PushService,
    ScaffoldService, StepOutcome, StepStatus, TagFlags, TagService, TemplateService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    AcquiredTemplate, CommandRunner, ConfigStore, Filesystem, TemplateOrigin, TemplateSettings,
    TemplateSource,
};

pub use error::ApplicationError;
