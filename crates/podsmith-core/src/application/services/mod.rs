//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "create a library" or "retag a release".

pub mod config_service;
pub mod materializer;
pub mod push_service;
pub mod scaffold_service;
pub mod tag_service;
pub mod template_service;

pub use config_service::ConfigService;
pub use materializer::{MaterializeJob, MaterializeReport, Materializer};
pub use push_service::{PushPlan, PushService};
pub use scaffold_service::{CreateReport, CreateRequest, ScaffoldService};
pub use tag_service::{StepOutcome, StepStatus, TagFlags, TagService};
pub use template_service::TemplateService;
