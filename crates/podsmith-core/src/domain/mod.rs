// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Podsmith.
//!
//! Pure logic only: configuration document access, value objects, name and
//! content substitution rules, podspec patching, and the command lines handed
//! to `git` and `pod`. Running anything is done through the ports defined in
//! the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, process, or network calls
//! - **Validated values**: `ModuleName`, `TagName` and `SpecRepoUrl` cannot
//!   be constructed in an invalid state

pub mod command;
pub mod config_document;
pub mod error;
pub mod git;
pub mod manifest;
pub mod pod;
pub mod substitution;
pub mod value_objects;

pub use command::{CommandOutput, CommandSpec, OutputLine, OutputStream};
pub use config_document::{ConfigDocument, DEFAULT_TEMPLATE_NAME, keys, merge, parse_cli_value};
pub use error::{DomainError, ErrorCategory};
pub use git::{GitStep, StepKind, TagPlan, TagRequest};
pub use manifest::{ManifestFields, patch_podspec};
pub use pod::PushOptions;
pub use substitution::Substitution;
pub use value_objects::{AuthorIdentity, ModuleName, SpecRepoUrl, TagName};
