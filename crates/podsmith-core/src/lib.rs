//! Podsmith Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Podsmith
//! CocoaPods scaffolding and publishing tool, following hexagonal (ports and
//! adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           podsmith-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ConfigService, ScaffoldService,       │
//! │   TagService, PushService)              │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, CommandRunner, ConfigStore,│
//! │  TemplateSource)                        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    podsmith-adapters (Infrastructure)   │
//! │ (LocalFilesystem, ProcessRunner, etc)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ConfigDocument, ModuleName, TagPlan,   │
//! │  PushOptions, substitution rules)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use podsmith_core::{
//!     application::{ScaffoldService, CreateRequest},
//!     domain::ModuleName,
//! };
//!
//! // Adapters come from `podsmith-adapters`.
//! let service = ScaffoldService::new(source, filesystem);
//! let request = CreateRequest::new(ModuleName::parse("MyLib").unwrap(), "./");
//! service.create(&request, &identity).unwrap();
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ConfigService, CreateReport, CreateRequest, PushService, ScaffoldService, TagService,
        TemplateService,
        ports::{CommandRunner, ConfigStore, Filesystem, TemplateSource},
    };
    pub use crate::domain::{
        AuthorIdentity, CommandOutput, CommandSpec, ConfigDocument, ModuleName, PushOptions,
        SpecRepoUrl, TagName,
    };
    pub use crate::error::{PodsmithError, PodsmithResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
