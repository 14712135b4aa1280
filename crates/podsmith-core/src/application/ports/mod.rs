//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `podsmith-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `CommandRunner`: External processes (`git`, `pod`, editor)
//!   - `ConfigStore`: Configuration persistence
//!   - `TemplateSource`: Template acquisition
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (The services themselves; the CLI calls them directly)

pub mod output;

pub use output::{
    AcquiredTemplate, CommandRunner, ConfigStore, Filesystem, TemplateOrigin, TemplateSettings,
    TemplateSource,
};

#[cfg(test)]
pub use output::{MockCommandRunner, MockConfigStore, MockFilesystem, MockTemplateSource};
