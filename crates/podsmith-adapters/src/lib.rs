//! Infrastructure adapters for Podsmith.
//!
//! This crate implements the ports defined in `podsmith-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod config_store;
pub mod filesystem;
pub mod process;
pub mod template_cache;

// Re-export commonly used adapters
pub use config_store::{JsonFileConfigStore, MemoryConfigStore};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::ProcessRunner;
pub use template_cache::TemplateAcquirer;
