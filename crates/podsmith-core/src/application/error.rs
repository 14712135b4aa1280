//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Target directory of a new project already exists.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// No acquisition path produced a usable template.
    #[error("Template unavailable: {reason}")]
    TemplateUnavailable { reason: String },

    /// An external command exited unsuccessfully.
    #[error("Command failed ({status}): {command}{}", stderr_suffix(.stderr))]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// An external program could not be started.
    #[error("'{program}' could not be run: {reason}")]
    ToolNotFound { program: String, reason: String },

    #[error("Current directory is not a git repository")]
    NotAGitRepository,

    #[error("No podspec files found in {dir}")]
    NoPodspecFound { dir: PathBuf },

    #[error("Podspec file not found: {path}")]
    PodspecNotFound { path: PathBuf },

    /// The config file could not be parsed.
    #[error("Configuration file {path} is not a JSON object: {reason}")]
    CorruptConfig { path: PathBuf, reason: String },

    /// Shared in-memory state was poisoned.
    #[error("Internal store lock poisoned")]
    StoreLockError,
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{trimmed}")
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different module name".into(),
                "Or pick another location with --output".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::TemplateUnavailable { .. } => vec![
                "Check the template source: podsmith config get cocoapods.template_repo".into(),
                "Check network access and git credentials".into(),
                "Retry with a fresh clone: podsmith template update".into(),
            ],
            Self::CommandFailed { .. } => {
                vec!["See the command output above for details".into()]
            }
            Self::ToolNotFound { program, .. } => vec![
                format!("Make sure '{}' is installed and on your PATH", program),
            ],
            Self::NotAGitRepository => vec![
                "Run this command from inside a git working tree".into(),
            ],
            Self::NoPodspecFound { .. } => vec![
                "Pass the podspec explicitly: podsmith push MyLib.podspec".into(),
            ],
            Self::CorruptConfig { .. } => vec![
                "Restore defaults with: podsmith config reset".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectExists { .. } => ErrorCategory::Validation,
            Self::NotAGitRepository => ErrorCategory::Validation,
            Self::NoPodspecFound { .. } | Self::PodspecNotFound { .. } => ErrorCategory::NotFound,
            Self::TemplateUnavailable { .. } => ErrorCategory::NotFound,
            Self::CorruptConfig { .. } => ErrorCategory::Configuration,
            Self::CommandFailed { .. } | Self::ToolNotFound { .. } => ErrorCategory::External,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}
