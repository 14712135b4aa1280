// ============================================================================
// domain/error.rs - DOMAIN VALIDATION ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (cheap to carry across layers)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid module name '{name}': {reason}")]
    InvalidModuleName { name: String, reason: String },

    #[error("Invalid configuration key '{key}': {reason}")]
    InvalidConfigKey { key: String, reason: String },

    #[error("Invalid repository URL format: {url}")]
    InvalidRepoUrl { url: String },

    #[error("Invalid tag name '{name}': {reason}")]
    InvalidTagName { name: String, reason: String },

    #[error("Invalid spec repository name '{name}'")]
    InvalidSpecRepoName { name: String },

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    #[error("Repository not found: {name}")]
    UnknownSpecRepo { name: String },

    #[error("No default spec repository configured")]
    NoDefaultSpecRepo,
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidModuleName { .. } => vec![
                "Module names become directory, file and podspec names".into(),
                "Use letters, digits, '-' and '_' only; start with a letter".into(),
                "Example: podsmith create MyLibrary".into(),
            ],
            Self::InvalidConfigKey { key, .. } => vec![
                format!("'{}' is not a usable dotted key", key),
                "Keys look like: author, cocoapods.template_repo".into(),
            ],
            Self::InvalidRepoUrl { .. } => vec![
                "URL should start with http://, https://, git@, or ssh://".into(),
                "Example: podsmith repo add MySpecs git@github.com:me/Specs.git".into(),
            ],
            Self::InvalidTagName { .. } => vec![
                "Tag names may not contain spaces, '..', '~', '^', ':' or '\\'".into(),
                "Example: podsmith tag create 1.2.8".into(),
            ],
            Self::InvalidSpecRepoName { .. } => vec![
                "Repository names may not be empty or contain whitespace".into(),
            ],
            Self::UnknownSpecRepo { .. } => vec![
                "List configured repositories: podsmith repo list".into(),
                "Add one with: podsmith repo add <NAME> <URL>".into(),
            ],
            Self::NoDefaultSpecRepo => vec![
                "Use --repo to specify a repository".into(),
                "Or set a default: podsmith repo default <NAME>".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidModuleName { .. }
            | Self::InvalidConfigKey { .. }
            | Self::InvalidRepoUrl { .. }
            | Self::InvalidTagName { .. }
            | Self::InvalidSpecRepoName { .. } => ErrorCategory::Validation,
            Self::UnknownSpecRepo { .. } | Self::NoDefaultSpecRepo => ErrorCategory::NotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
