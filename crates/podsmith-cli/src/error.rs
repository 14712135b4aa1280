//! The CLI error type: wraps core errors, adds suggestions and picks the
//! process exit code.

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use podsmith_core::error::PodsmithError;

pub use podsmith_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input that clap could not catch.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// `config get` on a key that is not set.
    #[error("Configuration key not found: {key}")]
    UnknownConfigKey { key: String },

    /// A configuration file could not be resolved, read or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error propagated from `podsmith-core` or an adapter.
    #[error("{0}")]
    Core(#[from] PodsmithError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation cancelled by user.
    #[error("Operation cancelled")]
    Cancelled,

    /// An external program other than git or pod (the editor) failed.
    #[error("External command failed: {command}: {reason}")]
    ExternalCommandFailed { command: String, reason: String },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: None,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec!["Use --help for usage information".into()],

            Self::UnknownConfigKey { key } => vec![
                format!("'{key}' is not set"),
                "Show every value with: podsmith config show".into(),
                format!("Set it with: podsmith config set {key} <VALUE>"),
            ],

            Self::ConfigError { .. } => vec![
                "Check the file passed with --config, or $PODSMITH_HOME".into(),
                "Show the active file with: podsmith config path".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { .. } => vec![
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Cancelled => vec!["No changes were made".into()],

            Self::ExternalCommandFailed { .. } => vec![
                "Ensure the command is installed and in your PATH".into(),
                "Pick another editor with: podsmith config set editor <COMMAND>".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::Cancelled => ErrorCategory::UserError,
            Self::UnknownConfigKey { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::External | CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } | Self::ExternalCommandFailed { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Coloured report for a terminal.
    pub fn format_colored(&self, verbose: bool) -> String {
        self.render(verbose, true)
    }

    /// The same report without ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        self.render(verbose, false)
    }

    fn render(&self, verbose: bool, color: bool) -> String {
        let paint = |text: &str, style: fn(&str) -> String| {
            if color { style(text) } else { text.to_owned() }
        };

        let mut lines = vec![String::new()];
        lines.push(format!(
            "{} {}",
            paint("\u{2717}", |t| t.red().bold().to_string()),
            paint("Error:", |t| t.red().bold().to_string())
        ));
        lines.extend(
            self.to_string()
                .lines()
                .map(|line| format!("  {}", paint(line, |t| t.red().to_string()))),
        );

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                let text = format!("caused by: {err}");
                lines.push(format!("  {}", paint(&text, |t| t.dimmed().to_string())));
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            lines.push(String::new());
            lines.push(paint("Suggestions:", |t| t.yellow().bold().to_string()));
            lines.extend(suggestions.iter().map(|s| format!("  - {s}")));
        }

        if !verbose {
            lines.push(String::new());
            let hint = "Run again with -v for more detail.";
            lines.push(paint(hint, |t| t.dimmed().to_string()));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Emit the error as a tracing event at a level matching its category.
    pub fn log(&self) {
        let category = self.category();
        let cause = self.source().map(|e| e.to_string());
        match category {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(?category, ?cause, "{self}")
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(?category, ?cause, "{self}")
            }
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    NotFound,
    Configuration,
    /// Internal/system error, including failed external commands.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Converts foreign error types into [`CliError`] at call-sites with a
/// descriptive context message.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podsmith_core::{application::ApplicationError, domain::DomainError};
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn exit_code_user_error() {
        let err = CliError::InvalidInput {
            message: "x".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn exit_code_not_found() {
        assert_eq!(
            CliError::UnknownConfigKey { key: "x".into() }.exit_code(),
            3
        );
        let core: PodsmithError = DomainError::UnknownSpecRepo { name: "X".into() }.into();
        assert_eq!(CliError::from(core).exit_code(), 3);
    }

    #[test]
    fn exit_code_configuration() {
        assert_eq!(CliError::config("x").exit_code(), 4);
    }

    #[test]
    fn exit_code_internal() {
        let err = CliError::IoError {
            message: "x".into(),
            source: io::Error::new(io::ErrorKind::Other, "e"),
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn failed_external_process_is_internal() {
        let core: PodsmithError = ApplicationError::CommandFailed {
            command: "git push origin 1.0".into(),
            status: "128".into(),
            stderr: "rejected".into(),
        }
        .into();
        assert_eq!(CliError::from(core).exit_code(), 1);
    }

    #[test]
    fn existing_project_is_a_user_error() {
        let core: PodsmithError = ApplicationError::ProjectExists {
            path: PathBuf::from("/tmp/MyLib"),
        }
        .into();
        let err = CliError::from(core);
        assert_eq!(err.exit_code(), 2);
        assert!(err.format_plain(false).contains("/tmp/MyLib"));
    }

    #[test]
    fn format_plain_contains_error_header() {
        let err = CliError::UnknownConfigKey {
            key: "cocoapods.nope".into(),
        };
        let s = err.format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("podsmith config set cocoapods.nope"));
    }

    #[test]
    fn verbose_hint_only_when_not_verbose() {
        let hint = "-v for more detail";
        assert!(CliError::Cancelled.format_plain(false).contains(hint));
        assert!(!CliError::Cancelled.format_plain(true).contains(hint));
    }

    #[test]
    fn verbose_report_lists_causes() {
        let err = CliError::IoError {
            message: "cannot write out.json".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.format_plain(true).contains("caused by: denied"));
        assert!(!err.format_plain(false).contains("caused by"));
    }

    #[test]
    fn plain_report_has_no_ansi() {
        assert!(!CliError::Cancelled.format_plain(false).contains('\u{1b}'));
    }

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading config");
        assert!(matches!(cli, Err(CliError::IoError { .. })));
    }
}
