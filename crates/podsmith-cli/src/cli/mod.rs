//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "podsmith",
    bin_name = "podsmith",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "CocoaPods library scaffolding, tagging and publishing",
    long_about = "Podsmith creates CocoaPods library projects from a template \
                  repository, manages git tags and pushes podspecs to spec repositories.",
    after_help = "EXAMPLES:\n\
        \x20 podsmith create MyLib\n\
        \x20 podsmith config set author \"Jane Doe\"\n\
        \x20 podsmith tag retag 1.2.8 --force\n\
        \x20 podsmith push --repo MySpecs\n\
        \x20 podsmith completions bash > /usr/share/bash-completion/completions/podsmith",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new library project from the template.
    #[command(
        visible_alias = "new",
        about = "Create a new library project",
        after_help = "EXAMPLES:\n\
            \x20 podsmith create MyLib\n\
            \x20 podsmith create MyLib --output ~/Projects --no-example\n\
            \x20 podsmith create MyLib --force-update"
    )]
    Create(CreateArgs),

    /// Manage the cached template.
    #[command(subcommand, about = "Template cache management")]
    Template(TemplateCommands),

    /// Manage the Podsmith configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 podsmith config get cocoapods.template_branch\n\
            \x20 podsmith config set author \"Jane Doe\"\n\
            \x20 podsmith config show"
    )]
    Config(ConfigCommands),

    /// Manage registered spec repositories.
    #[command(
        subcommand,
        about = "Spec repository management",
        after_help = "EXAMPLES:\n\
            \x20 podsmith repo add MySpecs git@github.com:me/Specs.git\n\
            \x20 podsmith repo default MySpecs"
    )]
    Repo(RepoCommands),

    /// Create or re-create git tags.
    #[command(subcommand, about = "Git tag management")]
    Tag(TagCommands),

    /// Push a podspec to a spec repository.
    #[command(
        about = "Push a podspec to a spec repository",
        after_help = "EXAMPLES:\n\
            \x20 podsmith push\n\
            \x20 podsmith push MyLib.podspec --repo MySpecs --swift-version 5.0\n\
            \x20 podsmith push --list-repos"
    )]
    Push(PushArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 podsmith completions bash > ~/.local/share/bash-completion/completions/podsmith\n\
            \x20 podsmith completions zsh  > ~/.zfunc/_podsmith\n\
            \x20 podsmith completions fish > ~/.config/fish/completions/podsmith.fish"
    )]
    Completions(CompletionsArgs),
}

// ── create ────────────────────────────────────────────────────────────────────

/// Arguments for `podsmith create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Module name; becomes the directory, file and podspec name.
    #[arg(value_name = "NAME", help = "Module name")]
    pub name: String,

    /// Directory the project is created in.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: current directory)"
    )]
    pub output: Option<PathBuf>,

    /// Drop the `Example/` project.
    #[arg(long = "no-example", help = "Do not include the example project")]
    pub no_example: bool,

    /// Fetch the template again even when a cached copy exists.
    #[arg(long = "force-update", help = "Refresh the template before creating")]
    pub force_update: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── template ──────────────────────────────────────────────────────────────────

/// Subcommands for `podsmith template`.
#[derive(Debug, Subcommand)]
pub enum TemplateCommands {
    /// Fetch the template again, replacing the cache.
    Update,
    /// List cached template directories.
    #[command(visible_alias = "ls")]
    List,
    /// Print the template cache location.
    Path,
}

// ── config ────────────────────────────────────────────────────────────────────

/// Subcommands for `podsmith config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print all configuration values.
    #[command(visible_alias = "list")]
    Show,
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `cocoapods.template_branch`.
        key: String,
    },
    /// Set a configuration key to a value.
    ///
    /// Values that parse as JSON (`true`, `3`, `null`, `{"a":1}`) are stored
    /// as such; anything else is stored as a string.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Open the configuration file in an editor.
    Edit,
    /// Restore the default configuration.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
    /// Print the path to the active configuration file.
    Path,
    /// Merge a JSON file into the configuration.
    Import {
        /// File to import.
        file: PathBuf,
    },
    /// Write the configuration to a JSON file.
    Export {
        /// Destination file.
        file: PathBuf,
    },
}

// ── repo ──────────────────────────────────────────────────────────────────────

/// Subcommands for `podsmith repo`.
#[derive(Debug, Subcommand)]
pub enum RepoCommands {
    /// List registered spec repositories.
    #[command(visible_alias = "ls")]
    List,
    /// Register a spec repository.
    Add {
        /// Repository name as known to `pod repo`.
        name: String,
        /// Git URL of the repository.
        url: String,
    },
    /// Unregister a spec repository.
    #[command(visible_alias = "rm")]
    Remove { name: String },
    /// Make a registered repository the default.
    Default { name: String },
}

// ── tag ───────────────────────────────────────────────────────────────────────

/// Subcommands for `podsmith tag`.
#[derive(Debug, Subcommand)]
pub enum TagCommands {
    /// Create a tag and push it.
    Create {
        #[command(flatten)]
        tag: TagArgs,

        /// Create the tag locally only.
        #[arg(long = "no-push", help = "Do not push the tag")]
        no_push: bool,
    },
    /// Delete a tag locally and remotely, then create and push it again.
    Retag {
        #[command(flatten)]
        tag: TagArgs,

        /// Carry on when the tag to delete does not exist.
        #[arg(short = 'f', long = "force", help = "Ignore missing tags while deleting")]
        force: bool,
    },
}

/// Arguments shared by `tag create` and `tag retag`.
#[derive(Debug, Args)]
pub struct TagArgs {
    /// Tag name, e.g. `1.2.8`.
    #[arg(value_name = "TAG")]
    pub name: String,

    /// Commit to tag (default: HEAD).
    #[arg(long = "commit", value_name = "COMMIT")]
    pub commit: Option<String>,

    /// Annotation message; creates an annotated tag.
    #[arg(short = 'm', long = "message", value_name = "MESSAGE")]
    pub message: Option<String>,

    /// Remote to push to (default: config `git.remote`).
    #[arg(long = "remote", value_name = "REMOTE")]
    pub remote: Option<String>,

    /// Print the git commands without running them.
    #[arg(long = "dry-run", help = "Show the commands without running them")]
    pub dry_run: bool,
}

// ── push ──────────────────────────────────────────────────────────────────────

/// Arguments for `podsmith push`.
#[derive(Debug, Args)]
pub struct PushArgs {
    /// Podspec to push (default: auto-detect in the current directory).
    #[arg(value_name = "PODSPEC")]
    pub podspec: Option<PathBuf>,

    /// Spec repository to push to (default: the configured default).
    #[arg(short = 'r', long = "repo", value_name = "NAME")]
    pub repo: Option<String>,

    #[arg(long = "no-allow-warnings", help = "Do not pass --allow-warnings")]
    pub no_allow_warnings: bool,

    #[arg(long = "no-verbose", help = "Do not pass --verbose")]
    pub no_verbose: bool,

    #[arg(
        long = "no-skip-import-validation",
        help = "Do not pass --skip-import-validation"
    )]
    pub no_skip_import_validation: bool,

    #[arg(long = "no-use-libraries", help = "Do not pass --use-libraries")]
    pub no_use_libraries: bool,

    #[arg(long = "no-use-modular-headers", help = "Do not pass --use-modular-headers")]
    pub no_use_modular_headers: bool,

    #[arg(long = "swift-version", value_name = "VERSION")]
    pub swift_version: Option<String>,

    /// Extra spec sources, comma-separated.
    #[arg(long = "sources", value_name = "URLS", value_delimiter = ',')]
    pub sources: Vec<String>,

    #[arg(long = "local-only", help = "Do not push to the remote spec repository")]
    pub local_only: bool,

    #[arg(long = "no-overwrite", help = "Refuse to overwrite an existing version")]
    pub no_overwrite: bool,

    #[arg(long = "commit-message", value_name = "MESSAGE")]
    pub commit_message: Option<String>,

    /// Additional raw `pod repo push` arguments, comma-separated.
    #[arg(long = "extra-args", value_name = "ARGS", allow_hyphen_values = true)]
    pub extra_args: Option<String>,

    /// Skip `pod spec lint --quick`.
    #[arg(long = "no-lint", help = "Skip the quick lint before pushing")]
    pub no_lint: bool,

    /// Skip every confirmation.
    #[arg(short = 'y', long = "yes", help = "Push without asking for confirmation")]
    pub yes: bool,

    #[command(flatten)]
    pub repo_action: RepoActionArgs,
}

/// Spec-repository actions reachable from `push`; any of them replaces the push.
#[derive(Debug, Args)]
#[group(multiple = false)]
pub struct RepoActionArgs {
    #[arg(long = "list-repos", help = "List registered spec repositories")]
    pub list_repos: bool,

    #[arg(
        long = "add-repo",
        num_args = 2,
        value_names = ["NAME", "URL"],
        help = "Register a spec repository"
    )]
    pub add_repo: Option<Vec<String>>,

    #[arg(long = "remove-repo", value_name = "NAME", help = "Unregister a spec repository")]
    pub remove_repo: Option<String>,

    #[arg(
        long = "set-default-repo",
        value_name = "NAME",
        help = "Make a repository the default"
    )]
    pub set_default_repo: Option<String>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `podsmith completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_create_command() {
        let cli = Cli::parse_from(["podsmith", "create", "MyLib", "--no-example", "-o", "/tmp"]);
        let Commands::Create(args) = cli.command else {
            panic!("expected Create command");
        };
        assert_eq!(args.name, "MyLib");
        assert!(args.no_example);
        assert_eq!(args.output, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn new_is_an_alias_of_create() {
        let cli = Cli::parse_from(["podsmith", "new", "MyLib"]);
        assert!(matches!(cli.command, Commands::Create(_)));
    }

    #[test]
    fn retag_flags() {
        let cli = Cli::parse_from([
            "podsmith", "tag", "retag", "1.2.8", "--force", "-m", "Release", "--remote",
            "upstream",
        ]);
        let Commands::Tag(TagCommands::Retag { tag, force }) = cli.command else {
            panic!("expected retag");
        };
        assert!(force);
        assert_eq!(tag.name, "1.2.8");
        assert_eq!(tag.message.as_deref(), Some("Release"));
        assert_eq!(tag.remote.as_deref(), Some("upstream"));
    }

    #[test]
    fn push_toggles_and_lists() {
        let cli = Cli::parse_from([
            "podsmith",
            "push",
            "MyLib.podspec",
            "--no-verbose",
            "--sources",
            "https://a.example/specs.git,https://b.example/specs.git",
            "--extra-args",
            "--skip-tests,--synchronous",
        ]);
        let Commands::Push(args) = cli.command else {
            panic!("expected push");
        };
        assert!(args.no_verbose);
        assert_eq!(args.sources.len(), 2);
        assert_eq!(
            args.extra_args.as_deref(),
            Some("--skip-tests,--synchronous")
        );
    }

    #[test]
    fn push_add_repo_takes_two_values() {
        let cli = Cli::parse_from([
            "podsmith",
            "push",
            "--add-repo",
            "MySpecs",
            "https://github.com/me/Specs.git",
        ]);
        let Commands::Push(args) = cli.command else {
            panic!("expected push");
        };
        assert_eq!(
            args.repo_action.add_repo,
            Some(vec!["MySpecs".to_string(), "https://github.com/me/Specs.git".to_string()])
        );
    }

    #[test]
    fn repo_actions_are_exclusive() {
        let result =
            Cli::try_parse_from(["podsmith", "push", "--list-repos", "--remove-repo", "X"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["podsmith", "--quiet", "--verbose", "repo", "list"]);
        assert!(result.is_err());
    }
}
