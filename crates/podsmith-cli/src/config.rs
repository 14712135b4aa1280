//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and handed to each command. It
//! pairs the resolved per-user paths with the [`ConfigService`] that owns the
//! JSON document.
//!
//! # Resolution order (highest priority first)
//!
//! 1. `--config FILE` / `--home DIR` flags
//! 2. `PODSMITH_HOME` (also read from `.env`)
//! 3. `~/.config/podsmith`

use std::path::{Path, PathBuf};

use tracing::debug;

use podsmith_adapters::JsonFileConfigStore;
use podsmith_core::application::ConfigService;

use crate::{
    cli::GlobalArgs,
    error::{CliError, CliResult},
};

const CONFIG_FILE: &str = "config.json";
const TEMPLATE_DIR: &str = "template";

/// Where Podsmith keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub home: PathBuf,
    pub config_file: PathBuf,
}

impl AppPaths {
    pub fn resolve(args: &GlobalArgs) -> CliResult<Self> {
        let home = match &args.home {
            Some(home) => home.clone(),
            None => default_home()?,
        };
        let config_file = args
            .config
            .clone()
            .unwrap_or_else(|| home.join(CONFIG_FILE));
        Ok(Self { home, config_file })
    }

    /// Template cache directory.
    pub fn template_cache(&self) -> PathBuf {
        self.home.join(TEMPLATE_DIR)
    }
}

/// `~/.config/podsmith` on every platform, matching the layout of the
/// template cache documented for operators.
fn default_home() -> CliResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("podsmith"))
        .ok_or_else(|| {
            CliError::config("cannot determine the home directory; set PODSMITH_HOME or --home")
        })
}

pub struct AppConfig {
    pub paths: AppPaths,
    pub settings: ConfigService,
}

impl AppConfig {
    /// Resolve paths and load (or create) the configuration document.
    pub fn load(args: &GlobalArgs) -> CliResult<Self> {
        let paths = AppPaths::resolve(args)?;
        debug!(
            home = %paths.home.display(),
            config = %paths.config_file.display(),
            "Paths resolved"
        );
        let settings = ConfigService::load(Box::new(JsonFileConfigStore::new(&paths.config_file)));
        Ok(Self { paths, settings })
    }

    pub fn config_path(&self) -> &Path {
        &self.paths.config_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podsmith_core::domain::keys;

    fn args(home: &Path) -> GlobalArgs {
        GlobalArgs {
            home: Some(home.to_path_buf()),
            ..GlobalArgs::for_tests()
        }
    }

    #[test]
    fn paths_live_under_home() {
        let paths = AppPaths::resolve(&args(Path::new("/tmp/podsmith-home"))).unwrap();
        assert_eq!(
            paths.config_file,
            PathBuf::from("/tmp/podsmith-home/config.json")
        );
        assert_eq!(
            paths.template_cache(),
            PathBuf::from("/tmp/podsmith-home/template")
        );
    }

    #[test]
    fn explicit_config_file_wins() {
        let mut args = args(Path::new("/tmp/podsmith-home"));
        args.config = Some(PathBuf::from("/elsewhere/podsmith.json"));
        let paths = AppPaths::resolve(&args).unwrap();
        assert_eq!(paths.config_file, PathBuf::from("/elsewhere/podsmith.json"));
        assert_eq!(
            paths.template_cache(),
            PathBuf::from("/tmp/podsmith-home/template")
        );
    }

    #[test]
    fn load_creates_the_default_document() {
        let home = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&args(home.path())).unwrap();

        assert!(config.config_path().is_file());
        assert_eq!(
            config.settings.document().get_str(keys::TEMPLATE_NAME),
            Some("NBTemplateModule")
        );
    }
}
