//! The nested key-value configuration document.
//!
//! Pure data access: dotted-key lookups, dotted-key writes, deep merge against
//! the built-in defaults, and the spec-repository registry that lives under
//! `spec_repos`. Persistence is the job of a [`ConfigStore`] adapter.
//!
//! [`ConfigStore`]: crate::application::ports::ConfigStore

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde_json::{Map, Value, json};

use crate::domain::{
    error::DomainError,
    value_objects::{AuthorIdentity, SpecRepoUrl},
};

/// Placeholder token the bundled template is built around.
pub const DEFAULT_TEMPLATE_NAME: &str = "NBTemplateModule";

/// Well-known keys read by the services.
pub mod keys {
    pub const AUTHOR: &str = "author";
    pub const EMAIL: &str = "email";
    pub const EDITOR: &str = "editor";
    pub const TEMPLATE_NAME: &str = "cocoapods.template_name";
    pub const TEMPLATE_REPO: &str = "cocoapods.template_repo";
    pub const TEMPLATE_BRANCH: &str = "cocoapods.template_branch";
    pub const TEMPLATE_PATH: &str = "cocoapods.template_path";
    pub const SPEC_REPOS: &str = "spec_repos.repos";
    pub const DEFAULT_SPEC_REPO: &str = "spec_repos.default";
    pub const GIT_REMOTE: &str = "git.remote";
}

/// A JSON object with dotted-key access.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: Map<String, Value>,
}

impl ConfigDocument {
    /// The built-in document written on first run.
    pub fn defaults() -> Self {
        let value = json!({
            "author": "Your Name",
            "email": "you@example.com",
            "organization": "Personal",
            "editor": "vi",
            "cocoapods": {
                "template_name": DEFAULT_TEMPLATE_NAME,
                "template_repo": "https://github.com/DargonLee/lee-devkit.git",
                "template_branch": "main",
                "template_path": "template"
            },
            "spec_repos": {
                "default": null,
                "repos": {}
            },
            "git": {
                "remote": "origin"
            }
        });
        match value {
            Value::Object(root) => Self { root },
            _ => unreachable!("default document is an object literal"),
        }
    }

    /// Wrap a parsed JSON value. Only objects are valid documents.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(root) => Some(Self { root }),
            _ => None,
        }
    }

    /// Deep-merge `user` over the defaults. The user's values always win.
    pub fn with_defaults(user: &ConfigDocument) -> Self {
        let merged = merge(&Self::defaults().to_value(), &user.to_value());
        Self::from_value(merged).unwrap_or_else(|| user.clone())
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.root).unwrap_or_else(|_| "{}".into())
    }

    /// Resolve a period-separated path through nested objects.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// String value at `key`; `None` when missing, null or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Set the leaf at `key`, creating intermediate objects as needed.
    ///
    /// A non-object value sitting on the path is replaced by an object.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), DomainError> {
        let segments = split_key(key)?;
        let (leaf, parents) = segments
            .split_last()
            .ok_or_else(|| DomainError::InvalidConfigKey {
                key: key.into(),
                reason: "key cannot be empty".into(),
            })?;

        let mut current = &mut self.root;
        for segment in parents {
            let slot = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot {
                Value::Object(map) => map,
                _ => unreachable!("slot was just made an object"),
            };
        }
        current.insert(leaf.to_string(), value);
        Ok(())
    }

    pub fn identity(&self) -> AuthorIdentity {
        let fallback = AuthorIdentity::default();
        AuthorIdentity::new(
            self.get_str(keys::AUTHOR).unwrap_or(&fallback.author),
            self.get_str(keys::EMAIL).unwrap_or(&fallback.email),
        )
    }

    // ── Spec repository registry ─────────────────────────────────────────────

    /// All registered spec repositories, name → URL.
    pub fn spec_repos(&self) -> BTreeMap<String, String> {
        self.get(keys::SPEC_REPOS)
            .and_then(Value::as_object)
            .map(|repos| {
                repos
                    .iter()
                    .filter_map(|(name, url)| Some((name.clone(), url.as_str()?.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn default_spec_repo(&self) -> Option<&str> {
        self.get_str(keys::DEFAULT_SPEC_REPO)
    }

    pub fn spec_repo_url(&self, name: &str) -> Option<&str> {
        self.get(keys::SPEC_REPOS)?.as_object()?.get(name)?.as_str()
    }

    /// Register (or re-point) a spec repository.
    ///
    /// Returns `true` when the repository became the default because it is
    /// the only one registered.
    pub fn add_spec_repo(&mut self, name: &str, url: &SpecRepoUrl) -> Result<bool, DomainError> {
        validate_repo_name(name)?;

        let mut repos = self.repos_object();
        repos.insert(name.to_string(), Value::String(url.as_str().to_string()));
        let only_one = repos.len() == 1;
        self.set(keys::SPEC_REPOS, Value::Object(repos))?;

        if only_one {
            self.set(keys::DEFAULT_SPEC_REPO, Value::String(name.to_string()))?;
        }
        Ok(only_one)
    }

    /// Unregister a spec repository.
    ///
    /// Returns `true` when the removed entry was the default, which is then
    /// cleared.
    pub fn remove_spec_repo(&mut self, name: &str) -> Result<bool, DomainError> {
        let mut repos = self.repos_object();
        if repos.remove(name).is_none() {
            return Err(DomainError::UnknownSpecRepo { name: name.into() });
        }
        self.set(keys::SPEC_REPOS, Value::Object(repos))?;

        let was_default = self.default_spec_repo() == Some(name);
        if was_default {
            self.set(keys::DEFAULT_SPEC_REPO, Value::Null)?;
        }
        Ok(was_default)
    }

    pub fn set_default_spec_repo(&mut self, name: &str) -> Result<(), DomainError> {
        if self.spec_repo_url(name).is_none() {
            return Err(DomainError::UnknownSpecRepo { name: name.into() });
        }
        self.set(keys::DEFAULT_SPEC_REPO, Value::String(name.to_string()))
    }

    /// Clear a default that names no registered repository.
    ///
    /// Returns `true` if the document changed.
    pub fn clear_dangling_default(&mut self) -> bool {
        let dangling = match self.default_spec_repo() {
            Some(name) => self.spec_repo_url(name).is_none(),
            None => false,
        };
        if dangling {
            // `spec_repos.default` is a well-formed key.
            let _ = self.set(keys::DEFAULT_SPEC_REPO, Value::Null);
        }
        dangling
    }

    fn repos_object(&self) -> Map<String, Value> {
        self.get(keys::SPEC_REPOS)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    // ── Display ──────────────────────────────────────────────────────────────

    /// Indented `key: value` tree, one entry per line.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        render_object(&self.root, 0, &mut out);
        out
    }
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Deep merge with `overlay` precedence.
///
/// Two objects merge key by key, recursively. Any other pairing is resolved by
/// taking `overlay` wholesale.
pub fn merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            let mut merged = base.clone();
            for (key, value) in overlay {
                let next = match merged.get(key) {
                    Some(existing) => merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Interpret a command-line value: JSON if it parses, a plain string otherwise.
pub fn parse_cli_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn split_key(key: &str) -> Result<Vec<&str>, DomainError> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|s| s.trim().is_empty()) {
        return Err(DomainError::InvalidConfigKey {
            key: key.into(),
            reason: "empty segment".into(),
        });
    }
    Ok(segments)
}

fn validate_repo_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidSpecRepoName { name: name.into() });
    }
    Ok(())
}

fn render_object(map: &Map<String, Value>, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for (key, value) in map {
        match value {
            Value::Object(child) => {
                let _ = writeln!(out, "{indent}{key}:");
                render_object(child, depth + 1, out);
            }
            Value::String(s) => {
                let _ = writeln!(out, "{indent}{key}: {s}");
            }
            Value::Null => {
                let _ = writeln!(out, "{indent}{key}: (unset)");
            }
            other => {
                let _ = writeln!(out, "{indent}{key}: {other}");
            }
        }
    }
}
