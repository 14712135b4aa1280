//! Domain value objects: ModuleName, TagName, SpecRepoUrl, AuthorIdentity.
//!
//! # Design
//!
//! These are pure value types, validated at construction. Anything that holds
//! one of them can rely on its invariant without re-checking.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::error::DomainError;

// ── ModuleName ───────────────────────────────────────────────────────────────

/// Name of the library being created.
///
/// It replaces the placeholder token in file names, directory names and file
/// contents, so it must be a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct ModuleName(String);

impl ModuleName {
    pub fn parse(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let invalid = |reason: &str| DomainError::InvalidModuleName {
            name: name.clone(),
            reason: reason.into(),
        };

        if name.is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if name.starts_with('.') {
            return Err(invalid("name cannot start with '.'"));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(invalid("name cannot contain path separators"));
        }
        if !name.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return Err(invalid("name must start with a letter"));
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(invalid(&format!("character '{c}' is not allowed")));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModuleName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ModuleName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ModuleName> for String {
    fn from(value: ModuleName) -> Self {
        value.0
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── TagName ──────────────────────────────────────────────────────────────────

/// A git tag name, checked against the parts of `git check-ref-format` that
/// matter for release tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    pub fn parse(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let invalid = |reason: &str| DomainError::InvalidTagName {
            name: name.clone(),
            reason: reason.into(),
        };

        if name.is_empty() {
            return Err(invalid("tag cannot be empty"));
        }
        if name.starts_with('-') {
            return Err(invalid("tag cannot start with '-'"));
        }
        if name.contains("..") || name.contains("@{") {
            return Err(invalid("tag cannot contain '..' or '@{'"));
        }
        if name.ends_with('.') || name.ends_with('/') || name.ends_with(".lock") {
            return Err(invalid("tag cannot end with '.', '/' or '.lock'"));
        }
        if name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || "~^:?*[\\".contains(c))
        {
            return Err(invalid("tag contains a forbidden character"));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── SpecRepoUrl ──────────────────────────────────────────────────────────────

/// Remote URL of a spec repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecRepoUrl(String);

impl SpecRepoUrl {
    const SCHEMES: [&'static str; 4] = ["http://", "https://", "git@", "ssh://"];

    pub fn parse(url: impl Into<String>) -> Result<Self, DomainError> {
        let url = url.into();
        let has_scheme = Self::SCHEMES
            .iter()
            .any(|scheme| url.starts_with(scheme) && url.len() > scheme.len());
        if !has_scheme {
            return Err(DomainError::InvalidRepoUrl { url });
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpecRepoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── AuthorIdentity ───────────────────────────────────────────────────────────

/// Who generated projects are attributed to in their podspec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorIdentity {
    pub author: String,
    pub email: String,
}

impl AuthorIdentity {
    pub fn new(author: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            email: email.into(),
        }
    }
}

impl Default for AuthorIdentity {
    fn default() -> Self {
        Self::new("Unknown", "unknown@example.com")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_name_accepts_pod_style_names() {
        for name in ["MyLib", "NBNetworking", "my-lib", "Lib_2"] {
            assert!(ModuleName::parse(name).is_ok(), "rejected {name}");
        }
    }

    #[test]
    fn module_name_rejects_path_like_input() {
        assert!(ModuleName::parse("").is_err());
        assert!(ModuleName::parse(".hidden").is_err());
        assert!(ModuleName::parse("a/b").is_err());
        assert!(ModuleName::parse("a\\b").is_err());
        assert!(ModuleName::parse("1Lib").is_err());
        assert!(ModuleName::parse("My Lib").is_err());
    }

    #[test]
    fn tag_name_rules() {
        assert!(TagName::parse("1.2.8").is_ok());
        assert!(TagName::parse("v1.0.0-beta.1").is_ok());
        assert!(TagName::parse("release/1.0").is_ok());
        assert!(TagName::parse("").is_err());
        assert!(TagName::parse("1..2").is_err());
        assert!(TagName::parse("has space").is_err());
        assert!(TagName::parse("-n").is_err());
        assert!(TagName::parse("1.0.").is_err());
    }

    #[test]
    fn repo_url_requires_known_scheme() {
        assert!(SpecRepoUrl::parse("git@github.com:me/Specs.git").is_ok());
        assert!(SpecRepoUrl::parse("https://github.com/me/Specs.git").is_ok());
        assert!(SpecRepoUrl::parse("ssh://git@host/Specs.git").is_ok());
        assert!(SpecRepoUrl::parse("ftp://host/Specs").is_err());
        assert!(SpecRepoUrl::parse("https://").is_err());
    }
}
