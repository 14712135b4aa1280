//! Podspec metadata patching.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::domain::{ModuleName, value_objects::AuthorIdentity};

/// Values written into a generated podspec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFields {
    pub author: String,
    pub email: String,
    pub summary: String,
    pub description: String,
}

impl ManifestFields {
    pub fn new(module: &ModuleName, identity: &AuthorIdentity) -> Self {
        Self {
            author: identity.author.clone(),
            email: identity.email.clone(),
            summary: format!("A brief description of {module}"),
            description: format!("A longer description of {module} library"),
        }
    }
}

static PATTERNS: LazyLock<[(&'static str, Regex); 4]> = LazyLock::new(|| {
    let assignment = |field: &str| {
        Regex::new(&format!(r#"s\.{field}\s*=\s*['"].*?['"]"#))
            .unwrap_or_else(|e| unreachable!("static podspec pattern: {e}"))
    };
    [
        ("author", assignment("author")),
        ("email", assignment("email")),
        ("summary", assignment("summary")),
        ("description", assignment("description")),
    ]
});

/// Rewrite the quoted `s.<field> = '...'` assignments in a podspec.
///
/// Fields without a matching assignment are left alone. Returns the new
/// content and whether anything changed.
pub fn patch_podspec(content: &str, fields: &ManifestFields) -> (String, bool) {
    let mut patched = content.to_string();
    for (field, pattern) in PATTERNS.iter() {
        let value = match *field {
            "author" => &fields.author,
            "email" => &fields.email,
            "summary" => &fields.summary,
            _ => &fields.description,
        };
        let line = format!("s.{field} = '{}'", value.replace('\'', "\\'"));
        patched = pattern.replace_all(&patched, NoExpand(&line)).into_owned();
    }
    let changed = patched != content;
    (patched, changed)
}
