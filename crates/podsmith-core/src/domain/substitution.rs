//! Placeholder substitution rules.
//!
//! Which files get their contents rewritten, how names are rewritten, and the
//! text/byte replacement itself. No I/O happens here.

use std::borrow::Cow;
use std::path::Path;

/// Extensions whose files get content substitution.
pub const SUBSTITUTED_EXTENSIONS: &[&str] = &[
    "swift", "h", "m", "mm", "podspec", "md", "txt", "json", "yml", "yaml", "plist", "pbxproj",
    "xcscheme",
];

/// Extension-less file names that get content substitution.
pub const SUBSTITUTED_FILE_NAMES: &[&str] = &["Podfile"];

/// Directories never descended into.
pub const SKIPPED_DIRS: &[&str] = &[".git"];

/// Name of the optional example sub-project.
pub const EXAMPLE_DIR: &str = "Example";

/// Whether `path` is on the substitution allow-list.
pub fn is_substitutable(path: &Path) -> bool {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        return SUBSTITUTED_EXTENSIONS.contains(&ext);
    }
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| SUBSTITUTED_FILE_NAMES.contains(&n))
}

/// Backup and swap files left behind by editors and merge tools.
pub fn is_backup_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".orig") || n.ends_with('~'))
}

/// The file name with `token` replaced, or `None` when it does not contain it.
pub fn renamed(name: &str, token: &str, replacement: &str) -> Option<String> {
    if token.is_empty() || !name.contains(token) {
        return None;
    }
    Some(name.replace(token, replacement))
}

/// Outcome of substituting a single file's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Substitution {
    /// Valid UTF-8, token replaced.
    Text(String),
    /// Not UTF-8, token bytes replaced.
    Bytes(Vec<u8>),
    /// Token absent; nothing to write.
    Unchanged,
}

/// Replace every occurrence of `token` in `content`.
///
/// Text mode is tried first; content that is not valid UTF-8 is treated as raw
/// bytes and the UTF-8 encoding of the token is replaced instead.
pub fn substitute(content: &[u8], token: &str, replacement: &str) -> Substitution {
    if token.is_empty() {
        return Substitution::Unchanged;
    }
    match std::str::from_utf8(content) {
        Ok(text) if text.contains(token) => Substitution::Text(text.replace(token, replacement)),
        Ok(_) => Substitution::Unchanged,
        Err(_) => match replace_bytes(content, token.as_bytes(), replacement.as_bytes()) {
            Cow::Owned(bytes) => Substitution::Bytes(bytes),
            Cow::Borrowed(_) => Substitution::Unchanged,
        },
    }
}

fn replace_bytes<'a>(haystack: &'a [u8], needle: &[u8], with: &[u8]) -> Cow<'a, [u8]> {
    let Some(first) = find(haystack, needle) else {
        return Cow::Borrowed(haystack);
    };

    let mut out = Vec::with_capacity(haystack.len());
    let mut rest = haystack;
    let mut next = Some(first);
    while let Some(at) = next {
        out.extend_from_slice(&rest[..at]);
        out.extend_from_slice(with);
        rest = &rest[at + needle.len()..];
        next = find(rest, needle);
    }
    out.extend_from_slice(rest);
    Cow::Owned(out)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
