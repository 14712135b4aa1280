//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use podsmith_core::{
    application::{ApplicationError, ports::Filesystem},
    error::PodsmithResult,
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can hand one clone to a service and inspect
/// the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    /// Every successful rename, in order.
    renames: Vec<(PathBuf, PathBuf)>,
    /// Reads of any path ending with one of these fail.
    unreadable: BTreeSet<PathBuf>,
    /// Copies stop with an error on reaching a file ending with one of these.
    uncopyable: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating its parent directories (testing helper).
    pub fn with_file(self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                insert_ancestors(&mut inner.directories, parent);
            }
            inner
                .files
                .insert(path.to_path_buf(), content.as_ref().to_vec());
        }
        self
    }

    /// Make reads of every path ending with `suffix` fail (testing helper).
    pub fn with_unreadable(self, suffix: impl AsRef<Path>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.unreadable.insert(suffix.as_ref().to_path_buf());
        }
        self
    }

    /// Make `copy_dir_all` fail partway, on the first file ending with
    /// `suffix`. Files copied before it stay in the destination.
    pub fn with_uncopyable(self, suffix: impl AsRef<Path>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.uncopyable.insert(suffix.as_ref().to_path_buf());
        }
        self
    }

    /// Read a file's content as text (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        let bytes = inner.files.get(path)?;
        String::from_utf8(bytes.clone()).ok()
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Renames performed so far, oldest first.
    pub fn renames(&self) -> Vec<(PathBuf, PathBuf)> {
        self.inner
            .read()
            .map(|inner| inner.renames.clone())
            .unwrap_or_default()
    }

    fn read_lock(&self) -> PodsmithResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }

    fn write_lock(&self) -> PodsmithResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }
}

impl MemoryFilesystemInner {
    /// All paths strictly below `root`, files and directories.
    fn descendants(&self, root: &Path) -> Vec<PathBuf> {
        self.directories
            .iter()
            .chain(self.files.keys())
            .filter(|p| p.starts_with(root) && p.as_path() != root)
            .filter(|p| !p.strip_prefix(root).is_ok_and(has_vcs_component))
            .cloned()
            .collect()
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn create_dir_all(&self, path: &Path) -> PodsmithResult<()> {
        let mut inner = self.write_lock()?;
        insert_ancestors(&mut inner.directories, path);
        Ok(())
    }

    fn copy_dir_all(&self, from: &Path, to: &Path) -> PodsmithResult<()> {
        let mut inner = self.write_lock()?;
        if !inner.directories.contains(from) {
            return Err(not_found(from));
        }
        insert_ancestors(&mut inner.directories, to);

        let dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter_map(|d| d.strip_prefix(from).ok().map(|rel| to.join(rel)))
            .collect();
        let files: Vec<(PathBuf, PathBuf, Vec<u8>)> = inner
            .files
            .iter()
            .filter_map(|(p, c)| {
                let rel = p.strip_prefix(from).ok()?;
                Some((p.clone(), to.join(rel), c.clone()))
            })
            .collect();

        inner.directories.extend(dirs);
        for (source, target, content) in files {
            if inner
                .uncopyable
                .iter()
                .any(|suffix| source.ends_with(suffix))
            {
                return Err(ApplicationError::FilesystemError {
                    path: source,
                    reason: "copy interrupted".into(),
                }
                .into());
            }
            inner.files.insert(target, content);
        }
        Ok(())
    }

    fn entries_deepest_first(&self, root: &Path) -> PodsmithResult<Vec<PathBuf>> {
        let inner = self.read_lock()?;
        let mut entries = inner.descendants(root);
        entries.sort_by(|a, b| {
            b.components()
                .count()
                .cmp(&a.components().count())
                .then_with(|| a.cmp(b))
        });
        Ok(entries)
    }

    fn files(&self, root: &Path) -> PodsmithResult<Vec<PathBuf>> {
        let inner = self.read_lock()?;
        Ok(inner
            .descendants(root)
            .into_iter()
            .filter(|p| inner.files.contains_key(p))
            .collect())
    }

    fn list_dir(&self, dir: &Path) -> PodsmithResult<Vec<PathBuf>> {
        let inner = self.read_lock()?;
        if !inner.directories.contains(dir) {
            return Err(not_found(dir));
        }
        let mut children: Vec<PathBuf> = inner
            .directories
            .iter()
            .chain(inner.files.keys())
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect();
        children.sort();
        Ok(children)
    }

    fn rename(&self, from: &Path, to: &Path) -> PodsmithResult<()> {
        let mut inner = self.write_lock()?;
        if inner.files.contains_key(to) || inner.directories.contains(to) {
            return Err(ApplicationError::FilesystemError {
                path: to.to_path_buf(),
                reason: "destination exists".into(),
            }
            .into());
        }

        if let Some(content) = inner.files.remove(from) {
            inner.files.insert(to.to_path_buf(), content);
        } else if inner.directories.contains(from) {
            let moved_dirs: Vec<PathBuf> = inner
                .directories
                .iter()
                .filter(|d| d.starts_with(from))
                .cloned()
                .collect();
            for dir in moved_dirs {
                inner.directories.remove(&dir);
                inner.directories.insert(rebase(&dir, from, to));
            }
            let moved_files: Vec<PathBuf> = inner
                .files
                .keys()
                .filter(|f| f.starts_with(from))
                .cloned()
                .collect();
            for file in moved_files {
                if let Some(content) = inner.files.remove(&file) {
                    inner.files.insert(rebase(&file, from, to), content);
                }
            }
        } else {
            return Err(not_found(from));
        }

        inner.renames.push((from.to_path_buf(), to.to_path_buf()));
        Ok(())
    }

    fn read(&self, path: &Path) -> PodsmithResult<Vec<u8>> {
        let inner = self.read_lock()?;
        if inner.unreadable.iter().any(|suffix| path.ends_with(suffix)) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "permission denied".into(),
            }
            .into());
        }
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    fn write(&self, path: &Path, content: &[u8]) -> PodsmithResult<()> {
        let mut inner = self.write_lock()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }
        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> PodsmithResult<()> {
        let mut inner = self.write_lock()?;
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> PodsmithResult<()> {
        let mut inner = self.write_lock()?;
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found(path))
    }
}

fn insert_ancestors(directories: &mut BTreeSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        directories.insert(current.clone());
    }
}

fn rebase(path: &Path, from: &Path, to: &Path) -> PathBuf {
    path.strip_prefix(from)
        .map(|rel| to.join(rel))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn has_vcs_component(relative: &Path) -> bool {
    relative.components().any(|c| c.as_os_str() == ".git")
}

fn not_found(path: &Path) -> podsmith_core::error::PodsmithError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "No such file or directory".into(),
    }
    .into()
}
