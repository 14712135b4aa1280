//! Local filesystem adapter using std::fs and walkdir.

use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;
use walkdir::{DirEntry, WalkDir};

use podsmith_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{PodsmithError, PodsmithResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }

    fn walk(root: &Path, contents_first: bool) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
        WalkDir::new(root)
            .min_depth(1)
            .contents_first(contents_first)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_vcs_dir(e))
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> PodsmithResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn copy_dir_all(&self, from: &Path, to: &Path) -> PodsmithResult<()> {
        self.create_dir_all(to)?;
        for entry in WalkDir::new(from).min_depth(1) {
            let entry = entry.map_err(|e| map_walk_error(from, e))?;
            let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
            let dest = to.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                self.create_dir_all(&dest)?;
            } else if file_type.is_symlink() {
                copy_symlink(entry.path(), &dest)?;
            } else {
                std::fs::copy(entry.path(), &dest)
                    .map_err(|e| map_io_error(entry.path(), e, "copy file"))?;
            }
            trace!(to = %dest.display(), "Copied");
        }
        Ok(())
    }

    fn entries_deepest_first(&self, root: &Path) -> PodsmithResult<Vec<PathBuf>> {
        Self::walk(root, true)
            .map(|e| {
                e.map(DirEntry::into_path)
                    .map_err(|e| map_walk_error(root, e))
            })
            .collect()
    }

    fn files(&self, root: &Path) -> PodsmithResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in Self::walk(root, false) {
            let entry = entry.map_err(|e| map_walk_error(root, e))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn list_dir(&self, dir: &Path) -> PodsmithResult<Vec<PathBuf>> {
        let mut entries = std::fs::read_dir(dir)
            .map_err(|e| map_io_error(dir, e, "read directory"))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| map_io_error(dir, e, "read directory"))?;
        entries.sort();
        Ok(entries)
    }

    fn rename(&self, from: &Path, to: &Path) -> PodsmithResult<()> {
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename"))
    }

    fn read(&self, path: &Path) -> PodsmithResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write(&self, path: &Path, content: &[u8]) -> PodsmithResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn remove_dir_all(&self, path: &Path) -> PodsmithResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn remove_file(&self, path: &Path) -> PodsmithResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }
}

fn is_vcs_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == ".git"
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> PodsmithResult<()> {
    let target = std::fs::read_link(from).map_err(|e| map_io_error(from, e, "read link"))?;
    std::os::unix::fs::symlink(target, to).map_err(|e| map_io_error(to, e, "create link"))
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> PodsmithResult<()> {
    std::fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| map_io_error(from, e, "copy file"))
}

pub(crate) fn map_io_error(path: &Path, e: io::Error, operation: &str) -> PodsmithError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

fn map_walk_error(root: &Path, e: walkdir::Error) -> PodsmithError {
    let path = e.path().unwrap_or(root).to_path_buf();
    ApplicationError::FilesystemError {
        path,
        reason: format!("Failed to walk directory: {}", e),
    }
    .into()
}
