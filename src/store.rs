//! File storage behind a trait.
//!
//! The pipeline only needs four filesystem operations: existence check,
//! read, write and delete. [`FileStore`] captures them so the resize pipeline
//! can run against [`LocalStore`] in production and an in-memory store in
//! tests.
//!
//! ## Atomic writes
//!
//! [`LocalStore::write_bytes`] never leaves a half-written image at the
//! destination. Bytes go to a hidden temp file in the destination directory,
//! which is then renamed over the target. On failure the temp file is removed
//! and the destination is untouched.
//!
//! A new file gets the mode `File::create` would give it (`0o666` minus the
//! umask). Replacing an existing file keeps that file's permissions.
//!
//! ## File identity
//!
//! [`FileStore::identity`] maps every spelling of a file (`a/../b.png`, an
//! absolute path, a symlink) to one path, so callers can tell whether two
//! paths name the same file.

use std::io::Write;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("{}: {source}", path.display())]
pub struct StoreError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl StoreError {
    fn new(path: &Path, source: std::io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Storage operations used by the resize pipeline.
pub trait FileStore: Sync {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, StoreError>;

    /// Replace the contents of `path` with `bytes`.
    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError>;

    fn delete(&self, path: &Path) -> Result<(), StoreError>;

    /// One canonical spelling of the file at `path`. Two paths name the same
    /// file when their identities are equal.
    fn identity(&self, path: &Path) -> PathBuf;
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// ```
/// # use resize_image::store::normalize;
/// # use std::path::Path;
/// assert_eq!(normalize(Path::new("dir/sub/../a.png")), Path::new("dir/a.png"));
/// assert_eq!(normalize(Path::new("./a.png")), Path::new("a.png"));
/// ```
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

/// The local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }
}

impl FileStore for LocalStore {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        std::fs::read(path).map_err(|e| StoreError::new(path, e))
    }

    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let prefix = format!(
            ".{}.",
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        );

        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(".tmp");
        #[cfg(unix)]
        {
            // Masked by the umask when the file is created.
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }

        let mut tmp = builder
            .tempfile_in(dir)
            .map_err(|e| StoreError::new(path, e))?;
        if let Ok(existing) = std::fs::metadata(path) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(|e| StoreError::new(path, e))?;
        }
        tmp.write_all(bytes).map_err(|e| StoreError::new(path, e))?;
        tmp.persist(path)
            .map_err(|e| StoreError::new(path, e.error))?;
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<(), StoreError> {
        std::fs::remove_file(path).map_err(|e| StoreError::new(path, e))
    }

    /// Canonical path for existing files, else the normalized absolute path.
    fn identity(&self, path: &Path) -> PathBuf {
        std::fs::canonicalize(path)
            .or_else(|_| std::path::absolute(path))
            .map(|p| normalize(&p))
            .unwrap_or_else(|_| normalize(path))
    }
}
