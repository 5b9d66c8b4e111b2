//! Virtual File System: unifies disk reads and editor-overlay buffers behind
//! one content-addressed interface (spec §4.1).
//!
//! Two tiers are consulted in order:
//! 1. The in-memory overlay (`open`/`change`/`close`), which always wins.
//! 2. The disk cache, which re-reads only when the file's mtime has moved.
//!
//! Both tiers live behind a single [`std::sync::Mutex`] so overlay writes and
//! disk-cache refreshes never interleave; reads are safe from any number of
//! threads.

mod hash;
mod path_resolution;

pub use hash::ContentHash;
pub use path_resolution::resolve_path;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VfsError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("is a directory, not a file: {0}")]
    IsDirectory(String),
    #[error("I/O error reading {path}: {message}")]
    Io { path: String, message: String },
    #[error("relative_to must be an absolute path, got: {0}")]
    RelativeToNotAbsolute(String),
}

/// Result of a successful [`VirtualFileSystem::read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResult {
    pub content: String,
    pub hash: ContentHash,
    /// Canonical absolute path the content was read from/for.
    pub path: PathBuf,
}

#[derive(Clone)]
struct DiskEntry {
    mtime: SystemTime,
    content: String,
    hash: ContentHash,
}

#[derive(Clone)]
struct OverlayEntry {
    content: String,
    hash: ContentHash,
}

#[derive(Default)]
struct Caches {
    disk: HashMap<PathBuf, DiskEntry>,
    overlay: HashMap<PathBuf, OverlayEntry>,
}

/// The VFS. Cheap to clone-share via `Arc` if needed by callers; internally
/// it owns its caches behind a mutex so sharing a single instance across
/// concurrent analyses is always safe.
pub struct VirtualFileSystem {
    caches: Mutex<Caches>,
}

impl Default for VirtualFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualFileSystem {
    pub fn new() -> Self {
        Self {
            caches: Mutex::new(Caches::default()),
        }
    }

    /// Register or replace an editor-dirty buffer for `path`.
    pub fn open(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = normalize_absolute(path.as_ref());
        let content = content.into();
        let hash = ContentHash::of(content.as_bytes());
        let mut caches = self.caches.lock().expect("vfs lock poisoned");
        caches.overlay.insert(path.clone(), OverlayEntry { content, hash });
        caches.disk.remove(&path);
    }

    /// Replace the content of an already-open overlay buffer (same as
    /// `open` — kept as a distinct name to mirror the LSP's `didChange`).
    pub fn change(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.open(path, content);
    }

    /// Remove an overlay buffer, falling back to disk on the next read.
    pub fn close(&self, path: impl AsRef<Path>) {
        let path = normalize_absolute(path.as_ref());
        let mut caches = self.caches.lock().expect("vfs lock poisoned");
        caches.overlay.remove(&path);
    }

    /// Read `path`, resolved relative to `relative_to` if `path` is not
    /// itself absolute. Returns `Ok(None)` semantics are not used: a missing
    /// file is `VfsError::NotFound` so callers (the Resolver) can turn it
    /// into a diagnostic with full control over wording.
    pub fn read(
        &self,
        relative_to: Option<&Path>,
        path: &str,
    ) -> Result<ReadResult, VfsError> {
        let resolved = resolve_path(relative_to, path)?;
        self.read_absolute(&resolved)
    }

    /// Read an already-resolved absolute path.
    pub fn read_absolute(&self, path: &Path) -> Result<ReadResult, VfsError> {
        let path = normalize_absolute(path);

        {
            let caches = self.caches.lock().expect("vfs lock poisoned");
            if let Some(entry) = caches.overlay.get(&path) {
                return Ok(ReadResult {
                    content: entry.content.clone(),
                    hash: entry.hash,
                    path,
                });
            }
        }

        self.read_disk(&path)
    }

    fn read_disk(&self, path: &Path) -> Result<ReadResult, VfsError> {
        let metadata = fs::metadata(path).map_err(|e| io_error(path, e))?;
        if metadata.is_dir() {
            return Err(VfsError::IsDirectory(path.display().to_string()));
        }
        let mtime = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        {
            let caches = self.caches.lock().expect("vfs lock poisoned");
            if let Some(entry) = caches.disk.get(path) {
                if entry.mtime == mtime {
                    tracing::trace!(path = %path.display(), "vfs disk cache hit");
                    return Ok(ReadResult {
                        content: entry.content.clone(),
                        hash: entry.hash,
                        path: path.to_path_buf(),
                    });
                }
            }
        }

        tracing::debug!(path = %path.display(), "vfs disk cache miss, reading");
        let content = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        let hash = ContentHash::of(content.as_bytes());

        let mut caches = self.caches.lock().expect("vfs lock poisoned");
        caches.disk.insert(
            path.to_path_buf(),
            DiskEntry {
                mtime,
                content: content.clone(),
                hash,
            },
        );

        Ok(ReadResult {
            content,
            hash,
            path: path.to_path_buf(),
        })
    }

    /// Whether `path` exists in the overlay or on disk, without reading it.
    pub fn exists(&self, path: &Path) -> bool {
        let path = normalize_absolute(path);
        {
            let caches = self.caches.lock().expect("vfs lock poisoned");
            if caches.overlay.contains_key(&path) {
                return true;
            }
        }
        path.is_file()
    }
}

fn io_error(path: &Path, e: std::io::Error) -> VfsError {
    if e.kind() == std::io::ErrorKind::NotFound {
        VfsError::NotFound(path.display().to_string())
    } else {
        VfsError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    }
}

/// Strip a `file://` prefix and recognize drive-letter paths (`C:\...`) as
/// already-absolute, without touching the filesystem.
fn normalize_absolute(path: &Path) -> PathBuf {
    path_resolution::strip_file_uri(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn overlay_shadows_disk() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.vdl");
        std::fs::write(&file, "type A {}\n").unwrap();

        let vfs = VirtualFileSystem::new();
        let on_disk = vfs.read_absolute(&file).unwrap();
        assert_eq!(on_disk.content, "type A {}\n");

        vfs.open(&file, "type B {}\n");
        let overlaid = vfs.read_absolute(&file).unwrap();
        assert_eq!(overlaid.content, "type B {}\n");

        vfs.close(&file);
        let back_to_disk = vfs.read_absolute(&file).unwrap();
        assert_eq!(back_to_disk.content, "type A {}\n");
    }

    #[test]
    fn disk_cache_refreshes_on_mtime_change() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.vdl");
        std::fs::write(&file, "v1").unwrap();

        let vfs = VirtualFileSystem::new();
        assert_eq!(vfs.read_absolute(&file).unwrap().content, "v1");

        // Force the mtime forward; some filesystems have coarse mtime
        // resolution so we set it explicitly rather than just re-writing.
        let mut f = std::fs::OpenOptions::new().write(true).truncate(true).open(&file).unwrap();
        f.write_all(b"v2").unwrap();
        drop(f);
        let newer = SystemTime::now() + std::time::Duration::from_secs(5);
        let _ = filetime_touch(&file, newer);

        assert_eq!(vfs.read_absolute(&file).unwrap().content, "v2");
    }

    fn filetime_touch(path: &Path, when: SystemTime) -> std::io::Result<()> {
        let f = std::fs::OpenOptions::new().write(true).open(path)?;
        f.set_modified(when)
    }

    #[test]
    fn missing_file_is_not_found() {
        let vfs = VirtualFileSystem::new();
        let err = vfs.read_absolute(Path::new("/definitely/not/here.vdl")).unwrap_err();
        assert!(matches!(err, VfsError::NotFound(_)));
    }

    #[test]
    fn directory_read_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let vfs = VirtualFileSystem::new();
        let err = vfs.read_absolute(dir.path()).unwrap_err();
        assert!(matches!(err, VfsError::IsDirectory(_)));
    }
}
