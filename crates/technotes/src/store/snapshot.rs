//! The posts document on disk.
//!
//! The document is a pretty-printed JSON array of posts. Writes replace the
//! whole file through a synced sibling temp file and a rename, so readers never
//! see a partial document. Writers in different processes take turns through a
//! [`DocumentLock`].

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::post::Post;

/// Seed document compiled into the binary, used when no document exists yet.
pub const SEED_DOCUMENT: &str = include_str!("../../content/posts.json");

/// Load posts from `path`, falling back to the bundled seed if it is missing.
///
/// # Errors
///
/// Returns [`Error::DocumentLoad`] if the file exists but cannot be read or
/// parsed.
pub fn load(path: &Path) -> Result<Vec<Post>> {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let posts = parse(&text).map_err(|e| Error::DocumentLoad {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            info!("Loaded {} posts from {}", posts.len(), path.display());
            Ok(posts)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("{} not found, using bundled seed", path.display());
            seed()
        }
        Err(e) => Err(Error::DocumentLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

/// Parse the bundled seed document.
///
/// # Errors
///
/// Returns [`Error::DocumentLoad`] if the seed is malformed.
pub fn seed() -> Result<Vec<Post>> {
    parse(SEED_DOCUMENT).map_err(|e| Error::DocumentLoad {
        path: PathBuf::from("<bundled seed>"),
        message: e.to_string(),
    })
}

/// Parse a posts document.
///
/// # Errors
///
/// Returns the JSON error if `text` is not an array of posts.
pub fn parse(text: &str) -> serde_json::Result<Vec<Post>> {
    serde_json::from_str(text)
}

/// Atomically replace the document at `path` with `posts`.
///
/// Parent directories are created as needed. The temp file is synced before
/// the rename and the directory after it.
///
/// # Errors
///
/// Returns [`Error::DirectoryCreate`] if the parent directory cannot be
/// created, or [`Error::Persist`] if writing or renaming fails. A failed
/// write or rename removes the temp file.
pub fn write(path: &Path, posts: &[Post]) -> Result<()> {
    let parent = ensure_parent(path)?;

    let mut json = serde_json::to_string_pretty(posts)?;
    json.push('\n');

    let tmp = temp_path(path);
    let persisted =
        write_synced(&tmp, json.as_bytes()).and_then(|()| std::fs::rename(&tmp, path));
    if let Err(source) = persisted {
        let _ = std::fs::remove_file(&tmp);
        return Err(Error::Persist {
            path: path.to_path_buf(),
            source,
        });
    }

    if let Some(dir) = parent {
        if let Ok(dir) = File::open(dir) {
            let _ = dir.sync_all();
        }
    }

    debug!("Wrote {} posts to {}", posts.len(), path.display());
    Ok(())
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Create the parent directory of `path` if needed and return it.
fn ensure_parent(path: &Path) -> Result<Option<&Path>> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(None);
    };
    if !parent.exists() {
        std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(Some(parent))
}

/// `posts.json` -> `posts.json.<pid>.tmp`, in the same directory.
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    sibling(path, &format!(".{}.tmp", std::process::id()))
}

/// `posts.json` -> `posts.json.lock`, in the same directory.
pub(crate) fn lock_path(path: &Path) -> PathBuf {
    sibling(path, ".lock")
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("posts"), OsString::from);
    name.push(suffix);
    path.with_file_name(name)
}

/// Exclusive claim on a posts document, shared by every process using it.
///
/// The claim is a `<document>.lock` file created with `create_new`; dropping
/// the guard removes it.
#[derive(Debug)]
pub struct DocumentLock {
    lock: PathBuf,
    _file: File,
}

impl DocumentLock {
    /// Poll interval while another writer holds the lock.
    const RETRY: Duration = Duration::from_millis(50);

    /// Claim the document at `path`, waiting up to `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Locked`] if the lock is still held after `timeout`,
    /// [`Error::DirectoryCreate`] if the parent directory cannot be created,
    /// or [`Error::Io`] if the lock file cannot be created.
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self> {
        ensure_parent(path)?;
        let lock = lock_path(path);
        let started = Instant::now();

        loop {
            match OpenOptions::new().write(true).create_new(true).open(&lock) {
                Ok(file) => {
                    debug!("Locked {}", path.display());
                    return Ok(Self { lock, _file: file });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if started.elapsed() >= timeout {
                        warn!("Gave up waiting for {}", lock.display());
                        return Err(Error::Locked {
                            path: path.to_path_buf(),
                            lock,
                        });
                    }
                    std::thread::sleep(Self::RETRY);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Drop for DocumentLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.lock) {
            warn!("Failed to release {}: {}", self.lock.display(), e);
        }
    }
}
