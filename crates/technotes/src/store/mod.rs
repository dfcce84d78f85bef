//! Post store for technotes.
//!
//! The whole collection lives in memory. Write capability is carried by the
//! type: a [`ReadOnlyStore`] has no mutating methods, while a
//! [`MutableStore`] flushes the collection to its document after every
//! change. [`StoreHandle`] holds one or the other, chosen from the runtime
//! mode.

pub mod snapshot;

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::post::{Post, PostDraft};

/// One page of posts, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostPage {
    /// Posts on this page.
    pub posts: Vec<Post>,
    /// Total posts in the store.
    pub total: usize,
    /// Whether posts exist beyond this page.
    pub has_more: bool,
}

/// Read access shared by every store flavor.
pub trait PostReader {
    /// Run `f` over the collection in document order.
    fn with_posts<R>(&self, f: impl FnOnce(&[Post]) -> R) -> R;

    /// Get a page of posts ordered by creation time, newest first.
    ///
    /// An offset past the end yields an empty page.
    fn list(&self, limit: usize, offset: usize) -> PostPage {
        self.with_posts(|posts| {
            let mut sorted: Vec<&Post> = posts.iter().collect();
            sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

            let total = sorted.len();
            PostPage {
                posts: sorted
                    .into_iter()
                    .skip(offset)
                    .take(limit)
                    .cloned()
                    .collect(),
                total,
                has_more: offset.saturating_add(limit) < total,
            }
        })
    }

    /// Creation times of every post.
    fn all_timestamps(&self) -> Vec<DateTime<Utc>> {
        self.with_posts(|posts| posts.iter().map(|p| p.created_at).collect())
    }

    /// Get a post by id.
    fn get(&self, id: &str) -> Option<Post> {
        self.with_posts(|posts| posts.iter().find(|p| p.id == id).cloned())
    }

    /// Number of posts.
    fn len(&self) -> usize {
        self.with_posts(<[Post]>::len)
    }

    /// Whether the store has no posts.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A store that can only be read.
#[derive(Debug, Default)]
pub struct ReadOnlyStore {
    posts: Vec<Post>,
}

impl ReadOnlyStore {
    /// Load the document at `path`, or the bundled seed if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let posts = snapshot::load(path.as_ref())?;
        Ok(Self { posts })
    }

    /// Wrap an existing collection.
    #[must_use]
    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self { posts }
    }
}

impl PostReader for ReadOnlyStore {
    fn with_posts<R>(&self, f: impl FnOnce(&[Post]) -> R) -> R {
        f(&self.posts)
    }
}

/// How long a mutation waits for another process to release the document.
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// A store that accepts writes.
///
/// Mutations hold the write lock across the in-memory change and the flush.
/// When the store has a backing document, each mutation also claims the
/// document's [`snapshot::DocumentLock`] and reloads it first, so a server
/// and the CLI writing the same file never drop each other's posts. Changes
/// made by another process become visible here at the next mutation.
///
/// If the flush fails the change is undone before the error is returned, so
/// memory and disk never disagree.
///
/// Mutations block on file I/O; async callers run them on a blocking thread.
#[derive(Debug, Default)]
pub struct MutableStore {
    posts: RwLock<Vec<Post>>,
    /// Backing document. `None` keeps the store in memory only.
    path: Option<PathBuf>,
}

impl MutableStore {
    /// Load the document at `path` (or the bundled seed) and flush changes
    /// back to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let posts = snapshot::load(&path)?;
        info!("Opened writable store at {}", path.display());
        Ok(Self {
            posts: RwLock::new(posts),
            path: Some(path),
        })
    }

    /// Create an empty store that is never flushed.
    #[must_use]
    pub fn open_in_memory() -> Self {
        Self::default()
    }

    /// Wrap an existing collection that is never flushed.
    #[must_use]
    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: RwLock::new(posts),
            path: None,
        }
    }

    /// Create a post from a validated draft and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be locked, reloaded or
    /// flushed; the post is not kept.
    pub fn create(&self, draft: PostDraft) -> Result<String> {
        let post = Post::new(draft);
        let id = post.id.clone();

        self.mutate(|posts| {
            posts.push(post);
            Some(Undo::Remove(posts.len() - 1))
        })?;

        info!("Created post {}", id);
        Ok(id)
    }

    /// Replace a post's content and icon.
    ///
    /// Returns `false` if no post has this id.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be locked, reloaded or
    /// flushed; the post keeps its old values.
    pub fn update(&self, id: &str, draft: PostDraft) -> Result<bool> {
        let updated = self.mutate(|posts| {
            let index = posts.iter().position(|p| p.id == id)?;
            let previous = posts[index].clone();
            posts[index].apply(draft);
            Some(Undo::Restore(index, previous))
        })?;

        if updated {
            info!("Updated post {}", id);
        } else {
            debug!("Update skipped, no post {}", id);
        }
        Ok(updated)
    }

    /// Delete a post.
    ///
    /// Returns `false` if no post has this id.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be locked, reloaded or
    /// flushed; the post is restored.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let deleted = self.mutate(|posts| {
            let index = posts.iter().position(|p| p.id == id)?;
            let removed = posts.remove(index);
            Some(Undo::Insert(index, removed))
        })?;

        if deleted {
            info!("Deleted post {}", id);
        } else {
            debug!("Delete skipped, no post {}", id);
        }
        Ok(deleted)
    }

    /// Apply `change` to the latest collection and flush it.
    ///
    /// `change` returns `None` when it found nothing to change. Returns whether
    /// a change was written.
    fn mutate(&self, change: impl FnOnce(&mut Vec<Post>) -> Option<Undo>) -> Result<bool> {
        let mut posts = self.write();

        let Some(path) = &self.path else {
            return Ok(change(&mut *posts).is_some());
        };

        let _lock = snapshot::DocumentLock::acquire(path, LOCK_TIMEOUT)?;
        *posts = snapshot::load(path)?;

        let Some(undo) = change(&mut *posts) else {
            return Ok(false);
        };

        if let Err(e) = snapshot::write(path, &posts) {
            undo.apply(&mut *posts);
            warn!("Change to {} rolled back: {}", path.display(), e);
            return Err(e);
        }
        Ok(true)
    }

    // A panic while holding the lock cannot leave a half-applied mutation,
    // so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Post>> {
        self.posts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Post>> {
        self.posts.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// How to take back a change whose flush failed.
enum Undo {
    Remove(usize),
    Restore(usize, Post),
    Insert(usize, Post),
}

impl Undo {
    fn apply(self, posts: &mut Vec<Post>) {
        match self {
            Self::Remove(index) => {
                posts.remove(index);
            }
            Self::Restore(index, post) => posts[index] = post,
            Self::Insert(index, post) => posts.insert(index, post),
        }
    }
}

impl PostReader for MutableStore {
    fn with_posts<R>(&self, f: impl FnOnce(&[Post]) -> R) -> R {
        f(&self.read())
    }
}

/// The store as chosen by the runtime mode.
#[derive(Debug)]
pub enum StoreHandle {
    /// Production and test: reads only.
    ReadOnly(ReadOnlyStore),
    /// Development: reads and writes.
    Mutable(MutableStore),
}

impl StoreHandle {
    /// Open the configured document with the capability the mode allows.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be parsed.
    pub fn open(config: &Config) -> Result<Self> {
        let path = config.posts_path();
        if config.mode.allows_writes() {
            Ok(Self::Mutable(MutableStore::open(path)?))
        } else {
            debug!("Opening {} read-only ({} mode)", path.display(), config.mode);
            Ok(Self::ReadOnly(ReadOnlyStore::open(path)?))
        }
    }

    /// Write access, if this handle has it.
    #[must_use]
    pub fn writable(&self) -> Option<&MutableStore> {
        match self {
            Self::Mutable(store) => Some(store),
            Self::ReadOnly(_) => None,
        }
    }
}

impl PostReader for StoreHandle {
    fn with_posts<R>(&self, f: impl FnOnce(&[Post]) -> R) -> R {
        match self {
            Self::ReadOnly(store) => store.with_posts(f),
            Self::Mutable(store) => store.with_posts(f),
        }
    }
}

impl From<ReadOnlyStore> for StoreHandle {
    fn from(store: ReadOnlyStore) -> Self {
        Self::ReadOnly(store)
    }
}

impl From<MutableStore> for StoreHandle {
    fn from(store: MutableStore) -> Self {
        Self::Mutable(store)
    }
}
