//! Core post types for technotes.
//!
//! A [`Post`] is one short note. New content enters the system as a
//! [`PostDraft`], which is the only way to get validated content and icon
//! values into the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::format::FormattedContent;
use crate::icons::{self, TechIcon};

/// Maximum post length, in characters.
pub const MAX_CONTENT_CHARS: usize = 200;

/// A single tech note.
///
/// Serialized in the posts document as
/// `{"id", "content", "techIcon", "createdAt"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Opaque unique identifier.
    pub id: String,

    /// Note text, possibly with inline code and one fenced code block.
    pub content: String,

    /// Icon catalog key.
    #[serde(default = "default_tech_icon")]
    pub tech_icon: String,

    /// When the post was created. Never changes after creation.
    pub created_at: DateTime<Utc>,
}

fn default_tech_icon() -> String {
    icons::FALLBACK_KEY.to_string()
}

impl Post {
    /// Create a new post from a validated draft.
    ///
    /// Assigns a fresh random id and sets the creation time to now.
    #[must_use]
    pub fn new(draft: PostDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: draft.content,
            tech_icon: draft.tech_icon,
            created_at: Utc::now(),
        }
    }

    /// Replace the editable fields with the draft's, keeping id and creation time.
    pub fn apply(&mut self, draft: PostDraft) {
        self.content = draft.content;
        self.tech_icon = draft.tech_icon;
    }

    /// Display metadata for this post's icon, falling back to `other`.
    #[must_use]
    pub fn icon(&self) -> &'static TechIcon {
        icons::resolve(&self.tech_icon)
    }

    /// Split the content into prose and an optional code block.
    #[must_use]
    pub fn formatted(&self) -> FormattedContent {
        FormattedContent::parse(&self.content)
    }
}

/// Why a draft was rejected.
///
/// The messages are shown verbatim to the author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Content was missing or only whitespace.
    #[error("Content is required")]
    ContentRequired,

    /// The icon key is not in the catalog.
    #[error("Invalid category selected")]
    UnknownTechIcon,

    /// Content exceeded [`MAX_CONTENT_CHARS`].
    #[error("Content must be 200 characters or less")]
    ContentTooLong,
}

/// Validated user input for creating or updating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    content: String,
    tech_icon: String,
}

impl PostDraft {
    /// Validate raw form input.
    ///
    /// Checks, in order: content present, icon known, content length. The
    /// length limit applies to the content as submitted; the stored content is
    /// trimmed.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] that applies.
    pub fn new(content: &str, tech_icon: &str) -> Result<Self, ValidationError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::ContentRequired);
        }

        if !icons::is_known(tech_icon) {
            return Err(ValidationError::UnknownTechIcon);
        }

        if content.chars().count() > MAX_CONTENT_CHARS {
            return Err(ValidationError::ContentTooLong);
        }

        Ok(Self {
            content: trimmed.to_string(),
            tech_icon: tech_icon.to_string(),
        })
    }

    /// The trimmed content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The icon key.
    #[must_use]
    pub fn tech_icon(&self) -> &str {
        &self.tech_icon
    }
}
