//! # Domain Models
//!
//! Core entities of picstash. UUID v7 gives time-ordered, globally unique
//! identification, matching the most-recent-first listing convention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored photo and its searchable metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: Uuid,
    /// Owner identity resolved from the caller's bearer token.
    pub user_id: Uuid,
    /// Display name. Mutable (rename); distinct from the storage object key.
    pub filename: String,
    /// Final object-storage URL. Immutable once set.
    pub url: String,
    /// Lowercase, trimmed, deduplicated. Union of filename-derived baseline
    /// tags and whatever the vision tagger returned.
    pub tags: Vec<String>,
    pub is_favorite: bool,
    pub hidden: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload handed to the metadata store, which assigns `id` and
/// `created_at`.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub user_id: Uuid,
    pub filename: String,
    pub url: String,
    pub tags: Vec<String>,
}

/// Partial update against an existing record. `None` fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagePatch {
    pub filename: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_favorite: Option<bool>,
    pub hidden: Option<bool>,
    pub deleted: Option<bool>,
}

impl ImagePatch {
    /// Patch that replaces only the tag set. Used by the ingestion pipeline's
    /// merge stage.
    pub fn tags(tags: Vec<String>) -> Self {
        Self {
            tags: Some(tags),
            ..Self::default()
        }
    }
}

/// Selection within a user's visible (`deleted=false, hidden=false`) set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFilter {
    pub favorites_only: bool,
}

/// Location of a successfully stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object key inside the bucket, `<millis>-<sanitized-filename>`.
    pub key: String,
    /// Full public URL of the object.
    pub url: String,
}
