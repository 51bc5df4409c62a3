//! In-memory `MetadataStore` for wiring and tests.
//!
//! The durable store is an external collaborator; this adapter exists so the
//! service runs self-contained and so pipeline tests have a real store with
//! real visibility filtering and ordering.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use domains::{
    AppError, ImageFilter, ImagePatch, ImageRecord, MetadataStore, NewImage, Result,
};

#[derive(Default)]
pub struct InMemoryMetadataStore {
    records: DashMap<Uuid, ImageRecord>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn insert(&self, image: NewImage) -> Result<ImageRecord> {
        let record = ImageRecord {
            id: Uuid::now_v7(),
            user_id: image.user_id,
            filename: image.filename,
            url: image.url,
            tags: image.tags,
            is_favorite: false,
            hidden: false,
            deleted: false,
            created_at: Utc::now(),
        };
        self.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, owner: Uuid, id: Uuid, patch: ImagePatch) -> Result<ImageRecord> {
        let mut entry = self
            .records
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("image".into(), id.to_string()))?;
        if entry.user_id != owner {
            // Foreign records are indistinguishable from absent ones.
            return Err(AppError::NotFound("image".into(), id.to_string()));
        }
        if let Some(filename) = patch.filename {
            entry.filename = filename;
        }
        if let Some(tags) = patch.tags {
            entry.tags = tags;
        }
        if let Some(is_favorite) = patch.is_favorite {
            entry.is_favorite = is_favorite;
        }
        if let Some(hidden) = patch.hidden {
            entry.hidden = hidden;
        }
        if let Some(deleted) = patch.deleted {
            entry.deleted = deleted;
        }
        Ok(entry.clone())
    }

    async fn list(&self, owner: Uuid, filter: ImageFilter) -> Result<Vec<ImageRecord>> {
        let mut records: Vec<ImageRecord> = self
            .records
            .iter()
            .filter(|entry| {
                entry.user_id == owner
                    && !entry.deleted
                    && !entry.hidden
                    && (!filter.favorites_only || entry.is_favorite)
            })
            .map(|entry| entry.clone())
            .collect();
        // Most-recent-first; v7 ids break created_at ties in insert order.
        records.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(records)
    }
}
