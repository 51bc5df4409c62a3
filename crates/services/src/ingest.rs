//! The ingestion pipeline: object upload → baseline tags → persist →
//! vision tagging → merge.
//!
//! Stages 1 and 3 are fatal; the tagging/merge tail is best-effort and never
//! fails an upload that already persisted. A storage object left behind by a
//! stage-3 failure is an accepted inconsistency and is only logged.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};
use uuid::Uuid;

use domains::{
    AppError, ImagePatch, ImageRecord, MetadataStore, NewImage, ObjectStore, Result, VisionTagger,
};

use crate::tags;

/// Drives one upload end-to-end. Stateless across invocations; concurrent
/// ingestions are independent.
#[derive(Clone)]
pub struct IngestionPipeline {
    store: Arc<dyn ObjectStore>,
    meta: Arc<dyn MetadataStore>,
    tagger: Arc<dyn VisionTagger>,
}

impl IngestionPipeline {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        meta: Arc<dyn MetadataStore>,
        tagger: Arc<dyn VisionTagger>,
    ) -> Self {
        Self {
            store,
            meta,
            tagger,
        }
    }

    /// Ingests one file for `owner`. The caller's bearer token is forwarded
    /// unchanged to the vision tagger.
    ///
    /// On success the returned record is persisted and carries at least the
    /// baseline tags; enrichment may or may not have landed, and the caller
    /// cannot tell the difference by design.
    pub async fn ingest(
        &self,
        owner: Uuid,
        bearer: &str,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<ImageRecord> {
        if filename.trim().is_empty() {
            return Err(AppError::Validation("filename must not be empty".into()));
        }
        if data.is_empty() {
            return Err(AppError::Validation("image payload is empty".into()));
        }

        // Stage 1: store the bytes. Fatal on failure, nothing persisted yet.
        let stored = self.store.put(data, filename, content_type).await?;
        debug!(key = %stored.key, "object stored");

        // Stage 2: baseline tags from the filename. Infallible.
        let baseline = tags::baseline_tags(filename);

        // Stage 3: persist the record. Fatal, but the object already exists
        // remotely; surface the failure and leave the orphan to diagnostics.
        let record = match self
            .meta
            .insert(NewImage {
                user_id: owner,
                filename: filename.to_string(),
                url: stored.url.clone(),
                tags: baseline.clone(),
            })
            .await
        {
            Ok(record) => record,
            Err(err) => {
                warn!(key = %stored.key, error = %err, "metadata insert failed after object upload; orphaned object remains");
                return Err(err);
            }
        };

        // Stages 4-5: best-effort enrichment. Any failure here degrades to
        // baseline tags without touching the pipeline outcome.
        let record = self.enrich(record, &baseline, bearer).await;

        info!(id = %record.id, tags = record.tags.len(), "ingestion complete");
        Ok(record)
    }

    async fn enrich(&self, record: ImageRecord, baseline: &[String], bearer: &str) -> ImageRecord {
        let ai_tags = match self.tagger.tag(&record.url, bearer).await {
            Ok(tags) => tags,
            Err(err) => {
                warn!(id = %record.id, error = %err, "vision tagging failed, keeping baseline tags");
                return record;
            }
        };
        if ai_tags.is_empty() {
            return record;
        }

        let merged = tags::merge(baseline.to_vec(), ai_tags);
        match self
            .meta
            .update(record.user_id, record.id, ImagePatch::tags(merged))
            .await
        {
            Ok(updated) => updated,
            Err(err) => {
                // Not retried; the record stays valid with baseline tags.
                warn!(id = %record.id, error = %err, "tag merge update failed, record keeps baseline tags");
                record
            }
        }
    }
}
