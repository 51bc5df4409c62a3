//! # Core Traits (Ports)
//!
//! Adapters implement these traits to be wired into the binary. The metadata
//! store and the vision tagger are external collaborators consumed through
//! these narrow contracts; only the object store is implemented in-house.

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ImageFilter, ImagePatch, ImageRecord, NewImage, StoredObject};

/// Single-object PUT to remote object storage.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `data` under a freshly derived key and returns its location.
    ///
    /// Fails with `NotConfigured` before any network call when credentials
    /// are missing, `Transport` on network failure, and `UpstreamRejection`
    /// on any non-2xx status.
    async fn put(&self, data: Bytes, filename: &str, content_type: &str)
        -> Result<StoredObject>;
}

/// Durable record of images. Listing is restricted to the visible set
/// (`deleted=false, hidden=false`) and ordered most-recent-first.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn insert(&self, image: NewImage) -> Result<ImageRecord>;

    /// Applies a partial update. `NotFound` when the id does not exist or
    /// belongs to a different owner.
    async fn update(&self, owner: Uuid, id: Uuid, patch: ImagePatch) -> Result<ImageRecord>;

    async fn list(&self, owner: Uuid, filter: ImageFilter) -> Result<Vec<ImageRecord>>;
}

/// External vision model that describes an image as keywords.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait VisionTagger: Send + Sync {
    /// Returns descriptive tags for the image at `image_url`, invoked with
    /// the same caller authorization context that initiated the upload.
    /// Returned tags are not yet normalized.
    async fn tag(&self, image_url: &str, bearer: &str) -> Result<Vec<String>>;
}

/// Maps a caller's bearer token to a stable owner identity.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, bearer: &str) -> Result<Uuid>;
}
