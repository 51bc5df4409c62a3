//! Shared fixtures for the cross-crate tests.

use bytes::Bytes;
use domains::StoredObject;

/// A small, valid-enough JPEG payload for upload tests.
pub fn jpeg_bytes() -> Bytes {
    Bytes::from_static(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46])
}

pub fn stored_object(key: &str) -> StoredObject {
    StoredObject {
        key: key.to_string(),
        url: format!("https://pics.s3.us-east-1.amazonaws.com/{key}"),
    }
}
