//! picstash/crates/storage-adapters/src/lib.rs
//!
//! Edge implementations of the `domains` ports: the hand-rolled SigV4
//! signer and S3 object store, the in-memory metadata store, and the
//! OpenAI-backed vision tagger.

pub mod memory;
pub mod s3;
pub mod sigv4;
pub mod vision;

pub use memory::InMemoryMetadataStore;
pub use s3::{S3Config, S3ObjectStore};
pub use vision::{OpenAiVisionTagger, VisionConfig};
