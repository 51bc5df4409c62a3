//! picstash/crates/services/src/lib.rs
//!
//! Use-case layer: the ingestion pipeline, the search matcher, and the tag
//! derivation rules they share. Everything here talks to the outside world
//! through the port traits in `domains`.

pub mod ingest;
pub mod search;
pub mod tags;

pub use ingest::IngestionPipeline;
pub use search::SearchResults;
