//! Semantic equipment-catalog matching engine.
//!
//! Matches free-text equipment descriptions against a fixed catalog by
//! embedding similarity and returns the closest entries with ranked scores.
//!
//! # Architecture
//!
//! - `catalog`: CSV loading and catalog normalization
//! - `embeddings`: `Embedder` contract and the fastembed implementation
//! - `index`: brute-force vector index over squared L2 distance
//! - `engine`: query/scoring pipeline over catalog + embedder + index
//! - `registry`: once-initialized process-wide engine holder
//! - `config`: engine settings
//!
//! The HTTP surface is deliberately absent: a hosting layer constructs an
//! [`EngineRegistry`] at startup and calls [`EnrichmentEngine::enrich`],
//! [`EnrichmentEngine::statistics`] and [`EnrichmentEngine::get_by_id`] from
//! its handlers. All result and error types serialize with serde.

pub mod catalog;
pub mod config;
pub mod embeddings;
pub mod engine;
pub mod index;
pub mod registry;

#[cfg(test)]
mod testing;

pub use catalog::{Catalog, CatalogEntry, DataLoadError};
pub use config::{EngineSettings, DEFAULT_TOP_K};
pub use embeddings::{Embedder, EmbeddingError, EmbeddingModel};
pub use engine::{
    EngineError, EnrichedMatch, Enrichment, EnrichmentEngine, ErrorBody, QueryError, Statistics,
};
pub use index::{FlatIndex, IndexError, Neighbor};
pub use registry::EngineRegistry;
