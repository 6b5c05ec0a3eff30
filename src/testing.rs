//! Shared test fixtures: an in-memory catalog and a deterministic embedder
//! that never touches the network.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::embeddings::{Embedder, EmbeddingError};
use crate::engine::{EngineError, EnrichmentEngine};

/// Small headerless catalog used across the engine and registry tests.
pub const TEST_CATALOG_CSV: &str = "\
HVAC,Boiler,Gas,2000W
HVAC,Boiler,Electric,1500W
HVAC,Radiator,Electric,500W
HVAC,Air Conditioner,Mobile,
Power,Generator,Diesel,5kW
";

const STUB_DIMENSIONS: usize = 16;

/// Deterministic stand-in for the embedding model.
///
/// Each output component is a hash of (component index, text), so equal texts
/// map to equal vectors and distinct texts to (practically always) distinct
/// vectors. No semantic structure, which is all the engine contract needs.
pub struct StubEmbedder {
    /// When set, drops the last row of every batch to simulate a provider
    /// that violates the alignment contract.
    truncate_batches: bool,
}

impl StubEmbedder {
    pub fn new() -> Self {
        Self {
            truncate_batches: false,
        }
    }

    pub fn short_by_one() -> Self {
        Self {
            truncate_batches: true,
        }
    }

    fn embed_one(text: &str) -> Vec<f32> {
        (0..STUB_DIMENSIONS)
            .map(|component| {
                let mut hasher = std::collections::hash_map::DefaultHasher::new();
                component.hash(&mut hasher);
                text.hash(&mut hasher);
                (hasher.finish() % 1000) as f32 / 1000.0
            })
            .collect()
    }
}

impl Embedder for StubEmbedder {
    fn name(&self) -> &str {
        "stub-embedder"
    }

    fn dimensions(&self) -> usize {
        STUB_DIMENSIONS
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut matrix: Vec<Vec<f32>> = texts.iter().map(|t| Self::embed_one(t)).collect();
        if self.truncate_batches {
            matrix.pop();
        }
        Ok(matrix)
    }
}

/// Engine over [`TEST_CATALOG_CSV`] with a [`StubEmbedder`].
pub fn stub_engine() -> EnrichmentEngine {
    let catalog = Catalog::from_reader(TEST_CATALOG_CSV.as_bytes(), false).unwrap();
    EnrichmentEngine::with_embedder(catalog, Arc::new(StubEmbedder::new())).unwrap()
}

/// Builder closure for registry tests.
pub fn stub_engine_builder(
) -> impl Fn() -> Result<EnrichmentEngine, EngineError> + Send + Sync + 'static {
    || {
        let catalog = Catalog::from_reader(TEST_CATALOG_CSV.as_bytes(), false)?;
        EnrichmentEngine::with_embedder(catalog, Arc::new(StubEmbedder::new()))
    }
}
