//! Enrichment engine: catalog + embedder + flat index behind one facade.
//!
//! Construction is a single atomic step (load catalog, encode all names,
//! build the index); a partially constructed engine is never exposed. After
//! construction everything reachable from the engine is immutable, so the
//! query operations take `&self` and run concurrently without coordination.

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{Catalog, CatalogEntry, DataLoadError};
use crate::config::EngineSettings;
use crate::embeddings::{Embedder, EmbeddingError, EmbeddingModel};
use crate::index::{FlatIndex, IndexError};

/// Fatal construction errors. Any of these aborts engine construction and,
/// through the registry, keeps the hosting service from becoming ready.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("data load error: {0}")]
    Data(#[from] DataLoadError),

    #[error("model init error: {0}")]
    Model(#[from] EmbeddingError),

    #[error("index build error: {0}")]
    Index(#[from] IndexError),

    #[error("embedding matrix has {vectors} rows for {entries} catalog entries")]
    Alignment { entries: usize, vectors: usize },
}

/// Recoverable per-query conditions, returned as values across the engine
/// boundary rather than propagated as failures.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("empty input")]
    EmptyInput,

    #[error("equipment {id} not found")]
    NotFound { id: usize },

    #[error("internal error: {0}")]
    Internal(String),
}

/// Wire shape for a query error: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl QueryError {
    /// Structured form the hosting layer forwards to clients.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
        }
    }
}

/// One enriched match: a catalog row plus its ranking scores.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedMatch {
    pub domain: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub category: String,
    pub sub_category: String,
    pub name: String,
    pub similarity_score: f32,
    pub distance: f32,
}

/// Full result of an enrichment query.
#[derive(Debug, Clone, Serialize)]
pub struct Enrichment {
    /// The query exactly as received, untrimmed.
    pub input: String,
    /// Matches in ascending-distance order.
    pub results: Vec<EnrichedMatch>,
    pub total_found: usize,
}

/// Descriptive engine statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_equipments: usize,
    pub index_size: usize,
    pub embedding_dimension: usize,
    pub model_name: String,
}

/// Semantic matching engine over the equipment catalog.
pub struct EnrichmentEngine {
    catalog: Catalog,
    embedder: Arc<dyn Embedder>,
    index: FlatIndex,
}

impl EnrichmentEngine {
    /// Build the engine from settings: load the catalog, initialize the
    /// fastembed model, encode every catalog name, build the index.
    pub fn new(settings: &EngineSettings) -> Result<Self, EngineError> {
        let catalog = Catalog::from_path(&settings.catalog_path, settings.catalog_has_headers)?;
        let model = EmbeddingModel::new(
            &settings.model,
            settings.cache_dir.clone(),
            Some(std::time::Duration::from_secs(settings.download_timeout_secs)),
        )?;
        Self::with_embedder(catalog, Arc::new(model))
    }

    /// Build the engine around an already-constructed embedding provider.
    ///
    /// This is the injection seam: hosts that share a provider, and tests
    /// that substitute a deterministic one, come through here. All-or-nothing
    /// like [`EnrichmentEngine::new`].
    pub fn with_embedder(
        catalog: Catalog,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, EngineError> {
        let names = catalog.names();
        log::info!("encoding {} catalog names", names.len());
        let matrix = embedder.embed_batch(&names)?;

        // Row i of the matrix must be catalog entry i; this alignment is the
        // only join key between index hits and catalog rows.
        if matrix.len() != catalog.len() {
            return Err(EngineError::Alignment {
                entries: catalog.len(),
                vectors: matrix.len(),
            });
        }

        let index = FlatIndex::build(matrix)?;
        log::info!("enrichment engine ready: {} equipments indexed", catalog.len());

        Ok(Self {
            catalog,
            embedder,
            index,
        })
    }

    /// Match `query` against the catalog, returning up to `top_k` entries in
    /// ascending-distance order with `similarity_score = 1 / (1 + distance)`.
    ///
    /// A blank query is a recoverable [`QueryError::EmptyInput`]. `top_k`
    /// beyond the catalog size returns as many results as exist; it never
    /// pads and never errors.
    pub fn enrich(&self, query: &str, top_k: usize) -> Result<Enrichment, QueryError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(QueryError::EmptyInput);
        }

        let embedding = self
            .embedder
            .embed(trimmed)
            .map_err(|e| QueryError::Internal(e.to_string()))?;

        // A dimension mismatch here means a construction invariant broke;
        // surface it as an internal error, never a panic.
        let hits = self
            .index
            .search(&embedding, top_k)
            .map_err(|e| QueryError::Internal(e.to_string()))?;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let entry = self.catalog.get(hit.id).ok_or_else(|| {
                QueryError::Internal(format!("index returned unknown id {}", hit.id))
            })?;
            results.push(EnrichedMatch {
                domain: entry.domain.clone(),
                type_: entry.type_.clone(),
                category: entry.category.clone(),
                sub_category: entry.sub_category.clone(),
                name: entry.name.clone(),
                similarity_score: 1.0 / (1.0 + hit.distance),
                distance: hit.distance,
            });
        }

        log::debug!("enrich '{}': {} results", trimmed, results.len());

        Ok(Enrichment {
            input: query.to_string(),
            total_found: results.len(),
            results,
        })
    }

    /// Descriptive statistics; infallible once the engine exists.
    pub fn statistics(&self) -> Statistics {
        Statistics {
            total_equipments: self.catalog.len(),
            index_size: self.index.len(),
            embedding_dimension: self.index.dimensions(),
            model_name: self.embedder.name().to_string(),
        }
    }

    /// Look up a catalog entry by id.
    pub fn get_by_id(&self, id: usize) -> Result<&CatalogEntry, QueryError> {
        self.catalog.get(id).ok_or(QueryError::NotFound { id })
    }
}
