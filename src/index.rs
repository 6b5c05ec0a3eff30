//! In-memory brute-force vector index over squared Euclidean distance.
//!
//! Built once from the catalog's embedding matrix and read-only afterwards.
//! Row position in the matrix is the vector id, which by construction equals
//! the catalog entry id.

use serde::Serialize;

/// A single nearest-neighbor hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    /// Row id of the stored vector (= catalog entry id).
    pub id: usize,
    /// Squared L2 distance to the query.
    pub distance: f32,
}

/// Flat (exhaustive) nearest-neighbor index.
///
/// Every search compares the query against all stored vectors; no
/// approximation, no pruning. Results are fully deterministic: ascending
/// distance, ties broken by ascending id.
pub struct FlatIndex {
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
}

/// Errors that can occur while building or querying the index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("cannot build an index from an empty vector set")]
    Empty,

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

impl FlatIndex {
    /// Build the index from an N×D matrix.
    ///
    /// The dimension D is fixed from the first row; an empty matrix or a
    /// ragged row fails the build.
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self, IndexError> {
        let dimensions = match vectors.first() {
            Some(first) => first.len(),
            None => return Err(IndexError::Empty),
        };

        for row in &vectors {
            if row.len() != dimensions {
                return Err(IndexError::DimensionMismatch {
                    expected: dimensions,
                    got: row.len(),
                });
            }
        }

        log::info!(
            "flat index built with {} vectors, dimension {}",
            vectors.len(),
            dimensions
        );

        Ok(Self {
            vectors,
            dimensions,
        })
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Fixed vector dimension D.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Return the `min(k, N)` nearest stored vectors to `query`.
    ///
    /// Ordered by ascending squared L2 distance; equal distances order by
    /// ascending id so results are reproducible across runs.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        if query.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                got: query.len(),
            });
        }

        let mut hits: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(id, row)| Neighbor {
                id,
                distance: squared_l2(query, row),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));
        hits.truncate(k);

        Ok(hits)
    }
}

/// Squared L2 distance between two equal-length vectors.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
