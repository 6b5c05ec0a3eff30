//! Process-wide engine holder with once-only construction.
//!
//! The registry owns the lazily-built [`EnrichmentEngine`] singleton. The
//! first caller to ask for the engine runs the full construction (catalog
//! load, bulk encode, index build); concurrent callers block on the cell
//! until that construction finishes and then share the same `Arc`. The
//! hosting layer creates one registry at startup and passes it into request
//! handlers; there is no implicit global.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::EngineSettings;
use crate::engine::{EngineError, EnrichmentEngine};

type EngineBuilder = dyn Fn() -> Result<EnrichmentEngine, EngineError> + Send + Sync;

/// Once-initialized holder for the shared enrichment engine.
pub struct EngineRegistry {
    cell: OnceCell<Arc<EnrichmentEngine>>,
    builder: Box<EngineBuilder>,
}

impl EngineRegistry {
    /// Registry that builds the engine from settings on first access.
    pub fn new(settings: EngineSettings) -> Self {
        Self::with_builder(move || EnrichmentEngine::new(&settings))
    }

    /// Registry with an injected constructor. Lets hosts and tests supply
    /// their own embedding provider or catalog source.
    pub fn with_builder<F>(builder: F) -> Self
    where
        F: Fn() -> Result<EnrichmentEngine, EngineError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            builder: Box::new(builder),
        }
    }

    /// Get the shared engine, constructing it on first call.
    ///
    /// Exactly one racer runs the builder; late arrivals block until it
    /// completes. A failed build leaves the registry unconstructed, so the
    /// error propagates to the caller (and a later call may retry).
    pub fn engine(&self) -> Result<Arc<EnrichmentEngine>, EngineError> {
        self.cell
            .get_or_try_init(|| (self.builder)().map(Arc::new))
            .cloned()
    }

    /// Whether the engine has been successfully constructed.
    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Eagerly construct the engine. Hosts call this at startup so a
    /// construction failure aborts boot instead of the first request.
    pub fn warm_up(&self) -> Result<(), EngineError> {
        self.engine().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{stub_engine_builder, StubEmbedder, TEST_CATALOG_CSV};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    #[test]
    fn test_lazy_until_first_access() {
        let registry = EngineRegistry::with_builder(stub_engine_builder());
        assert!(!registry.is_ready());

        let engine = registry.engine().unwrap();
        assert!(registry.is_ready());
        assert!(engine.statistics().total_equipments > 0);
    }

    #[test]
    fn test_same_instance_returned() {
        let registry = EngineRegistry::with_builder(stub_engine_builder());
        let a = registry.engine().unwrap();
        let b = registry.engine().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_warm_up_marks_ready() {
        let registry = EngineRegistry::with_builder(stub_engine_builder());
        registry.warm_up().unwrap();
        assert!(registry.is_ready());
    }

    #[test]
    fn test_failed_build_propagates_and_leaves_unready() {
        let registry = EngineRegistry::with_builder(|| {
            let catalog = crate::catalog::Catalog::from_reader("".as_bytes(), false)?;
            EnrichmentEngine::with_embedder(catalog, Arc::new(StubEmbedder::new()))
        });

        assert!(registry.engine().is_err());
        assert!(!registry.is_ready());
    }

    #[test]
    fn test_concurrent_first_access_builds_exactly_once() {
        static BUILDS: AtomicUsize = AtomicUsize::new(0);
        BUILDS.store(0, Ordering::SeqCst);

        let registry = Arc::new(EngineRegistry::with_builder(|| {
            BUILDS.fetch_add(1, Ordering::SeqCst);
            let catalog =
                crate::catalog::Catalog::from_reader(TEST_CATALOG_CSV.as_bytes(), false)?;
            EnrichmentEngine::with_embedder(catalog, Arc::new(StubEmbedder::new()))
        }));

        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    registry.engine().unwrap().statistics()
                })
            })
            .collect();

        let stats: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
        for s in &stats[1..] {
            assert_eq!(s, &stats[0]);
        }
    }
}
