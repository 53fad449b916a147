//! Application state for HTTP handlers.

use std::sync::Arc;

use charmstore_domain::SeriesSet;
use charmstore_server::{IdResolver, MetaEngine};
use charmstore_storage::EntityStore;

use super::registry::{GlobalTable, Handlers, IdTable};
use crate::adapters::EntityStoreResolver;
use crate::handlers::default_handlers;

/// Router settings taken from configuration.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Series tokens recognized while splitting id paths.
    pub series: SeriesSet,
    /// Dispatch independent metadata groups concurrently.
    pub concurrent_meta_groups: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            series: SeriesSet::default(),
            concurrent_meta_groups: true,
        }
    }
}

/// Application state shared across all requests.
///
/// The handler tables are fixed at construction and only read afterwards.
pub struct AppState {
    pub(crate) global: GlobalTable,
    pub(crate) id: IdTable,
    /// The metadata engine over the meta table.
    pub engine: Arc<MetaEngine>,
    /// Resolves partial ids before any id-rooted handler runs.
    pub resolver: Arc<dyn IdResolver>,
    /// Known series used when splitting id paths.
    pub series: SeriesSet,
}

impl AppState {
    /// Creates state from explicit handler tables and resolver.
    pub fn new(handlers: Handlers, resolver: Arc<dyn IdResolver>, options: RouterOptions) -> Self {
        let Handlers { global, id, meta } = handlers;
        Self {
            global: GlobalTable::new(global),
            id: IdTable::new(id),
            engine: Arc::new(MetaEngine::new(meta, options.concurrent_meta_groups)),
            resolver,
            series: options.series,
        }
    }

    /// Creates state serving the built-in handlers over `store`.
    pub fn with_store<S: EntityStore>(store: Arc<S>, options: RouterOptions) -> Self {
        let resolver = Arc::new(EntityStoreResolver::new(Arc::clone(&store)));
        Self::new(default_handlers(store), resolver, options)
    }
}
