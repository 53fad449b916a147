//! Handler registry.
//!
//! Three tables are fixed when the router is built:
//!
//! - `global` - paths not rooted at an id, matched by longest prefix
//! - `id` - actions on a single id, keyed by the first path element after it
//! - `meta` - metadata facets served under `<id>/meta` and `meta/`
//!
//! A key ending in `/` accepts longer paths; any other key matches only
//! itself.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::routing::MethodRouter;
use charmstore_domain::CharmId;
use charmstore_server::{MetaHandler, RouterResult};

/// Handles a request rooted at a resolved id.
///
/// The request path holds what follows the handler's key, with a leading
/// `/` (or just `/` when nothing follows).
#[async_trait]
pub trait IdHandler: Send + Sync + 'static {
    async fn handle(&self, id: &CharmId, request: Request<Body>) -> RouterResult<Response>;
}

/// The routing tables.
#[derive(Default)]
pub struct Handlers {
    /// Handlers for paths not tied to an id.
    pub global: HashMap<String, MethodRouter>,
    /// Handlers for actions on an id.
    pub id: HashMap<String, Arc<dyn IdHandler>>,
    /// Metadata facet handlers.
    pub meta: HashMap<String, Arc<dyn MetaHandler>>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global(mut self, path: impl Into<String>, handler: MethodRouter) -> Self {
        self.global.insert(path.into(), handler);
        self
    }

    pub fn with_id(mut self, key: impl Into<String>, handler: Arc<dyn IdHandler>) -> Self {
        self.id.insert(key.into(), handler);
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, handler: Arc<dyn MetaHandler>) -> Self {
        self.meta.insert(key.into(), handler);
        self
    }
}

/// Reports whether a registered key matches `path`.
pub(crate) fn key_matches(key: &str, path: &str) -> bool {
    if key.ends_with('/') {
        path.starts_with(key)
    } else {
        path == key
    }
}

/// The global routing table, split from the id table for dispatch.
pub(crate) struct GlobalTable(HashMap<String, MethodRouter>);

impl GlobalTable {
    pub(crate) fn new(handlers: HashMap<String, MethodRouter>) -> Self {
        Self(handlers)
    }

    /// Returns the longest key matching `path` (no leading `/`).
    pub(crate) fn longest_match(&self, path: &str) -> Option<(&str, &MethodRouter)> {
        self.0
            .iter()
            .filter(|(key, _)| key_matches(key, path))
            .max_by_key(|(key, _)| key.len())
            .map(|(key, handler)| (key.as_str(), handler))
    }
}

/// The id action table.
pub(crate) struct IdTable(HashMap<String, Arc<dyn IdHandler>>);

impl IdTable {
    pub(crate) fn new(handlers: HashMap<String, Arc<dyn IdHandler>>) -> Self {
        Self(handlers)
    }

    /// Finds the handler for `key`, falling back to `key/`.
    pub(crate) fn lookup(&self, key: &str) -> Option<&Arc<dyn IdHandler>> {
        self.0.get(key).or_else(|| {
            if key.ends_with('/') {
                None
            } else {
                self.0.get(&format!("{key}/"))
            }
        })
    }
}
