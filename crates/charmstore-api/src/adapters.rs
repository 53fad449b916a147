//! Adapters that bridge the storage layer to the routing layer.
//!
//! The routing layer (charmstore-server) resolves ids through the
//! `IdResolver` trait. The storage layer (charmstore-storage) implements
//! `EntityStore` over concrete backends. This module connects the two.

use std::sync::Arc;

use async_trait::async_trait;

use charmstore_domain::CharmId;
use charmstore_server::{IdResolver, RouterResult};
use charmstore_storage::EntityStore;

/// Adapter that implements `IdResolver` using an `EntityStore`.
pub struct EntityStoreResolver<S: EntityStore> {
    store: Arc<S>,
}

impl<S: EntityStore> EntityStoreResolver<S> {
    /// Creates a new adapter wrapping the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: EntityStore> IdResolver for EntityStoreResolver<S> {
    async fn resolve(&self, id: &CharmId) -> RouterResult<CharmId> {
        Ok(self.store.resolve(id).await?)
    }
}
