//! EntityStore trait definition.

use async_trait::async_trait;
use charmstore_domain::CharmId;

use crate::entity::Entity;
use crate::error::StorageResult;

/// Which side of a relation an interface is declared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceRole {
    Provides,
    Requires,
}

/// Abstract storage interface for charm and bundle entities.
///
/// Implementations must be thread-safe (Send + Sync) and support
/// async operations.
#[async_trait]
pub trait EntityStore: Send + Sync + 'static {
    /// Fills in the series and revision of a partial id.
    ///
    /// Picks the highest revision among matching entities, breaking ties on
    /// the greatest series. A resolved id resolves to itself when an entity
    /// with that exact id exists.
    async fn resolve(&self, id: &CharmId) -> StorageResult<CharmId>;

    /// Returns the entity with the given resolved id.
    async fn entity(&self, id: &CharmId) -> StorageResult<Entity>;

    /// Returns the ids of charms declaring `interface` on the given side,
    /// sorted.
    async fn entities_with_interface(
        &self,
        interface: &str,
        role: InterfaceRole,
    ) -> StorageResult<Vec<CharmId>>;

    /// Returns every stored revision sharing the owner and name of `base`,
    /// sorted.
    async fn revisions(&self, base: &CharmId) -> StorageResult<Vec<CharmId>>;

    /// Adds an entity. Its id must be resolved.
    async fn add_entity(&self, entity: Entity) -> StorageResult<()>;
}
