//! In-memory storage implementation.
//!
//! Serves tests and small deployments that load their catalogue from a
//! JSON fixtures file at startup.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use charmstore_domain::CharmId;
use dashmap::DashMap;
use tracing::{debug, instrument};

use crate::entity::Entity;
use crate::error::{StorageError, StorageResult};
use crate::traits::{EntityStore, InterfaceRole};

/// In-memory implementation of EntityStore.
///
/// Resolution and interface queries scan every entity; lookups by resolved
/// id are a single DashMap read.
#[derive(Debug, Default)]
pub struct MemoryEntityStore {
    entities: DashMap<CharmId, Entity>,
}

impl MemoryEntityStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty in-memory store wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Creates a store holding the given entities.
    pub fn with_entities(entities: impl IntoIterator<Item = Entity>) -> StorageResult<Self> {
        let store = Self::new();
        for entity in entities {
            store.insert(entity)?;
        }
        Ok(store)
    }

    /// Creates a store from a JSON file holding an array of entities.
    pub fn from_fixtures(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| StorageError::ConnectionError {
            message: format!("failed to read fixtures {}: {e}", path.display()),
        })?;
        let entities: Vec<Entity> =
            serde_json::from_str(&raw).map_err(|e| StorageError::SerializationError {
                message: format!("invalid fixtures {}: {e}", path.display()),
            })?;
        let count = entities.len();
        let store = Self::with_entities(entities)?;
        debug!(path = %path.display(), count, "loaded entity fixtures");
        Ok(store)
    }

    /// Number of stored entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn insert(&self, entity: Entity) -> StorageResult<()> {
        if !entity.id.is_resolved() {
            return Err(StorageError::InvalidInput {
                message: format!("entity id {} is not fully resolved", entity.id),
            });
        }
        match self.entities.entry(entity.id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(StorageError::DuplicateEntity {
                id: entity.id.to_string(),
            }),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(entity);
                Ok(())
            }
        }
    }
}

/// Reports whether a stored id satisfies every part `partial` specifies.
fn matches_partial(stored: &CharmId, partial: &CharmId) -> bool {
    stored.user == partial.user
        && stored.name == partial.name
        && (partial.series.is_none() || stored.series == partial.series)
        && (partial.revision.is_none() || stored.revision == partial.revision)
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    #[instrument(skip(self), fields(id = %id))]
    async fn resolve(&self, id: &CharmId) -> StorageResult<CharmId> {
        self.entities
            .iter()
            .map(|e| e.key().clone())
            .filter(|stored| matches_partial(stored, id))
            .max_by(|a, b| a.revision.cmp(&b.revision).then_with(|| a.series.cmp(&b.series)))
            .ok_or_else(|| StorageError::EntityNotFound { id: id.to_string() })
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn entity(&self, id: &CharmId) -> StorageResult<Entity> {
        self.entities
            .get(id)
            .map(|e| e.value().clone())
            .ok_or_else(|| StorageError::EntityNotFound { id: id.to_string() })
    }

    async fn entities_with_interface(
        &self,
        interface: &str,
        role: InterfaceRole,
    ) -> StorageResult<Vec<CharmId>> {
        let mut ids: Vec<CharmId> = self
            .entities
            .iter()
            .filter(|e| {
                let declared = match role {
                    InterfaceRole::Provides => e.value().provided_interfaces(),
                    InterfaceRole::Requires => e.value().required_interfaces(),
                };
                declared.contains(&interface)
            })
            .map(|e| e.key().clone())
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn revisions(&self, base: &CharmId) -> StorageResult<Vec<CharmId>> {
        let base = base.base();
        let mut ids: Vec<CharmId> = self
            .entities
            .iter()
            .map(|e| e.key().clone())
            .filter(|stored| matches_partial(stored, &base))
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn add_entity(&self, entity: Entity) -> StorageResult<()> {
        self.insert(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BundleData, CharmData, CharmMeta, RelationSpec};

    fn charm(id: &str, requires: &[&str], provides: &[&str]) -> Entity {
        let mut meta = CharmMeta {
            name: CharmId::parse(id).unwrap().name,
            ..Default::default()
        };
        for iface in requires {
            meta.requires
                .insert(format!("{iface}-rel"), RelationSpec::new(*iface));
        }
        for iface in provides {
            meta.provides
                .insert(format!("{iface}-rel"), RelationSpec::new(*iface));
        }
        Entity::charm(
            CharmId::parse(id).unwrap(),
            "hash",
            1,
            CharmData {
                meta,
                config: None,
                actions: None,
            },
        )
    }

    fn populated() -> MemoryEntityStore {
        MemoryEntityStore::with_entities([
            charm("cs:precise/wordpress-1", &["mysql"], &["http"]),
            charm("cs:trusty/wordpress-2", &["mysql"], &["http"]),
            charm("cs:precise/wordpress-2", &["mysql"], &["http"]),
            charm("cs:trusty/mysql-4", &[], &["mysql"]),
            charm("cs:~bob/trusty/wordpress-9", &[], &[]),
            Entity::bundle(
                CharmId::parse("cs:bundle/wordpress-simple-1").unwrap(),
                "hash",
                1,
                BundleData::default(),
            ),
        ])
        .unwrap()
    }

    // Test: InMemoryStore can be created
    #[tokio::test]
    async fn test_memory_store_can_be_created() {
        let store = MemoryEntityStore::new();
        assert!(store.is_empty());
        let result = store.resolve(&CharmId::new("wordpress")).await;
        assert!(matches!(result, Err(StorageError::EntityNotFound { .. })));
    }

    // Test: Resolution picks the highest revision, then the greatest series
    #[tokio::test]
    async fn test_resolve_prefers_highest_revision_then_series() {
        let store = populated();
        let id = store.resolve(&CharmId::new("wordpress")).await.unwrap();
        assert_eq!(id.to_string(), "cs:trusty/wordpress-2");
    }

    #[tokio::test]
    async fn test_resolve_honours_given_series() {
        let store = populated();
        let id = store
            .resolve(&CharmId::new("wordpress").with_series("precise"))
            .await
            .unwrap();
        assert_eq!(id.to_string(), "cs:precise/wordpress-2");
    }

    #[tokio::test]
    async fn test_resolve_honours_given_revision() {
        let store = populated();
        let id = store
            .resolve(&CharmId::new("wordpress").with_revision(1))
            .await
            .unwrap();
        assert_eq!(id.to_string(), "cs:precise/wordpress-1");
    }

    // Test: Owner is part of identity
    #[tokio::test]
    async fn test_resolve_respects_owner() {
        let store = populated();
        let id = store
            .resolve(&CharmId::new("wordpress").with_user("bob"))
            .await
            .unwrap();
        assert_eq!(id.to_string(), "cs:~bob/trusty/wordpress-9");
        assert!(store
            .resolve(&CharmId::new("mysql").with_user("bob"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_resolve_unknown_is_not_found() {
        let store = populated();
        let result = store
            .resolve(&CharmId::new("wordpress").with_series("utopic"))
            .await;
        assert!(matches!(result, Err(StorageError::EntityNotFound { .. })));
    }

    #[tokio::test]
    async fn test_entity_lookup() {
        let store = populated();
        let id = CharmId::parse("cs:trusty/mysql-4").unwrap();
        let entity = store.entity(&id).await.unwrap();
        assert_eq!(entity.id, id);
        assert!(store.entity(&CharmId::new("mysql")).await.is_err());
    }

    #[tokio::test]
    async fn test_entities_with_interface() {
        let store = populated();
        let requirers = store
            .entities_with_interface("mysql", InterfaceRole::Requires)
            .await
            .unwrap();
        assert_eq!(requirers.len(), 3);
        let providers = store
            .entities_with_interface("mysql", InterfaceRole::Provides)
            .await
            .unwrap();
        assert_eq!(providers, vec![CharmId::parse("cs:trusty/mysql-4").unwrap()]);
    }

    #[tokio::test]
    async fn test_revisions_share_owner_and_name() {
        let store = populated();
        let revs = store
            .revisions(&CharmId::parse("cs:trusty/wordpress-2").unwrap())
            .await
            .unwrap();
        assert_eq!(revs.len(), 3);
        assert!(revs.iter().all(|id| id.user.is_none()));
    }

    // Test: Duplicate and unresolved entities are rejected
    #[tokio::test]
    async fn test_add_entity_validation() {
        let store = populated();
        let dup = charm("cs:trusty/mysql-4", &[], &[]);
        assert!(matches!(
            store.add_entity(dup).await,
            Err(StorageError::DuplicateEntity { .. })
        ));
        let mut unresolved = charm("cs:trusty/mysql-5", &[], &[]);
        unresolved.id = CharmId::new("mysql");
        assert!(matches!(
            store.add_entity(unresolved).await,
            Err(StorageError::InvalidInput { .. })
        ));
    }

    // Test: Shared store sees writes through every Arc
    #[tokio::test]
    async fn test_memory_store_shared() {
        let store = MemoryEntityStore::new_shared();
        store
            .add_entity(charm("cs:trusty/haproxy-1", &[], &["http"]))
            .await
            .unwrap();
        let store2 = Arc::clone(&store);
        let id = store2.resolve(&CharmId::new("haproxy")).await.unwrap();
        assert_eq!(id.revision, Some(1));
    }
}
