//! Facets read from the stored entity document.
//!
//! Every facet here shares the `entity` group key, so any mix of them costs
//! a single `entity()` lookup per id.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use charmstore_domain::CharmId;
use charmstore_server::{GroupKey, MetaHandler, MetaValue, QueryFlags, RouterError, RouterResult};
use charmstore_storage::{Entity, EntityStore};

/// Computes one facet value from an entity.
pub type EntityExtractor = fn(&Entity, &str, &QueryFlags) -> RouterResult<MetaValue>;

/// A facet backed by the entity document.
pub struct EntityFacet<S: EntityStore> {
    store: Arc<S>,
    extract: EntityExtractor,
}

impl<S: EntityStore> EntityFacet<S> {
    pub fn new(store: Arc<S>, extract: EntityExtractor) -> Self {
        Self { store, extract }
    }
}

#[async_trait]
impl<S: EntityStore> MetaHandler for EntityFacet<S> {
    fn group_key(&self) -> GroupKey {
        GroupKey::named("entity")
    }

    async fn handle(
        &self,
        handlers: &[Arc<dyn MetaHandler>],
        id: &CharmId,
        paths: &[String],
        flags: &QueryFlags,
    ) -> RouterResult<Vec<MetaValue>> {
        let entity = self.store.entity(id).await?;
        handlers
            .iter()
            .zip(paths)
            .map(|(handler, path)| {
                let facet = handler.downcast_ref::<EntityFacet<S>>().ok_or_else(|| {
                    RouterError::internal("entity group holds a foreign handler")
                })?;
                (facet.extract)(&entity, path, flags)
            })
            .collect()
    }
}

/// Returns `(key, extractor)` pairs for every entity facet.
pub fn entity_facets() -> Vec<(&'static str, EntityExtractor)> {
    vec![
        ("archive-size", archive_size),
        ("hash", hash),
        ("charm-metadata", charm_metadata),
        ("charm-config", charm_config),
        ("charm-actions", charm_actions),
        ("bundle-metadata", bundle_metadata),
        ("bundle-unit-count", bundle_unit_count),
        ("bundle-machine-count", bundle_machine_count),
    ]
}

fn archive_size(entity: &Entity, _: &str, _: &QueryFlags) -> RouterResult<MetaValue> {
    MetaValue::present(json!({ "Size": entity.size }))
}

fn hash(entity: &Entity, _: &str, _: &QueryFlags) -> RouterResult<MetaValue> {
    MetaValue::present(json!({ "Sum": entity.blob_hash }))
}

fn charm_metadata(entity: &Entity, _: &str, _: &QueryFlags) -> RouterResult<MetaValue> {
    match &entity.charm {
        Some(charm) => MetaValue::present(&charm.meta),
        None => Ok(MetaValue::Absent),
    }
}

fn charm_config(entity: &Entity, _: &str, _: &QueryFlags) -> RouterResult<MetaValue> {
    match entity.charm.as_ref().and_then(|c| c.config.as_ref()) {
        Some(options) => MetaValue::present(json!({ "Options": options })),
        None => Ok(MetaValue::Absent),
    }
}

fn charm_actions(entity: &Entity, _: &str, _: &QueryFlags) -> RouterResult<MetaValue> {
    match entity.charm.as_ref().and_then(|c| c.actions.as_ref()) {
        Some(actions) => MetaValue::present(json!({ "ActionSpecs": actions })),
        None => Ok(MetaValue::Absent),
    }
}

fn bundle_metadata(entity: &Entity, _: &str, _: &QueryFlags) -> RouterResult<MetaValue> {
    match &entity.bundle {
        Some(bundle) => MetaValue::present(bundle),
        None => Ok(MetaValue::Absent),
    }
}

fn bundle_unit_count(entity: &Entity, _: &str, _: &QueryFlags) -> RouterResult<MetaValue> {
    match &entity.bundle {
        Some(bundle) => MetaValue::present(json!({ "Count": bundle.unit_count() })),
        None => Ok(MetaValue::Absent),
    }
}

fn bundle_machine_count(entity: &Entity, _: &str, _: &QueryFlags) -> RouterResult<MetaValue> {
    match &entity.bundle {
        Some(bundle) => MetaValue::present(json!({ "Count": bundle.machine_count() })),
        None => Ok(MetaValue::Absent),
    }
}
