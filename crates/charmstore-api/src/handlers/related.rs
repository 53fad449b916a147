//! The `charm-related` facet.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use charmstore_domain::CharmId;
use charmstore_server::{GroupKey, MetaHandler, MetaValue, QueryFlags, RouterError, RouterResult};
use charmstore_storage::{EntityStore, InterfaceRole};

#[derive(Debug, Serialize)]
struct RelatedItem {
    #[serde(rename = "Id")]
    id: CharmId,
}

type RelatedMap = BTreeMap<String, Vec<RelatedItem>>;

#[derive(Debug, Default, Serialize)]
struct Related {
    #[serde(rename = "Provides", skip_serializing_if = "BTreeMap::is_empty")]
    provides: RelatedMap,
    #[serde(rename = "Requires", skip_serializing_if = "BTreeMap::is_empty")]
    requires: RelatedMap,
}

/// Charms that can be related to this one.
///
/// `Provides` lists, per interface this charm requires, the charms that
/// provide it. `Requires` lists, per interface this charm provides, the
/// charms that require it. Sub-paths `/provides` and `/requires` select one
/// half.
pub struct RelatedFacet<S: EntityStore> {
    store: Arc<S>,
}

impl<S: EntityStore> RelatedFacet<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn related(&self, id: &CharmId) -> RouterResult<Related> {
        let entity = self.store.entity(id).await?;
        Ok(Related {
            provides: self
                .counterparts(id, &entity.required_interfaces(), InterfaceRole::Provides)
                .await?,
            requires: self
                .counterparts(id, &entity.provided_interfaces(), InterfaceRole::Requires)
                .await?,
        })
    }

    async fn counterparts(
        &self,
        id: &CharmId,
        interfaces: &[&str],
        role: InterfaceRole,
    ) -> RouterResult<RelatedMap> {
        let mut out = RelatedMap::new();
        for interface in interfaces {
            let items: Vec<RelatedItem> = self
                .store
                .entities_with_interface(interface, role)
                .await?
                .into_iter()
                .filter(|other| other != id)
                .map(|other| RelatedItem { id: other })
                .collect();
            if !items.is_empty() {
                out.insert(interface.to_string(), items);
            }
        }
        Ok(out)
    }
}

fn non_empty<T: Serialize>(map: &RelatedMap, value: T) -> RouterResult<MetaValue> {
    if map.is_empty() {
        Ok(MetaValue::Absent)
    } else {
        MetaValue::present(value)
    }
}

#[async_trait]
impl<S: EntityStore> MetaHandler for RelatedFacet<S> {
    fn group_key(&self) -> GroupKey {
        GroupKey::named("related")
    }

    async fn handle(
        &self,
        _handlers: &[Arc<dyn MetaHandler>],
        id: &CharmId,
        paths: &[String],
        _flags: &QueryFlags,
    ) -> RouterResult<Vec<MetaValue>> {
        let related = self.related(id).await?;
        paths
            .iter()
            .map(|path| match path.as_str() {
                "" => {
                    if related.provides.is_empty() && related.requires.is_empty() {
                        Ok(MetaValue::Absent)
                    } else {
                        MetaValue::present(&related)
                    }
                }
                "/provides" => non_empty(&related.provides, &related.provides),
                "/requires" => non_empty(&related.requires, &related.requires),
                _ => Err(RouterError::not_found()),
            })
            .collect()
    }
}
