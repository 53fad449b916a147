//! Facets computed from the id alone.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use charmstore_domain::CharmId;
use charmstore_server::{GroupKey, MetaHandler, MetaValue, QueryFlags, RouterError, RouterResult};

type IdExtractor = fn(&CharmId) -> MetaValue;

/// A facet derived from the resolved id with no backend call.
pub struct IdFacet {
    extract: IdExtractor,
}

#[async_trait]
impl MetaHandler for IdFacet {
    fn group_key(&self) -> GroupKey {
        GroupKey::named("id")
    }

    async fn handle(
        &self,
        handlers: &[Arc<dyn MetaHandler>],
        id: &CharmId,
        _paths: &[String],
        _flags: &QueryFlags,
    ) -> RouterResult<Vec<MetaValue>> {
        handlers
            .iter()
            .map(|handler| {
                handler
                    .downcast_ref::<IdFacet>()
                    .map(|facet| (facet.extract)(id))
                    .ok_or_else(|| RouterError::internal("id group holds a foreign handler"))
            })
            .collect()
    }
}

/// Returns the id facets keyed by name.
pub fn id_facets() -> Vec<(&'static str, IdFacet)> {
    let facets: [(&'static str, IdExtractor); 5] = [
        ("id", |id| MetaValue::Present(json!({ "Id": id }))),
        ("id-name", |id| MetaValue::Present(json!({ "Name": id.name }))),
        ("id-revision", |id| {
            MetaValue::Present(json!({ "Revision": id.revision }))
        }),
        ("id-series", |id| MetaValue::Present(json!({ "Series": id.series }))),
        ("id-user", |id| match &id.user {
            Some(user) => MetaValue::Present(json!({ "User": user })),
            None => MetaValue::Absent,
        }),
    ];
    facets
        .into_iter()
        .map(|(name, extract)| (name, IdFacet { extract }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use charmstore_server::MetaEngine;
    use std::collections::HashMap;

    fn engine() -> MetaEngine {
        let handlers: HashMap<String, Arc<dyn MetaHandler>> = id_facets()
            .into_iter()
            .map(|(name, facet)| (name.to_string(), Arc::new(facet) as Arc<dyn MetaHandler>))
            .collect();
        MetaEngine::new(handlers, false)
    }

    #[tokio::test]
    async fn test_id_facets_batch_into_one_group() {
        let id = CharmId::parse("cs:~bob/trusty/wordpress-3").unwrap();
        let includes: Vec<String> = ["id", "id-name", "id-revision", "id-series", "id-user"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let meta = engine()
            .get_metadata(&id, &includes, &QueryFlags::new())
            .await
            .unwrap();

        assert_eq!(meta["id"], json!({"Id": "cs:~bob/trusty/wordpress-3"}));
        assert_eq!(meta["id-name"], json!({"Name": "wordpress"}));
        assert_eq!(meta["id-revision"], json!({"Revision": 3}));
        assert_eq!(meta["id-series"], json!({"Series": "trusty"}));
        assert_eq!(meta["id-user"], json!({"User": "bob"}));
    }

    #[tokio::test]
    async fn test_id_user_absent_without_owner() {
        let id = CharmId::parse("cs:trusty/wordpress-3").unwrap();
        let err = engine()
            .serve_meta(&id, "/id-user", &QueryFlags::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RouterError::DataNotFound));
    }
}
