//! Built-in handlers backed by an `EntityStore`.
//!
//! | Table | Key | Handler |
//! |-------|-----|---------|
//! | global | `debug/info` | service name and version |
//! | global | `health` | liveness |
//! | id | `expand-id` | [`ExpandId`] |
//! | meta | entity facets | [`EntityFacet`], group `entity` |
//! | meta | `id*` | [`IdFacet`], group `id` |
//! | meta | `charm-related/` | [`RelatedFacet`], group `related` |

mod entity;
mod expand;
mod id;
mod related;

use std::sync::Arc;

use axum::response::Json;
use axum::routing::get;
use serde_json::{json, Value};

use charmstore_storage::EntityStore;

use crate::http::Handlers;

pub use entity::{entity_facets, EntityExtractor, EntityFacet};
pub use expand::ExpandId;
pub use id::{id_facets, IdFacet};
pub use related::RelatedFacet;

/// Builds the handler tables served by the `charmstore` binary.
pub fn default_handlers<S: EntityStore>(store: Arc<S>) -> Handlers {
    let mut handlers = Handlers::new()
        .with_global("debug/info", get(debug_info))
        .with_global("health", get(health_check))
        .with_id("expand-id", Arc::new(ExpandId::new(Arc::clone(&store))))
        .with_meta(
            "charm-related/",
            Arc::new(RelatedFacet::new(Arc::clone(&store))),
        );

    for (name, extract) in entity_facets() {
        handlers = handlers.with_meta(name, Arc::new(EntityFacet::new(Arc::clone(&store), extract)));
    }
    for (name, facet) in id_facets() {
        handlers = handlers.with_meta(name, Arc::new(facet));
    }
    handlers
}

async fn debug_info() -> Json<Value> {
    Json(json!({
        "Name": env!("CARGO_PKG_NAME"),
        "Version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
