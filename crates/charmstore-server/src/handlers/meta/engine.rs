//! Metadata engine implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use charmstore_domain::{handler_key, CharmId};
use futures::future::join_all;
use serde_json::{json, Value};
use tracing::debug;

use super::handler::MetaHandler;
use super::types::{GroupKey, MetaValue, QueryFlags};
use crate::error::{RouterError, RouterResult};
use crate::resolver::IdResolver;

/// Facets that share a group key, in the order they were requested.
struct MetaGroup<'a> {
    key: GroupKey,
    handlers: Vec<Arc<dyn MetaHandler>>,
    includes: Vec<&'a str>,
    paths: Vec<String>,
}

/// Serves metadata requests against a fixed table of facet handlers.
///
/// The table maps a facet key to its handler. A key ending in `/` accepts
/// sub-paths, so `charm-related/` serves both `charm-related` and
/// `charm-related/provides`.
pub struct MetaEngine {
    handlers: HashMap<String, Arc<dyn MetaHandler>>,
    concurrent: bool,
}

impl MetaEngine {
    /// Creates an engine over the given facet table.
    ///
    /// With `concurrent` set, independent groups are dispatched together.
    pub fn new(handlers: HashMap<String, Arc<dyn MetaHandler>>, concurrent: bool) -> Self {
        Self {
            handlers,
            concurrent,
        }
    }

    /// Returns the facet table.
    pub fn handlers(&self) -> &HashMap<String, Arc<dyn MetaHandler>> {
        &self.handlers
    }

    /// Finds the handler for a facet key.
    ///
    /// An exact match wins; otherwise a prefix handler registered as
    /// `key/` serves the key with an empty continuation.
    pub fn lookup(&self, key: &str) -> Option<&Arc<dyn MetaHandler>> {
        if key.is_empty() {
            return None;
        }
        self.handlers.get(key).or_else(|| {
            if key.ends_with('/') {
                None
            } else {
                self.handlers.get(&format!("{key}/"))
            }
        })
    }

    /// Returns every registered facet name, sorted, without trailing `/`.
    pub fn meta_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .handlers
            .keys()
            .map(|k| k.trim_end_matches('/').to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Retrieves the metadata named by `includes` for one id.
    ///
    /// The result is keyed by include string. Absent results are left out,
    /// and when an include appears twice the later present result is kept.
    pub async fn get_metadata(
        &self,
        id: &CharmId,
        includes: &[String],
        flags: &QueryFlags,
    ) -> RouterResult<BTreeMap<String, Value>> {
        let groups = self.group_includes(includes)?;

        let group_results: Vec<RouterResult<Vec<MetaValue>>> = if self.concurrent {
            join_all(groups.iter().map(|g| self.dispatch(g, id, flags))).await
        } else {
            let mut results = Vec::with_capacity(groups.len());
            for group in &groups {
                let result = self.dispatch(group, id, flags).await;
                let failed = result.is_err();
                results.push(result);
                if failed {
                    break;
                }
            }
            results
        };

        let mut out = BTreeMap::new();
        for (group, result) in groups.iter().zip(group_results) {
            for (include, value) in group.includes.iter().zip(result?) {
                if let MetaValue::Present(v) = value {
                    out.insert(include.to_string(), v);
                }
            }
        }
        Ok(out)
    }

    /// Groups includes by handler key, preserving first-appearance order.
    fn group_includes<'a>(&self, includes: &'a [String]) -> RouterResult<Vec<MetaGroup<'a>>> {
        let mut groups: Vec<MetaGroup<'a>> = Vec::new();
        let mut key_to_index: HashMap<GroupKey, usize> = HashMap::new();

        for include in includes {
            let (facet_key, path) = handler_key(include);
            let handler = self
                .lookup(facet_key)
                .ok_or_else(|| RouterError::UnrecognizedMetadata {
                    name: include.clone(),
                })?;

            let key = handler.group_key();
            let index = *key_to_index.entry(key.clone()).or_insert_with(|| {
                groups.push(MetaGroup {
                    key,
                    handlers: Vec::new(),
                    includes: Vec::new(),
                    paths: Vec::new(),
                });
                groups.len() - 1
            });
            let group = &mut groups[index];
            group.handlers.push(Arc::clone(handler));
            group.includes.push(include.as_str());
            group.paths.push(path.to_string());
        }
        Ok(groups)
    }

    /// Invokes one group's batch operation.
    async fn dispatch(
        &self,
        group: &MetaGroup<'_>,
        id: &CharmId,
        flags: &QueryFlags,
    ) -> RouterResult<Vec<MetaValue>> {
        debug!(
            group = ?group.key,
            facets = group.paths.len(),
            id = %id,
            "dispatching metadata group"
        );
        // Any member can serve the group; all keys are equal.
        let leader = &group.handlers[0];
        let results = leader
            .handle(&group.handlers, id, &group.paths, flags)
            .await?;
        if results.len() != group.paths.len() {
            return Err(RouterError::internal(format!(
                "metadata handler returned {} results for {} paths",
                results.len(),
                group.paths.len()
            )));
        }
        Ok(results)
    }

    /// Serves a path under `<id>/meta`.
    ///
    /// | path | result |
    /// |------|--------|
    /// | `` | sorted facet names |
    /// | `/any` | `{"Id": .., "Meta": {..}}` for the `include` flags |
    /// | `/<facet>[/..]` | the facet's own value, or `DataNotFound` |
    pub async fn serve_meta(
        &self,
        id: &CharmId,
        path: &str,
        flags: &QueryFlags,
    ) -> RouterResult<Value> {
        let (key, rest) = handler_key(path);
        if key.is_empty() {
            return Ok(json!(self.meta_names()));
        }
        if key == "any" {
            let meta = self
                .get_metadata(id, flags.get_all("include"), flags)
                .await?;
            return Ok(json!({ "Id": id, "Meta": meta }));
        }

        let handler = self
            .lookup(key)
            .ok_or_else(|| RouterError::UnrecognizedMetadata {
                name: path.trim_start_matches('/').to_string(),
            })?;
        let mut results = handler
            .handle(&[Arc::clone(handler)], id, &[rest.to_string()], flags)
            .await?;
        if results.len() != 1 {
            return Err(RouterError::internal(format!(
                "metadata handler returned {} results for 1 path",
                results.len()
            )));
        }
        results
            .pop()
            .and_then(MetaValue::into_option)
            .ok_or(RouterError::DataNotFound)
    }

    /// Serves the same metadata path for several ids at once.
    ///
    /// The result is keyed by each id string exactly as given. Ids that do
    /// not resolve, or that have no data for the path, are left out. Any
    /// other failure aborts the request.
    pub async fn bulk_meta(
        &self,
        resolver: &dyn IdResolver,
        ids: &[String],
        path: &str,
        flags: &QueryFlags,
    ) -> RouterResult<BTreeMap<String, Value>> {
        if ids.is_empty() {
            return Err(RouterError::bad_request("no ids specified in meta request"));
        }

        let mut out = BTreeMap::new();
        for raw in ids {
            let id = CharmId::parse(raw)?;
            let id = match resolver.resolve(&id).await {
                Ok(id) => id,
                Err(e) if e.is_not_found() => {
                    debug!(id = %raw, "omitting unresolved id from bulk metadata");
                    continue;
                }
                Err(e) => return Err(e),
            };
            match self.serve_meta(&id, path, flags).await {
                Ok(value) => {
                    out.insert(raw.clone(), value);
                }
                Err(RouterError::DataNotFound) => {
                    debug!(id = %raw, path, "omitting id without metadata from bulk request");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }
}
