//! Id resolution seam between routing and storage.

use async_trait::async_trait;
use charmstore_domain::CharmId;

use crate::error::RouterResult;

/// Fills in the unresolved parts of a charm or bundle id.
///
/// Implementations return a fully resolved copy of `id`, or
/// [`RouterError::NotFound`](crate::RouterError::NotFound) when nothing
/// matches.
#[async_trait]
pub trait IdResolver: Send + Sync + 'static {
    async fn resolve(&self, id: &CharmId) -> RouterResult<CharmId>;
}
