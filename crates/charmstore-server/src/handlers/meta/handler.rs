//! The facet handler contract.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use charmstore_domain::CharmId;

use super::types::{GroupKey, MetaValue, QueryFlags};
use crate::error::RouterResult;

/// Upcast to [`Any`] so a group leader can reach its siblings' concrete type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A metadata facet handler that can serve several facet requests in a
/// single batch.
///
/// Handlers whose [`group_key`](MetaHandler::group_key) values are equal are
/// passed together to one [`handle`](MetaHandler::handle) call.
#[async_trait]
pub trait MetaHandler: AsAny + Send + Sync + 'static {
    /// Key used to group this handler with its siblings.
    fn group_key(&self) -> GroupKey;

    /// Returns one result per entry of `paths`, in order.
    ///
    /// `handlers[i]` is the handler registered for the facet whose remaining
    /// sub-path is `paths[i]`; every handler's key equals this one's. A
    /// failure applies to the whole group.
    async fn handle(
        &self,
        handlers: &[Arc<dyn MetaHandler>],
        id: &CharmId,
        paths: &[String],
        flags: &QueryFlags,
    ) -> RouterResult<Vec<MetaValue>>;
}

impl dyn MetaHandler {
    /// Returns the handler as `T` if that is its concrete type.
    pub fn downcast_ref<T: MetaHandler>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }
}
