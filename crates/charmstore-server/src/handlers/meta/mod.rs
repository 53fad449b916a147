//! Metadata batching engine.
//!
//! A metadata request names one or more facets of a charm or bundle. Facet
//! handlers that share a [`GroupKey`] can be served by one backend call, so
//! the engine:
//!
//! 1. **Groups** requested facets by their handler's key, keeping request order
//! 2. **Dispatches** each group once with every sibling handler and sub-path
//! 3. **Merges** results back under the include strings the caller used,
//!    omitting [`MetaValue::Absent`] results
//!
//! A failing group fails the whole request; no partial group results are
//! reported. Groups may run concurrently without changing the output.

mod engine;
mod handler;
mod types;

pub use engine::MetaEngine;
pub use handler::{AsAny, MetaHandler};
pub use types::{GroupKey, MetaValue, QueryFlags};
