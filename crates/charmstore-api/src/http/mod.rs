//! HTTP API.
//!
//! # Endpoints
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | `/<global key>` | any | Registered global handler (longest prefix wins) |
//! | `/meta/<facet>?id=..` | GET | Same facet for several ids, keyed by id |
//! | `/<id>/meta` | GET | Sorted facet names |
//! | `/<id>/meta/any?include=..` | GET | `{"Id", "Meta"}` for the included facets |
//! | `/<id>/meta/<facet>[/..]` | GET | One facet value |
//! | `/<id>/<action>[/..]` | any | Registered id handler |

pub mod registry;
pub mod routes;
pub mod state;

pub use registry::{Handlers, IdHandler};
pub use routes::{create_router, create_router_with_body_limit, DEFAULT_BODY_LIMIT};
pub use state::{AppState, RouterOptions};
