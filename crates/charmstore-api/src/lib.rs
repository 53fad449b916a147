//! charmstore-api: HTTP layer
//!
//! This crate provides the HTTP surface of the charm store:
//! - Handler registry and request dispatch via Axum
//! - Built-in metadata facets and id actions backed by an `EntityStore`
//! - Error envelope, middleware and logging setup
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               charmstore-api                 │
//! ├─────────────────────────────────────────────┤
//! │  http/          - Registry, dispatch, state │
//! │  handlers/      - Built-in handlers         │
//! │  errors.rs      - {"Message","Code"} body   │
//! │  adapters.rs    - EntityStore -> resolver   │
//! │  middleware/    - Request id, access log    │
//! │  observability/ - Log subscriber setup      │
//! └─────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod errors;
pub mod handlers;
pub mod http;
pub mod middleware;
pub mod observability;

pub use errors::ApiError;
