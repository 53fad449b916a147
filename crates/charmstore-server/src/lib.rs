//! charmstore-server: Routing core and metadata batching
//!
//! This crate contains the transport-agnostic routing layer including:
//! - Metadata batching engine that coalesces facet requests per group
//! - Bulk multi-id metadata retrieval
//! - Router error taxonomy
//! - Configuration management
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │             charmstore-server                │
//! ├─────────────────────────────────────────────┤
//! │  config.rs   - Configuration management     │
//! │  error.rs    - Router error taxonomy        │
//! │  resolver.rs - Id resolution seam           │
//! │  handlers/   - Request handlers             │
//! │    meta/          - Metadata batching       │
//! └─────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod resolver;

// Re-exports for convenience
pub use config::{ConfigLoadError, ServerConfig};
pub use error::{RouterError, RouterResult};
pub use handlers::meta::{GroupKey, MetaEngine, MetaHandler, MetaValue, QueryFlags};
pub use resolver::IdResolver;
