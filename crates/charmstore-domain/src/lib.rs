//! charmstore-domain: Core identifier and path logic
//!
//! This crate contains the pieces of request routing that need no I/O:
//! - Charm and bundle identifiers (`CharmId`) and their textual grammar
//! - The configurable set of known series used when splitting id paths
//! - Path splitting and handler key computation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │             charmstore-domain                │
//! ├─────────────────────────────────────────────┤
//! │  model/   - CharmId, SeriesSet, id parser   │
//! │  path.rs  - split_path, handler_key         │
//! │  error.rs - DomainError                     │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod model;
pub mod path;

// Re-export commonly used types at the crate root
pub use error::{DomainError, DomainResult};
pub use model::{split_id, CharmId, SeriesSet, BUNDLE_SERIES, DEFAULT_SERIES};
pub use path::{handler_key, split_path};
