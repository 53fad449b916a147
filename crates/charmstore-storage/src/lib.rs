//! charmstore-storage: Entity store abstraction layer
//!
//! This crate provides the storage abstraction used by the router, including:
//! - EntityStore trait for id resolution and entity lookup
//! - The entity document model for charms and bundles
//! - In-memory implementation for tests and fixture-backed deployments
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            charmstore-storage                │
//! ├─────────────────────────────────────────────┤
//! │  traits.rs  - EntityStore trait             │
//! │  entity.rs  - Entity document model         │
//! │  memory.rs  - In-memory implementation      │
//! └─────────────────────────────────────────────┘
//! ```

pub mod entity;
pub mod error;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use entity::{
    ActionSpec, BundleData, CharmData, CharmMeta, ConfigOption, Entity, MachineSpec, RelationSpec,
    ServiceSpec,
};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryEntityStore;
pub use traits::{EntityStore, InterfaceRole};
