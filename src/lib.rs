//! Dropbox Relay - line-of-sight item transfer between containers
//!
//! A container sitting on the marker block becomes a dropbox: closing it
//! sends its contents, one unit per cooldown, to the containers it can see
//! that already hold the same items.
//!
//! # Modules
//!
//! - [`core_types`] - Block/item ids and grid positions
//! - [`config`] - YAML application and relay configuration
//! - [`logging`] - tracing subscriber setup
//! - [`world`] - Host seam (world, containers, ghost spawner) and an in-memory host
//! - [`relay`] - Resolver, allocator, slot/transfer jobs and the coordinator

// Core types - must be first!
pub mod core_types;

pub mod config;
pub mod logging;
pub mod relay;
pub mod world;

// Convenient re-exports at crate root
pub use config::{AppConfig, RelayConfig};
pub use core_types::{BlockId, BlockPos, ItemId, Tick};
pub use relay::{
    AllocationPolicy, JobId, JobState, RelayError, RelayStats, TransferCoordinator, VisibleTarget,
};
pub use world::{Container, GhostHandle, GhostSpawn, GhostSpawner, ItemStack, World};
