//! Host World Seam
//!
//! Everything the relay needs from the host simulation: block and container
//! queries, a sight-line test, and a capability for spawning/ending ghost
//! entities. Hosts implement these traits; [`memory`] is a self-contained
//! reference implementation.

pub mod memory;

pub use memory::{MemoryContainer, MemoryGhosts, MemoryWorld};

use glam::DVec3;

use crate::core_types::{BlockId, BlockPos, ItemId};

/// One slot's contents. `count == 0` means the slot is empty and `item` is
/// meaningless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemStack {
    pub item: ItemId,
    pub count: u32,
}

impl ItemStack {
    pub const EMPTY: ItemStack = ItemStack { item: 0, count: 0 };

    pub fn new(item: ItemId, count: u32) -> Self {
        Self { item, count }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True when the slot holds this item (empty slots never match)
    #[inline]
    pub fn is_of(&self, item: ItemId) -> bool {
        !self.is_empty() && self.item == item
    }
}

/// Slot storage of a single container.
///
/// Slots are addressed `0..size()`. Other host systems may mutate them
/// between relay ticks, so callers must not cache contents.
pub trait Container {
    /// Number of addressable slots
    fn size(&self) -> usize;

    /// Contents of `slot`. Out-of-range slots read as empty.
    fn stack(&self, slot: usize) -> ItemStack;

    /// Replace the contents of `slot`.
    fn set_stack(&mut self, slot: usize, stack: ItemStack);

    /// Maximum stack size for `item` in this container.
    fn max_stack_size(&self, item: ItemId) -> u32;
}

/// Read/write view of the host world.
pub trait World {
    /// Block at `pos` (air when nothing is there)
    fn block_at(&self, pos: BlockPos) -> BlockId;

    /// Storage container at `pos`, if any
    fn container(&self, pos: BlockPos) -> Option<&dyn Container>;

    /// Mutable storage container at `pos`, if any
    fn container_mut(&mut self, pos: BlockPos) -> Option<&mut dyn Container>;

    /// Straight-line collision test from `from` to `to`.
    ///
    /// Returns the first obstruction point, or `None` when the segment is
    /// clear. Hosts whose ray query always reports a hit may return `to`
    /// itself for a clear segment.
    fn raycast(&self, from: DVec3, to: DVec3) -> Option<DVec3>;
}

/// Host-side identifier of a spawned ghost entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GhostHandle(pub u64);

/// Request for one ghost: a single unit of `item` flying from `position`
/// with a constant per-tick `velocity`.
///
/// The host must spawn it without gravity or collisions, invulnerable, and
/// not collectable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostSpawn {
    pub item: ItemId,
    pub position: DVec3,
    pub velocity: DVec3,
}

/// Capability for the purely visual ghost entities.
pub trait GhostSpawner {
    /// Spawn a ghost and return its handle
    fn spawn_ghost(&mut self, spawn: GhostSpawn) -> GhostHandle;

    /// Remove a ghost immediately. Unknown handles are ignored.
    fn end_ghost(&mut self, handle: GhostHandle);
}


#[cfg(test)]
pub use mock::MockGhosts;
