//! In-memory reference host
//!
//! A sparse voxel grid with chest-like containers and a ghost registry.
//! Backs the demo binary and the scenario tests; real hosts implement the
//! [`World`] and [`GhostSpawner`] traits over their own simulation.

use glam::DVec3;
use rustc_hash::FxHashMap;

use super::{Container, GhostHandle, GhostSpawn, GhostSpawner, ItemStack, World};
use crate::core_types::{BlockId, BlockPos, ItemId, blocks};

/// Stack limit for items without an explicit override
pub const DEFAULT_MAX_STACK: u32 = 64;

/// Default chest size (single chest)
pub const CHEST_SLOTS: usize = 27;

/// Sampling step for the reference sight-line test, in blocks
const RAY_STEP: f64 = 0.05;

/// Fixed-size slot array with per-item stack limits.
#[derive(Debug, Clone)]
pub struct MemoryContainer {
    slots: Vec<ItemStack>,
    limits: FxHashMap<ItemId, u32>,
}

impl MemoryContainer {
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![ItemStack::EMPTY; size],
            limits: FxHashMap::default(),
        }
    }

    /// Build a container from explicit slot contents
    pub fn with_slots(slots: Vec<ItemStack>) -> Self {
        Self {
            slots,
            limits: FxHashMap::default(),
        }
    }

    /// Override the stack limit of one item
    pub fn with_limit(mut self, item: ItemId, max: u32) -> Self {
        self.limits.insert(item, max);
        self
    }

    pub fn slots(&self) -> &[ItemStack] {
        &self.slots
    }

    /// Total units of `item` across all slots
    pub fn count_of(&self, item: ItemId) -> u64 {
        self.slots
            .iter()
            .filter(|s| s.is_of(item))
            .map(|s| s.count as u64)
            .sum()
    }
}

impl Container for MemoryContainer {
    fn size(&self) -> usize {
        self.slots.len()
    }

    fn stack(&self, slot: usize) -> ItemStack {
        self.slots.get(slot).copied().unwrap_or(ItemStack::EMPTY)
    }

    fn set_stack(&mut self, slot: usize, stack: ItemStack) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = if stack.count == 0 {
                ItemStack::EMPTY
            } else {
                stack
            };
        }
    }

    fn max_stack_size(&self, item: ItemId) -> u32 {
        self.limits.get(&item).copied().unwrap_or(DEFAULT_MAX_STACK)
    }
}

/// Sparse block grid plus containers. Every non-air block is solid.
#[derive(Debug, Default)]
pub struct MemoryWorld {
    blocks: FxHashMap<BlockPos, BlockId>,
    containers: FxHashMap<BlockPos, MemoryContainer>,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a block. Placing air removes any container at `pos`.
    pub fn set_block(&mut self, pos: BlockPos, block: BlockId) {
        if block == blocks::AIR {
            self.blocks.remove(&pos);
            self.containers.remove(&pos);
        } else {
            self.blocks.insert(pos, block);
        }
    }

    /// Place a chest block holding `container`
    pub fn place_container(&mut self, pos: BlockPos, container: MemoryContainer) {
        self.blocks.insert(pos, blocks::CHEST);
        self.containers.insert(pos, container);
    }

    /// Place a chest on top of the marker block, making it a relay source
    pub fn place_source(&mut self, pos: BlockPos, marker: BlockId, container: MemoryContainer) {
        self.set_block(pos + crate::core_types::DOWN, marker);
        self.place_container(pos, container);
    }

    pub fn memory_container(&self, pos: BlockPos) -> Option<&MemoryContainer> {
        self.containers.get(&pos)
    }

    pub fn memory_container_mut(&mut self, pos: BlockPos) -> Option<&mut MemoryContainer> {
        self.containers.get_mut(&pos)
    }

    fn is_solid(&self, pos: BlockPos) -> bool {
        self.blocks
            .get(&pos)
            .is_some_and(|&block| block != blocks::AIR)
    }
}

impl World for MemoryWorld {
    fn block_at(&self, pos: BlockPos) -> BlockId {
        self.blocks.get(&pos).copied().unwrap_or(blocks::AIR)
    }

    fn container(&self, pos: BlockPos) -> Option<&dyn Container> {
        self.containers.get(&pos).map(|c| c as &dyn Container)
    }

    fn container_mut(&mut self, pos: BlockPos) -> Option<&mut dyn Container> {
        self.containers
            .get_mut(&pos)
            .map(|c| c as &mut dyn Container)
    }

    fn raycast(&self, from: DVec3, to: DVec3) -> Option<DVec3> {
        let delta = to - from;
        let steps = (delta.length() / RAY_STEP).ceil() as usize;
        if steps == 0 {
            return None;
        }
        (0..=steps)
            .map(|i| from + delta * (i as f64 / steps as f64))
            .find(|p| self.is_solid(p.floor().as_ivec3()))
    }
}

/// A ghost as the reference host simulates it
#[derive(Debug, Clone, Copy)]
pub struct MemoryGhost {
    pub item: ItemId,
    pub position: DVec3,
    pub velocity: DVec3,
    pub age: u32,
}

/// Ghost registry; [`MemoryGhosts::advance`] plays the host's entity tick.
#[derive(Debug, Default)]
pub struct MemoryGhosts {
    next_handle: u64,
    live: FxHashMap<GhostHandle, MemoryGhost>,
    spawned_total: u64,
}

impl MemoryGhosts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move every live ghost one tick along its velocity
    pub fn advance(&mut self) {
        for ghost in self.live.values_mut() {
            ghost.position += ghost.velocity;
            ghost.age += 1;
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    pub fn get(&self, handle: GhostHandle) -> Option<&MemoryGhost> {
        self.live.get(&handle)
    }
}

impl GhostSpawner for MemoryGhosts {
    fn spawn_ghost(&mut self, spawn: GhostSpawn) -> GhostHandle {
        self.next_handle += 1;
        self.spawned_total += 1;
        let handle = GhostHandle(self.next_handle);
        self.live.insert(
            handle,
            MemoryGhost {
                item: spawn.item,
                position: spawn.position,
                velocity: spawn.velocity,
                age: 0,
            },
        );
        handle
    }

    fn end_ghost(&mut self, handle: GhostHandle) {
        self.live.remove(&handle);
    }
}
