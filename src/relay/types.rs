//! Relay Core Types
//!
//! Values passed between the resolver, slot jobs and transfer jobs.

use std::fmt;

use glam::DVec3;

use crate::core_types::{BlockPos, ItemId};
use crate::world::{GhostHandle, GhostSpawn};

/// Transfer job identifier (ULID)
///
/// Only used to name jobs in logs and accessors; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(ulid::Ulid);

impl JobId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    pub fn inner(&self) -> ulid::Ulid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A container seen from a source along a clear line.
///
/// Computed once per close event and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleTarget {
    /// Position of the target container
    pub target: BlockPos,
    /// Point just outside the source, on the line toward the target
    pub origin_point: DVec3,
    /// Point just outside the target, on the line toward the source
    pub target_point: DVec3,
    /// Per-tick ghost velocity; covers the line in exactly `ghost_ttl` ticks
    pub velocity: DVec3,
}

impl VisibleTarget {
    /// Ghost request for one unit of `item` sent toward this target
    pub fn ghost_for(&self, item: ItemId) -> GhostSpawn {
        GhostSpawn {
            item,
            position: self.origin_point,
            velocity: self.velocity,
        }
    }
}

/// Outcome of one successful unit transfer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitMoved {
    pub item: ItemId,
    pub target: BlockPos,
    pub target_slot: usize,
    pub ghost: GhostSpawn,
}

/// A live ghost owned by a transfer job.
///
/// Ages once per job tick and ends once its age exceeds the ghost TTL,
/// whatever happened to the job in the meantime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostToken {
    pub handle: GhostHandle,
    pub item: ItemId,
    pub position: DVec3,
    pub velocity: DVec3,
    pub age: u32,
}

impl GhostToken {
    pub fn new(handle: GhostHandle, spawn: GhostSpawn) -> Self {
        Self {
            handle,
            item: spawn.item,
            position: spawn.position,
            velocity: spawn.velocity,
            age: 0,
        }
    }

    /// Age by one tick; returns true once the token has outlived `ttl`
    #[inline]
    pub fn age_one_tick(&mut self, ttl: u32) -> bool {
        self.age += 1;
        self.age > ttl
    }
}
