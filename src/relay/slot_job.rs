//! Slot Job
//!
//! Drains one source slot into randomly chosen candidate containers, one
//! unit per call. Candidates that stop accepting the item are dropped for
//! good; nothing is retried or rebalanced.

use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use super::allocator::{AllocationPolicy, accepts, find_target_slot};
use super::error::RelayError;
use super::types::{UnitMoved, VisibleTarget};
use crate::core_types::{BlockPos, ItemId};
use crate::world::{ItemStack, World};

#[derive(Debug, Clone)]
pub struct SlotJob {
    source: BlockPos,
    slot: usize,
    item: ItemId,
    candidates: Vec<Arc<VisibleTarget>>,
}

impl SlotJob {
    /// Build a slot job over a non-empty `stack` with at least one candidate.
    pub fn new(
        source: BlockPos,
        slot: usize,
        stack: ItemStack,
        candidates: Vec<Arc<VisibleTarget>>,
    ) -> Result<Self, RelayError> {
        if stack.is_empty() {
            return Err(RelayError::EmptySourceSlot { slot });
        }
        if candidates.is_empty() {
            return Err(RelayError::NoCandidates { slot });
        }
        Ok(Self {
            source,
            slot,
            item: stack.item,
            candidates,
        })
    }

    /// Slot job for `slot` of the source, keeping only the visible targets
    /// that can take its item right now. `None` when the slot is empty or no
    /// target qualifies.
    pub fn create(
        world: &dyn World,
        source: BlockPos,
        slot: usize,
        visible: &[Arc<VisibleTarget>],
        policy: AllocationPolicy,
    ) -> Option<Self> {
        let stack = world.container(source)?.stack(slot);
        if stack.is_empty() {
            return None;
        }

        let candidates: Vec<_> = visible
            .iter()
            .filter(|v| {
                world
                    .container(v.target)
                    .is_some_and(|c| accepts(stack.item, c, policy))
            })
            .cloned()
            .collect();

        if candidates.is_empty() {
            debug!(source = %source, slot, item = stack.item, "No eligible target for slot");
            return None;
        }
        Self::new(source, slot, stack, candidates).ok()
    }

    /// Move one unit from the source slot into a random candidate.
    ///
    /// Returns `None` when the source slot no longer holds the item or every
    /// candidate has been dropped as full.
    pub fn attempt_transfer<R: Rng>(
        &mut self,
        world: &mut dyn World,
        rng: &mut R,
        policy: AllocationPolicy,
    ) -> Option<UnitMoved> {
        let remaining = world.container(self.source)?.stack(self.slot);
        if !remaining.is_of(self.item) {
            return None;
        }

        while !self.candidates.is_empty() {
            let index = rng.gen_range(0..self.candidates.len());
            let target = self.candidates[index].target;

            let Some(target_slot) = world
                .container(target)
                .and_then(|c| find_target_slot(self.item, c, policy))
            else {
                debug!(
                    source = %self.source,
                    slot = self.slot,
                    item = self.item,
                    target = %target,
                    "Candidate full, dropping"
                );
                self.candidates.swap_remove(index);
                continue;
            };

            // Take the unit out first; it goes back if the target cannot be written
            world.container_mut(self.source)?.set_stack(
                self.slot,
                ItemStack::new(self.item, remaining.count - 1),
            );

            let Some(dest) = world.container_mut(target) else {
                if let Some(src) = world.container_mut(self.source) {
                    src.set_stack(self.slot, remaining);
                }
                debug!(
                    source = %self.source,
                    slot = self.slot,
                    target = %target,
                    "Candidate not writable, dropping"
                );
                self.candidates.swap_remove(index);
                continue;
            };
            let current = dest.stack(target_slot);
            dest.set_stack(target_slot, ItemStack::new(self.item, current.count + 1));

            return Some(UnitMoved {
                item: self.item,
                target,
                target_slot,
                ghost: self.candidates[index].ghost_for(self.item),
            });
        }

        None
    }

    pub fn source(&self) -> BlockPos {
        self.source
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn candidates(&self) -> &[Arc<VisibleTarget>] {
        &self.candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::BlockId;
    use crate::world::{Container, MemoryContainer, MemoryWorld};
    use glam::{DVec3, IVec3};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const X: ItemId = 10;
    const OTHER: ItemId = 11;
    const POLICY: AllocationPolicy = AllocationPolicy::ConsolidateOnly;

    fn source() -> BlockPos {
        IVec3::new(0, 1, 0)
    }

    fn target_at(pos: BlockPos) -> Arc<VisibleTarget> {
        Arc::new(VisibleTarget {
            target: pos,
            origin_point: DVec3::ZERO,
            target_point: DVec3::ONE,
            velocity: DVec3::splat(0.1),
        })
    }

    fn stacks(slots: &[(ItemId, u32)]) -> MemoryContainer {
        MemoryContainer::with_slots(slots.iter().map(|&(i, c)| ItemStack::new(i, c)).collect())
    }

    /// Host whose mutable lookup refuses one position that still reads fine
    struct ReadOnlyAt {
        inner: MemoryWorld,
        locked: BlockPos,
    }

    impl World for ReadOnlyAt {
        fn block_at(&self, pos: BlockPos) -> BlockId {
            self.inner.block_at(pos)
        }

        fn container(&self, pos: BlockPos) -> Option<&dyn Container> {
            self.inner.container(pos)
        }

        fn container_mut(&mut self, pos: BlockPos) -> Option<&mut dyn Container> {
            if pos == self.locked {
                return None;
            }
            self.inner.container_mut(pos)
        }

        fn raycast(&self, from: DVec3, to: DVec3) -> Option<DVec3> {
            self.inner.raycast(from, to)
        }
    }

    fn total(world: &MemoryWorld, positions: &[BlockPos]) -> u64 {
        positions
            .iter()
            .map(|p| world.memory_container(*p).unwrap().count_of(X))
            .sum()
    }

    #[test]
    fn test_new_rejects_malformed_input() {
        let t = vec![target_at(IVec3::X)];
        assert_eq!(
            SlotJob::new(source(), 0, ItemStack::EMPTY, t).unwrap_err(),
            RelayError::EmptySourceSlot { slot: 0 }
        );
        assert_eq!(
            SlotJob::new(source(), 3, ItemStack::new(X, 1), vec![]).unwrap_err(),
            RelayError::NoCandidates { slot: 3 }
        );
    }

    #[test]
    fn test_create_filters_ineligible_targets() {
        let mut world = MemoryWorld::new();
        let a = IVec3::new(4, 1, 0);
        let b = IVec3::new(-4, 1, 0);
        world.place_container(source(), stacks(&[(X, 5), (0, 0)]));
        world.place_container(a, stacks(&[(X, 2), (OTHER, 64)]));
        world.place_container(b, stacks(&[(OTHER, 64), (OTHER, 64)]));
        let visible = vec![target_at(a), target_at(b)];

        let job = SlotJob::create(&world, source(), 0, &visible, POLICY).unwrap();
        assert_eq!(job.item(), X);
        assert_eq!(job.candidates().len(), 1);
        assert_eq!(job.candidates()[0].target, a);

        assert!(SlotJob::create(&world, source(), 1, &visible, POLICY).is_none());
    }

    #[test]
    fn test_transfer_conserves_items() {
        let mut world = MemoryWorld::new();
        let a = IVec3::new(4, 1, 0);
        world.place_container(source(), stacks(&[(X, 5)]));
        world.place_container(a, stacks(&[(X, 3), (OTHER, 64)]));
        let mut job = SlotJob::create(&world, source(), 0, &[target_at(a)], POLICY).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let before = total(&world, &[source(), a]);
        let moved = job.attempt_transfer(&mut world, &mut rng, POLICY).unwrap();

        assert_eq!(moved.item, X);
        assert_eq!(moved.target, a);
        assert_eq!(moved.target_slot, 0);
        assert_eq!(world.container(source()).unwrap().stack(0).count, 4);
        assert_eq!(world.container(a).unwrap().stack(0).count, 4);
        assert_eq!(total(&world, &[source(), a]), before);
    }

    #[test]
    fn test_full_candidate_dropped_and_job_terminates() {
        let mut world = MemoryWorld::new();
        let a = IVec3::new(4, 1, 0);
        let b = IVec3::new(-4, 1, 0);
        world.place_container(source(), stacks(&[(X, 50)]));
        world.place_container(a, stacks(&[(X, 62), (OTHER, 1)]));
        world.place_container(b, stacks(&[(X, 63), (OTHER, 1)]));
        let mut job =
            SlotJob::create(&world, source(), 0, &[target_at(a), target_at(b)], POLICY).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let mut moved = 0;
        while job.attempt_transfer(&mut world, &mut rng, POLICY).is_some() {
            moved += 1;
            assert!(moved <= 3, "transfer loop did not terminate");
        }

        assert_eq!(moved, 3);
        assert!(job.candidates().is_empty());
        assert_eq!(world.container(source()).unwrap().stack(0).count, 47);
        assert_eq!(world.container(a).unwrap().stack(0).count, 64);
        assert_eq!(world.container(b).unwrap().stack(0).count, 64);
    }

    #[test]
    fn test_empty_source_fails_without_touching_candidates() {
        let mut world = MemoryWorld::new();
        let a = IVec3::new(4, 1, 0);
        world.place_container(source(), stacks(&[(X, 1)]));
        world.place_container(a, stacks(&[(X, 1), (OTHER, 1)]));
        let mut job = SlotJob::create(&world, source(), 0, &[target_at(a)], POLICY).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        assert!(job.attempt_transfer(&mut world, &mut rng, POLICY).is_some());
        assert!(world.container(source()).unwrap().stack(0).is_empty());

        assert!(job.attempt_transfer(&mut world, &mut rng, POLICY).is_none());
        assert_eq!(job.candidates().len(), 1);
    }

    #[test]
    fn test_swapped_source_item_counts_as_exhausted() {
        let mut world = MemoryWorld::new();
        let a = IVec3::new(4, 1, 0);
        world.place_container(source(), stacks(&[(X, 4)]));
        world.place_container(a, stacks(&[(X, 1), (OTHER, 1)]));
        let mut job = SlotJob::create(&world, source(), 0, &[target_at(a)], POLICY).unwrap();

        world
            .container_mut(source())
            .unwrap()
            .set_stack(0, ItemStack::new(OTHER, 4));

        let mut rng = StdRng::seed_from_u64(3);
        assert!(job.attempt_transfer(&mut world, &mut rng, POLICY).is_none());
        assert_eq!(world.container(a).unwrap().stack(0).count, 1);
    }

    #[test]
    fn test_vanished_target_is_dropped() {
        let mut world = MemoryWorld::new();
        let a = IVec3::new(4, 1, 0);
        world.place_container(source(), stacks(&[(X, 4)]));
        world.place_container(a, stacks(&[(X, 1), (OTHER, 1)]));
        let mut job = SlotJob::create(&world, source(), 0, &[target_at(a)], POLICY).unwrap();

        world.set_block(a, crate::core_types::blocks::AIR);

        let mut rng = StdRng::seed_from_u64(3);
        assert!(job.attempt_transfer(&mut world, &mut rng, POLICY).is_none());
        assert!(job.candidates().is_empty());
        assert_eq!(world.container(source()).unwrap().stack(0).count, 4);
    }

    #[test]
    fn test_unwritable_target_restores_source() {
        let mut inner = MemoryWorld::new();
        let a = IVec3::new(4, 1, 0);
        inner.place_container(source(), stacks(&[(X, 4)]));
        inner.place_container(a, stacks(&[(X, 1), (OTHER, 1)]));
        let mut job = SlotJob::create(&inner, source(), 0, &[target_at(a)], POLICY).unwrap();
        let mut world = ReadOnlyAt { inner, locked: a };
        let mut rng = StdRng::seed_from_u64(3);

        assert!(job.attempt_transfer(&mut world, &mut rng, POLICY).is_none());
        assert!(job.candidates().is_empty());
        assert_eq!(world.inner.container(source()).unwrap().stack(0), ItemStack::new(X, 4));
        assert_eq!(world.inner.container(a).unwrap().stack(0), ItemStack::new(X, 1));
    }

    #[test]
    fn test_unwritable_source_moves_nothing() {
        let mut inner = MemoryWorld::new();
        let a = IVec3::new(4, 1, 0);
        inner.place_container(source(), stacks(&[(X, 4)]));
        inner.place_container(a, stacks(&[(X, 1), (OTHER, 1)]));
        let mut job = SlotJob::create(&inner, source(), 0, &[target_at(a)], POLICY).unwrap();
        let mut world = ReadOnlyAt {
            inner,
            locked: source(),
        };
        let mut rng = StdRng::seed_from_u64(3);

        assert!(job.attempt_transfer(&mut world, &mut rng, POLICY).is_none());
        assert_eq!(world.inner.container(source()).unwrap().stack(0), ItemStack::new(X, 4));
        assert_eq!(world.inner.container(a).unwrap().stack(0), ItemStack::new(X, 1));
    }
}
