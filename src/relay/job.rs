//! Transfer Job
//!
//! One source container's drain: a bag of slot jobs advanced one unit per
//! cooldown period, plus the ghosts already in flight.
//!
//! # Tick order
//!
//! 1. Age every ghost; end the ones older than the TTL.
//! 2. While ACTIVE, bump the cooldown counter. Once it exceeds the cooldown,
//!    reset it and move one unit through a random slot job, dropping slot
//!    jobs that fail. No slot job left means DRAINING.
//! 3. DRAINING with no live ghosts means DONE.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, trace};

use super::error::RelayError;
use super::slot_job::SlotJob;
use super::state::JobState;
use super::types::{GhostToken, JobId, VisibleTarget};
use crate::config::RelayConfig;
use crate::core_types::BlockPos;
use crate::world::{GhostSpawner, World};

/// Counters reported back to the coordinator after each tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub units_moved: u64,
    pub ghosts_spawned: u64,
    pub ghosts_expired: u64,
}

#[derive(Debug)]
pub struct TransferJob {
    id: JobId,
    source: BlockPos,
    slot_jobs: Vec<SlotJob>,
    ghosts: Vec<GhostToken>,
    cooldown: u32,
    state: JobState,
    config: RelayConfig,
}

impl TransferJob {
    /// Wrap already-built slot jobs. At least one is required.
    pub fn new(
        source: BlockPos,
        slot_jobs: Vec<SlotJob>,
        config: RelayConfig,
    ) -> Result<Self, RelayError> {
        if slot_jobs.is_empty() {
            return Err(RelayError::NoSlotJobs);
        }
        Ok(Self {
            id: JobId::new(),
            source,
            slot_jobs,
            ghosts: Vec::new(),
            cooldown: 0,
            state: JobState::Active,
            config,
        })
    }

    /// Build one slot job per non-empty source slot that some visible target
    /// accepts. `None` when there is nothing to move.
    pub fn create(
        world: &dyn World,
        source: BlockPos,
        visible: &[Arc<VisibleTarget>],
        config: &RelayConfig,
    ) -> Result<Option<Self>, RelayError> {
        let container = world
            .container(source)
            .ok_or(RelayError::ContainerNotFound(source))?;

        let slot_jobs: Vec<_> = (0..container.size())
            .filter_map(|slot| SlotJob::create(world, source, slot, visible, config.allocation))
            .collect();

        if slot_jobs.is_empty() {
            return Ok(None);
        }
        Self::new(source, slot_jobs, config.clone()).map(Some)
    }

    /// Advance the job by one world tick.
    pub fn tick<R: Rng>(
        &mut self,
        world: &mut dyn World,
        spawner: &mut dyn GhostSpawner,
        rng: &mut R,
    ) -> TickReport {
        let mut report = TickReport::default();
        if self.state.is_terminal() {
            return report;
        }

        let ttl = self.config.ghost_ttl;
        self.ghosts.retain_mut(|ghost| {
            if ghost.age_one_tick(ttl) {
                spawner.end_ghost(ghost.handle);
                report.ghosts_expired += 1;
                false
            } else {
                true
            }
        });

        if self.state.is_transferring() {
            self.cooldown += 1;
            if self.cooldown > self.config.transfer_cooldown {
                self.cooldown = 0;
                if self.transfer_one(world, spawner, rng) {
                    report.units_moved += 1;
                    report.ghosts_spawned += 1;
                } else {
                    self.state = JobState::Draining;
                    debug!(job_id = %self.id, source = %self.source, "Slot jobs exhausted, draining");
                }
            }
        }

        if self.state == JobState::Draining && self.ghosts.is_empty() {
            self.state = JobState::Done;
            info!(job_id = %self.id, source = %self.source, "Transfer job done");
        }

        report
    }

    /// Pick random slot jobs until one moves a unit; failed ones are dropped.
    fn transfer_one<R: Rng>(
        &mut self,
        world: &mut dyn World,
        spawner: &mut dyn GhostSpawner,
        rng: &mut R,
    ) -> bool {
        while !self.slot_jobs.is_empty() {
            let index = rng.gen_range(0..self.slot_jobs.len());
            let slot_job = &mut self.slot_jobs[index];

            match slot_job.attempt_transfer(world, rng, self.config.allocation) {
                Some(moved) => {
                    let handle = spawner.spawn_ghost(moved.ghost);
                    self.ghosts.push(GhostToken::new(handle, moved.ghost));
                    trace!(
                        target: "RELAY_UNITS",
                        job_id = %self.id,
                        slot = slot_job.slot(),
                        item = moved.item,
                        dest = %moved.target,
                        target_slot = moved.target_slot,
                        "Unit moved"
                    );
                    return true;
                }
                None => {
                    debug!(
                        job_id = %self.id,
                        slot = slot_job.slot(),
                        "Slot job exhausted"
                    );
                    self.slot_jobs.swap_remove(index);
                }
            }
        }
        false
    }

    /// Cancel: no more units move, live ghosts keep flying until they expire.
    pub fn stop(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        info!(
            job_id = %self.id,
            source = %self.source,
            pending_slots = self.slot_jobs.len(),
            live_ghosts = self.ghosts.len(),
            "Transfer job stopped"
        );
        self.slot_jobs.clear();
        self.state = JobState::Draining;
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn source(&self) -> BlockPos {
        self.source
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn slot_jobs(&self) -> &[SlotJob] {
        &self.slot_jobs
    }

    pub fn ghosts(&self) -> &[GhostToken] {
        &self.ghosts
    }
}
