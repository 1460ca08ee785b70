//! Transfer Coordinator
//!
//! Owns every live transfer job and turns host events into job changes:
//!
//! - container closed → scan for visible targets, register a new job
//! - container opened → stop the jobs draining that container
//! - world tick       → tick every job in registration order, drop DONE ones
//!
//! One instance lives as long as the host process; dropping it abandons all
//! in-flight jobs.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use super::error::RelayError;
use super::geometry::find_visible;
use super::job::TransferJob;
use super::stats::RelayStats;
use super::types::JobId;
use crate::config::RelayConfig;
use crate::core_types::{BlockPos, DOWN};
use crate::world::{GhostSpawner, World};

pub struct TransferCoordinator {
    config: RelayConfig,
    jobs: Vec<TransferJob>,
    rng: StdRng,
    stats: RelayStats,
}

impl TransferCoordinator {
    /// Create a coordinator; the generator is seeded from `config.rng_seed`
    /// or from entropy.
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Create a coordinator around an explicit generator
    pub fn with_rng(config: RelayConfig, rng: StdRng) -> Result<Self, RelayError> {
        config.validate()?;
        info!(
            search_radius = config.search_radius,
            ghost_ttl = config.ghost_ttl,
            transfer_cooldown = config.transfer_cooldown,
            marker_block = config.marker_block,
            "Transfer coordinator ready"
        );
        Ok(Self {
            config,
            jobs: Vec::new(),
            rng,
            stats: RelayStats::default(),
        })
    }

    /// Handle a container being closed at `source`.
    ///
    /// Returns the id of the registered job, or `None` when the container is
    /// not on the marker block or has nothing any visible target accepts.
    pub fn on_source_closed(
        &mut self,
        world: &dyn World,
        source: BlockPos,
    ) -> Result<Option<JobId>, RelayError> {
        if world.container(source).is_none() {
            return Err(RelayError::ContainerNotFound(source));
        }
        if !self.is_source(world, source) {
            return Ok(None);
        }

        let visible: Vec<_> = find_visible(world, source, &self.config)
            .into_iter()
            .map(Arc::new)
            .collect();
        info!(source = %source, visible = visible.len(), "Scanned for visible containers");
        if visible.is_empty() {
            return Ok(None);
        }

        let Some(job) = TransferJob::create(world, source, &visible, &self.config)? else {
            debug!(source = %source, "Nothing to transfer");
            return Ok(None);
        };

        for existing in self
            .jobs
            .iter_mut()
            .filter(|j| j.source() == source && j.state().is_transferring())
        {
            warn!(job_id = %existing.id(), source = %source, "Replacing active job for source");
            existing.stop();
            self.stats.jobs_cancelled += 1;
        }

        let id = job.id();
        info!(
            job_id = %id,
            source = %source,
            slot_jobs = job.slot_jobs().len(),
            "Transfer job created"
        );
        self.jobs.push(job);
        self.stats.jobs_created += 1;
        Ok(Some(id))
    }

    /// Handle a container being opened at `source`: stop every job draining
    /// it. Returns how many jobs were stopped.
    pub fn on_source_opened(&mut self, source: BlockPos) -> usize {
        let mut stopped = 0;
        for job in self
            .jobs
            .iter_mut()
            .filter(|j| j.source() == source && j.state().is_transferring())
        {
            job.stop();
            stopped += 1;
        }
        self.stats.jobs_cancelled += stopped as u64;
        stopped
    }

    /// Advance every job by one world tick, in registration order, and drop
    /// the ones that finished.
    pub fn on_tick(&mut self, world: &mut dyn World, spawner: &mut dyn GhostSpawner) {
        if self.jobs.is_empty() {
            return;
        }
        for job in self.jobs.iter_mut() {
            let report = job.tick(world, spawner, &mut self.rng);
            self.stats.record_tick(&report);
        }

        let before = self.jobs.len();
        self.jobs.retain(|job| !job.is_done());
        let finished = before - self.jobs.len();
        if finished > 0 {
            self.stats.jobs_completed += finished as u64;
            debug!(finished, remaining = self.jobs.len(), "Removed finished jobs");
        }
    }

    fn is_source(&self, world: &dyn World, pos: BlockPos) -> bool {
        world.block_at(pos + DOWN) == self.config.marker_block
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Live jobs in registration order
    pub fn jobs(&self) -> &[TransferJob] {
        &self.jobs
    }

    pub fn job(&self, id: JobId) -> Option<&TransferJob> {
        self.jobs.iter().find(|j| j.id() == id)
    }

    pub fn is_idle(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Copy of the counters at this moment
    pub fn stats(&self) -> RelayStats {
        self.stats
    }
}
