//! Relay counters, owned by the coordinator.

use std::fmt;

use super::job::TickReport;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub jobs_created: u64,
    pub jobs_completed: u64,
    pub jobs_cancelled: u64,
    pub units_moved: u64,
    pub ghosts_spawned: u64,
    pub ghosts_expired: u64,
}

impl RelayStats {
    pub fn record_tick(&mut self, report: &TickReport) {
        self.units_moved += report.units_moved;
        self.ghosts_spawned += report.ghosts_spawned;
        self.ghosts_expired += report.ghosts_expired;
    }

    /// Ghosts spawned and not yet expired
    pub fn ghosts_in_flight(&self) -> u64 {
        self.ghosts_spawned - self.ghosts_expired
    }
}

impl fmt::Display for RelayStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Relay Stats: jobs created={} completed={} cancelled={}, units moved={}, ghosts spawned={} expired={}",
            self.jobs_created,
            self.jobs_completed,
            self.jobs_cancelled,
            self.units_moved,
            self.ghosts_spawned,
            self.ghosts_expired
        )
    }
}
