//! Transfer Job States
//!
//! ```text
//! ACTIVE ──(slot jobs exhausted | stop)──▶ DRAINING ──(no live ghosts)──▶ DONE
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JobState {
    /// Still moving units on the cooldown cadence
    #[default]
    Active,

    /// No more units will move; waiting for live ghosts to expire
    Draining,

    /// Terminal: the coordinator drops the job
    Done,
}

impl JobState {
    /// Check if this is a terminal state
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done)
    }

    /// Check if the job can still move items
    #[inline]
    pub fn is_transferring(&self) -> bool {
        matches!(self, JobState::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Active => "ACTIVE",
            JobState::Draining => "DRAINING",
            JobState::Done => "DONE",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
