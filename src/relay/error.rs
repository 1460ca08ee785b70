//! Relay Error Types
//!
//! Only contract violations are errors. A full target or an exhausted slot
//! is a normal outcome and never shows up here.

use thiserror::Error;

use crate::core_types::BlockPos;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelayError {
    #[error("No container at {0}")]
    ContainerNotFound(BlockPos),

    #[error("Source slot {slot} is empty")]
    EmptySourceSlot { slot: usize },

    #[error("Source slot {slot} has no candidate targets")]
    NoCandidates { slot: usize },

    #[error("Transfer job needs at least one slot job")]
    NoSlotJobs,

    #[error("Invalid relay configuration: {0}")]
    InvalidConfig(String),
}

impl RelayError {
    /// Stable code for logs
    pub fn code(&self) -> &'static str {
        match self {
            RelayError::ContainerNotFound(_) => "CONTAINER_NOT_FOUND",
            RelayError::EmptySourceSlot { .. } => "EMPTY_SOURCE_SLOT",
            RelayError::NoCandidates { .. } => "NO_CANDIDATES",
            RelayError::NoSlotJobs => "NO_SLOT_JOBS",
            RelayError::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}
