//! Container Relay
//!
//! Moves items out of a source container, one unit at a time, into the
//! containers it can see, and shows each unit as a ghost in flight.
//!
//! # Architecture
//!
//! ```text
//! close ─▶ Coordinator ─▶ geometry::find_visible ─▶ TransferJob::create
//!                                                      └─ SlotJob::create (allocator)
//! tick  ─▶ Coordinator ─▶ TransferJob::tick ─▶ SlotJob::attempt_transfer ─▶ ghost
//! open  ─▶ Coordinator ─▶ TransferJob::stop
//! ```
//!
//! # Invariants
//!
//! 1. **One unit per cooldown**: a job moves at most one unit each time its
//!    cooldown counter is exceeded.
//! 2. **Conservation**: every unit leaving a source slot lands in exactly one
//!    target slot in the same call.
//! 3. **No revisits**: a candidate found full is never asked again by that
//!    slot job; a fresh scan only happens on the next close.
//! 4. **Ghosts are visual only**: a ghost ends when its age exceeds the TTL,
//!    independently of the job's state.

pub mod allocator;
pub mod coordinator;
pub mod error;
pub mod geometry;
pub mod job;
pub mod slot_job;
pub mod state;
pub mod stats;
pub mod types;


// Re-exports for convenience
pub use allocator::{AllocationPolicy, find_target_slot};
pub use coordinator::TransferCoordinator;
pub use error::RelayError;
pub use geometry::find_visible;
pub use job::{TickReport, TransferJob};
pub use slot_job::SlotJob;
pub use state::JobState;
pub use stats::RelayStats;
pub use types::{GhostToken, JobId, UnitMoved, VisibleTarget};
