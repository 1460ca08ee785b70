//! Core types used throughout the relay
//!
//! Plain aliases over glam and integer ids. The host owns the real registries;
//! the relay only compares ids for equality.

use glam::IVec3;

/// Integer block coordinate in the world grid.
///
/// # Convention:
/// - `y` is the vertical axis
/// - A block at `pos` occupies the unit cube `[pos, pos + 1)`
pub type BlockPos = IVec3;

/// Item identity - two stacks can merge only when their ids are equal.
pub type ItemId = u32;

/// Block identity as reported by the host.
pub type BlockId = u32;

/// World tick counter
pub type Tick = u64;

/// Well-known block ids used by the in-memory reference world and the
/// default configuration.
pub mod blocks {
    use super::BlockId;

    pub const AIR: BlockId = 0;
    pub const STONE: BlockId = 1;
    pub const CHEST: BlockId = 54;
    pub const DIAMOND_BLOCK: BlockId = 57;
}

/// One block step downwards.
pub const DOWN: IVec3 = IVec3::NEG_Y;
