//! Geometry / Visibility Resolver
//!
//! Finds the containers a source can see and precomputes the ghost flight
//! for each of them.

use glam::{DVec3, IVec3};
use tracing::debug;

use super::types::VisibleTarget;
use crate::config::RelayConfig;
use crate::core_types::BlockPos;
use crate::world::World;

/// Centre of the block at `pos`
#[inline]
pub fn block_center(pos: BlockPos) -> DVec3 {
    pos.as_dvec3() + DVec3::splat(0.5)
}

/// Point on the line from `from` toward `to`, `offset` blocks out of
/// `from`'s centre and lowered by `drop`.
pub fn transfer_point(from: BlockPos, to: BlockPos, offset: f64, drop: f64) -> DVec3 {
    let a = block_center(from);
    let b = block_center(to);
    a + (b - a).normalize_or_zero() * offset - DVec3::new(0.0, drop, 0.0)
}

/// Every container within `config.search_radius` of `source` that has a
/// clear line to it, in x/y/z scan order.
///
/// Read-only; a container rejected here is not looked at again until the
/// next scan.
pub fn find_visible(
    world: &dyn World,
    source: BlockPos,
    config: &RelayConfig,
) -> Vec<VisibleTarget> {
    let r = config.search_radius;
    let mut out = Vec::new();

    for x in -r..=r {
        for y in -r..=r {
            for z in -r..=r {
                let offset = IVec3::new(x, y, z);
                if offset == IVec3::ZERO {
                    continue;
                }
                let target = source + offset;
                if world.container(target).is_none() {
                    continue;
                }
                match resolve_line(world, source, target, config) {
                    Some(visible) => {
                        debug!(source = %source, target = %target, "Container visible");
                        out.push(visible);
                    }
                    None => debug!(source = %source, target = %target, "Container not visible"),
                }
            }
        }
    }

    out
}

/// Transfer line between two containers, or `None` if it is obstructed.
pub fn resolve_line(
    world: &dyn World,
    source: BlockPos,
    target: BlockPos,
    config: &RelayConfig,
) -> Option<VisibleTarget> {
    let origin_point = transfer_point(
        source,
        target,
        config.transfer_point_offset,
        config.ghost_drop,
    );
    let target_point = transfer_point(
        target,
        source,
        config.transfer_point_offset,
        config.ghost_drop,
    );

    if let Some(hit) = world.raycast(origin_point, target_point)
        && !hit.abs_diff_eq(target_point, config.hit_epsilon)
    {
        return None;
    }

    Some(VisibleTarget {
        target,
        origin_point,
        target_point,
        velocity: (target_point - origin_point) / config.ghost_ttl as f64,
    })
}
