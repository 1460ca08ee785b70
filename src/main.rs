//! Dropbox Relay - demo driver
//!
//! Builds a small scene in the in-memory host, closes the dropbox once and
//! runs world ticks until every job has drained.
//!
//! ```text
//!            [iron chest]
//!                 │
//! [hidden] ▓  [dropbox] ──── [cobble chest]
//!                 ▼
//!            diamond block
//! ```

use anyhow::{Context, Result};
use glam::IVec3;
use tracing::info;

use dropbox_relay::config::AppConfig;
use dropbox_relay::core_types::{ItemId, blocks};
use dropbox_relay::logging::init_logging;
use dropbox_relay::world::memory::CHEST_SLOTS;
use dropbox_relay::world::{MemoryContainer, MemoryGhosts, MemoryWorld};
use dropbox_relay::{ItemStack, TransferCoordinator};

const COBBLESTONE: ItemId = 4;
const IRON_INGOT: ItemId = 265;
const DIRT: ItemId = 3;
const JUNK: ItemId = 287;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Tick limit from command line (--max-ticks argument)
fn get_max_ticks() -> u64 {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--max-ticks" && i + 1 < args.len() {
            if let Ok(n) = args[i + 1].parse() {
                return n;
            }
        }
    }
    2_000
}

/// Chest holding a partial stack of `item` in slot 0 and junk elsewhere
fn sorting_chest(item: ItemId, count: u32) -> MemoryContainer {
    let mut slots = vec![ItemStack::new(JUNK, 1); CHEST_SLOTS];
    slots[0] = ItemStack::new(item, count);
    MemoryContainer::with_slots(slots)
}

fn build_scene(marker: u32) -> (MemoryWorld, IVec3, Vec<IVec3>) {
    let mut world = MemoryWorld::new();
    let dropbox = IVec3::new(0, 64, 0);
    let mut contents = vec![ItemStack::EMPTY; CHEST_SLOTS];
    contents[0] = ItemStack::new(COBBLESTONE, 20);
    contents[1] = ItemStack::new(IRON_INGOT, 5);
    contents[2] = ItemStack::new(DIRT, 3);
    world.place_source(dropbox, marker, MemoryContainer::with_slots(contents));

    let cobble = IVec3::new(4, 64, 0);
    let iron = IVec3::new(0, 64, -4);
    let hidden = IVec3::new(-4, 64, 0);
    world.place_container(cobble, sorting_chest(COBBLESTONE, 40));
    world.place_container(iron, sorting_chest(IRON_INGOT, 1));
    world.place_container(hidden, sorting_chest(DIRT, 1));
    world.set_block(IVec3::new(-2, 64, 0), blocks::STONE);

    (world, dropbox, vec![cobble, iron, hidden])
}

fn main() -> Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env).with_context(|| format!("loading {env} config"))?;
    let _log_guard = init_logging(&app_config).context("initialising logging")?;

    info!(
        "Starting dropbox relay demo in {} mode (rev {})",
        env,
        env!("RELAY_BUILD_REV")
    );

    let (mut world, dropbox, chests) = build_scene(app_config.relay.marker_block);
    let mut ghosts = MemoryGhosts::new();
    let mut relay = TransferCoordinator::new(app_config.relay.clone())?;

    match relay.on_source_closed(&world, dropbox)? {
        Some(id) => info!(job_id = %id, "Dropbox closed, job registered"),
        None => info!("Dropbox closed, nothing to send"),
    }

    let max_ticks = get_max_ticks();
    let mut tick = 0;
    while !relay.is_idle() && tick < max_ticks {
        ghosts.advance();
        relay.on_tick(&mut world, &mut ghosts);
        tick += 1;
    }

    info!(ticks = tick, idle = relay.is_idle(), "{}", relay.stats());
    for pos in chests.iter().chain(std::iter::once(&dropbox)) {
        if let Some(chest) = world.memory_container(*pos) {
            info!(
                chest = %pos,
                cobblestone = chest.count_of(COBBLESTONE),
                iron = chest.count_of(IRON_INGOT),
                dirt = chest.count_of(DIRT),
                "Final contents"
            );
        }
    }

    Ok(())
}
