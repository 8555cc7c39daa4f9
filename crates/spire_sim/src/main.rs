//! Spire headless runner
//!
//! Builds the demo level and plays a scripted session without a renderer.
//!
//! Run with: cargo run -p spire_sim -- [config.toml]

use spire_sim::demo::{demo_script, demo_world, run_script};
use spire_sim::{Result, SimConfig};

/// Simulated seconds the scripted session lasts
const SESSION_SECONDS: f32 = 9.0;
/// Frame time fed to the fixed-step loop
const FRAME_TIME: f32 = 1.0 / 60.0;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::load(path)?,
        None => {
            log::info!("No config given, using defaults");
            SimConfig::default()
        }
    };
    log::info!("Seed {}, timestep {:.4}s", config.seed, config.physics.timestep);

    let mut world = demo_world(config)?;
    let stats = run_script(&mut world, &demo_script(), SESSION_SECONDS, FRAME_TIME);

    log::info!("Session finished after {:.2}s ({} ticks)", world.elapsed(), stats.ticks);
    log::info!(
        "Projectiles: {} spawned, {} hits; melee hits: {}; tower turns: {} (facing {:?})",
        stats.projectiles_spawned,
        stats.projectile_hits,
        stats.melee_hits,
        stats.turns,
        world.tower().facing()
    );
    for (id, character) in world.characters() {
        log::info!(
            "  {} {:?} at {:?}: {:?}, {:.0} health",
            id,
            character.allegiance(),
            character.position(),
            character.health().state(),
            character.health().current
        );
    }
    Ok(())
}
