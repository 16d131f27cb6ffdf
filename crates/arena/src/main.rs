//! Arena binary.
//!
//! Runs the preset arena (or a JSON blueprint from `ARENA_BEHAVIOR`) for a
//! fixed number of ticks and logs how the fight went.
//!
//! ```bash
//! RUST_LOG=agent_ai=debug ARENA_TICKS=300 cargo run -p arena
//! ```

use std::time::Duration;

use anyhow::Result;
use arena::{Arena, ArenaConfig, load_blueprint};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ArenaConfig::from_env();
    tracing::info!("Starting arena: {} ticks at {}s", config.ticks, config.delta_time);

    let blueprint = load_blueprint(config.behavior.as_deref())?;
    let mut arena = Arena::new(&config, &blueprint)?;
    tracing::info!("Spawned {} agents", arena.runner().len());

    let mut interval = tokio::time::interval(Duration::from_secs_f32(config.delta_time));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    for _ in 0..config.ticks {
        if config.realtime {
            interval.tick().await;
        }

        let report = arena.tick();
        if arena.player_health() <= 0.0 {
            tracing::info!("Player defeated at {:.2}s", report.frame.elapsed);
            break;
        }
    }

    tracing::info!(
        "Arena finished: {} shots fired, player health {:.1}",
        arena.shots_fired(),
        arena.player_health()
    );

    Ok(())
}
