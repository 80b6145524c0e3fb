mod autopilot;

use std::process::ExitCode;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use mariosan_core::game_trait::{Phase, Simulation};
use mariosan_core::input::InputLatch;
use mariosan_platformer::{LevelError, LevelRuntime, MariosanConfig, load_level_from_file};

use autopilot::Autopilot;

const DEFAULT_MAX_TICKS: u32 = 3600;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = MariosanConfig::load();
    let mut runtime = match build_runtime(config) {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to load levels: {e}");
            return ExitCode::FAILURE;
        },
    };

    let meta = runtime.metadata();
    tracing::info!(
        game = %meta.name,
        level = runtime.level().name(),
        "Mariosan headless run starting"
    );

    let max_ticks = env_or("MARIOSAN_MAX_TICKS", DEFAULT_MAX_TICKS);
    let dt = 1.0 / runtime.tick_rate();
    let mut latch = InputLatch::new();
    let mut pilot = Autopilot::new();
    let mut ticks = 0;

    while ticks < max_ticks {
        pilot.steer(&runtime, &mut latch);
        let input = latch.take_snapshot();
        let result = runtime.tick(dt, &input);
        ticks += 1;

        for event in &result.events {
            tracing::info!(tick = ticks, ?event, "Event");
        }
        if result.phase.is_terminal() {
            break;
        }
    }

    let phase = runtime.phase();
    let player = runtime.player();
    tracing::info!(
        ?phase,
        ticks,
        x = player.body.x,
        y = player.body.y,
        enemies = runtime.enemies().len(),
        "Run finished"
    );

    if phase == Phase::Won {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// A single level file when `MARIOSAN_LEVEL_FILE` is set, otherwise the
/// built-in stages starting at `MARIOSAN_STAGE`.
fn build_runtime(config: MariosanConfig) -> Result<LevelRuntime, LevelError> {
    if let Ok(path) = std::env::var("MARIOSAN_LEVEL_FILE") {
        let level = load_level_from_file(&path)?;
        return LevelRuntime::new(vec![level], config);
    }

    let mut runtime = LevelRuntime::with_builtin_levels(config)?;
    let stage = env_or("MARIOSAN_STAGE", 0usize);
    if stage != 0 && !runtime.select_level(stage) {
        tracing::warn!(
            stage,
            available = runtime.level_count(),
            "Stage out of range, starting from the first"
        );
    }
    Ok(runtime)
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparseable {name}={raw}");
            default
        }),
        Err(_) => default,
    }
}
