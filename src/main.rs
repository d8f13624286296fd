//! Corona Shooter headless runner
//!
//! Drives the world with a simple autopilot through the fixed-step loop and
//! logs what happens. Useful for soak runs and for checking determinism
//! across seeds (`RUST_LOG=debug`).

use clap::Parser;
use corona_shooter::audio::LoggingAudio;
use corona_shooter::sim::{GameEvent, GamePhase, GameState, TickInput};
use corona_shooter::{Difficulty, FixedStep, Settings, SimError, World};

/// Wall-clock frame time fed to the accumulator (60 Hz display)
const FRAME_MS: f32 = 1000.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "corona-shooter")]
#[command(about = "Run the shooter simulation headless under an autopilot")]
struct CliArgs {
    /// Balance file (JSON); falls back to defaults if unreadable
    #[arg(long = "settings")]
    settings_path: Option<String>,

    /// Difficulty preset: easy, normal or hard
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Display frames to run
    #[arg(long, default_value_t = 3600)]
    frames: u64,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty '{s}'"))
}

/// Steer under the lowest enemy, keep firing, sidestep incoming fire and
/// bomb when crowded. On menus, tap select (the ship starts under Play).
fn autopilot(state: &GameState, frame: u64) -> TickInput {
    let mut input = TickInput::default();
    match state.phase {
        GamePhase::Menu | GamePhase::LevelSelect => {
            input.select = frame % 2 == 0;
        }
        GamePhase::Playing => {
            let ship = state.player_pos();
            input.fire = true;

            let threat = state
                .enemy_lasers
                .iter()
                .filter(|l| l.pos.y < ship.y && ship.y - l.pos.y < 120.0)
                .any(|l| (l.pos.x - ship.x).abs() < 30.0);

            let target = state
                .live_enemies()
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

            if threat {
                input.left = ship.x > 320.0;
                input.right = !input.left;
            } else if let Some(enemy) = target {
                let dx = enemy.pos.x - ship.x;
                input.left = dx < -8.0;
                input.right = dx > 8.0;
            }

            input.bomb = state.live_enemies().count() > 5;
        }
        GamePhase::Quit => {}
    }
    input
}

fn main() -> Result<(), SimError> {
    env_logger::init();
    let cli = CliArgs::parse();

    let mut settings = match &cli.settings_path {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    if let Some(preset) = cli.difficulty {
        settings.apply_preset(preset);
    }
    if let Some(seed) = cli.seed {
        settings = settings.with_seed(seed);
    }
    settings.validate()?;

    let mut world = World::new(settings, Box::new(LoggingAudio::new()))?;
    let mut clock = FixedStep::default();
    let mut deaths = 0u32;

    for frame in 0..cli.frames {
        let ticks = clock.accumulate(FRAME_MS);
        for _ in 0..ticks {
            let input = autopilot(world.state(), frame);
            let events = world.tick(clock.step(), &input)?;

            for event in &events.events {
                match event {
                    GameEvent::PlayerDied { score } => {
                        deaths += 1;
                        log::info!("Run {} over with score {}", deaths, score);
                    }
                    GameEvent::LevelAdvanced { level } => {
                        log::info!("Reached level {} ({:?})", level, events.backdrop);
                    }
                    other => log::debug!("{:?}", other),
                }
            }
        }

        if frame % 600 == 0 {
            let hud = world.hud();
            log::info!(
                "frame {}: level {} score {} lives {} bombs {} shield {}",
                frame,
                hud.level,
                hud.score,
                hud.lives,
                hud.bombs,
                hud.shield_active
            );
        }
        if !world.is_running() {
            break;
        }
    }

    let hud = world.hud();
    log::info!(
        "Finished: level {} score {} ({} deaths, {} entities on screen)",
        hud.level,
        hud.score,
        deaths,
        world.renderables().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = CliArgs::try_parse_from(["corona-shooter"]).unwrap();
        assert_eq!(cli.frames, 3600);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.difficulty, None);
        assert!(cli.settings_path.is_none());
    }

    #[test]
    fn test_cli_typed_values() {
        let cli = CliArgs::try_parse_from([
            "corona-shooter",
            "--seed",
            "42",
            "--frames",
            "120",
            "--difficulty",
            "HARD",
            "--settings",
            "balance.json",
        ])
        .unwrap();
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.frames, 120);
        assert_eq!(cli.difficulty, Some(Difficulty::Hard));
        assert_eq!(cli.settings_path.as_deref(), Some("balance.json"));
    }

    #[test]
    fn test_cli_rejects_malformed_values() {
        assert!(CliArgs::try_parse_from(["corona-shooter", "--seed", "abc"]).is_err());
        assert!(CliArgs::try_parse_from(["corona-shooter", "--frames", "-3"]).is_err());
        assert!(CliArgs::try_parse_from(["corona-shooter", "--difficulty", "nightmare"]).is_err());
        assert!(CliArgs::try_parse_from(["corona-shooter", "--speed", "2"]).is_err());
    }
}
