//! Frame API for the render/input/audio layer
//!
//! `World` owns the simulation and the injected audio sink. `FixedStep`
//! turns variable wall-clock frame times into whole simulation ticks.

use crate::audio::AudioSink;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{FrameEvents, GamePhase, GameState, HudState, Renderable, TickInput, tick};
use crate::{Settings, SimError};

/// Simulation facade
pub struct World {
    state: GameState,
    audio: Box<dyn AudioSink>,
}

impl World {
    pub fn new(settings: Settings, audio: Box<dyn AudioSink>) -> Result<Self, SimError> {
        let state = GameState::new(settings)?;
        log::info!(
            "World created (seed {:#x}, {})",
            state.settings.seed,
            state.settings.difficulty.as_str()
        );
        Ok(Self { state, audio })
    }

    /// Advance one step and forward this step's sound cues to the sink
    pub fn tick(&mut self, dt: f32, input: &TickInput) -> Result<FrameEvents, SimError> {
        let frame = tick(&mut self.state, input, dt)?;
        for &cue in &frame.sounds {
            self.audio.play(cue);
        }
        Ok(frame)
    }

    pub fn renderables(&self) -> Vec<Renderable> {
        self.state.renderables()
    }

    pub fn hud(&self) -> HudState {
        self.state.hud()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Stop-the-loop flag (escape/quit)
    pub fn request_quit(&mut self) {
        if self.state.phase != GamePhase::Quit {
            log::info!("Quit requested");
        }
        self.state.phase = GamePhase::Quit;
    }

    pub fn is_running(&self) -> bool {
        self.state.phase != GamePhase::Quit
    }
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            step,
            max_substeps,
        }
    }

    /// Add `elapsed` milliseconds; returns how many ticks to run now.
    /// Time beyond `max_substeps` ticks is dropped.
    pub fn accumulate(&mut self, elapsed: f32) -> u32 {
        if !elapsed.is_finite() || elapsed <= 0.0 {
            return 0;
        }
        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_substeps {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if ticks == self.max_substeps {
            // Spiral of death guard
            self.accumulator = self.accumulator.min(self.step);
        }
        ticks
    }

    pub fn step(&self) -> f32 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::SoundCue;
    use crate::audio::Silent;

    #[test]
    fn test_world_forwards_cues() {
        let heard = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let heard = Rc::clone(&heard);
            move |cue: SoundCue| heard.borrow_mut().push(cue)
        };
        let mut world = World::new(Settings::default(), Box::new(sink)).unwrap();

        // Ship starts under the Play block
        let select = TickInput {
            select: true,
            ..Default::default()
        };
        world.tick(SIM_DT, &select).unwrap();
        assert_eq!(world.phase(), GamePhase::Playing);

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let frame = world.tick(SIM_DT, &fire).unwrap();
        assert_eq!(frame.sounds, vec![SoundCue::PlayerShoot]);
        assert_eq!(*heard.borrow(), vec![SoundCue::PlayerShoot]);
    }

    #[test]
    fn test_world_hud_and_quit() {
        let mut world = World::new(Settings::default(), Box::new(Silent)).unwrap();
        let hud = world.hud();
        assert_eq!(hud.lives, 3);
        assert_eq!(hud.bombs, 1);
        assert!(!hud.shield_active);
        assert!(world.renderables().len() >= 4);

        world.request_quit();
        assert!(!world.is_running());
        let frame = world.tick(SIM_DT, &TickInput::default()).unwrap();
        assert!(frame.quit);
    }

    #[test]
    fn test_world_rejects_bad_settings() {
        let settings = Settings {
            boss_base_lives: 0,
            ..Default::default()
        };
        assert!(World::new(settings, Box::new(Silent)).is_err());
    }

    #[test]
    fn test_fixed_step_accumulates() {
        let mut step = FixedStep::default();
        assert_eq!(step.accumulate(10.0), 0);
        assert_eq!(step.accumulate(10.0), 1);
        assert_eq!(step.accumulate(40.0), 2);
        assert_eq!(step.accumulate(-5.0), 0);
    }

    #[test]
    fn test_fixed_step_caps_substeps() {
        let mut step = FixedStep::new(16.0, 8);
        assert_eq!(step.accumulate(10_000.0), 8);
        // Backlog dropped: at most one more tick pending
        assert!(step.accumulate(0.001) <= 1);
    }
}
