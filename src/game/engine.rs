use std::collections::HashSet;
use std::time::Duration;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    action::Direction,
    config::GameConfig,
    error::GameError,
    state::{GameState, PlayState, Position},
};

/// Event produced by a tick, delivered synchronously to the session loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Runner landed on the bonus; carries the incremented score
    BonusCollected { score: u32 },
    /// Runner landed on a hazard; carries the final score
    GameOver { score: u32 },
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// What the runner landed on, if anything
    pub event: Option<GameEvent>,
    /// Interval the tick loop should run at after this step
    pub tick_interval: Duration,
}

/// Rejection-sampling budget per placement, scaled by grid area
const PLACEMENT_ATTEMPTS_PER_CELL: usize = 64;

/// The game engine: owns the config and RNG, drives all state transitions
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create an engine with an entropy-seeded RNG
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::from_entropy(),
        })
    }

    /// Create an engine with a fixed seed for reproducible sessions
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build a fresh session: runner at the origin heading right, score 0,
    /// one bonus away from the runner, hazards outside the safe zone.
    /// Serves both initialization and restart.
    pub fn reset(&mut self) -> Result<GameState, GameError> {
        let grid_size = self.config.grid_size;
        let runner = Position::new(0, 0);
        let origin = runner.index(grid_size);

        let bonus = self.sample_cell(|cell| cell != origin)?;
        let hazards = self.generate_hazards(runner, bonus)?;
        Ok(GameState::new(grid_size, bonus, hazards))
    }

    /// Start the tick loop. Returns the interval to schedule at, or None
    /// if the command is a no-op (already running, or game over).
    pub fn play(&self, state: &mut GameState, interval: Option<Duration>) -> Option<Duration> {
        match state.play_state {
            PlayState::Running | PlayState::GameOver => None,
            PlayState::Idle | PlayState::Paused => {
                state.play_state = PlayState::Running;
                let interval =
                    interval.unwrap_or_else(|| self.config.interval_for_score(state.score));
                debug!("tick loop starting at {interval:?}");
                Some(interval)
            }
        }
    }

    /// Stop the tick loop. Returns whether the state changed; the caller
    /// stops the scheduler on true.
    pub fn pause(&self, state: &mut GameState) -> bool {
        if state.is_running() {
            state.play_state = PlayState::Paused;
            true
        } else {
            false
        }
    }

    /// Steer the runner; applied on the next tick. Ignored once the
    /// session has ended.
    pub fn set_direction(&self, state: &mut GameState, direction: Direction) {
        if state.is_game_over() {
            return;
        }
        state.direction = direction;
    }

    /// One tick: advance the runner, then resolve what it landed on.
    /// No-op unless the session is running.
    pub fn step(&mut self, state: &mut GameState) -> Result<StepResult, GameError> {
        if !state.is_running() {
            return Ok(StepResult {
                event: None,
                tick_interval: self.config.interval_for_score(state.score),
            });
        }

        state.runner = state.runner.stepped(state.direction, state.grid_size);
        state.ticks += 1;

        let event = if state.is_hazard(state.runner) {
            // Terminal: the state, score included, stays observable until
            // the input layer asks for a restart.
            state.play_state = PlayState::GameOver;
            debug!(
                "hazard hit at {} after {} ticks, final score {}",
                state.runner.cell_id(state.grid_size),
                state.ticks,
                state.score
            );
            Some(GameEvent::GameOver { score: state.score })
        } else if state.is_bonus(state.runner) {
            state.score += 1;
            self.relocate_bonus(state)?;
            state.hazards = self.generate_hazards(state.runner, state.bonus)?;
            debug!("bonus collected, score {}", state.score);
            Some(GameEvent::BonusCollected { score: state.score })
        } else {
            None
        };

        Ok(StepResult {
            event,
            tick_interval: self.config.interval_for_score(state.score),
        })
    }

    /// Move the bonus to a random cell that is not its previous cell, not
    /// the runner, and not a current hazard.
    fn relocate_bonus(&mut self, state: &mut GameState) -> Result<(), GameError> {
        let previous = state.bonus;
        let runner = state.runner.index(state.grid_size);
        let hazards = &state.hazards;

        let bonus =
            self.sample_cell(|cell| cell != previous && cell != runner && !hazards.contains(&cell))?;
        state.bonus = bonus;
        Ok(())
    }

    /// Draw a full hazard set: distinct cells, none on the bonus, none in
    /// the safe zone (the runner's cell and its in-bounds neighbors).
    fn generate_hazards(
        &mut self,
        runner: Position,
        bonus: usize,
    ) -> Result<HashSet<usize>, GameError> {
        let grid_size = self.config.grid_size;

        let mut excluded: HashSet<usize> = HashSet::new();
        excluded.insert(bonus);
        excluded.insert(runner.index(grid_size));
        for cell in runner.neighbors(grid_size) {
            excluded.insert(cell.index(grid_size));
        }

        let mut hazards = HashSet::with_capacity(self.config.hazard_count());
        while hazards.len() < self.config.hazard_count() {
            let cell = self.sample_cell(|c| !excluded.contains(&c) && !hazards.contains(&c))?;
            hazards.insert(cell);
        }
        Ok(hazards)
    }

    /// Rejection sampling with a bounded attempt budget. Validation keeps
    /// the constraints satisfiable, so exhaustion means a logic error
    /// rather than an unlucky streak.
    fn sample_cell<F>(&mut self, accept: F) -> Result<usize, GameError>
    where
        F: Fn(usize) -> bool,
    {
        let cells = self.config.cell_count();
        let attempts = cells * PLACEMENT_ATTEMPTS_PER_CELL;
        for _ in 0..attempts {
            let cell = self.rng.gen_range(0..cells);
            if accept(cell) {
                return Ok(cell);
            }
        }
        Err(GameError::PlacementExhausted { attempts })
    }
}
