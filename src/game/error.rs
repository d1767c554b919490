use thiserror::Error;

use super::config::MIN_GRID_SIZE;

/// Errors the game core can produce
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Grid too small to place hazards outside the exclusion zones
    #[error("grid size {0} is below the minimum of {}", MIN_GRID_SIZE)]
    GridTooSmall(usize),

    /// A zero interval would make the tick loop spin
    #[error("base tick interval must be non-zero")]
    ZeroTickInterval,

    /// Rejection sampling ran out of attempts; only reachable with a
    /// config that bypassed validation
    #[error("no free cell found after {attempts} placement attempts")]
    PlacementExhausted { attempts: usize },
}
