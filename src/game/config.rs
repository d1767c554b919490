use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::GameError;

/// Smallest grid on which bonus and hazard placement stays satisfiable:
/// the safe zone around the runner plus the bonus cell must leave at
/// least `grid_size` free cells for hazards.
pub const MIN_GRID_SIZE: usize = 3;

/// Configuration for a game session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    /// Tick interval at score 0, in milliseconds
    pub base_tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            base_tick_ms: 500,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Small grid for tests
    pub fn small() -> Self {
        Self::new(5)
    }

    /// Reject configurations the placement constraints cannot satisfy
    pub fn validate(&self) -> Result<(), GameError> {
        if self.grid_size < MIN_GRID_SIZE {
            return Err(GameError::GridTooSmall(self.grid_size));
        }
        if self.base_tick_ms == 0 {
            return Err(GameError::ZeroTickInterval);
        }
        Ok(())
    }

    /// Total number of cells on the grid
    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Number of hazards on the grid, one per row
    pub fn hazard_count(&self) -> usize {
        self.grid_size
    }

    /// Tick interval for a score. Piecewise constant and non-increasing;
    /// each bracket is capped at the base so a fast base stays fast.
    pub fn interval_for_score(&self, score: u32) -> Duration {
        let bracket_ms = match score {
            0 => self.base_tick_ms,
            1..=4 => 400,
            5..=9 => 300,
            10..=19 => 200,
            _ => 100,
        };
        Duration::from_millis(bracket_ms.min(self.base_tick_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 10);
        assert_eq!(config.base_tick_ms, 500);
        assert_eq!(config.hazard_count(), 10);
        assert_eq!(config.cell_count(), 100);
    }

    #[test]
    fn test_validation_rejects_tiny_grids() {
        assert_eq!(
            GameConfig::new(2).validate(),
            Err(GameError::GridTooSmall(2))
        );
        assert_eq!(GameConfig::new(0).validate(), Err(GameError::GridTooSmall(0)));
        assert!(GameConfig::new(3).validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_tick() {
        let config = GameConfig {
            grid_size: 10,
            base_tick_ms: 0,
        };
        assert_eq!(config.validate(), Err(GameError::ZeroTickInterval));
    }

    #[test]
    fn test_interval_brackets() {
        let config = GameConfig::default();
        assert_eq!(config.interval_for_score(0), Duration::from_millis(500));
        assert_eq!(config.interval_for_score(1), Duration::from_millis(400));
        assert_eq!(config.interval_for_score(4), Duration::from_millis(400));
        assert_eq!(config.interval_for_score(5), Duration::from_millis(300));
        assert_eq!(config.interval_for_score(9), Duration::from_millis(300));
        assert_eq!(config.interval_for_score(10), Duration::from_millis(200));
        assert_eq!(config.interval_for_score(19), Duration::from_millis(200));
        assert_eq!(config.interval_for_score(20), Duration::from_millis(100));
        assert_eq!(config.interval_for_score(1000), Duration::from_millis(100));
    }

    #[test]
    fn test_interval_never_exceeds_base() {
        let config = GameConfig {
            grid_size: 10,
            base_tick_ms: 150,
        };
        assert_eq!(config.interval_for_score(0), Duration::from_millis(150));
        assert_eq!(config.interval_for_score(3), Duration::from_millis(150));
        assert_eq!(config.interval_for_score(25), Duration::from_millis(100));
    }
}
