use std::collections::HashSet;

use super::action::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major linear index of this cell
    pub fn index(&self, grid_size: usize) -> usize {
        debug_assert!(self.row < grid_size && self.col < grid_size);
        self.row * grid_size + self.col
    }

    /// Rebuild a position from a row-major index
    pub fn from_index(index: usize, grid_size: usize) -> Self {
        debug_assert!(index < grid_size * grid_size);
        Self {
            row: index / grid_size,
            col: index % grid_size,
        }
    }

    /// Stable per-cell identifier for the render layer
    pub fn cell_id(&self, grid_size: usize) -> String {
        format!("{}:{}:{}", self.row, self.col, self.index(grid_size))
    }

    /// One step in a direction, wrapping around the grid edges
    pub fn stepped(&self, direction: Direction, grid_size: usize) -> Self {
        let n = grid_size;
        match direction {
            Direction::Up => Self::new((self.row + n - 1) % n, self.col),
            Direction::Down => Self::new((self.row + 1) % n, self.col),
            Direction::Left => Self::new(self.row, (self.col + n - 1) % n),
            Direction::Right => Self::new(self.row, (self.col + 1) % n),
        }
    }

    /// Orthogonal neighbors that lie within the grid, without wrapping.
    /// Edge cells have fewer than four.
    pub fn neighbors(&self, grid_size: usize) -> Vec<Position> {
        let mut cells = Vec::with_capacity(4);
        if self.row > 0 {
            cells.push(Self::new(self.row - 1, self.col));
        }
        if self.row + 1 < grid_size {
            cells.push(Self::new(self.row + 1, self.col));
        }
        if self.col > 0 {
            cells.push(Self::new(self.row, self.col - 1));
        }
        if self.col + 1 < grid_size {
            cells.push(Self::new(self.row, self.col + 1));
        }
        cells
    }
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    /// Created but never started
    Idle,
    /// Tick loop active
    Running,
    /// Explicitly paused
    Paused,
    /// Runner hit a hazard; only restart recovers
    GameOver,
}

/// Complete session state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub grid_size: usize,
    pub runner: Position,
    pub direction: Direction,
    /// Cell index of the single bonus tile
    pub bonus: usize,
    /// Cell indices of the hazards, one per grid row
    pub hazards: HashSet<usize>,
    pub score: u32,
    pub play_state: PlayState,
    pub ticks: u32,
}

impl GameState {
    /// Create a fresh session with the given bonus and hazard placement
    pub fn new(grid_size: usize, bonus: usize, hazards: HashSet<usize>) -> Self {
        Self {
            grid_size,
            runner: Position::new(0, 0),
            direction: Direction::Right,
            bonus,
            hazards,
            score: 0,
            play_state: PlayState::Idle,
            ticks: 0,
        }
    }

    pub fn is_hazard(&self, pos: Position) -> bool {
        self.hazards.contains(&pos.index(self.grid_size))
    }

    pub fn is_bonus(&self, pos: Position) -> bool {
        pos.index(self.grid_size) == self.bonus
    }

    pub fn is_running(&self) -> bool {
        self.play_state == PlayState::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.play_state == PlayState::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        let pos = Position::new(3, 7);
        assert_eq!(pos.index(10), 37);
        assert_eq!(Position::from_index(37, 10), pos);
        assert_eq!(Position::new(0, 0).index(10), 0);
        assert_eq!(Position::new(9, 9).index(10), 99);
    }

    #[test]
    fn test_cell_id_format() {
        assert_eq!(Position::new(2, 4).cell_id(10), "2:4:24");
        assert_eq!(Position::new(0, 0).cell_id(5), "0:0:0");
    }

    #[test]
    fn test_step_interior() {
        let pos = Position::new(2, 2);
        assert_eq!(pos.stepped(Direction::Up, 5), Position::new(1, 2));
        assert_eq!(pos.stepped(Direction::Down, 5), Position::new(3, 2));
        assert_eq!(pos.stepped(Direction::Left, 5), Position::new(2, 1));
        assert_eq!(pos.stepped(Direction::Right, 5), Position::new(2, 3));
    }

    #[test]
    fn test_step_wraps_at_edges() {
        let n = 5;
        assert_eq!(
            Position::new(0, 2).stepped(Direction::Up, n),
            Position::new(4, 2)
        );
        assert_eq!(
            Position::new(4, 2).stepped(Direction::Down, n),
            Position::new(0, 2)
        );
        assert_eq!(
            Position::new(2, 0).stepped(Direction::Left, n),
            Position::new(2, 4)
        );
        assert_eq!(
            Position::new(2, 4).stepped(Direction::Right, n),
            Position::new(2, 0)
        );
    }

    #[test]
    fn test_step_stays_in_bounds() {
        let n = 3;
        let directions = [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ];
        let mut pos = Position::new(0, 0);
        for i in 0..100 {
            pos = pos.stepped(directions[i % directions.len()], n);
            assert!(pos.row < n && pos.col < n);
        }
    }

    #[test]
    fn test_neighbors_respect_bounds() {
        let corner = Position::new(0, 0).neighbors(5);
        assert_eq!(corner.len(), 2);
        assert!(corner.contains(&Position::new(1, 0)));
        assert!(corner.contains(&Position::new(0, 1)));

        let edge = Position::new(0, 2).neighbors(5);
        assert_eq!(edge.len(), 3);

        let interior = Position::new(2, 2).neighbors(5);
        assert_eq!(interior.len(), 4);
    }

    #[test]
    fn test_state_queries() {
        let hazards: HashSet<usize> = [7, 12, 18].into_iter().collect();
        let state = GameState::new(5, 3, hazards);

        assert!(state.is_bonus(Position::new(0, 3)));
        assert!(state.is_hazard(Position::new(1, 2)));
        assert!(!state.is_hazard(Position::new(0, 0)));
        assert_eq!(state.play_state, PlayState::Idle);
        assert!(!state.is_running());
    }
}
