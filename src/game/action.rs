/// Direction the runner moves in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Command the session accepts from the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Steer the runner; takes effect on the next tick
    SetDirection(Direction),
    /// Start the automatic tick loop
    Play,
    /// Stop the automatic tick loop
    Pause,
    /// Discard the session and reinitialize
    Restart,
}

impl From<Direction> for Command {
    fn from(direction: Direction) -> Self {
        Command::SetDirection(direction)
    }
}
