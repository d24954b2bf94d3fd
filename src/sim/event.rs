/// Events emitted by the state machine.
/// The presentation layer consumes these for messages and sound.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Hopped { col: usize, row: usize },
    Drowned,
    Crushed,
    GoalReached { slot: usize, points: u32 },
    BoundaryBonus { points: u32 },
    LevelCleared { level: u32 },
    GameOver,
    Victory { bonus: u32 },
}
