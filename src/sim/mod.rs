/// Session state, level generation and the state machine that drives them.

pub mod event;
pub mod level;
pub mod step;
pub mod world;
