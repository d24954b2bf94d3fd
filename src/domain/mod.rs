/// Pure game rules: board geometry, entities, motion and collision.
/// Nothing in here knows about phases, lives or score.

pub mod board;
pub mod constants;
pub mod entity;
pub mod geometry;
pub mod motion;
pub mod rules;
