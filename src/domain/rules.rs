/// Collision & carrying rules: first match wins.
///
/// Pure classification of the player's hit rect against the obstacle
/// collections and the goal slots. The only mutation is marking a goal
/// slot filled when it is entered.
///
/// ## Evaluation order
/// ┌───┬────────────────────────────────────────────┬──────────────────┐
/// │ # │ Condition                                  │ Outcome          │
/// ├───┼────────────────────────────────────────────┼──────────────────┤
/// │ 1 │ in water band, overlaps no platform        │ Drowned          │
/// │ 2 │ overlaps any hazard                        │ Crushed          │
/// │ 3 │ overlaps an unfilled goal slot             │ GoalReached      │
/// │ 4 │ row above the water band (row < 1)         │ BoundaryBonus    │
/// │ 5 │ otherwise                                  │ NoEvent          │
/// └───┴────────────────────────────────────────────┴──────────────────┘
///
/// A platform found in step 1 also yields a carry: its signed per-tick
/// speed. Checks 2-4 use the carried probe rect. The caller shifts the
/// player's rect by the carry, and the next `refresh_rect` throws it away,
/// so riding never moves the player between turns.

use super::entity::{GoalSlot, Obstacle, Player};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Drowned,
    Crushed,
    GoalReached { slot: usize },
    BoundaryBonus,
    NoEvent,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Detection {
    pub outcome: Outcome,
    /// Pixel displacement from the platform being ridden, if any.
    pub carry: Option<i32>,
}

/// Classify `player.rect` (expected to be freshly refreshed).
pub fn detect(
    player: &Player,
    hazards: &[Obstacle],
    platforms: &[Obstacle],
    goals: &mut [GoalSlot],
) -> Detection {
    let mut probe = player.rect;
    let mut carry = None;

    if player.is_in_water_band() {
        match platforms.iter().find(|p| p.rect().overlaps(&probe)) {
            Some(platform) => {
                let dx = platform.velocity();
                probe = probe.shifted_x(dx);
                carry = Some(dx);
            }
            None => return Detection { outcome: Outcome::Drowned, carry: None },
        }
    }

    let outcome = if hazards.iter().any(|h| h.rect().overlaps(&probe)) {
        Outcome::Crushed
    } else if let Some(slot) = goals.iter().position(|g| !g.filled && g.rect.overlaps(&probe)) {
        goals[slot].filled = true;
        Outcome::GoalReached { slot }
    } else if player.row < 1 {
        Outcome::BoundaryBonus
    } else {
        Outcome::NoEvent
    };

    Detection { outcome, carry }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
