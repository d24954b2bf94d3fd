/// Obstacle motion: per-tick horizontal advance with wraparound.
///
/// Obstacles are never removed mid-level. Once an obstacle fully leaves
/// the screen on its travel side it re-enters from the opposite edge, so
/// after every advance `-width <= x <= SCREEN_WIDTH` holds.

use super::constants::SCREEN_WIDTH;
use super::entity::Obstacle;

pub fn advance(ob: &mut Obstacle) {
    ob.x += ob.velocity();
    if ob.rightward {
        if ob.x > SCREEN_WIDTH {
            ob.x = -ob.width();
        }
    } else if ob.x < -ob.width() {
        ob.x = SCREEN_WIDTH;
    }
}

pub fn advance_all(obstacles: &mut [Obstacle]) {
    for ob in obstacles {
        advance(ob);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::ObstacleKind;
    use proptest::prelude::*;

    #[test]
    fn moves_by_signed_speed() {
        let mut right = Obstacle::new(ObstacleKind::Hazard, 4, true);
        let mut left = Obstacle::new(ObstacleKind::Platform, 1, false);
        advance(&mut right);
        advance(&mut left);
        assert_eq!(right.x, 3);
        assert_eq!(left.x, 558);
    }

    #[test]
    fn lane_never_changes() {
        let mut ob = Obstacle::new(ObstacleKind::Hazard, 6, false);
        let (lane, y) = (ob.lane, ob.y);
        for _ in 0..1000 {
            advance(&mut ob);
        }
        assert_eq!((ob.lane, ob.y), (lane, y));
    }

    #[test]
    fn rightward_wraps_to_left_edge() {
        let mut ob = Obstacle::new(ObstacleKind::Hazard, 4, true);
        ob.x = SCREEN_WIDTH; // at the edge, not past it
        advance(&mut ob);
        assert_eq!(ob.x, -80);
        advance(&mut ob);
        assert_eq!(ob.x, -77);
    }

    #[test]
    fn rightward_stays_at_exact_edge() {
        let mut ob = Obstacle::new(ObstacleKind::Platform, 1, true);
        ob.x = SCREEN_WIDTH - 2;
        advance(&mut ob);
        assert_eq!(ob.x, SCREEN_WIDTH);
    }

    #[test]
    fn leftward_wraps_to_right_edge() {
        let mut ob = Obstacle::new(ObstacleKind::Platform, 2, false);
        ob.x = -119;
        advance(&mut ob);
        assert_eq!(ob.x, SCREEN_WIDTH);
    }

    #[test]
    fn leftward_stays_at_exact_edge() {
        let mut ob = Obstacle::new(ObstacleKind::Platform, 2, false);
        ob.x = -118;
        advance(&mut ob);
        assert_eq!(ob.x, -120);
    }

    #[test]
    fn advance_all_moves_every_obstacle() {
        let mut obs = vec![
            Obstacle::new(ObstacleKind::Hazard, 4, true),
            Obstacle::new(ObstacleKind::Hazard, 5, false),
        ];
        advance_all(&mut obs);
        assert_eq!(obs[0].x, 3);
        assert_eq!(obs[1].x, 557);
    }

    proptest! {
        #[test]
        fn position_stays_in_wrap_band(
            platform in any::<bool>(),
            rightward in any::<bool>(),
            start in -120i32..=560,
            ticks in 0usize..2000,
        ) {
            let kind = if platform { ObstacleKind::Platform } else { ObstacleKind::Hazard };
            let mut ob = Obstacle::new(kind, 3, rightward);
            ob.x = start.max(-ob.width());
            for _ in 0..ticks {
                advance(&mut ob);
                prop_assert!(ob.x >= -ob.width() && ob.x <= SCREEN_WIDTH, "x = {}", ob.x);
            }
        }
    }
}
