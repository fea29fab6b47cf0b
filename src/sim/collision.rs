//! Collision detection for the rectangular arena
//!
//! Everything is axis-aligned: walls are half-plane checks, the paddle is a
//! vertical band plus a horizontal reach, bricks are AABB overlap tests that
//! resolve along the axis of lesser penetration. The lesser-penetration rule
//! is deliberately approximate on corner hits; behavior compatibility beats
//! physical realism here.

use glam::Vec2;

use crate::consts::*;

/// Which velocity component a brick hit reflects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Ball vs. brick AABB overlap, inflated by the ball radius.
///
/// Returns the reflection axis if they overlap: x when the lateral gap is
/// the larger of the two (side hit), y otherwise.
pub fn ball_brick_overlap(ball_pos: Vec2, ball_radius: f32, brick_pos: Vec2) -> Option<Axis> {
    let dx = (ball_pos.x - brick_pos.x).abs();
    let dy = (ball_pos.y - brick_pos.y).abs();

    if dx < BRICK_WIDTH / 2.0 + ball_radius && dy < BRICK_HEIGHT / 2.0 + ball_radius {
        Some(if dx > dy { Axis::X } else { Axis::Y })
    } else {
        None
    }
}

/// Ball vs. paddle: inside the vertical band around the paddle line and
/// within horizontal reach of the paddle center
pub fn hits_paddle(ball_pos: Vec2, paddle_x: f32) -> bool {
    ball_pos.y < PADDLE_Y + PADDLE_BAND
        && ball_pos.y > PADDLE_Y - PADDLE_BAND
        && (ball_pos.x - paddle_x).abs() < PADDLE_HIT_HALF_WIDTH
}

/// Past either side wall
#[inline]
pub fn past_side_wall(x: f32) -> bool {
    x > WALL_X || x < -WALL_X
}

/// Past the ceiling
#[inline]
pub fn past_ceiling(y: f32) -> bool {
    y > WALL_TOP_Y
}

/// Below the floor line (life loss, not a bounce)
#[inline]
pub fn below_floor(y: f32) -> bool {
    y < FLOOR_Y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brick_side_hit_reflects_x() {
        // Ball level with the brick center, overlapping from the right
        let brick = Vec2::new(0.0, 5.0);
        let ball = Vec2::new(BRICK_WIDTH / 2.0 + 0.5, 5.0);
        assert_eq!(ball_brick_overlap(ball, BALL_RADIUS, brick), Some(Axis::X));
    }

    #[test]
    fn brick_bottom_hit_reflects_y() {
        let brick = Vec2::new(0.0, 5.0);
        let ball = Vec2::new(0.0, 5.0 - BRICK_HEIGHT / 2.0 - 0.5);
        assert_eq!(ball_brick_overlap(ball, BALL_RADIUS, brick), Some(Axis::Y));
    }

    #[test]
    fn brick_miss() {
        let brick = Vec2::new(0.0, 5.0);
        let ball = Vec2::new(BRICK_WIDTH / 2.0 + BALL_RADIUS + 0.1, 5.0);
        assert_eq!(ball_brick_overlap(ball, BALL_RADIUS, brick), None);
    }

    #[test]
    fn paddle_hit_band() {
        // On the paddle line, within reach
        assert!(hits_paddle(Vec2::new(2.0, PADDLE_Y + 0.5), 0.0));
        // Too far to the side
        assert!(!hits_paddle(Vec2::new(PADDLE_HIT_HALF_WIDTH + 0.1, PADDLE_Y), 0.0));
        // Right vertical range but paddle is elsewhere
        assert!(!hits_paddle(Vec2::new(2.0, PADDLE_Y), 10.0));
        // Above the band
        assert!(!hits_paddle(Vec2::new(0.0, PADDLE_Y + PADDLE_BAND + 0.1), 0.0));
    }

    #[test]
    fn wall_checks() {
        assert!(past_side_wall(WALL_X + 0.01));
        assert!(past_side_wall(-WALL_X - 0.01));
        assert!(!past_side_wall(0.0));
        assert!(past_ceiling(WALL_TOP_Y + 0.01));
        assert!(below_floor(FLOOR_Y - 0.01));
        assert!(!below_floor(FLOOR_Y + 0.01));
    }
}
