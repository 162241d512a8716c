/// Collision primitives: pure queries, no mutation.
///
/// ## Model
///
/// The ball is a circle, everything else is an axis-aligned rectangle.
/// Responses are axis flips decided by `sim::step`; nothing here clamps
/// positions or sweeps between frames, so a fast ball can tunnel.
///
/// ## Wall / floor tests
///
/// ┌──────────────┬──────────────────────────────┬──────────────────┐
/// │ Test          │ Condition                     │ Response         │
/// ├──────────────┼──────────────────────────────┼──────────────────┤
/// │ side wall     │ right > width, moving right   │ negate speed_x   │
/// │               │ left < 0, moving left         │                  │
/// │ ceiling       │ top < 0, moving up            │ negate speed_y   │
/// │ floor         │ bottom > height               │ lose a life      │
/// └──────────────┴──────────────────────────────┴──────────────────┘
///
/// ## Paddle hit
///
/// Overlap alone is not enough: the ball must be moving down and its
/// bottom edge must sit no lower than the paddle's vertical midpoint.
/// That approximates "hit from the top only".

use super::consts::{FIELD_HEIGHT, FIELD_WIDTH, PADDLE_DEFLECTION};
use super::entity::{Ball, Paddle, Rect};

/// Circle vs. axis-aligned rectangle. Touching counts as overlap.
///
/// Clamps the circle center onto the rectangle and compares the squared
/// distance to the closest point against the squared radius.
#[inline]
pub fn circle_rect_overlap(cx: f32, cy: f32, radius: f32, rect: &Rect) -> bool {
    let closest_x = cx.max(rect.x).min(rect.right());
    let closest_y = cy.max(rect.y).min(rect.bottom());
    let dx = cx - closest_x;
    let dy = cy - closest_y;
    dx * dx + dy * dy <= radius * radius
}

#[inline]
pub fn ball_overlaps(ball: &Ball, rect: &Rect) -> bool {
    circle_rect_overlap(ball.x, ball.y, ball.radius, rect)
}

/// Ball edge beyond the left or right wall, still heading outward.
/// A ball that already turned back is left alone until it re-enters,
/// so one crossing yields exactly one flip.
#[inline]
pub fn hits_side_wall(ball: &Ball) -> bool {
    (ball.right() > FIELD_WIDTH && ball.speed_x > 0.0)
        || (ball.left() < 0.0 && ball.speed_x < 0.0)
}

#[inline]
pub fn hits_ceiling(ball: &Ball) -> bool {
    ball.top() < 0.0 && ball.speed_y < 0.0
}

/// Ball bottom edge has dropped past the floor.
#[inline]
pub fn below_floor(ball: &Ball) -> bool {
    ball.bottom() > FIELD_HEIGHT
}

/// Does the paddle catch the ball this frame?
pub fn paddle_catches(ball: &Ball, paddle: &Paddle) -> bool {
    if !ball_overlaps(ball, &paddle.rect()) {
        return false;
    }
    ball.speed_y > 0.0 && ball.bottom() <= paddle.y + paddle.height / 2.0
}

/// Fraction of the paddle width at which the ball center sits,
/// measured from the paddle's left edge (0.0 = left edge, 1.0 = right edge).
/// Not clamped: a ball overlapping a corner may land slightly outside [0, 1].
#[inline]
pub fn hit_position(ball_x: f32, paddle: &Paddle) -> f32 {
    (ball_x - paddle.x) / paddle.width
}

/// Horizontal speed after a paddle hit.
/// Center hits go straight up, edge hits deflect up to ±PADDLE_DEFLECTION/2.
#[inline]
pub fn deflection_speed(ball_x: f32, paddle: &Paddle) -> f32 {
    (hit_position(ball_x, paddle) - 0.5) * PADDLE_DEFLECTION
}

/// Per-axis ball speed magnitude at the start of `level` (1-based).
#[inline]
pub fn level_speed(level: u32, base: f32, per_level: f32) -> f32 {
    debug_assert!(level >= 1, "levels are 1-based");
    base + level.saturating_sub(1) as f32 * per_level
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::consts::*;

    fn ball_at(x: f32, y: f32, sx: f32, sy: f32) -> Ball {
        let mut b = Ball::new(BASE_BALL_SPEED);
        b.x = x;
        b.y = y;
        b.speed_x = sx;
        b.speed_y = sy;
        b
    }

    // ── circle_rect_overlap ──

    #[test]
    fn overlap_center_inside() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(circle_rect_overlap(5.0, 5.0, 1.0, &r));
    }

    #[test]
    fn overlap_edge_touch_counts() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        // exactly radius away from the right edge
        assert!(circle_rect_overlap(13.0, 5.0, 3.0, &r));
        assert!(!circle_rect_overlap(13.01, 5.0, 3.0, &r));
    }

    #[test]
    fn overlap_corner_uses_distance() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        // (13, 14) is 3-4-5 from the corner (10, 10)
        assert!(circle_rect_overlap(13.0, 14.0, 5.0, &r));
        assert!(!circle_rect_overlap(13.0, 14.0, 4.9, &r));
    }

    // ── walls ──

    #[test]
    fn side_walls() {
        assert!(hits_side_wall(&ball_at(795.0, 300.0, 1.0, 0.0)));
        assert!(hits_side_wall(&ball_at(5.0, 300.0, -1.0, 0.0)));
        // touching exactly is still in bounds
        assert!(!hits_side_wall(&ball_at(790.0, 300.0, 1.0, 0.0)));
        assert!(!hits_side_wall(&ball_at(10.0, 300.0, 1.0, 0.0)));
    }

    #[test]
    fn side_wall_ignores_returning_ball() {
        assert!(!hits_side_wall(&ball_at(795.0, 300.0, -1.0, 0.0)));
        assert!(!hits_side_wall(&ball_at(5.0, 300.0, 1.0, 0.0)));
    }

    #[test]
    fn ceiling_and_floor() {
        assert!(hits_ceiling(&ball_at(400.0, 9.0, 0.0, -1.0)));
        assert!(!hits_ceiling(&ball_at(400.0, 10.0, 0.0, -1.0)));
        assert!(!hits_ceiling(&ball_at(400.0, 9.0, 0.0, 1.0)));
        assert!(below_floor(&ball_at(400.0, 591.0, 0.0, 1.0)));
        assert!(!below_floor(&ball_at(400.0, 590.0, 0.0, 1.0)));
    }

    // ── paddle ──

    #[test]
    fn paddle_catches_from_top() {
        let p = Paddle::new(PADDLE_SPEED);
        // bottom edge at 565: below the paddle top (560), above the midpoint (570)
        assert!(paddle_catches(&ball_at(400.0, 555.0, 0.0, 300.0), &p));
    }

    #[test]
    fn paddle_ignores_rising_ball() {
        let p = Paddle::new(PADDLE_SPEED);
        assert!(!paddle_catches(&ball_at(400.0, 555.0, 0.0, -300.0), &p));
    }

    #[test]
    fn paddle_catches_at_exact_midpoint() {
        let p = Paddle::new(PADDLE_SPEED);
        // bottom edge at 570 == midpoint 570
        assert!(paddle_catches(&ball_at(400.0, 560.0, 0.0, 300.0), &p));
    }

    #[test]
    fn paddle_ignores_ball_past_midpoint() {
        let p = Paddle::new(PADDLE_SPEED);
        // bottom edge at 575 > midpoint 570
        assert!(!paddle_catches(&ball_at(400.0, 565.0, 0.0, 300.0), &p));
    }

    #[test]
    fn paddle_misses_far_ball() {
        let p = Paddle::new(PADDLE_SPEED);
        assert!(!paddle_catches(&ball_at(100.0, 555.0, 0.0, 300.0), &p));
    }

    #[test]
    fn deflection_edges_and_center() {
        let p = Paddle::new(PADDLE_SPEED);
        assert_eq!(p.x, 350.0);
        assert_eq!(deflection_speed(350.0, &p), -300.0);
        assert_eq!(deflection_speed(400.0, &p), 0.0);
        assert_eq!(deflection_speed(450.0, &p), 300.0);
    }

    #[test]
    fn level_speed_scales_linearly() {
        assert_eq!(level_speed(1, BASE_BALL_SPEED, SPEED_PER_LEVEL), 300.0);
        assert_eq!(level_speed(3, BASE_BALL_SPEED, SPEED_PER_LEVEL), 400.0);
        assert_eq!(level_speed(10, BASE_BALL_SPEED, SPEED_PER_LEVEL), 750.0);
    }
}
