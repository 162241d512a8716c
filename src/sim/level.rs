/// Level initializer.
///
/// Every level uses the same brick wall; only the ball speed changes:
///   speed(level) = base + (level - 1) * per_level     (per axis)
///
/// The paddle is never touched here: it stays wherever the player left it,
/// across lives, levels and restarts.

use crate::domain::consts::{BALL_RESET_RISE, FIELD_HEIGHT, FIELD_WIDTH};
use crate::domain::physics;
use crate::sim::world::WorldState;

/// Put the ball back in play: centered, `BALL_RESET_RISE` above the
/// field's middle, heading up and to the right at the base speed.
pub fn reset_ball(world: &mut WorldState) {
    let speed = world.tuning.base_ball_speed;
    let ball = &mut world.ball;
    ball.x = FIELD_WIDTH / 2.0;
    ball.y = FIELD_HEIGHT / 2.0 - BALL_RESET_RISE;
    ball.speed_x = speed;
    ball.speed_y = -speed;
}

/// Rebuild the wall and serve for `level` (1-based).
/// Score, lives and the session's level counter are left to the caller.
pub fn reset_level(world: &mut WorldState, level: u32) {
    debug_assert!(level >= 1, "levels are 1-based");

    reset_ball(world);
    world.bricks.reactivate_all();

    // Keep the direction chosen by reset_ball, scale the magnitude.
    let speed = physics::level_speed(level, world.tuning.base_ball_speed, world.tuning.speed_per_level);
    let ball = &mut world.ball;
    ball.speed_x = speed.copysign(ball.speed_x);
    ball.speed_y = speed.copysign(ball.speed_y);

    log::info!("level {level} ready: ball speed {speed}");
}
