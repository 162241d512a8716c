/// The step function: advances the world by one frame of `dt` seconds.
///
/// Processing order (fixed; later stages see earlier stages' results):
///   1. Paddle control
///   2. Ball translation
///   3. Wall bounce (sides, ceiling)
///   4. Floor: lose a life, serve again or end the game
///   5. Paddle bounce
///   6. Brick hit (first overlap only) and clear check
///
/// Stages 5 and 6 still run on the frame a life is lost; the phase change
/// only stops the *next* step.
///
/// No fixed timestep: movement scales with the measured frame time.

use crate::domain::consts::FIELD_WIDTH;
use crate::domain::entity::FrameInput;
use crate::domain::grid::BrickGrid;
use crate::domain::physics;
use super::event::GameEvent;
use super::level;
use super::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: FrameInput, dt: f32) -> Vec<GameEvent> {
    if world.phase != Phase::Playing { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.frame += 1;

    resolve_paddle(world, input, dt);
    resolve_ball_motion(world, dt);
    resolve_walls(world, &mut events);
    resolve_floor(world, &mut events);
    resolve_paddle_hit(world, &mut events);
    resolve_bricks(world, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

/// Left and right are checked independently: holding both moves the paddle
/// back and forth by the same amount unless it is against a wall.
fn resolve_paddle(world: &mut WorldState, input: FrameInput, dt: f32) {
    let paddle = &mut world.paddle;
    if input.left && paddle.x > 0.0 {
        paddle.x -= paddle.speed * dt;
    }
    if input.right && paddle.right() < FIELD_WIDTH {
        paddle.x += paddle.speed * dt;
    }
}

fn resolve_ball_motion(world: &mut WorldState, dt: f32) {
    let ball = &mut world.ball;
    ball.x += ball.speed_x * dt;
    ball.y += ball.speed_y * dt;
}

// ══════════════════════════════════════════════════════════════
// Walls / floor
// ══════════════════════════════════════════════════════════════

/// Flip the offending axis; position is not corrected.
fn resolve_walls(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let ball = &mut world.ball;
    let mut bounced = false;
    if physics::hits_side_wall(ball) {
        ball.speed_x = -ball.speed_x;
        bounced = true;
    }
    if physics::hits_ceiling(ball) {
        ball.speed_y = -ball.speed_y;
        bounced = true;
    }
    if bounced {
        events.push(GameEvent::WallBounce);
    }
}

fn resolve_floor(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if !physics::below_floor(&world.ball) { return; }

    world.lives = world.lives.saturating_sub(1);
    if world.lives == 0 {
        world.phase = Phase::GameOver;
        log::info!("game over: level {}, score {}, frame {}", world.level, world.score, world.frame);
        events.push(GameEvent::GameOver);
    } else {
        level::reset_ball(world);
        log::debug!("ball lost, {} lives left", world.lives);
        events.push(GameEvent::LifeLost { lives_left: world.lives });
    }
}

// ══════════════════════════════════════════════════════════════
// Paddle / bricks
// ══════════════════════════════════════════════════════════════

fn resolve_paddle_hit(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if !physics::paddle_catches(&world.ball, &world.paddle) { return; }

    let ball = &mut world.ball;
    ball.speed_y = -ball.speed_y;
    ball.speed_x = physics::deflection_speed(ball.x, &world.paddle);
    events.push(GameEvent::PaddleHit);
}

/// At most one brick per frame, lowest row-major index wins.
fn resolve_bricks(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if let Some(idx) = world.bricks.first_hit(&world.ball) {
        world.bricks.deactivate(idx);
        world.ball.speed_y = -world.ball.speed_y;
        world.score += world.tuning.brick_score;

        let (row, col) = BrickGrid::cell(idx);
        log::debug!("brick ({row}, {col}) destroyed, score {}", world.score);
        events.push(GameEvent::BrickDestroyed { row, col });
    }

    if world.bricks.active_count() == 0 && world.phase == Phase::Playing {
        world.phase = Phase::LevelComplete;
        log::info!("level {} cleared, score {}, frame {}", world.level, world.score, world.frame);
        events.push(GameEvent::LevelCleared);
    }
}
