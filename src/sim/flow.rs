/// Game state machine: the player-driven transitions out of the end states.
///
/// ```text
///   Playing ──lives → 0───▶ GameOver ───────Restart──▶ Playing (level 1)
///   Playing ──bricks → 0──▶ LevelComplete ──Advance──▶ Playing (level + 1)
/// ```
///
/// `step` owns the two automatic transitions; this module owns the two
/// manual ones. Commands that don't match the current phase are ignored.

use crate::domain::consts::MAX_LIVES;
use super::level;
use super::world::{Phase, WorldState};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    /// GameOver → Playing, fresh session
    Restart,
    /// LevelComplete → Playing, next level
    Advance,
}

/// Route a command. Returns true if it caused a transition.
pub fn apply(world: &mut WorldState, command: Command) -> bool {
    match (world.phase, command) {
        (Phase::GameOver, Command::Restart) => {
            restart_game(world);
            true
        }
        (Phase::LevelComplete, Command::Advance) => {
            advance_level(world);
            true
        }
        _ => false,
    }
}

/// Back to level 1 with full lives and no score.
pub fn restart_game(world: &mut WorldState) {
    world.lives = MAX_LIVES;
    world.score = 0;
    world.level = 1;
    level::reset_level(world, 1);
    world.phase = Phase::Playing;
    world.set_message("Level 1", 90);
    log::info!("new game");
}

/// Next level; score and lives carry over.
pub fn advance_level(world: &mut WorldState) {
    world.level += 1;
    let next = world.level;
    level::reset_level(world, next);
    world.phase = Phase::Playing;
    world.set_message(&format!("Level {next}"), 90);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::consts::BRICK_COUNT;

    fn ended_game() -> WorldState {
        let mut w = WorldState::new();
        w.phase = Phase::GameOver;
        w.lives = 0;
        w.score = 730;
        w.level = 4;
        for i in 0..20 {
            w.bricks.deactivate(i);
        }
        w
    }

    fn cleared_level() -> WorldState {
        let mut w = WorldState::new();
        w.phase = Phase::LevelComplete;
        w.lives = 2;
        w.score = 500;
        w.level = 2;
        for i in 0..BRICK_COUNT {
            w.bricks.deactivate(i);
        }
        w
    }

    #[test]
    fn restart_resets_session() {
        let mut w = ended_game();
        assert!(apply(&mut w, Command::Restart));
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.score, 0);
        assert_eq!(w.level, 1);
        assert_eq!(w.lives, MAX_LIVES);
        assert_eq!(w.bricks.active_count(), BRICK_COUNT);
        // level 1 speed, serving upward
        assert_eq!((w.ball.speed_x, w.ball.speed_y), (300.0, -300.0));
    }

    #[test]
    fn advance_keeps_score_and_lives() {
        let mut w = cleared_level();
        assert!(apply(&mut w, Command::Advance));
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.level, 3);
        assert_eq!(w.score, 500);
        assert_eq!(w.lives, 2);
        assert_eq!(w.bricks.active_count(), BRICK_COUNT);
        assert_eq!((w.ball.speed_x, w.ball.speed_y), (400.0, -400.0));
        assert_eq!(w.message, "Level 3");
    }

    #[test]
    fn commands_ignored_while_playing() {
        let mut w = WorldState::new();
        w.score = 40;
        w.bricks.deactivate(0);
        assert!(!apply(&mut w, Command::Restart));
        assert!(!apply(&mut w, Command::Advance));
        assert_eq!(w.score, 40);
        assert_eq!(w.level, 1);
        assert_eq!(w.bricks.active_count(), BRICK_COUNT - 1);
    }

    #[test]
    fn wrong_command_for_phase_is_ignored() {
        let mut w = ended_game();
        assert!(!apply(&mut w, Command::Advance));
        assert_eq!(w.phase, Phase::GameOver);
        assert_eq!(w.level, 4);

        let mut w = cleared_level();
        assert!(!apply(&mut w, Command::Restart));
        assert_eq!(w.phase, Phase::LevelComplete);
        assert_eq!(w.score, 500);
    }

    #[test]
    fn paddle_survives_restart() {
        let mut w = ended_game();
        w.paddle.x = 42.0;
        restart_game(&mut w);
        assert_eq!(w.paddle.x, 42.0);
    }
}
