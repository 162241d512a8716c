/// WorldState: the complete snapshot of a running game.
///
/// ## Ownership
///
/// One `WorldState` lives in `main` for the whole session and is handed to
/// `step`, `flow` and the renderer by reference. Nothing else holds game
/// state, so each frame has exactly one writer.
///
/// ## Phase
///
/// `Playing`, `GameOver` and `LevelComplete` are mutually exclusive by
/// construction. `paused` is a presentation flag layered on top of
/// `Playing`; it freezes the step without changing the phase.

use crate::config::TuningConfig;
use crate::domain::consts::MAX_LIVES;
use crate::domain::entity::{Ball, Paddle};
use crate::domain::grid::BrickGrid;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    GameOver,
    LevelComplete,
}

pub struct WorldState {
    // ── Entities ──
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: BrickGrid,

    // ── Tuning ──
    pub tuning: TuningConfig,

    // ── Session ──
    pub phase: Phase,
    pub score: u32,
    pub lives: u32,
    /// 1-based
    pub level: u32,
    pub frame: u64,

    // ── UI ──
    pub paused: bool,
    pub message: String,
    /// Frames until `message` clears; 0 = sticky
    pub message_timer: u32,
}

// ── Construction ──

impl WorldState {
    /// Fresh session with the arcade defaults.
    pub fn new() -> Self {
        Self::with_tuning(TuningConfig::default())
    }

    /// Fresh session: level 1, full lives, full wall, opening serve.
    pub fn with_tuning(tuning: TuningConfig) -> Self {
        WorldState {
            paddle: Paddle::new(tuning.paddle_speed),
            ball: Ball::new(tuning.base_ball_speed),
            bricks: BrickGrid::new(),
            tuning,
            phase: Phase::Playing,
            score: 0,
            lives: MAX_LIVES,
            level: 1,
            frame: 0,
            paused: false,
            message: String::new(),
            message_timer: 0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// Count down the HUD message; clears it when the timer runs out.
    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}
