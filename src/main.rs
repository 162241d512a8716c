/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::OpenOptions;
use std::time::Instant;

use crossterm::event::KeyCode;

use config::{GameConfig, LogConfig};
use domain::entity::FrameInput;
use sim::event::GameEvent;
use sim::flow::{self, Command};
use sim::step;
use sim::world::{Phase, WorldState};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

/// Frames a HUD toast stays up at the target rate.
const MESSAGE_FRAMES: u32 = 90;

fn main() {
    let config = GameConfig::load();
    init_logging(&config.log);

    match &config.source {
        Some(path) => log::info!("config loaded from {}", path.display()),
        None => log::info!("no config.toml found, using defaults"),
    }

    let mut world = WorldState::with_tuning(config.tuning.clone());
    world.set_message("Level 1", MESSAGE_FRAMES);
    log::info!(
        "starting: {} fps, ball speed {}, paddle speed {}",
        config.display.target_fps, config.tuning.base_ball_speed, config.tuning.paddle_speed
    );

    let mut renderer = Renderer::new();

    let honor_release = match renderer.init() {
        Ok(enhanced) => enhanced,
        Err(e) => {
            // Raw mode may be half-enabled; undo what we can.
            let _ = renderer.cleanup();
            eprintln!("Terminal init failed: {e}");
            return;
        }
    };

    let sound = SoundEngine::new();
    if sound.is_none() {
        log::warn!("no audio output device, sound disabled");
    }

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config, honor_release);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game loop aborted: {e}");
        eprintln!("Game error: {e}");
    }

    log::info!("exit: level {}, score {}", world.level, world.score);
    println!();
    println!("Thanks for playing Brick Runner!");
    println!("Final Score: {}", world.score);
}

/// Send log output to the configured file; stdout/stderr belong to the
/// terminal UI. RUST_LOG overrides the configured level.
fn init_logging(cfg: &LogConfig) {
    let file = match OpenOptions::new().create(true).append(true).open(&cfg.file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: cannot open log file {}: {e}", cfg.file.display());
            return;
        }
    };

    let env = env_logger::Env::default().default_filter_or(cfg.level.as_str());
    let result = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
    if let Err(e) = result {
        eprintln!("Warning: logger init failed: {e}");
    }
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
    honor_release: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new(honor_release);
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        log::info!("gamepad detected");
    }

    let frame_time = config.frame_duration();
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let dt = frame_start
            .duration_since(last_frame)
            .as_secs_f32()
            .min(config.display.max_frame_dt);
        last_frame = frame_start;

        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_meta(world, &kb, &gp) {
            break;
        }

        if world.is_playing() && !world.paused {
            let input = detect_movement(&kb, &gp);
            let events = step::step(world, input, dt);
            process_events(world, sound, &events);
        }

        world.tick_message();
        renderer.render(world)?;

        // End-state transitions are checked after drawing, so the overlay
        // for the frame that ended the round is shown at least once.
        if let Some(cmd) = detect_command(&kb, &gp, world.phase) {
            flow::apply(world, cmd);
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    Ok(())
}

/// Sounds and HUD messages for what happened during a step.
fn process_events(world: &mut WorldState, sound: Option<&SoundEngine>, events: &[GameEvent]) {
    for event in events {
        if let Some(sfx) = sound {
            sfx.play_event(event);
        }
        if let GameEvent::LifeLost { lives_left } = *event {
            let msg = match lives_left {
                1 => "Ball lost! Last life".to_string(),
                n => format!("Ball lost! {n} lives left"),
            };
            world.set_message(&msg, MESSAGE_FRAMES);
        }
    }
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r')];
const KEYS_ADVANCE: &[KeyCode] = &[KeyCode::Char('n')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char(' ')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q')];

fn detect_movement(kb: &InputState, gp: &GamepadState) -> FrameInput {
    FrameInput {
        left: kb.any_held(KEYS_LEFT) || gp.left_held(),
        right: kb.any_held(KEYS_RIGHT) || gp.right_held(),
    }
}

/// Only the command the current phase accepts is looked for, so a button
/// bound to both restart and advance does the right thing in either end state.
fn detect_command(kb: &InputState, gp: &GamepadState, phase: Phase) -> Option<Command> {
    match phase {
        Phase::GameOver if kb.any_pressed(KEYS_RESTART) || gp.restart_pressed() => {
            Some(Command::Restart)
        }
        Phase::LevelComplete if kb.any_pressed(KEYS_ADVANCE) || gp.advance_pressed() => {
            Some(Command::Advance)
        }
        _ => None,
    }
}

/// Quit and pause. Returns true when the loop should end.
fn handle_meta(world: &mut WorldState, kb: &InputState, gp: &GamepadState) -> bool {
    if kb.any_pressed(KEYS_QUIT) || gp.quit_pressed() {
        log::info!("quit requested");
        return true;
    }

    if kb.any_pressed(KEYS_PAUSE) || gp.pause_pressed() {
        toggle_pause(world);
    }
    false
}

/// Pause only means something mid-round; the end states are already still.
fn toggle_pause(world: &mut WorldState) {
    if !world.is_playing() {
        return;
    }
    world.paused = !world.paused;
    log::debug!("paused: {}", world.paused);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ui::gamepad::Btn;

    fn start_pressed() -> (InputState, GamepadState) {
        let mut gp = GamepadState::new();
        gp.press(Btn::Start);
        (InputState::new(false), gp)
    }

    #[test]
    fn shared_start_button_advances_after_clear() {
        let (kb, gp) = start_pressed();
        let mut w = WorldState::new();
        w.phase = Phase::LevelComplete;

        let cmd = detect_command(&kb, &gp, w.phase);
        assert_eq!(cmd, Some(Command::Advance));
        assert!(flow::apply(&mut w, cmd.unwrap()));
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.level, 2);
    }

    #[test]
    fn shared_start_button_restarts_after_game_over() {
        let (kb, gp) = start_pressed();
        let mut w = WorldState::new();
        w.phase = Phase::GameOver;
        w.lives = 0;

        let cmd = detect_command(&kb, &gp, w.phase);
        assert_eq!(cmd, Some(Command::Restart));
        assert!(flow::apply(&mut w, cmd.unwrap()));
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn no_command_while_playing() {
        let (kb, gp) = start_pressed();
        assert_eq!(detect_command(&kb, &gp, Phase::Playing), None);
    }

    #[test]
    fn life_lost_sets_message() {
        let mut w = WorldState::new();
        process_events(&mut w, None, &[GameEvent::WallBounce, GameEvent::LifeLost { lives_left: 2 }]);
        assert_eq!(w.message, "Ball lost! 2 lives left");
        assert_eq!(w.message_timer, MESSAGE_FRAMES);

        process_events(&mut w, None, &[GameEvent::LifeLost { lives_left: 1 }]);
        assert_eq!(w.message, "Ball lost! Last life");
    }

    #[test]
    fn other_events_leave_message_alone() {
        let mut w = WorldState::new();
        w.set_message("Level 1", 10);
        process_events(
            &mut w,
            None,
            &[GameEvent::PaddleHit, GameEvent::BrickDestroyed { row: 0, col: 3 }],
        );
        assert_eq!(w.message, "Level 1");
    }

    #[test]
    fn pause_toggles_only_while_playing() {
        let mut w = WorldState::new();
        toggle_pause(&mut w);
        assert!(w.paused);
        toggle_pause(&mut w);
        assert!(!w.paused);

        w.phase = Phase::GameOver;
        toggle_pause(&mut w);
        assert!(!w.paused);
    }
}
