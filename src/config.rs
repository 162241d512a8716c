/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to the classic arcade defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::consts::{BASE_BALL_SPEED, BRICK_SCORE, PADDLE_SPEED, SPEED_PER_LEVEL};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub display: DisplayConfig,
    pub tuning: TuningConfig,
    pub gamepad: GamepadConfig,
    pub log: LogConfig,
    /// Where the settings came from; `None` = built-in defaults.
    pub source: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub target_fps: u32,
    /// Upper bound on the measured frame delta fed to the simulation (seconds)
    pub max_frame_dt: f32,
}

/// Gameplay numbers. Defaults are the classic arcade values from `consts`.
#[derive(Clone, Debug, PartialEq)]
pub struct TuningConfig {
    pub paddle_speed: f32,
    pub base_ball_speed: f32,
    pub speed_per_level: f32,
    pub brick_score: u32,
}

impl Default for TuningConfig {
    fn default() -> Self {
        TuningConfig {
            paddle_speed: PADDLE_SPEED,
            base_ball_speed: BASE_BALL_SPEED,
            speed_per_level: SPEED_PER_LEVEL,
            brick_score: BRICK_SCORE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub restart: Vec<String>,
    pub advance: Vec<String>,
    pub pause: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    tuning: TomlTuning,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_target_fps")]
    target_fps: u32,
    #[serde(default = "default_max_frame_dt")]
    max_frame_dt: f32,
}

#[derive(Deserialize, Debug)]
struct TomlTuning {
    #[serde(default = "default_paddle_speed")]
    paddle_speed: f32,
    #[serde(default = "default_base_ball_speed")]
    base_ball_speed: f32,
    #[serde(default = "default_speed_per_level")]
    speed_per_level: f32,
    #[serde(default = "default_brick_score")]
    brick_score: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_advance")]
    advance: Vec<String>,
    #[serde(default = "default_pause")]
    pause: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_target_fps() -> u32 { 60 }
fn default_max_frame_dt() -> f32 { 0.1 }

fn default_paddle_speed() -> f32 { PADDLE_SPEED }
fn default_base_ball_speed() -> f32 { BASE_BALL_SPEED }
fn default_speed_per_level() -> f32 { SPEED_PER_LEVEL }
fn default_brick_score() -> u32 { BRICK_SCORE }

fn default_restart() -> Vec<String> { vec!["Start".into()] }
fn default_advance() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_pause() -> Vec<String> { vec!["Y".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

fn default_log_file() -> String { "brickrunner.log".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            target_fps: default_target_fps(),
            max_frame_dt: default_max_frame_dt(),
        }
    }
}

impl Default for TomlTuning {
    fn default() -> Self {
        TomlTuning {
            paddle_speed: default_paddle_speed(),
            base_ball_speed: default_base_ball_speed(),
            speed_per_level: default_speed_per_level(),
            brick_score: default_brick_score(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            restart: default_restart(),
            advance: default_advance(),
            pause: default_pause(),
            quit: default_quit(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let Some((path, text)) = read_config(&candidate_dirs()) else {
            return Self::default();
        };
        match Self::parse(&text) {
            Ok(mut cfg) => {
                cfg.source = Some(path);
                cfg
            }
            Err(e) => {
                eprintln!("Warning: {} parse error: {e}", path.display());
                eprintln!("Using default settings.");
                Self::default()
            }
        }
    }

    /// Parse a config document directly (no filesystem search).
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::from_toml(toml_cfg, None))
    }

    fn from_toml(toml_cfg: TomlConfig, source: Option<PathBuf>) -> Self {
        // Relative log paths resolve against the temp dir
        let log_file = PathBuf::from(&toml_cfg.log.file);
        let log_file = if log_file.is_absolute() {
            log_file
        } else {
            std::env::temp_dir().join(log_file)
        };

        GameConfig {
            display: DisplayConfig {
                target_fps: toml_cfg.display.target_fps.max(1),
                max_frame_dt: toml_cfg.display.max_frame_dt.max(0.0),
            },
            tuning: TuningConfig {
                paddle_speed: toml_cfg.tuning.paddle_speed,
                base_ball_speed: toml_cfg.tuning.base_ball_speed,
                speed_per_level: toml_cfg.tuning.speed_per_level,
                brick_score: toml_cfg.tuning.brick_score,
            },
            gamepad: GamepadConfig {
                restart: toml_cfg.gamepad.restart,
                advance: toml_cfg.gamepad.advance,
                pause: toml_cfg.gamepad.pause,
                quit: toml_cfg.gamepad.quit,
            },
            log: LogConfig {
                file: log_file,
                level: toml_cfg.log.level,
            },
            source,
        }
    }

    /// Seconds per frame at the target rate.
    pub fn frame_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.display.target_fps as f64)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), None)
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// First readable `config.toml` in the candidate directories.
/// Runs before the logger exists, so problems go to stderr
/// (the terminal is not in raw mode yet).
fn read_config(search_dirs: &[PathBuf]) -> Option<(PathBuf, String)> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => return Some((path, text)),
            Err(e) => eprintln!("Warning: could not read {}: {e}", path.display()),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.tuning, TuningConfig::default());
        assert_eq!(cfg.display.target_fps, 60);
        assert_eq!(cfg.gamepad.restart, vec!["Start".to_string()]);
        assert_eq!(cfg.log.level, "info");
        assert!(cfg.log.file.ends_with("brickrunner.log"));
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let cfg = GameConfig::parse(
            "[tuning]\nspeed_per_level = 75.0\n\n[display]\ntarget_fps = 30\n",
        )
        .unwrap();
        assert_eq!(cfg.tuning.speed_per_level, 75.0);
        assert_eq!(cfg.tuning.base_ball_speed, 300.0);
        assert_eq!(cfg.tuning.brick_score, 10);
        assert_eq!(cfg.display.target_fps, 30);
        assert_eq!(cfg.display.max_frame_dt, 0.1);
    }

    #[test]
    fn zero_fps_is_clamped() {
        let cfg = GameConfig::parse("[display]\ntarget_fps = 0\n").unwrap();
        assert_eq!(cfg.display.target_fps, 1);
        assert_eq!(cfg.frame_duration(), std::time::Duration::from_secs(1));
    }

    #[test]
    fn absolute_log_path_is_kept() {
        let path = std::env::temp_dir().join("custom.log");
        let doc = format!("[log]\nfile = {:?}\n", path.display().to_string());
        let cfg = GameConfig::parse(&doc).unwrap();
        assert_eq!(cfg.log.file, path);
    }

    #[test]
    fn search_takes_first_dir_with_a_file() {
        let root = std::env::temp_dir().join(format!("brickrunner-cfg-{}", std::process::id()));
        let empty = root.join("empty");
        let filled = root.join("filled");
        std::fs::create_dir_all(&empty).unwrap();
        std::fs::create_dir_all(&filled).unwrap();
        std::fs::write(filled.join("config.toml"), "[tuning]\nbrick_score = 25\n").unwrap();

        let (path, text) = read_config(&[empty.clone(), filled.clone()]).unwrap();
        assert_eq!(path, filled.join("config.toml"));
        assert_eq!(GameConfig::parse(&text).unwrap().tuning.brick_score, 25);
        assert!(read_config(&[empty]).is_none());

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(GameConfig::parse("[tuning\npaddle_speed = ").is_err());
    }
}
