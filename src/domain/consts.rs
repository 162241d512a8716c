/// Playfield geometry and baseline tuning.
///
/// All distances are in field units (one unit = one pixel of the classic
/// 800×600 window). The terminal renderer scales these onto character cells.

/// Play area
pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 600.0;

/// Paddle
pub const PADDLE_WIDTH: f32 = 100.0;
pub const PADDLE_HEIGHT: f32 = 20.0;
pub const PADDLE_SPEED: f32 = 500.0;
/// Distance from the paddle's top edge to the bottom of the field
pub const PADDLE_FLOOR_OFFSET: f32 = 40.0;
/// Horizontal speed span imparted by a paddle hit (edge to edge)
pub const PADDLE_DEFLECTION: f32 = 600.0;

/// Ball
pub const BALL_RADIUS: f32 = 10.0;
pub const BASE_BALL_SPEED: f32 = 300.0;
pub const SPEED_PER_LEVEL: f32 = 50.0;
/// Ball respawns this far above the field's vertical center
pub const BALL_RESET_RISE: f32 = 100.0;

/// Bricks
pub const BRICK_WIDTH: f32 = 76.0;
pub const BRICK_HEIGHT: f32 = 28.0;
pub const BRICK_GAP: f32 = 4.0;
pub const BRICK_TOP: f32 = 50.0;
pub const BRICKS_PER_ROW: usize = 10;
pub const BRICK_ROWS: usize = 5;
pub const BRICK_COUNT: usize = BRICKS_PER_ROW * BRICK_ROWS;
pub const BRICK_SCORE: u32 = 10;

/// Session
pub const MAX_LIVES: u32 = 3;
