/// Entities: Paddle, Ball, Brick. Plain data records.
/// Behavior lives in `physics` (pure queries) and `sim::step` (mutation).

use super::consts::*;

/// Axis-aligned rectangle, top-left origin, y grows downward.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Frame input: which direction keys are held this frame.
/// Both may be held at once; the step resolves each independently.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
}

#[derive(Clone, Debug)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    /// Horizontal speed magnitude (units/s)
    pub speed: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    /// Paddle centered horizontally, `PADDLE_FLOOR_OFFSET` above the floor.
    pub fn new(speed: f32) -> Self {
        Paddle {
            x: FIELD_WIDTH / 2.0 - PADDLE_WIDTH / 2.0,
            y: FIELD_HEIGHT - PADDLE_FLOOR_OFFSET,
            speed,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Clone, Debug)]
pub struct Ball {
    /// Center
    pub x: f32,
    pub y: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub radius: f32,
}

impl Ball {
    /// Opening serve: field center, drifting down-right.
    pub fn new(speed: f32) -> Self {
        Ball {
            x: FIELD_WIDTH / 2.0,
            y: FIELD_HEIGHT / 2.0,
            speed_x: speed,
            speed_y: speed,
            radius: BALL_RADIUS,
        }
    }

    pub fn left(&self) -> f32 { self.x - self.radius }
    pub fn right(&self) -> f32 { self.x + self.radius }
    pub fn top(&self) -> f32 { self.y - self.radius }
    pub fn bottom(&self) -> f32 { self.y + self.radius }
}

#[derive(Clone, Copy, Debug)]
pub struct Brick {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub active: bool,
}

impl Brick {
    /// Brick at grid cell (row, col), laid out left-to-right from the
    /// field's left edge with `BRICK_GAP` between neighbours.
    pub fn at(row: usize, col: usize) -> Self {
        Brick {
            x: col as f32 * (BRICK_WIDTH + BRICK_GAP),
            y: row as f32 * (BRICK_HEIGHT + BRICK_GAP) + BRICK_TOP,
            width: BRICK_WIDTH,
            height: BRICK_HEIGHT,
            active: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
