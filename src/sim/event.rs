/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and HUD messages.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    WallBounce,
    PaddleHit,
    BrickDestroyed { row: usize, col: usize },
    LifeLost { lives_left: u32 },
    GameOver,
    LevelCleared,
}
