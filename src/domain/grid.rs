/// The brick wall: a fixed row-major array of `BRICK_ROWS × BRICKS_PER_ROW`.
///
/// Built once; bricks are never moved or reallocated. A level start flips
/// every `active` flag back on, collisions flip individual flags off.
/// Index arithmetic is `row * BRICKS_PER_ROW + col`.

use super::consts::{BRICK_COUNT, BRICKS_PER_ROW};
use super::entity::{Ball, Brick};
use super::physics;

#[derive(Clone, Debug)]
pub struct BrickGrid {
    bricks: [Brick; BRICK_COUNT],
}

impl BrickGrid {
    pub fn new() -> Self {
        BrickGrid {
            bricks: std::array::from_fn(|i| Brick::at(i / BRICKS_PER_ROW, i % BRICKS_PER_ROW)),
        }
    }

    #[cfg(test)]
    #[inline]
    pub fn index(row: usize, col: usize) -> usize {
        debug_assert!(row < super::consts::BRICK_ROWS && col < BRICKS_PER_ROW);
        row * BRICKS_PER_ROW + col
    }

    /// (row, col) of a flat index.
    #[inline]
    pub fn cell(index: usize) -> (usize, usize) {
        (index / BRICKS_PER_ROW, index % BRICKS_PER_ROW)
    }

    #[cfg(test)]
    pub fn get(&self, row: usize, col: usize) -> &Brick {
        &self.bricks[Self::index(row, col)]
    }

    /// Active bricks with their row, in row-major order.
    pub fn active(&self) -> impl Iterator<Item = (usize, &Brick)> {
        self.bricks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.active)
            .map(|(i, b)| (i / BRICKS_PER_ROW, b))
    }

    pub fn active_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.active).count()
    }

    pub fn reactivate_all(&mut self) {
        for brick in &mut self.bricks {
            brick.active = true;
        }
    }

    pub fn deactivate(&mut self, index: usize) {
        self.bricks[index].active = false;
    }

    /// Lowest-index active brick touching the ball, if any.
    /// Scanning stops at the first match; later overlaps are never seen.
    pub fn first_hit(&self, ball: &Ball) -> Option<usize> {
        self.bricks
            .iter()
            .position(|b| b.active && physics::ball_overlaps(ball, &b.rect()))
    }
}

impl Default for BrickGrid {
    fn default() -> Self {
        Self::new()
    }
}
