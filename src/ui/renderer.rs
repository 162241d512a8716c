/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The 800×600 playfield is scaled onto whatever part of the terminal is
/// left after the HUD, border, message and help rows (see `Viewport`).
///
/// Screen layout:
///   row 0      HUD: Score / Lives / Level
///   row 1      top border
///   rows 2..   playfield, boxed by side borders
///   next       bottom border
///   next       message bar
///   next       key help

use std::io::{self, BufWriter, Write};
use std::ops::Range;

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::consts::{BRICK_ROWS, FIELD_HEIGHT, FIELD_WIDTH};
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for all "empty" terminal cells. Using the same
    /// RGB for `Clear(ClearType::All)` and every cell keeps VTE terminals
    /// from showing lines in the inter-row gap.
    const BASE_BG: Color = Color::Rgb { r: 0, g: 0, b: 0 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    /// Normalize bg: Color::Reset → BASE_BG so that every cell gets an
    /// explicit background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg: Self::norm_bg(bg) }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    /// Write a string horizontally centered on `center`.
    fn put_centered(&mut self, center: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let half = s.chars().count() / 2;
        self.put_str(center.saturating_sub(half), y, s, fg, bg);
    }

    fn fill_row(&mut self, y: usize, cols: Range<usize>, cell: Cell) {
        for x in cols {
            self.set(x, y, cell);
        }
    }

    #[cfg(test)]
    fn row_text(&self, y: usize) -> String {
        (0..self.width).map(|x| self.get(x, y).ch).collect()
    }
}

// ── Palette ──

const BRICK_COLORS: [Color; BRICK_ROWS] = [
    Color::Rgb { r: 230, g: 41, b: 55 },   // red
    Color::Rgb { r: 255, g: 161, b: 0 },   // orange
    Color::Rgb { r: 253, g: 249, b: 0 },   // yellow
    Color::Rgb { r: 0, g: 228, b: 48 },    // green
    Color::Rgb { r: 0, g: 121, b: 241 },   // blue
];
const PADDLE_COLOR: Color = Color::Rgb { r: 0, g: 121, b: 241 };
const BALL_COLOR: Color = Color::White;
const BORDER_COLOR: Color = Color::Rgb { r: 70, g: 70, b: 90 };
const GAME_OVER_COLOR: Color = Color::Rgb { r: 130, g: 130, b: 130 };
const GOLD: Color = Color::Rgb { r: 255, g: 203, b: 0 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const OVERLAY_BG: Color = Color::Rgb { r: 30, g: 30, b: 30 };

/// Half-strength version of a brick color, blended toward the background.
fn faded(c: Color) -> Color {
    match c {
        Color::Rgb { r, g, b } => Color::Rgb { r: r / 2, g: g / 2, b: b / 2 },
        other => other,
    }
}

// ── Viewport: field units → terminal cells ──

const HUD_ROW: usize = 0;
const FIELD_ROW: usize = 2;
/// HUD, two borders, message bar, help bar.
const RESERVED_ROWS: usize = 5;
const MIN_COLS: usize = 30;
const MIN_ROWS: usize = 10;

/// Where the playfield sits on the terminal and how big it is.
/// Terminal cells are roughly twice as tall as they are wide, so a 4:3
/// field maps onto 8:3 columns-to-rows.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Viewport {
    left: usize,
    top: usize,
    cols: usize,
    rows: usize,
}

impl Viewport {
    /// Largest aspect-correct field that fits, or None if the terminal is
    /// too small to play in.
    fn fit(term_w: usize, term_h: usize) -> Option<Viewport> {
        let avail_w = term_w.checked_sub(2)?;
        let avail_h = term_h.checked_sub(RESERVED_ROWS)?;
        let cols = avail_w.min(avail_h * 8 / 3);
        let rows = (cols * 3 / 8).min(avail_h);
        if cols < MIN_COLS || rows < MIN_ROWS {
            return None;
        }
        Some(Viewport {
            left: (term_w - cols) / 2,
            top: FIELD_ROW,
            cols,
            rows,
        })
    }

    fn scale(v: f32, extent: f32, cells: usize) -> usize {
        let c = (v / extent * cells as f32).floor().max(0.0) as usize;
        c.min(cells - 1)
    }

    /// Terminal column of field x.
    fn col(&self, x: f32) -> usize {
        self.left + Self::scale(x, FIELD_WIDTH, self.cols)
    }

    /// Terminal row of field y.
    fn row(&self, y: f32) -> usize {
        self.top + Self::scale(y, FIELD_HEIGHT, self.rows)
    }

    /// Terminal columns covered by field span [x0, x1). Never empty.
    fn cols_of(&self, x0: f32, x1: f32) -> Range<usize> {
        let start = self.col(x0);
        start..self.col(x1).max(start + 1)
    }

    /// Terminal rows covered by field span [y0, y1). Never empty.
    fn rows_of(&self, y0: f32, y1: f32) -> Range<usize> {
        let start = self.row(y0);
        start..self.row(y1).max(start + 1)
    }

    fn center_col(&self) -> usize {
        self.left + self.cols / 2
    }

    fn center_row(&self) -> usize {
        self.top + self.rows / 2
    }

    fn bottom(&self) -> usize {
        self.top + self.rows
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    enhanced_keys: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            enhanced_keys: false,
        }
    }

    /// Enter raw mode and the alternate screen. Returns true when the
    /// terminal will report key Release events.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced_keys = true;
        }

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        log::debug!(
            "terminal {}x{}, key release events: {}",
            self.term_w, self.term_h, self.enhanced_keys
        );
        Ok(self.enhanced_keys)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.enhanced_keys {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change → clear for a clean transition
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.compose(world);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors, not ResetColor: the terminal default may
        // differ from BASE_BG.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, w: &WorldState) {
        self.front.clear();

        let Some(view) = Viewport::fit(self.front.width, self.front.height) else {
            self.compose_too_small();
            return;
        };

        self.compose_hud(w, &view);
        self.compose_border(&view);
        self.compose_bricks(w, &view);
        self.compose_paddle(w, &view);
        self.compose_ball(w, &view);

        match w.phase {
            Phase::Playing => {}
            Phase::GameOver => self.compose_banner(
                &view, "GAME OVER", "Press R to Restart", GAME_OVER_COLOR,
            ),
            Phase::LevelComplete => self.compose_banner(
                &view, "LEVEL COMPLETE!", "Press N for Next Level", GOLD,
            ),
        }

        if w.paused && w.is_playing() {
            self.compose_pause_overlay(&view);
        }

        self.compose_message(w, &view);
        self.compose_help(&view);
    }

    fn compose_too_small(&mut self) {
        let msg = "Terminal too small - enlarge the window";
        let y = self.front.height / 2;
        let x = self.front.width.saturating_sub(msg.len()) / 2;
        self.front.put_str(x, y, msg, Color::White, Color::Reset);
    }

    fn compose_hud(&mut self, w: &WorldState, view: &Viewport) {
        let score = format!("Score: {}", w.score);
        let lives = format!("Lives: {}", w.lives);
        let level = format!("Level: {}", w.level);
        let right_edge = view.left + view.cols;
        self.front.put_str(view.left, HUD_ROW, &score, Color::White, Color::Reset);
        self.front.put_centered(view.center_col(), HUD_ROW, &lives, Color::White, Color::Reset);
        self.front.put_str(
            right_edge.saturating_sub(level.len()), HUD_ROW, &level, Color::White, Color::Reset,
        );
    }

    fn compose_border(&mut self, view: &Viewport) {
        let left = view.left - 1;
        let right = view.left + view.cols;
        let top = view.top - 1;
        let bottom = view.bottom();
        let line = Cell::new('─', BORDER_COLOR, Color::Reset);
        self.front.fill_row(top, view.left..right, line);
        self.front.fill_row(bottom, view.left..right, line);
        for y in view.top..bottom {
            self.front.set(left, y, Cell::new('│', BORDER_COLOR, Color::Reset));
            self.front.set(right, y, Cell::new('│', BORDER_COLOR, Color::Reset));
        }
        self.front.set(left, top, Cell::new('┌', BORDER_COLOR, Color::Reset));
        self.front.set(right, top, Cell::new('┐', BORDER_COLOR, Color::Reset));
        self.front.set(left, bottom, Cell::new('└', BORDER_COLOR, Color::Reset));
        self.front.set(right, bottom, Cell::new('┘', BORDER_COLOR, Color::Reset));
    }

    /// Solid fill in the row color, last column in the faded outline shade.
    fn compose_bricks(&mut self, w: &WorldState, view: &Viewport) {
        for (row, brick) in w.bricks.active() {
            let color = BRICK_COLORS[row];
            let cols = view.cols_of(brick.x, brick.x + brick.width);
            let edge = cols.end - 1;
            for y in view.rows_of(brick.y, brick.y + brick.height) {
                for x in cols.clone() {
                    let bg = if x == edge { faded(color) } else { color };
                    self.front.set(x, y, Cell::new(' ', color, bg));
                }
            }
        }
    }

    fn compose_paddle(&mut self, w: &WorldState, view: &Viewport) {
        let p = &w.paddle;
        let cols = view.cols_of(p.x, p.right());
        let y = view.row(p.y);
        self.front.fill_row(y, cols, Cell::new('▀', PADDLE_COLOR, Color::Reset));
    }

    fn compose_ball(&mut self, w: &WorldState, view: &Viewport) {
        let b = &w.ball;
        // The ball may sit partly outside the field for a frame.
        let x = view.col(b.x);
        let y = view.row(b.y);
        let under = self.front.get(x, y);
        self.front.set(x, y, Cell::new('●', BALL_COLOR, under.bg));
    }

    fn compose_banner(&mut self, view: &Viewport, title: &str, hint: &str, color: Color) {
        let box_w = (hint.len().max(title.len()) + 6).min(view.cols);
        let box_x = view.center_col().saturating_sub(box_w / 2);
        let cy = view.center_row();
        for y in cy.saturating_sub(1)..=cy + 2 {
            self.front.fill_row(y, box_x..box_x + box_w, Cell::new(' ', color, OVERLAY_BG));
        }
        self.front.put_centered(view.center_col(), cy, title, color, OVERLAY_BG);
        self.front.put_centered(view.center_col(), cy + 1, hint, color, OVERLAY_BG);
    }

    fn compose_pause_overlay(&mut self, view: &Viewport) {
        self.compose_banner(view, "PAUSED", "P / Space: Resume   Esc / Q: Quit", Color::White);
    }

    fn compose_message(&mut self, w: &WorldState, view: &Viewport) {
        if w.message.is_empty() {
            return;
        }
        let y = view.bottom() + 1;
        let msg = format!(" {} ", w.message);
        self.front.fill_row(y, view.left..view.left + view.cols, Cell::new(' ', Color::Black, MSG_BG));
        self.front.put_centered(view.center_col(), y, &msg, Color::Black, MSG_BG);
    }

    fn compose_help(&mut self, view: &Viewport) {
        let help = "←/→ A/D: Move   P/Space: Pause   R: Restart   N: Next   Esc/Q: Quit";
        self.front.put_str(view.left, view.bottom() + 2, help, Color::DarkGrey, Color::Reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::consts::BRICK_COUNT;

    fn composed(w: &WorldState, tw: usize, th: usize) -> Renderer {
        let mut r = Renderer::new();
        r.front.resize(tw, th);
        r.compose(w);
        r
    }

    fn count(r: &Renderer, pred: impl Fn(&Cell) -> bool) -> usize {
        r.front.cells.iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn viewport_keeps_aspect() {
        let v = Viewport::fit(80, 24).unwrap();
        assert_eq!((v.cols, v.rows), (50, 18));
        assert_eq!(v.left, 15);
        assert_eq!(v.top, FIELD_ROW);
    }

    #[test]
    fn viewport_width_limited() {
        let v = Viewport::fit(60, 60).unwrap();
        assert_eq!(v.cols, 58);
        assert_eq!(v.rows, 21);
    }

    #[test]
    fn viewport_rejects_tiny_terminal() {
        assert!(Viewport::fit(20, 10).is_none());
        assert!(Viewport::fit(80, 4).is_none());
    }

    #[test]
    fn field_corners_map_inside() {
        let v = Viewport::fit(80, 24).unwrap();
        assert_eq!(v.col(0.0), v.left);
        assert_eq!(v.col(FIELD_WIDTH), v.left + v.cols - 1);
        assert_eq!(v.col(-50.0), v.left);
        assert_eq!(v.row(FIELD_HEIGHT + 50.0), v.top + v.rows - 1);
    }

    #[test]
    fn brick_rows_do_not_overlap() {
        let v = Viewport::fit(80, 24).unwrap();
        let w = WorldState::new();
        let mut last_end = 0;
        for row in 0..BRICK_ROWS {
            let b = w.bricks.get(row, 0);
            let rows = v.rows_of(b.y, b.y + b.height);
            assert!(rows.start >= last_end);
            last_end = rows.end;
        }
    }

    #[test]
    fn hud_shows_score_lives_level() {
        let mut w = WorldState::new();
        w.score = 120;
        w.lives = 2;
        w.level = 4;
        let r = composed(&w, 80, 24);
        let hud = r.front.row_text(HUD_ROW);
        assert!(hud.contains("Score: 120"));
        assert!(hud.contains("Lives: 2"));
        assert!(hud.contains("Level: 4"));
    }

    #[test]
    fn only_active_bricks_are_drawn() {
        let red = BRICK_COLORS[0];
        let mut w = WorldState::new();
        let full = count(&composed(&w, 80, 24), |c| c.bg == red);
        assert!(full > 0);
        for col in 0..10 {
            w.bricks.deactivate(col);
        }
        assert_eq!(count(&composed(&w, 80, 24), |c| c.bg == red), 0);
        // other rows untouched
        let blue = BRICK_COLORS[4];
        assert!(count(&composed(&w, 80, 24), |c| c.bg == blue) > 0);
    }

    #[test]
    fn cleared_field_has_no_brick_cells() {
        let mut w = WorldState::new();
        for i in 0..BRICK_COUNT {
            w.bricks.deactivate(i);
        }
        let r = composed(&w, 80, 24);
        for color in BRICK_COLORS {
            assert_eq!(count(&r, |c| c.bg == color || c.bg == faded(color)), 0);
        }
    }

    #[test]
    fn ball_and_paddle_drawn() {
        let w = WorldState::new();
        let r = composed(&w, 80, 24);
        assert_eq!(count(&r, |c| c.ch == '●'), 1);
        // 100 of 800 units on a 50-column field
        assert!(count(&r, |c| c.ch == '▀') >= 6);
    }

    #[test]
    fn game_over_overlay() {
        let mut w = WorldState::new();
        w.phase = Phase::GameOver;
        let r = composed(&w, 80, 24);
        let all: String = (0..24).map(|y| r.front.row_text(y)).collect();
        assert!(all.contains("GAME OVER"));
        assert!(all.contains("Press R to Restart"));
        assert!(!all.contains("LEVEL COMPLETE!"));
    }

    #[test]
    fn level_complete_overlay() {
        let mut w = WorldState::new();
        w.phase = Phase::LevelComplete;
        let r = composed(&w, 80, 24);
        let all: String = (0..24).map(|y| r.front.row_text(y)).collect();
        assert!(all.contains("LEVEL COMPLETE!"));
        assert!(all.contains("Press N for Next Level"));
        assert!(!all.contains("GAME OVER"));
    }

    #[test]
    fn no_overlay_while_playing() {
        let w = WorldState::new();
        let r = composed(&w, 80, 24);
        let all: String = (0..24).map(|y| r.front.row_text(y)).collect();
        assert!(!all.contains("GAME OVER"));
        assert!(!all.contains("LEVEL COMPLETE!"));
        assert!(!all.contains("PAUSED"));
    }

    #[test]
    fn pause_overlay_while_paused() {
        let mut w = WorldState::new();
        w.paused = true;
        let r = composed(&w, 80, 24);
        let all: String = (0..24).map(|y| r.front.row_text(y)).collect();
        assert!(all.contains("PAUSED"));
    }

    #[test]
    fn tiny_terminal_shows_notice() {
        let w = WorldState::new();
        let r = composed(&w, 50, 8);
        let all: String = (0..8).map(|y| r.front.row_text(y)).collect();
        assert!(all.contains("Terminal too small"));
    }
}
