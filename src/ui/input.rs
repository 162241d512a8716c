/// Keyboard state tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Continuous paddle movement while an arrow key is held
///   - Edge-triggered commands (restart, next level, pause) that fire once per press
///
/// Terminals that support crossterm's keyboard enhancement report Release
/// events; the renderer turns that on at init and tells us via `honor_release`.
/// Elsewhere a key counts as released once its auto-repeat stops arriving.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Only used when the terminal doesn't report Release events.
/// Before the first auto-repeat arrives the key gets the long window, which
/// bridges the typical repeat delay so a held arrow doesn't stutter. Once
/// repeats are flowing, a gap of `HOLD_TIMEOUT` means the key was let go.
const FIRST_REPEAT_TIMEOUT: Duration = Duration::from_millis(550);
const HOLD_TIMEOUT: Duration = Duration::from_millis(120);

/// Last Press/Repeat of a held key.
#[derive(Clone, Copy, Debug)]
struct Hold {
    last: Instant,
    /// A second event arrived while held: auto-repeat has started.
    repeating: bool,
}

impl Hold {
    fn timeout(&self) -> Duration {
        if self.repeating { HOLD_TIMEOUT } else { FIRST_REPEAT_TIMEOUT }
    }

    fn live_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last) < self.timeout()
    }
}

pub struct InputState {
    last_active: HashMap<KeyCode, Hold>,

    /// Keys that went from "not held" to "held" during the most recent
    /// `drain_events()` call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain.
    raw_events: Vec<KeyEvent>,

    /// Honor Release events (keyboard enhancement confirmed).
    honor_release: bool,
}

impl InputState {
    pub fn new(honor_release: bool) -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call once per frame, before the simulation step.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.apply_key(key, Instant::now());
            }
        }

        if !self.honor_release {
            let now = Instant::now();
            self.last_active.retain(|_, h| h.live_at(now));
        }
    }

    fn apply_key(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);
        let code = normalize(key.code);

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&code);
            }
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.held_at(code, now);
                self.last_active.insert(code, Hold { last: now, repeating: was_held });
                // A Repeat with no prior Press (focus regained mid-hold)
                // also counts as a fresh press.
                if !was_held {
                    self.fresh_presses.push(code);
                }
            }
        }
    }

    /// Is this key currently held down?
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held_at(normalize(code), Instant::now())
    }

    fn held_at(&self, code: KeyCode, now: Instant) -> bool {
        match self.last_active.get(&code) {
            Some(_) if self.honor_release => true,
            Some(h) => h.live_at(now),
            None => false,
        }
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&normalize(code))
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(k.code, KeyCode::Char('c') | KeyCode::Char('C'))
        })
    }
}

/// Fold letter case so `R` and `r` are the same key.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
