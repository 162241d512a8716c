/// Sound engine: procedural retro blips via rodio.
///
/// Every effect is synthesized once at startup into a mono f32 buffer.
/// Playback is fire-and-forget (non-blocking) via a detached rodio Sink.
/// `play_event` maps the `GameEvent`s returned by `step` onto effects.
///
/// Build without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

#[cfg(feature = "sound")]
mod inner {
    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use crate::domain::consts::BRICK_ROWS;

    pub(super) const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::TAU;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_paddle: Vec<f32>,
        sfx_wall: Vec<f32>,
        /// One pitch per brick row, top row highest.
        sfx_brick: Vec<Vec<f32>>,
        sfx_life_lost: Vec<f32>,
        sfx_game_over: Vec<f32>,
        sfx_level_clear: Vec<f32>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_paddle: gen_paddle(),
                sfx_wall: gen_wall(),
                sfx_brick: (0..BRICK_ROWS).map(gen_brick).collect(),
                sfx_life_lost: gen_life_lost(),
                sfx_game_over: gen_game_over(),
                sfx_level_clear: gen_level_clear(),
            })
        }

        fn play(&self, samples: &[f32]) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.to_vec()));
                sink.detach();
            }
        }

        pub fn play_paddle(&self) { self.play(&self.sfx_paddle); }
        pub fn play_wall(&self) { self.play(&self.sfx_wall); }
        pub fn play_life_lost(&self) { self.play(&self.sfx_life_lost); }
        pub fn play_game_over(&self) { self.play(&self.sfx_game_over); }
        pub fn play_level_clear(&self) { self.play(&self.sfx_level_clear); }

        pub fn play_brick(&self, row: usize) {
            if let Some(buf) = self.sfx_brick.get(row) {
                self.play(buf);
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: mono f32 samples in [-1, 1]
    // ════════════════════════════════════════════════════════════

    fn sample_count(duration: f32) -> usize {
        (SAMPLE_RATE as f32 * duration) as usize
    }

    /// Square-ish tone sweeping linearly from `f0` to `f1` with a
    /// linear fade out.
    pub(super) fn sweep(f0: f32, f1: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = sample_count(duration);
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                phase += (f0 + (f1 - f0) * t) / SAMPLE_RATE as f32;
                let s = (phase * TAU).sin();
                let wave = s * 0.75 + (phase * 3.0 * TAU).sin() * 0.25;
                wave * (1.0 - t) * volume
            })
            .collect()
    }

    /// Notes played back to back, each with a short decay.
    pub(super) fn melody(notes: &[(f32, f32)], volume: f32) -> Vec<f32> {
        notes
            .iter()
            .flat_map(|&(freq, dur)| {
                let n = sample_count(dur);
                (0..n).map(move |i| {
                    let t = i as f32 / SAMPLE_RATE as f32;
                    let env = 1.0 - (i as f32 / n as f32) * 0.4;
                    let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 2.0 * TAU).sin() * 0.3;
                    wave * env * volume
                })
            })
            .collect()
    }

    fn gen_paddle() -> Vec<f32> {
        sweep(440.0, 520.0, 0.06, 0.3)
    }

    fn gen_wall() -> Vec<f32> {
        sweep(220.0, 220.0, 0.04, 0.2)
    }

    /// Higher rows ring higher: row 0 (top, red) is the brightest.
    pub(super) fn gen_brick(row: usize) -> Vec<f32> {
        let base = 1200.0 - row as f32 * 140.0;
        sweep(base, base * 1.25, 0.05, 0.25)
    }

    fn gen_life_lost() -> Vec<f32> {
        sweep(600.0, 150.0, 0.35, 0.3)
    }

    fn gen_game_over() -> Vec<f32> {
        // A4 → F#4 → Eb4 → C4
        melody(&[(440.0, 0.14), (370.0, 0.14), (311.0, 0.14), (261.0, 0.4)], 0.3)
    }

    fn gen_level_clear() -> Vec<f32> {
        // C5 → E5 → G5 → C6, last one held
        melody(&[(523.0, 0.09), (659.0, 0.09), (784.0, 0.09), (1047.0, 0.3)], 0.3)
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when the sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_paddle(&self) {}
    pub fn play_wall(&self) {}
    pub fn play_brick(&self, _row: usize) {}
    pub fn play_life_lost(&self) {}
    pub fn play_game_over(&self) {}
    pub fn play_level_clear(&self) {}
}

impl SoundEngine {
    pub fn play_event(&self, event: &GameEvent) {
        match *event {
            GameEvent::WallBounce => self.play_wall(),
            GameEvent::PaddleHit => self.play_paddle(),
            GameEvent::BrickDestroyed { row, .. } => self.play_brick(row),
            GameEvent::LifeLost { .. } => self.play_life_lost(),
            GameEvent::GameOver => self.play_game_over(),
            GameEvent::LevelCleared => self.play_level_clear(),
        }
    }
}
