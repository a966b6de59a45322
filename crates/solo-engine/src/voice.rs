//! The one playback voice.
//!
//! Runs entirely in the audio callback: reads the bank through linear
//! interpolation at a pitch-derived rate and stops itself at the window
//! edge. Monophony is last-note-wins; a new note steals the voice and a
//! release only lands if its note is still the one sounding.

use solo_core::bank::{dequantize, SampleBank};

/// Note that plays a loaded sample at its natural rate.
pub const UNISON_NOTE: u8 = 60;

#[derive(Debug, Clone)]
pub struct PlaybackVoice {
    active: bool,
    note: u8,
    gain: f32,
    phase: f64,
    rate: f64,
}

impl Default for PlaybackVoice {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackVoice {
    pub fn new() -> Self {
        Self {
            active: false,
            note: 0,
            gain: 0.0,
            phase: 0.0,
            rate: 0.0,
        }
    }

    /// Starts the voice at the window start. Rejects unloaded banks and
    /// windows too narrow to interpolate. With `apply_pitch` the rate is
    /// transposed in semitones around [`UNISON_NOTE`]; without it the
    /// sample plays at its natural rate whatever the note.
    pub fn start(
        &mut self,
        note: u8,
        velocity: u8,
        apply_pitch: bool,
        bank: &SampleBank,
        frame_start: u32,
        frame_end: u32,
        engine_rate: u32,
    ) -> bool {
        if !bank.loaded() || engine_rate == 0 || frame_end < frame_start + 2 {
            return false;
        }
        let natural = f64::from(bank.sample_rate()) / f64::from(engine_rate);
        let rate = if apply_pitch {
            2f64.powf((f64::from(note) - f64::from(UNISON_NOTE)) / 12.0) * natural
        } else {
            natural
        };

        self.active = true;
        self.note = note;
        self.gain = f32::from(velocity.min(127)) / 127.0;
        self.phase = f64::from(frame_start);
        self.rate = rate;
        true
    }

    /// Stops the voice if `note` is the one sounding. Returns whether it
    /// stopped.
    pub fn release(&mut self, note: u8) -> bool {
        if self.active && self.note == note {
            self.active = false;
            true
        } else {
            false
        }
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Note currently sounding, if any.
    pub fn note(&self) -> Option<u8> {
        self.active.then_some(self.note)
    }

    /// Current read position in bank frames.
    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// One stereo output frame. Silence once inactive; deactivates itself
    /// when the phase runs past the last interpolation pair or the window
    /// has been trimmed out from under it.
    #[inline]
    pub fn render(&mut self, bank: &SampleBank, frame_start: u32, frame_end: u32) -> [f32; 2] {
        if !self.active {
            return [0.0; 2];
        }
        let end = (frame_end as usize).min(bank.len());
        let start = frame_start as usize;
        let last_pair = end.wrapping_sub(1);
        let idx = self.phase as usize;
        if end < start + 2 || self.phase < start as f64 || idx >= last_pair {
            self.active = false;
            return [0.0; 2];
        }

        let frac = (self.phase - idx as f64) as f32;
        let (l0, r0) = bank.frame(idx);
        let (l1, r1) = bank.frame(idx + 1);
        let l = dequantize(l0) + (dequantize(l1) - dequantize(l0)) * frac;
        let r = dequantize(r0) + (dequantize(r1) - dequantize(r0)) * frac;

        self.phase += self.rate;
        [l * self.gain, r * self.gain]
    }
}
