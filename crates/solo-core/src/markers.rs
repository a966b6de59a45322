//! Envelope stage markers inside the trim window.
//!
//! Four frame positions split the window into attack, decay, sustain and
//! release spans. They are ordered, bounded by the window, and initialized
//! lazily because the window can change many times before anyone edits them.

use crate::trim::encoder_step;

/// Stage end positions, in bank frames: attack, decay, sustain, release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdsrMarkers {
    points: [usize; 4],
    valid: bool,
}

impl AdsrMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the current points. The next `ensure_init` reseeds them.
    /// Called whenever the trim window or the bank changes.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Stage end frames. Meaningful only while `is_valid`.
    #[inline]
    pub fn points(&self) -> [usize; 4] {
        self.points
    }

    /// Seeds the markers at the window quartiles unless already valid.
    pub fn ensure_init(&mut self, frame_start: usize, frame_end: usize) {
        if self.valid {
            return;
        }
        let span = frame_end.saturating_sub(frame_start);
        self.points = [
            frame_start + span / 4,
            frame_start + span / 2,
            frame_start + span * 3 / 4,
            frame_end,
        ];
        self.valid = true;
    }

    /// Moves one marker by an encoder step scaled to the window span, at
    /// least one frame per nonzero delta. The marker stops at its neighbors
    /// and at the window edges. Returns true when the point moved.
    pub fn nudge(
        &mut self,
        index: usize,
        delta: i32,
        fine: bool,
        frame_start: usize,
        frame_end: usize,
    ) -> bool {
        self.ensure_init(frame_start, frame_end);
        if index >= 4 || delta == 0 {
            return false;
        }

        let span = frame_end.saturating_sub(frame_start) as f64;
        let mut step = (encoder_step(delta, fine) * span).trunc() as i64;
        if step == 0 {
            step = i64::from(delta.signum());
        }

        let lo = if index == 0 {
            frame_start
        } else {
            self.points[index - 1]
        };
        let hi = if index == 3 {
            frame_end
        } else {
            self.points[index + 1]
        };

        let moved = (self.points[index] as i64 + step).clamp(lo as i64, hi as i64) as usize;
        let changed = moved != self.points[index];
        self.points[index] = moved;
        changed
    }
}
