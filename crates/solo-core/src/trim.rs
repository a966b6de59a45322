//! Normalized trim window over the sample bank.
//!
//! The window is stored as two fractions of the bank length so it survives
//! the bank being replaced by a shorter or longer sample. Frame positions are
//! derived on demand, and derived positions always leave at least two frames
//! between start and end so linear interpolation has a pair to read.

/// Playback window in normalized position, `0.0..=1.0` of the bank length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimWindow {
    norm_start: f64,
    norm_end: f64,
}

impl Default for TrimWindow {
    fn default() -> Self {
        Self::full()
    }
}

/// Normalized movement for one detented encoder click burst.
///
/// The magnitude grows with the log of the click count so slow turns give
/// frame-level control and fast spins cross the whole sample.
pub fn encoder_step(delta: i32, fine: bool) -> f64 {
    let base = if fine { 0.000_5 } else { 0.005 };
    let magnitude = base * ((delta.unsigned_abs() as f64) + 1.0).log2();
    magnitude * f64::from(delta.signum())
}

impl TrimWindow {
    /// The whole bank.
    pub fn full() -> Self {
        Self {
            norm_start: 0.0,
            norm_end: 1.0,
        }
    }

    #[inline]
    pub fn norm_start(&self) -> f64 {
        self.norm_start
    }

    #[inline]
    pub fn norm_end(&self) -> f64 {
        self.norm_end
    }

    fn min_gap(len: usize) -> f64 {
        if len >= 2 {
            (2.0 / len as f64).min(1.0)
        } else {
            0.0
        }
    }

    /// Sets both edges at once, clamping into `[0, 1]` and keeping the window
    /// at least two frames wide for the given bank length. The end edge gives
    /// way when the pair would be narrower than the minimum.
    pub fn set(&mut self, start: f64, end: f64, len: usize) {
        let gap = Self::min_gap(len);
        let start = start.clamp(0.0, 1.0).min(1.0 - gap);
        let end = end.clamp(start + gap, 1.0);
        self.norm_start = start;
        self.norm_end = end;
    }

    /// Applies one encoder step to each edge. A moving edge stops against the
    /// opposite edge instead of pushing it. Returns true when either
    /// normalized edge actually moved.
    pub fn adjust(&mut self, start_delta: i32, end_delta: i32, fine: bool, len: usize) -> bool {
        let gap = Self::min_gap(len);
        let before = *self;

        let start_max = (self.norm_end - gap).max(0.0);
        self.norm_start =
            (self.norm_start + encoder_step(start_delta, fine)).clamp(0.0, start_max);

        let end_min = (self.norm_start + gap).min(1.0);
        self.norm_end = (self.norm_end + encoder_step(end_delta, fine)).clamp(end_min, 1.0);

        *self != before
    }

    /// First playable frame for a bank of `len` frames.
    pub fn frame_start(&self, len: usize) -> usize {
        if len < 2 {
            return 0;
        }
        let raw = (self.norm_start * len as f64).floor() as usize;
        raw.min(len - 2)
    }

    /// One past the last playable frame. Always at least `frame_start + 2`
    /// when the bank holds two or more frames.
    pub fn frame_end(&self, len: usize) -> usize {
        if len < 2 {
            return len;
        }
        let raw = (self.norm_end * len as f64).floor() as usize;
        raw.clamp(self.frame_start(len) + 2, len)
    }

    pub fn frames(&self, len: usize) -> (usize, usize) {
        (self.frame_start(len), self.frame_end(len))
    }

    pub fn is_playable(&self, len: usize) -> bool {
        let (start, end) = self.frames(len);
        end >= start + 2
    }
}
