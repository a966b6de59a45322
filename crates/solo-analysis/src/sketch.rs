//! Column min/max waveform sketch for the display.
//!
//! A sketch maps a frame span onto a fixed number of display columns and
//! keeps the min and max amplitude seen in each. The live variant is fed
//! one sample at a time while recording; `from_bank` rebuilds the sketch
//! from committed audio.

use solo_core::bank::SampleBank;

#[derive(Debug, Clone)]
pub struct WaveSketch {
    /// Per-column (min, max). Untouched columns hold (MAX, MIN).
    cols: Vec<(f32, f32)>,
    span_frames: usize,
    pos: usize,
    peak: f32,
}

impl WaveSketch {
    /// A live sketch covering `span_frames` of future input.
    pub fn live(columns: usize, span_frames: usize) -> Self {
        Self {
            cols: vec![(f32::MAX, f32::MIN); columns],
            span_frames,
            pos: 0,
            peak: 0.0,
        }
    }

    /// Sketch of `[frame_start, frame_end)` of a bank, channels averaged.
    pub fn from_bank(
        bank: &SampleBank,
        frame_start: usize,
        frame_end: usize,
        columns: usize,
    ) -> Self {
        let end = frame_end.min(bank.len());
        let start = frame_start.min(end);
        let mut sketch = Self::live(columns, end - start);
        for i in start..end {
            let (l, r) = bank.frame(i);
            sketch.push((l as f32 + r as f32) * 0.5 / 32768.0);
        }
        sketch
    }

    /// Folds one sample into its column. Samples past the span are dropped.
    #[inline]
    pub fn push(&mut self, sample: f32) {
        if self.pos >= self.span_frames || self.cols.is_empty() {
            return;
        }
        let col = self.pos * self.cols.len() / self.span_frames;
        let (min, max) = &mut self.cols[col];
        *min = min.min(sample);
        *max = max.max(sample);
        self.peak = self.peak.max(sample.abs());
        self.pos += 1;
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.cols.len()
    }

    /// Columns that have received at least one sample.
    pub fn filled_columns(&self) -> usize {
        if self.span_frames == 0 || self.pos == 0 {
            return 0;
        }
        ((self.pos - 1) * self.cols.len() / self.span_frames + 1).min(self.cols.len())
    }

    /// Raw (min, max) for a column; (0, 0) when untouched.
    pub fn column(&self, index: usize) -> (f32, f32) {
        match self.cols.get(index) {
            Some(&(min, max)) if min <= max => (min, max),
            _ => (0.0, 0.0),
        }
    }

    /// Column scaled by the running peak so the loudest sample spans the
    /// full display height.
    pub fn normalized(&self, index: usize) -> (f32, f32) {
        let (min, max) = self.column(index);
        if self.peak <= f32::EPSILON {
            return (0.0, 0.0);
        }
        (min / self.peak, max / self.peak)
    }

    #[inline]
    pub fn peak(&self) -> f32 {
        self.peak
    }

    /// Fraction of the span consumed so far.
    pub fn progress(&self) -> f32 {
        if self.span_frames == 0 {
            0.0
        } else {
            self.pos as f32 / self.span_frames as f32
        }
    }
}
