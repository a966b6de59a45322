//! Monophonic pitch estimation over the trimmed sample.
//!
//! Normalized autocorrelation on a decimated, de-meaned segment of the
//! playback window. The score at lag τ is the correlation of the segment
//! with itself shifted by τ, normalized by the energy of both halves, so a
//! perfectly periodic signal scores 1.0 at its period and every multiple of
//! it. Peak picking then has to separate the true period from its aliases;
//! see `estimate` for the rule.

use solo_core::bank::SampleBank;
use solo_core::note::{freq_to_midi, note_name};

/// Lowest estimable pitch, C1.
pub const MIN_PITCH_HZ: f32 = 32.7;
/// Highest estimable pitch, C8.
pub const MAX_PITCH_HZ: f32 = 4186.0;
/// Fewest source frames worth analyzing.
pub const MIN_REGION_FRAMES: usize = 64;

/// One pitch estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchResult {
    /// Estimated fundamental in Hz.
    pub freq_hz: f32,
    /// Normalized autocorrelation at the chosen peak, 0.0 - 1.0.
    pub score: f32,
    /// Nearest MIDI note.
    pub midi_note: u8,
    /// Offset from that note in cents.
    pub cents: f32,
}

impl PitchResult {
    pub fn note_name(&self) -> String {
        note_name(self.midi_note)
    }
}

/// Autocorrelation pitch estimator.
///
/// All fields are tunable; `Default` matches the instrument's behavior.
#[derive(Debug, Clone)]
pub struct PitchEstimator {
    pub min_hz: f32,
    pub max_hz: f32,
    /// Peaks scoring below this are treated as unpitched.
    pub min_score: f32,
    /// Candidate band as a fraction of the best peak score.
    pub peak_band: f32,
    /// Decimation factor applied before analysis.
    pub downsample: usize,
}

impl Default for PitchEstimator {
    fn default() -> Self {
        Self {
            min_hz: MIN_PITCH_HZ,
            max_hz: MAX_PITCH_HZ,
            min_score: 0.4,
            peak_band: 0.9,
            downsample: 4,
        }
    }
}

impl PitchEstimator {
    /// Estimates pitch over `[frame_start, frame_end)` of the bank.
    /// Returns `None` for unloaded banks and regions too short to analyze.
    pub fn estimate_bank(
        &self,
        bank: &SampleBank,
        frame_start: usize,
        frame_end: usize,
    ) -> Option<PitchResult> {
        if !bank.loaded() {
            return None;
        }
        let end = frame_end.min(bank.len());
        let start = frame_start.min(end);
        if end - start < MIN_REGION_FRAMES {
            return None;
        }
        let mono: Vec<f32> = (start..end)
            .map(|i| {
                let (l, r) = bank.frame(i);
                (l as f32 + r as f32) * 0.5 / 32768.0
            })
            .collect();
        self.estimate(&mono, bank.sample_rate() as f32)
    }

    /// Estimates pitch of a mono signal. Returns `None` when no peak in the
    /// pitch range scores at least `min_score`.
    pub fn estimate(&self, samples: &[f32], sample_rate: f32) -> Option<PitchResult> {
        if sample_rate <= 0.0 || self.downsample == 0 {
            return None;
        }

        // Decimate by block mean. The tail short of one block is dropped.
        let ds: Vec<f32> = samples
            .chunks_exact(self.downsample)
            .map(|c| c.iter().sum::<f32>() / self.downsample as f32)
            .collect();
        if ds.len() < 8 {
            return None;
        }

        let mean = ds.iter().sum::<f32>() / ds.len() as f32;
        let centered: Vec<f32> = ds.iter().map(|v| v - mean).collect();

        // Longest power-of-two segment that fits, centered in the region.
        let seg_len = if centered.len() >= 4_096 {
            4_096
        } else if centered.len() >= 2_048 {
            2_048
        } else {
            centered.len()
        };
        let offset = (centered.len() - seg_len) / 2;
        let x = &centered[offset..offset + seg_len];

        let rate = sample_rate / self.downsample as f32;
        let lag_min = ((rate / self.max_hz).ceil() as usize).max(1);
        let lag_max = ((rate / self.min_hz).floor() as usize).min(seg_len.saturating_sub(2));
        if lag_max <= lag_min {
            return None;
        }

        // Prefix energies so both halves of every lag normalize in O(1).
        let mut cum = vec![0f64; seg_len + 1];
        for (i, v) in x.iter().enumerate() {
            cum[i + 1] = cum[i] + f64::from(v * v);
        }
        if cum[seg_len] <= f64::EPSILON {
            return None;
        }

        let mut scores = Vec::with_capacity(lag_max - lag_min + 1);
        for lag in lag_min..=lag_max {
            let n = seg_len - lag;
            let mut dot = 0f64;
            for i in 0..n {
                dot += f64::from(x[i]) * f64::from(x[i + lag]);
            }
            let e0 = cum[n];
            let e1 = cum[lag + n] - cum[lag];
            let denom = (e0 * e1).sqrt();
            scores.push(if denom > 1e-12 {
                (dot / denom) as f32
            } else {
                0.0
            });
        }

        // Local maxima only; a monotonic slope is not a period.
        let mut peaks: Vec<(usize, f32)> = Vec::new();
        for i in 1..scores.len().saturating_sub(1) {
            if scores[i] > scores[i - 1] && scores[i] >= scores[i + 1] {
                peaks.push((lag_min + i, scores[i]));
            }
        }
        let best = peaks
            .iter()
            .map(|&(_, s)| s)
            .fold(f32::MIN, f32::max);
        if peaks.is_empty() || best < self.min_score {
            return None;
        }

        let banded: Vec<(usize, f32)> = peaks
            .into_iter()
            .filter(|&(_, s)| s >= self.peak_band * best)
            .collect();
        let (tau0, score0) = banded[0];

        // A periodic signal peaks at every multiple of its period, so the
        // band usually holds a whole train of aliases. Drop to the
        // octave-down peak only when the train stops there; a train that
        // keeps going past it means those peaks are subharmonic aliases of
        // the first one.
        let cutoff = 2 * tau0 + 2;
        let octave_down = banded
            .iter()
            .take_while(|&&(lag, _)| lag <= cutoff)
            .last()
            .copied()
            .unwrap_or((tau0, score0));
        let train_continues = banded
            .iter()
            .any(|&(lag, _)| lag > cutoff && lag <= 3 * tau0 + 3);
        let (lag, score) = if train_continues {
            (tau0, score0)
        } else {
            octave_down
        };

        let freq_hz = rate / lag as f32;
        let (midi_note, cents) = freq_to_midi(freq_hz);
        Some(PitchResult {
            freq_hz,
            score,
            midi_note,
            cents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solo_core::bank::BankOrigin;

    fn generate_sine(sample_rate: f32, freq: f32, duration: f32) -> Vec<f32> {
        let num_samples = (sample_rate * duration) as usize;
        (0..num_samples)
            .map(|i| {
                let t = i as f32 / sample_rate;
                (2.0 * std::f32::consts::PI * freq * t).sin()
            })
            .collect()
    }

    #[test]
    fn detects_a440() {
        let samples = generate_sine(48_000.0, 440.0, 1.0);
        let result = PitchEstimator::default()
            .estimate(&samples, 48_000.0)
            .unwrap();

        let error_percent = ((result.freq_hz - 440.0) / 440.0).abs() * 100.0;
        assert!(
            error_percent < 2.0,
            "Expected ~440 Hz, got {} Hz ({}% error)",
            result.freq_hz,
            error_percent
        );
        assert_eq!(result.midi_note, 69, "A4 should be MIDI note 69");
        assert_eq!(result.note_name(), "A4");
        assert!(result.score > 0.9, "clean sine should score high");
    }

    #[test]
    fn detects_various_frequencies() {
        for freq in [110.0f32, 220.0, 440.0, 1_000.0] {
            let samples = generate_sine(48_000.0, freq, 1.0);
            let result = PitchEstimator::default()
                .estimate(&samples, 48_000.0)
                .unwrap_or_else(|| panic!("should detect {freq} Hz"));
            let error_percent = ((result.freq_hz - freq) / freq).abs() * 100.0;
            assert!(
                error_percent < 2.0,
                "Expected {} Hz, got {} Hz ({}% error)",
                freq,
                result.freq_hz,
                error_percent
            );
        }
    }

    #[test]
    fn silence_is_unpitched() {
        let samples = vec![0.0f32; 48_000];
        assert!(PitchEstimator::default()
            .estimate(&samples, 48_000.0)
            .is_none());
    }

    #[test]
    fn dc_offset_alone_is_unpitched() {
        let samples = vec![0.7f32; 48_000];
        assert!(PitchEstimator::default()
            .estimate(&samples, 48_000.0)
            .is_none());
    }

    #[test]
    fn short_input_is_unpitched() {
        let samples = generate_sine(48_000.0, 440.0, 0.0005);
        assert!(PitchEstimator::default()
            .estimate(&samples, 48_000.0)
            .is_none());
    }

    #[test]
    fn unloaded_bank_is_unpitched() {
        let bank = SampleBank::empty();
        assert!(PitchEstimator::default()
            .estimate_bank(&bank, 0, 0)
            .is_none());
    }

    #[test]
    fn tiny_region_is_unpitched() {
        let mono: Vec<i16> = generate_sine(48_000.0, 440.0, 0.1)
            .iter()
            .map(|v| (v * 30_000.0) as i16)
            .collect();
        let bank = SampleBank::from_mono(mono, 48_000, BankOrigin::Recorded);
        assert!(PitchEstimator::default()
            .estimate_bank(&bank, 0, MIN_REGION_FRAMES - 1)
            .is_none());
    }

    #[test]
    fn bank_estimate_matches_raw_estimate() {
        let mono: Vec<i16> = generate_sine(48_000.0, 220.0, 1.0)
            .iter()
            .map(|v| (v * 30_000.0) as i16)
            .collect();
        let bank = SampleBank::from_mono(mono, 48_000, BankOrigin::Recorded);
        let result = PitchEstimator::default()
            .estimate_bank(&bank, 0, bank.len())
            .unwrap();
        let error_percent = ((result.freq_hz - 220.0) / 220.0).abs() * 100.0;
        assert!(error_percent < 2.0, "got {} Hz", result.freq_hz);
    }

    #[test]
    fn window_restricts_analysis() {
        // First half is 440 Hz, second half silence. A window over the
        // silent half must be unpitched.
        let mut mono: Vec<i16> = generate_sine(48_000.0, 440.0, 0.5)
            .iter()
            .map(|v| (v * 30_000.0) as i16)
            .collect();
        mono.resize(48_000, 0);
        let bank = SampleBank::from_mono(mono, 48_000, BankOrigin::Recorded);
        assert!(PitchEstimator::default()
            .estimate_bank(&bank, 26_000, 48_000)
            .is_none());
        assert!(PitchEstimator::default()
            .estimate_bank(&bank, 0, 24_000)
            .is_some());
    }
}
