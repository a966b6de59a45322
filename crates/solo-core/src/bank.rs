//! The sample bank: one stereo pair of 16-bit arenas holding the active sample.
//!
//! A bank is immutable once built. Replacing the sample means building a new
//! bank and swapping the `Arc` that points at it, so the audio callback never
//! observes a half-written buffer.

use crate::config::ENGINE_SAMPLE_RATE;

/// Hard limit on frames stored in one bank.
pub const MAX_BANK_FRAMES: usize = 2 * 1024 * 1024;

/// How the audio in the bank got there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankOrigin {
    /// Committed from the capture path. Eligible for saving.
    Recorded,
    /// Streamed in from a file on the storage medium.
    FromFile,
}

/// Converts a float sample in [-1, 1] to the stored 16-bit form.
#[inline]
pub fn quantize(sample: f32) -> i16 {
    (sample * 32768.0).round().clamp(-32768.0, 32767.0) as i16
}

/// Converts a stored 16-bit sample back to float.
#[inline]
pub fn dequantize(value: i16) -> f32 {
    value as f32 / 32768.0
}

#[derive(Debug, Clone)]
pub struct SampleBank {
    left: Box<[i16]>,
    right: Box<[i16]>,
    len: usize,
    sample_rate: u32,
    channels: u16,
    loaded: bool,
    origin: BankOrigin,
}

impl SampleBank {
    /// An unloaded bank. Playback and analysis reject it.
    pub fn empty() -> Self {
        Self {
            left: Box::new([]),
            right: Box::new([]),
            len: 0,
            sample_rate: ENGINE_SAMPLE_RATE,
            channels: 1,
            loaded: false,
            origin: BankOrigin::Recorded,
        }
    }

    /// Builds a mono bank. The single channel is duplicated into both arenas
    /// so playback never branches on channel count.
    pub fn from_mono(mut samples: Vec<i16>, sample_rate: u32, origin: BankOrigin) -> Self {
        samples.truncate(MAX_BANK_FRAMES);
        let len = samples.len();
        let left: Box<[i16]> = samples.into_boxed_slice();
        let right = left.clone();
        Self {
            left,
            right,
            len,
            sample_rate,
            channels: 1,
            loaded: len > 0,
            origin,
        }
    }

    /// Builds a stereo bank. Arenas are clamped to the shorter channel.
    pub fn from_stereo(
        mut left: Vec<i16>,
        mut right: Vec<i16>,
        sample_rate: u32,
        origin: BankOrigin,
    ) -> Self {
        let len = left.len().min(right.len()).min(MAX_BANK_FRAMES);
        left.truncate(len);
        right.truncate(len);
        Self {
            left: left.into_boxed_slice(),
            right: right.into_boxed_slice(),
            len,
            sample_rate,
            channels: 2,
            loaded: len > 0,
            origin,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn channels(&self) -> u16 {
        self.channels
    }

    #[inline]
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    #[inline]
    pub fn origin(&self) -> BankOrigin {
        self.origin
    }

    pub fn left(&self) -> &[i16] {
        &self.left
    }

    pub fn right(&self) -> &[i16] {
        &self.right
    }

    /// One stereo frame. Callers keep `idx` inside `0..len`.
    #[inline]
    pub fn frame(&self, idx: usize) -> (i16, i16) {
        (self.left[idx], self.right[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bank_is_unloaded() {
        let bank = SampleBank::empty();
        assert_eq!(bank.len(), 0);
        assert!(!bank.loaded());
        assert_eq!(bank.sample_rate(), ENGINE_SAMPLE_RATE);
    }

    #[test]
    fn mono_bank_duplicates_into_both_arenas() {
        let bank = SampleBank::from_mono(vec![1, -2, 3], 44_100, BankOrigin::FromFile);
        assert_eq!(bank.len(), 3);
        assert_eq!(bank.channels(), 1);
        assert!(bank.loaded());
        assert_eq!(bank.frame(1), (-2, -2));
        assert_eq!(bank.left(), bank.right());
    }

    #[test]
    fn stereo_bank_keeps_channels_separate() {
        let bank = SampleBank::from_stereo(vec![10, 20], vec![-10, -20], 48_000, BankOrigin::FromFile);
        assert_eq!(bank.channels(), 2);
        assert_eq!(bank.frame(0), (10, -10));
        assert_eq!(bank.frame(1), (20, -20));
    }

    #[test]
    fn overlong_input_truncates_to_capacity_and_stays_loaded() {
        let samples = vec![7i16; MAX_BANK_FRAMES + 1_000];
        let bank = SampleBank::from_mono(samples, 48_000, BankOrigin::FromFile);
        assert_eq!(bank.len(), MAX_BANK_FRAMES);
        assert!(bank.loaded());
    }

    #[test]
    fn mismatched_stereo_clamps_to_shorter_channel() {
        let bank = SampleBank::from_stereo(vec![1, 2, 3], vec![4, 5], 48_000, BankOrigin::FromFile);
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn zero_length_input_stays_unloaded() {
        let bank = SampleBank::from_mono(Vec::new(), 48_000, BankOrigin::Recorded);
        assert!(!bank.loaded());
    }

    #[test]
    fn quantize_matches_dequantize_for_representable_values() {
        for v in [-32768i16, -1, 0, 1, 12_345, 32_767] {
            assert_eq!(quantize(dequantize(v)), v);
        }
    }

    #[test]
    fn quantize_clamps_out_of_range_input() {
        assert_eq!(quantize(1.5), 32_767);
        assert_eq!(quantize(-1.5), -32_768);
        assert_eq!(quantize(1.0), 32_767);
        assert_eq!(quantize(-1.0), -32_768);
    }
}
