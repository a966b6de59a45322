//! Control-side half of recording.
//!
//! The audio callback quantizes input into the capture ring; this drains
//! it into a pending take, feeding the live waveform sketch as it goes,
//! and turns the take into a committed bank. The duration cap is enforced
//! here: hitting it auto-stops the take and the caller commits inline.

use tracing::debug;

use solo_analysis::WaveSketch;
use solo_core::bank::{dequantize, BankOrigin, SampleBank};

use crate::capture::CaptureConsumer;

/// What one drain pass found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Still room under the cap.
    Running,
    /// The cap was reached; capture should stop and the take be committed.
    CapReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    Taking,
}

pub struct Recorder {
    consumer: CaptureConsumer,
    pending: Vec<i16>,
    max_frames: usize,
    sketch: WaveSketch,
    wave_columns: usize,
    sample_rate: u32,
    stage: Stage,
    chunk: Vec<i16>,
}

impl Recorder {
    pub fn new(
        consumer: CaptureConsumer,
        max_frames: usize,
        wave_columns: usize,
        sample_rate: u32,
    ) -> Self {
        Self {
            consumer,
            pending: Vec::new(),
            max_frames,
            sketch: WaveSketch::live(wave_columns, max_frames),
            wave_columns,
            sample_rate,
            stage: Stage::Idle,
            chunk: vec![0; 1_024],
        }
    }

    /// Starts a fresh take, discarding anything buffered from before.
    pub fn start(&mut self) {
        self.consumer.clear();
        self.pending.clear();
        self.sketch = WaveSketch::live(self.wave_columns, self.max_frames);
        self.stage = Stage::Taking;
    }

    #[inline]
    pub fn is_taking(&self) -> bool {
        self.stage == Stage::Taking
    }

    /// Frames captured so far in this take.
    #[inline]
    pub fn position(&self) -> usize {
        self.pending.len()
    }

    /// The live waveform built alongside the take.
    pub fn sketch(&self) -> &WaveSketch {
        &self.sketch
    }

    /// Samples the callback pushed but the ring could not hold.
    pub fn frames_dropped(&self) -> u64 {
        self.consumer.frames_dropped()
    }

    /// Moves everything buffered in the ring into the pending take, up to
    /// the cap. Extra samples past the cap are discarded.
    pub fn drain(&mut self) -> DrainOutcome {
        if self.stage != Stage::Taking {
            return DrainOutcome::Running;
        }
        loop {
            let n = self.consumer.pop_chunk(&mut self.chunk);
            if n == 0 {
                break;
            }
            let room = self.max_frames - self.pending.len();
            let take = n.min(room);
            for &s in &self.chunk[..take] {
                self.sketch.push(dequantize(s));
            }
            self.pending.extend_from_slice(&self.chunk[..take]);
            if self.pending.len() >= self.max_frames {
                debug!(frames = self.pending.len(), "recording cap reached");
                return DrainOutcome::CapReached;
            }
        }
        DrainOutcome::Running
    }

    /// Ends the take and builds the committed bank: mono at the engine
    /// rate, trimmed state left to the caller. Returns `None` for an empty
    /// take.
    pub fn commit(&mut self) -> Option<SampleBank> {
        self.drain();
        self.stage = Stage::Idle;
        if self.pending.is_empty() {
            return None;
        }
        let take = std::mem::take(&mut self.pending);
        debug!(frames = take.len(), "committing take");
        Some(SampleBank::from_mono(
            take,
            self.sample_rate,
            BankOrigin::Recorded,
        ))
    }

    /// Throws the take away.
    pub fn discard(&mut self) {
        self.consumer.clear();
        self.pending.clear();
        self.stage = Stage::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureRing;

    fn recorder_with_cap(cap: usize) -> (crate::capture::CaptureProducer, Recorder) {
        let (prod, cons) = CaptureRing::with_capacity(4_096);
        (prod, Recorder::new(cons, cap, 128, 48_000))
    }

    #[test]
    fn drained_samples_reach_the_commit_in_order() {
        let (mut prod, mut rec) = recorder_with_cap(1_000);
        rec.start();
        for v in 0..100i16 {
            prod.push(v);
        }
        assert_eq!(rec.drain(), DrainOutcome::Running);
        assert_eq!(rec.position(), 100);

        let bank = rec.commit().unwrap();
        assert_eq!(bank.len(), 100);
        assert_eq!(bank.channels(), 1);
        assert_eq!(bank.sample_rate(), 48_000);
        assert_eq!(bank.origin(), BankOrigin::Recorded);
        let expected: Vec<i16> = (0..100).collect();
        assert_eq!(bank.left(), &expected[..]);
    }

    #[test]
    fn cap_stops_the_take() {
        let (mut prod, mut rec) = recorder_with_cap(50);
        rec.start();
        for v in 0..80i16 {
            prod.push(v);
        }
        assert_eq!(rec.drain(), DrainOutcome::CapReached);
        assert_eq!(rec.position(), 50);
        let bank = rec.commit().unwrap();
        assert_eq!(bank.len(), 50);
    }

    #[test]
    fn sketch_tracks_the_take() {
        let (mut prod, mut rec) = recorder_with_cap(1_000);
        rec.start();
        for _ in 0..10 {
            prod.push(16_384);
        }
        rec.drain();
        assert!(rec.sketch().peak() > 0.49);
        assert!(rec.sketch().filled_columns() >= 1);
    }

    #[test]
    fn empty_take_commits_to_nothing() {
        let (_prod, mut rec) = recorder_with_cap(1_000);
        rec.start();
        assert!(rec.commit().is_none());
    }

    #[test]
    fn start_discards_the_previous_backlog() {
        let (mut prod, mut rec) = recorder_with_cap(1_000);
        rec.start();
        prod.push(1);
        prod.push(2);
        rec.drain();

        rec.start();
        prod.push(9);
        rec.drain();
        let bank = rec.commit().unwrap();
        assert_eq!(bank.left(), &[9]);
    }

    #[test]
    fn discard_leaves_nothing_behind() {
        let (mut prod, mut rec) = recorder_with_cap(1_000);
        rec.start();
        prod.push(5);
        rec.drain();
        rec.discard();
        assert!(!rec.is_taking());
        assert_eq!(rec.position(), 0);
        assert!(rec.commit().is_none());
    }

    #[test]
    fn drain_outside_a_take_is_inert() {
        let (mut prod, mut rec) = recorder_with_cap(1_000);
        prod.push(1);
        assert_eq!(rec.drain(), DrainOutcome::Running);
        assert_eq!(rec.position(), 0);
    }
}
