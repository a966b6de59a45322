//! State shared between the audio callback and the control surface.
//!
//! Everything in here is lock-free: plain atomics for scalars and an
//! `ArcSwap` for the bank so the callback always sees a complete sample.
//! The control side retires replaced banks, never the callback.

use std::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use solo_core::bank::SampleBank;
use solo_core::config::RecordSource;
use solo_core::lockfree::{AtomicFlag, AtomicFloat};

#[derive(Debug)]
pub struct EngineShared {
    bank: ArcSwap<SampleBank>,
    frame_start: AtomicU32,
    frame_end: AtomicU32,
    playhead: AtomicU32,
    voice_active: AtomicFlag,
    capture_active: AtomicFlag,
    record_source: AtomicU8,
    preview_active: AtomicFlag,
    preview_rate: AtomicFloat,
    preview_epoch: AtomicU32,
    preview_ack: AtomicU32,
    preview_underruns: AtomicU64,
}

impl EngineShared {
    pub fn new() -> Self {
        Self {
            bank: ArcSwap::from_pointee(SampleBank::empty()),
            frame_start: AtomicU32::new(0),
            frame_end: AtomicU32::new(0),
            playhead: AtomicU32::new(0),
            voice_active: AtomicFlag::new(false),
            capture_active: AtomicFlag::new(false),
            record_source: AtomicU8::new(RecordSource::default() as u8),
            preview_active: AtomicFlag::new(false),
            preview_rate: AtomicFloat::new(1.0),
            preview_epoch: AtomicU32::new(0),
            preview_ack: AtomicU32::new(0),
            preview_underruns: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current bank.
    #[inline]
    pub fn bank(&self) -> Arc<SampleBank> {
        self.bank.load_full()
    }

    /// Swaps in a new bank and hands the old one back for the caller to
    /// drop outside the audio callback.
    pub fn install_bank(&self, bank: Arc<SampleBank>) -> Arc<SampleBank> {
        self.bank.swap(bank)
    }

    pub fn set_window(&self, frame_start: u32, frame_end: u32) {
        self.frame_start.store(frame_start, Ordering::Release);
        self.frame_end.store(frame_end, Ordering::Release);
    }

    #[inline]
    pub fn window(&self) -> (u32, u32) {
        (
            self.frame_start.load(Ordering::Acquire),
            self.frame_end.load(Ordering::Acquire),
        )
    }

    #[inline]
    pub fn set_playhead(&self, frame: u32) {
        self.playhead.store(frame, Ordering::Relaxed);
    }

    #[inline]
    pub fn playhead(&self) -> u32 {
        self.playhead.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_voice_active(&self, active: bool) {
        self.voice_active.set(active);
    }

    #[inline]
    pub fn voice_active(&self) -> bool {
        self.voice_active.get()
    }

    #[inline]
    pub fn set_capture_active(&self, active: bool) {
        self.capture_active.set(active);
    }

    #[inline]
    pub fn capture_active(&self) -> bool {
        self.capture_active.get()
    }

    #[inline]
    pub fn set_record_source(&self, source: RecordSource) {
        self.record_source.store(source as u8, Ordering::Release);
    }

    #[inline]
    pub fn record_source(&self) -> RecordSource {
        RecordSource::from(self.record_source.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set_preview_active(&self, active: bool) {
        self.preview_active.set(active);
    }

    #[inline]
    pub fn preview_active(&self) -> bool {
        self.preview_active.get()
    }

    #[inline]
    pub fn set_preview_rate(&self, rate: f32) {
        self.preview_rate.set(rate);
    }

    #[inline]
    pub fn preview_rate(&self) -> f32 {
        self.preview_rate.get()
    }

    /// Claims the next preview epoch. Each preview start gets a fresh one
    /// so stale stop commands cannot kill a newer preview.
    pub fn next_preview_epoch(&self) -> u32 {
        self.preview_epoch.fetch_add(1, Ordering::AcqRel) + 1
    }

    #[inline]
    pub fn set_preview_ack(&self, epoch: u32) {
        self.preview_ack.store(epoch, Ordering::Release);
    }

    /// Last epoch the audio side adopted. The filler holds off until this
    /// matches its session so a drained ring from the previous preview is
    /// never topped up with the new file's audio.
    #[inline]
    pub fn preview_ack(&self) -> u32 {
        self.preview_ack.load(Ordering::Acquire)
    }

    #[inline]
    pub fn report_underrun(&self) {
        self.preview_underruns.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn underrun_count(&self) -> u64 {
        self.preview_underruns.load(Ordering::Relaxed)
    }

    /// Returns the current count and resets it.
    pub fn take_underrun_count(&self) -> u64 {
        self.preview_underruns.swap(0, Ordering::Relaxed)
    }
}

impl Default for EngineShared {
    fn default() -> Self {
        Self::new()
    }
}
