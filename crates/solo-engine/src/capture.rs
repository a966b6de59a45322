//! Capture ring between the audio callback and the recorder.
//!
//! The callback quantizes the selected input source and pushes one sample
//! per frame; the control side drains in batches. When the recorder falls
//! behind and the ring fills, samples are dropped and counted rather than
//! blocking the callback.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ringbuf::{
    traits::{Consumer, Observer, Producer, Split},
    HeapCons, HeapProd, HeapRb,
};

#[derive(Debug, Default)]
pub struct CaptureMeta {
    frames_pushed: AtomicU64,
    frames_dropped: AtomicU64,
}

/// Callback side.
pub struct CaptureProducer {
    prod: HeapProd<i16>,
    meta: Arc<CaptureMeta>,
}

unsafe impl Send for CaptureProducer {}

impl CaptureProducer {
    /// Pushes one quantized sample. Returns false when the ring is full
    /// and the sample was dropped.
    #[inline]
    pub fn push(&mut self, sample: i16) -> bool {
        if self.prod.try_push(sample).is_ok() {
            self.meta.frames_pushed.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            self.meta.frames_dropped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    pub fn write_space(&self) -> usize {
        self.prod.vacant_len()
    }

    pub fn capacity(&self) -> usize {
        self.prod.capacity().get()
    }
}

/// Recorder side.
pub struct CaptureConsumer {
    cons: HeapCons<i16>,
    meta: Arc<CaptureMeta>,
}

unsafe impl Send for CaptureConsumer {}

impl CaptureConsumer {
    /// Pops up to `buf.len()` samples. Returns how many were read.
    pub fn pop_chunk(&mut self, buf: &mut [i16]) -> usize {
        self.cons.pop_slice(buf)
    }

    pub fn available(&self) -> usize {
        self.cons.occupied_len()
    }

    /// Discards everything buffered.
    pub fn clear(&mut self) {
        while self.cons.try_pop().is_some() {}
    }

    pub fn frames_pushed(&self) -> u64 {
        self.meta.frames_pushed.load(Ordering::Relaxed)
    }

    pub fn frames_dropped(&self) -> u64 {
        self.meta.frames_dropped.load(Ordering::Relaxed)
    }
}

pub struct CaptureRing;

impl CaptureRing {
    pub fn with_capacity(frames: usize) -> (CaptureProducer, CaptureConsumer) {
        let rb = HeapRb::<i16>::new(frames.max(64));
        let (prod, cons) = rb.split();
        let meta = Arc::new(CaptureMeta::default());

        (
            CaptureProducer {
                prod,
                meta: meta.clone(),
            },
            CaptureConsumer { cons, meta },
        )
    }
}
