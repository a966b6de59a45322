//! File preview: a budgeted reader that decodes ahead into an SPSC ring,
//! and a resampling tap the audio callback reads from.
//!
//! The reader loops the file forever; preview ends when the session is
//! dropped and the tap is told to stop. Sessions carry an epoch so a stop
//! aimed at an old preview cannot kill the one that replaced it.

use std::time::Instant;

use ringbuf::{
    traits::{Consumer, Observer, Producer, Split},
    HeapCons, HeapProd, HeapRb,
};

use solo_store::wav::{self, WavError, WavInfo};
use solo_store::StoreFile;

/// File-reader side of the preview ring.
pub struct PreviewProducer {
    prod: HeapProd<f32>,
}

unsafe impl Send for PreviewProducer {}

impl PreviewProducer {
    pub fn write_space(&self) -> usize {
        self.prod.vacant_len()
    }

    pub fn push_slice(&mut self, samples: &[f32]) -> usize {
        self.prod.push_slice(samples)
    }
}

/// Audio-callback side: linear interpolation over buffered mono samples.
pub struct PreviewTap {
    cons: HeapCons<f32>,
    window: [f32; 2],
    primed: bool,
    frac: f32,
}

unsafe impl Send for PreviewTap {}

impl PreviewTap {
    /// Next output sample, or `None` when fewer than two samples are
    /// buffered. Advances the fractional read position by `rate`.
    #[inline]
    pub fn render(&mut self, rate: f32) -> Option<f32> {
        if !self.primed {
            if self.cons.occupied_len() < 2 {
                return None;
            }
            self.window = [self.cons.try_pop()?, self.cons.try_pop()?];
            self.primed = true;
            self.frac = 0.0;
        }

        let out = self.window[0] + (self.window[1] - self.window[0]) * self.frac;
        self.frac += rate.max(0.0);
        while self.frac >= 1.0 {
            match self.cons.try_pop() {
                Some(next) => {
                    self.window[0] = self.window[1];
                    self.window[1] = next;
                    self.frac -= 1.0;
                }
                None => {
                    // Ran dry mid-stream; re-prime when data returns.
                    self.primed = false;
                    self.frac = 0.0;
                    break;
                }
            }
        }
        Some(out)
    }

    /// Drops the interpolation state and everything buffered.
    pub fn reset(&mut self) {
        self.primed = false;
        self.frac = 0.0;
        while self.cons.try_pop().is_some() {}
    }

    pub fn available(&self) -> usize {
        self.cons.occupied_len()
    }
}

pub struct PreviewRing;

impl PreviewRing {
    pub fn with_capacity(frames: usize) -> (PreviewProducer, PreviewTap) {
        let rb = HeapRb::<f32>::new(frames.max(4));
        let (prod, cons) = rb.split();
        (
            PreviewProducer { prod },
            PreviewTap {
                cons,
                window: [0.0; 2],
                primed: false,
                frac: 0.0,
            },
        )
    }
}

/// Control-side half of one preview: owns the file and the producer, and
/// decodes ahead of the tap a budgeted slice at a time.
pub struct PreviewSession<F: StoreFile> {
    file: F,
    info: WavInfo,
    producer: PreviewProducer,
    epoch: u32,
    rate: f32,
    frames_left: u32,
    loops: u64,
    chunk_frames: usize,
    read_buf: Vec<u8>,
    decoded: Vec<f32>,
}

impl<F: StoreFile> PreviewSession<F> {
    /// Parses the header and positions the file at the first frame. On
    /// failure the producer comes back with the error so the next preview
    /// can reuse it.
    pub fn begin(
        mut file: F,
        epoch: u32,
        producer: PreviewProducer,
        chunk_frames: usize,
        engine_rate: u32,
    ) -> Result<Self, (PreviewProducer, WavError)> {
        let info = match wav::parse_header(&mut file) {
            Ok(info) => info,
            Err(e) => return Err((producer, e)),
        };
        if let Err(e) = file.seek(info.data_offset) {
            return Err((producer, e.into()));
        }

        let rate = info.sample_rate as f32 / engine_rate as f32;
        Ok(Self {
            file,
            info,
            producer,
            epoch,
            rate,
            frames_left: info.frame_count() as u32,
            loops: 0,
            chunk_frames: chunk_frames.max(1),
            read_buf: Vec::new(),
            decoded: Vec::new(),
        })
    }

    #[inline]
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Source rate over engine rate; the tap advances by this much per
    /// output frame.
    #[inline]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Times the reader has wrapped back to the start of the data chunk.
    #[inline]
    pub fn loop_count(&self) -> u64 {
        self.loops
    }

    /// Decodes chunks into the ring until the ring is full or the deadline
    /// passes. Hitting the end of the data seeks back to its start.
    pub fn fill(&mut self, deadline: Instant) -> wav::Result<usize> {
        if self.info.frame_count() == 0 {
            return Ok(0);
        }
        let block = self.info.block_align() as usize;
        let mut total = 0;
        let mut just_looped = false;

        loop {
            if Instant::now() >= deadline {
                break;
            }
            let space = self.producer.write_space();
            if space == 0 {
                break;
            }
            if self.frames_left == 0 {
                self.file.seek(self.info.data_offset)?;
                self.frames_left = self.info.frame_count() as u32;
                self.loops += 1;
                just_looped = true;
                continue;
            }

            let want = self
                .chunk_frames
                .min(space)
                .min(self.frames_left as usize);
            self.read_buf.resize(want * block, 0);
            let mut got = 0;
            while got < self.read_buf.len() {
                let n = self.file.read(&mut self.read_buf[got..])?;
                if n == 0 {
                    break;
                }
                got += n;
            }
            let got_frames = got / block;
            if got_frames == 0 {
                if just_looped {
                    // Declared frames but no bytes behind them; give up
                    // rather than seek in a tight circle.
                    break;
                }
                // File shorter than its declared data length; loop early.
                self.frames_left = 0;
                continue;
            }
            just_looped = false;

            self.decoded.clear();
            for frame in self.read_buf[..got_frames * block].chunks_exact(block) {
                let sample = if self.info.channels == 1 {
                    i16::from_le_bytes([frame[0], frame[1]]) as f32
                } else {
                    let l = i16::from_le_bytes([frame[0], frame[1]]) as f32;
                    let r = i16::from_le_bytes([frame[2], frame[3]]) as f32;
                    (l + r) * 0.5
                };
                self.decoded.push(sample / 32768.0);
            }
            total += self.producer.push_slice(&self.decoded);
            self.frames_left -= got_frames as u32;
        }
        Ok(total)
    }

    /// Ends the session, handing the producer back for the next preview.
    pub fn finish(self) -> (u32, PreviewProducer) {
        (self.epoch, self.producer)
    }
}
