//! Chunked WAV loading into a fresh bank.
//!
//! A load session validates the header up front and then streams the data
//! chunk a budgeted slice at a time so the polling loop stays responsive
//! on slow media. Oversized files truncate at the bank capacity; files
//! shorter than their declared data length commit what was actually read.

use std::time::Instant;

use tracing::{debug, warn};

use solo_core::bank::{BankOrigin, SampleBank, MAX_BANK_FRAMES};
use solo_store::wav::{self, WavInfo};
use solo_store::StoreFile;

/// A finished load.
#[derive(Debug)]
pub struct LoadOutcome {
    pub bank: SampleBank,
    /// Source held more frames than the bank can.
    pub truncated: bool,
    /// Source ended before its declared data length.
    pub partial: bool,
}

/// Result of one `step` call.
pub enum LoadStep {
    Working,
    Done(LoadOutcome),
}

pub struct LoadSession<F: StoreFile> {
    file: F,
    info: WavInfo,
    left: Vec<i16>,
    right: Vec<i16>,
    frames_wanted: usize,
    truncated: bool,
    partial: bool,
    chunk_frames: usize,
    read_buf: Vec<u8>,
}

impl<F: StoreFile> LoadSession<F> {
    /// Parses the header and positions the file at the first frame.
    pub fn begin(mut file: F, chunk_frames: usize) -> wav::Result<Self> {
        let info = wav::parse_header(&mut file)?;
        let declared = info.frame_count();
        let frames_wanted = declared.min(MAX_BANK_FRAMES);
        let truncated = declared > MAX_BANK_FRAMES;
        if truncated {
            debug!(declared, kept = frames_wanted, "source exceeds bank capacity");
        }
        Ok(Self {
            file,
            info,
            left: Vec::new(),
            right: Vec::new(),
            frames_wanted,
            truncated,
            partial: false,
            chunk_frames: chunk_frames.max(1),
            read_buf: Vec::new(),
        })
    }

    #[inline]
    pub fn info(&self) -> &WavInfo {
        &self.info
    }

    /// Fraction of the wanted frames read so far.
    pub fn progress(&self) -> f32 {
        if self.frames_wanted == 0 {
            1.0
        } else {
            self.left.len() as f32 / self.frames_wanted as f32
        }
    }

    /// Reads chunks until done or the deadline passes.
    pub fn step(&mut self, deadline: Instant) -> wav::Result<LoadStep> {
        let block = self.info.block_align() as usize;

        while self.left.len() < self.frames_wanted {
            if Instant::now() >= deadline {
                return Ok(LoadStep::Working);
            }
            let want = self.chunk_frames.min(self.frames_wanted - self.left.len());
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
                warn!(
                    read = self.left.len(),
                    declared = self.info.frame_count(),
                    "data chunk ended early"
                );
                self.partial = true;
                break;
            }

            for frame in self.read_buf[..got_frames * block].chunks_exact(block) {
                self.left
                    .push(i16::from_le_bytes([frame[0], frame[1]]));
                if self.info.channels == 2 {
                    self.right
                        .push(i16::from_le_bytes([frame[2], frame[3]]));
                }
            }
        }

        let left = std::mem::take(&mut self.left);
        let bank = if self.info.channels == 2 {
            SampleBank::from_stereo(
                left,
                std::mem::take(&mut self.right),
                self.info.sample_rate,
                BankOrigin::FromFile,
            )
        } else {
            SampleBank::from_mono(left, self.info.sample_rate, BankOrigin::FromFile)
        };
        Ok(LoadStep::Done(LoadOutcome {
            bank,
            truncated: self.truncated,
            partial: self.partial,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use solo_store::{BlockStore, MemStore, StoreFile as _};

    fn deadline() -> Instant {
        Instant::now() + Duration::from_secs(1)
    }

    fn run<F: StoreFile>(mut session: LoadSession<F>) -> LoadOutcome {
        for _ in 0..100_000 {
            if let LoadStep::Done(outcome) = session.step(deadline()).unwrap() {
                return outcome;
            }
        }
        panic!("load never finished");
    }

    fn write_wav(store: &mut MemStore, name: &str, channels: u16, frames: &[i16]) {
        let mut f = store.create(name).unwrap();
        wav::write_header(&mut f, channels, 44_100, (frames.len() * 2) as u32).unwrap();
        for s in frames {
            f.write_all(&s.to_le_bytes()).unwrap();
        }
    }

    #[test]
    fn mono_file_loads_completely() {
        let mut store = MemStore::new();
        store.mount().unwrap();
        let samples: Vec<i16> = (0..500).map(|i| i as i16).collect();
        write_wav(&mut store, "m.wav", 1, &samples);

        let file = store.open("m.wav").unwrap();
        let outcome = run(LoadSession::begin(file, 64).unwrap());
        assert!(!outcome.truncated);
        assert!(!outcome.partial);
        assert_eq!(outcome.bank.len(), 500);
        assert_eq!(outcome.bank.sample_rate(), 44_100);
        assert_eq!(outcome.bank.left(), &samples[..]);
        assert_eq!(outcome.bank.left(), outcome.bank.right());
    }

    #[test]
    fn stereo_file_deinterleaves() {
        let mut store = MemStore::new();
        store.mount().unwrap();
        // L, R, L, R...
        let interleaved = [10i16, -10, 20, -20, 30, -30];
        write_wav(&mut store, "s.wav", 2, &interleaved);

        let file = store.open("s.wav").unwrap();
        let outcome = run(LoadSession::begin(file, 2).unwrap());
        assert_eq!(outcome.bank.channels(), 2);
        assert_eq!(outcome.bank.left(), &[10, 20, 30]);
        assert_eq!(outcome.bank.right(), &[-10, -20, -30]);
    }

    #[test]
    fn short_data_reports_partial() {
        let mut store = MemStore::new();
        store.mount().unwrap();
        let mut f = store.create("cut.wav").unwrap();
        // Header declares 100 frames, file holds 10.
        wav::write_header(&mut f, 1, 48_000, 200).unwrap();
        for s in 0..10i16 {
            f.write_all(&s.to_le_bytes()).unwrap();
        }

        let file = store.open("cut.wav").unwrap();
        let outcome = run(LoadSession::begin(file, 16).unwrap());
        assert!(outcome.partial);
        assert!(!outcome.truncated);
        assert_eq!(outcome.bank.len(), 10);
        assert!(outcome.bank.loaded());
    }

    #[test]
    fn oversized_declared_length_truncates_at_capacity() {
        let mut store = MemStore::new();
        store.mount().unwrap();
        let mut f = store.create("big.wav").unwrap();
        wav::write_header(&mut f, 1, 48_000, ((MAX_BANK_FRAMES + 1_000) * 2) as u32).unwrap();
        drop(f);

        let file = store.open("big.wav").unwrap();
        let session = LoadSession::begin(file, 4_096).unwrap();
        assert!(session.truncated);
        // The file body is empty, so the read also comes up partial; the
        // truncation flag must survive regardless.
        let outcome = run(session);
        assert!(outcome.truncated);
    }

    #[test]
    fn step_respects_the_deadline() {
        let mut store = MemStore::new();
        store.mount().unwrap();
        let samples = vec![0i16; 10_000];
        write_wav(&mut store, "slow.wav", 1, &samples);

        let file = store.open("slow.wav").unwrap();
        let mut session = LoadSession::begin(file, 8).unwrap();
        // An already-expired deadline reads nothing.
        let expired = Instant::now() - Duration::from_millis(1);
        assert!(matches!(session.step(expired).unwrap(), LoadStep::Working));
        assert_eq!(session.progress(), 0.0);
    }

    #[test]
    fn bad_header_fails_begin() {
        let mut store = MemStore::new();
        store.mount().unwrap();
        store.create("bad.wav").unwrap().write_all(b"garbage").unwrap();
        let file = store.open("bad.wav").unwrap();
        assert!(LoadSession::begin(file, 64).is_err());
    }
}
