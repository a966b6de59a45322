//! Chunked WAV saving of a committed recording.
//!
//! Only a recorded bank may be saved; loads came from the medium already.
//! The session claims the first free `RecNNNN.wav` name, writes the header
//! once, and then streams frames a budgeted slice at a time. Any I/O error
//! closes the file and fails the whole save.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use solo_core::bank::{BankOrigin, SampleBank};
use solo_store::{catalog, wav, BlockStore, StoreFile};

use crate::error::{EngineError, Result};

/// Result of one `step` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStep {
    Working,
    Done,
}

pub struct SaveSession<F: StoreFile> {
    file: Option<F>,
    name: String,
    bank: Arc<SampleBank>,
    frames_written: usize,
    chunk_frames: usize,
    write_buf: Vec<u8>,
}

impl<F: StoreFile> SaveSession<F> {
    /// Claims a name and writes the header. Fails without touching the
    /// medium if the bank is not a committed recording; fails and removes
    /// the claimed file if the header write goes wrong.
    pub fn begin<S: BlockStore<File = F>>(
        store: &mut S,
        bank: Arc<SampleBank>,
        chunk_frames: usize,
    ) -> Result<Self> {
        if !bank.loaded() || bank.origin() != BankOrigin::Recorded {
            return Err(EngineError::NothingToSave);
        }
        let name = catalog::probe_free_name(store)?;
        let mut file = store.create(&name)?;

        let data_bytes = (bank.len() * bank.channels() as usize * 2) as u32;
        if let Err(e) = wav::write_header(&mut file, bank.channels(), bank.sample_rate(), data_bytes)
        {
            drop(file);
            let _ = store.remove(&name);
            return Err(e.into());
        }
        debug!(name = %name, frames = bank.len(), "save started");
        Ok(Self {
            file: Some(file),
            name,
            bank,
            frames_written: 0,
            chunk_frames: chunk_frames.max(1),
            write_buf: Vec::new(),
        })
    }

    /// The claimed file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    pub fn progress(&self) -> f32 {
        if self.bank.len() == 0 {
            1.0
        } else {
            self.frames_written as f32 / self.bank.len() as f32
        }
    }

    /// Writes frames until done or the deadline passes. On the last slice
    /// the file is synced and closed before success is reported. Errors
    /// close the file; the session is then spent.
    pub fn step(&mut self, deadline: Instant) -> Result<SaveStep> {
        // Taken out of the option so an error path drops (closes) it.
        let mut file = self.file.take().ok_or(EngineError::Busy)?;
        let stereo = self.bank.channels() == 2;

        while self.frames_written < self.bank.len() {
            if Instant::now() >= deadline {
                self.file = Some(file);
                return Ok(SaveStep::Working);
            }
            let n = self.chunk_frames.min(self.bank.len() - self.frames_written);
            self.write_buf.clear();
            for i in self.frames_written..self.frames_written + n {
                let (l, r) = self.bank.frame(i);
                self.write_buf.extend_from_slice(&l.to_le_bytes());
                if stereo {
                    self.write_buf.extend_from_slice(&r.to_le_bytes());
                }
            }
            if let Err(e) = file.write_all(&self.write_buf) {
                warn!(name = %self.name, "write failed: {e}");
                return Err(e.into());
            }
            self.frames_written += n;
        }

        if let Err(e) = file.sync() {
            warn!(name = %self.name, "sync failed: {e}");
            return Err(e.into());
        }
        debug!(name = %self.name, frames = self.frames_written, "save finished");
        Ok(SaveStep::Done)
    }

    /// Cancels the save, closing the file. The partial file stays on the
    /// medium under its claimed name.
    pub fn abort(mut self) {
        if self.file.take().is_some() {
            debug!(name = %self.name, frames = self.frames_written, "save aborted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use solo_store::{MemStore, StoreError};

    fn deadline() -> Instant {
        Instant::now() + Duration::from_secs(1)
    }

    fn recorded_bank(frames: usize) -> Arc<SampleBank> {
        let mono: Vec<i16> = (0..frames).map(|i| i as i16).collect();
        Arc::new(SampleBank::from_mono(mono, 48_000, BankOrigin::Recorded))
    }

    fn run<F: StoreFile>(session: &mut SaveSession<F>) {
        for _ in 0..100_000 {
            if session.step(deadline()).unwrap() == SaveStep::Done {
                return;
            }
        }
        panic!("save never finished");
    }

    #[test]
    fn saved_file_round_trips() {
        let mut store = MemStore::new();
        store.mount().unwrap();
        let bank = recorded_bank(300);
        let mut session = SaveSession::begin(&mut store, bank.clone(), 64).unwrap();
        assert_eq!(session.name(), "Rec0001.wav");
        run(&mut session);

        let mut f = store.open("Rec0001.wav").unwrap();
        let info = wav::parse_header(&mut f).unwrap();
        assert_eq!(info.channels, 1);
        assert_eq!(info.sample_rate, 48_000);
        assert_eq!(info.frame_count(), 300);
        for i in 0..300i16 {
            let mut b = [0u8; 2];
            f.read_exact(&mut b).unwrap();
            assert_eq!(i16::from_le_bytes(b), i);
        }
    }

    #[test]
    fn loaded_banks_are_not_saveable() {
        let mut store = MemStore::new();
        store.mount().unwrap();
        let bank = Arc::new(SampleBank::from_mono(
            vec![1, 2, 3],
            48_000,
            BankOrigin::FromFile,
        ));
        assert!(matches!(
            SaveSession::<solo_store::MemFile>::begin(&mut store, bank, 64),
            Err(EngineError::NothingToSave)
        ));
    }

    #[test]
    fn empty_bank_is_not_saveable() {
        let mut store = MemStore::new();
        store.mount().unwrap();
        let bank = Arc::new(SampleBank::empty());
        assert!(matches!(
            SaveSession::<solo_store::MemFile>::begin(&mut store, bank, 64),
            Err(EngineError::NothingToSave)
        ));
    }

    #[test]
    fn unmounted_store_fails_the_begin() {
        let mut store = MemStore::new();
        assert!(matches!(
            SaveSession::<solo_store::MemFile>::begin(&mut store, recorded_bank(10), 64),
            Err(EngineError::Store(StoreError::NotMounted))
        ));
    }

    #[test]
    fn names_advance_past_existing_recordings() {
        let mut store = MemStore::new();
        store.mount().unwrap();
        let mut first = SaveSession::begin(&mut store, recorded_bank(4), 64).unwrap();
        run(&mut first);
        let second = SaveSession::begin(&mut store, recorded_bank(4), 64).unwrap();
        assert_eq!(second.name(), "Rec0002.wav");
    }

    #[test]
    fn step_respects_the_deadline() {
        let mut store = MemStore::new();
        store.mount().unwrap();
        let mut session = SaveSession::begin(&mut store, recorded_bank(10_000), 8).unwrap();
        let expired = Instant::now() - Duration::from_millis(1);
        assert_eq!(session.step(expired).unwrap(), SaveStep::Working);
        assert_eq!(session.frames_written(), 0);
    }

    #[test]
    fn stereo_banks_interleave_on_the_way_out() {
        let mut store = MemStore::new();
        store.mount().unwrap();
        let bank = Arc::new(SampleBank::from_stereo(
            vec![1, 2],
            vec![-1, -2],
            48_000,
            BankOrigin::Recorded,
        ));
        let mut session = SaveSession::begin(&mut store, bank, 64).unwrap();
        run(&mut session);

        let mut f = store.open("Rec0001.wav").unwrap();
        let info = wav::parse_header(&mut f).unwrap();
        assert_eq!(info.channels, 2);
        let mut body = [0u8; 8];
        f.read_exact(&mut body).unwrap();
        let words: Vec<i16> = body
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]))
            .collect();
        assert_eq!(words, [1, -1, 2, -2]);
    }

    #[test]
    fn spent_session_refuses_more_steps() {
        let mut store = MemStore::new();
        store.mount().unwrap();
        let mut session = SaveSession::begin(&mut store, recorded_bank(4), 64).unwrap();
        run(&mut session);
        assert!(matches!(session.step(deadline()), Err(EngineError::Busy)));
    }
}
