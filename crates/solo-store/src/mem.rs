//! In-memory `BlockStore` for tests and the desktop simulator.
//!
//! Card removal and flaky mounts are simulated through `set_detected` and
//! `fail_next_mounts`, which is how the lifecycle retry path gets exercised
//! without hardware.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use crate::blockstore::{BlockStore, DirEntry, StoreFile};
use crate::error::{Result, StoreError};

type Blob = Arc<Mutex<Vec<u8>>>;

#[derive(Debug, Default)]
pub struct MemStore {
    files: HashMap<String, Blob>,
    detected: bool,
    mounted: bool,
    fail_mounts: u32,
}

pub struct MemFile {
    blob: Blob,
    pos: u64,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            detected: true,
            mounted: false,
            fail_mounts: 0,
        }
    }

    /// Simulates inserting or pulling the card.
    pub fn set_detected(&mut self, detected: bool) {
        self.detected = detected;
        if !detected {
            self.mounted = false;
        }
    }

    /// The next `count` mount calls fail with `NotReady`.
    pub fn fail_next_mounts(&mut self, count: u32) {
        self.fail_mounts = count;
    }

    fn require_mounted(&self) -> Result<()> {
        if self.mounted {
            Ok(())
        } else {
            Err(StoreError::NotMounted)
        }
    }

    fn check_name(name: &str) -> Result<()> {
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(())
    }
}

impl BlockStore for MemStore {
    type File = MemFile;

    fn detect(&mut self) -> bool {
        self.detected
    }

    fn mount(&mut self) -> Result<()> {
        if !self.detected {
            return Err(StoreError::NoMedium);
        }
        if self.fail_mounts > 0 {
            self.fail_mounts -= 1;
            return Err(StoreError::NotReady);
        }
        self.mounted = true;
        Ok(())
    }

    fn unmount(&mut self) {
        self.mounted = false;
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn open(&mut self, name: &str) -> Result<MemFile> {
        self.require_mounted()?;
        Self::check_name(name)?;
        let blob = self.files.get(name).cloned().ok_or_else(|| {
            StoreError::Io(io::Error::new(io::ErrorKind::NotFound, name.to_string()))
        })?;
        Ok(MemFile { blob, pos: 0 })
    }

    fn create(&mut self, name: &str) -> Result<MemFile> {
        self.require_mounted()?;
        Self::check_name(name)?;
        let blob: Blob = Arc::new(Mutex::new(Vec::new()));
        self.files.insert(name.to_string(), blob.clone());
        Ok(MemFile { blob, pos: 0 })
    }

    fn exists(&mut self, name: &str) -> Result<bool> {
        self.require_mounted()?;
        Ok(self.files.contains_key(name))
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        self.require_mounted()?;
        self.files.remove(name).ok_or_else(|| {
            StoreError::Io(io::Error::new(io::ErrorKind::NotFound, name.to_string()))
        })?;
        Ok(())
    }

    fn list(&mut self) -> Result<Vec<DirEntry>> {
        self.require_mounted()?;
        let mut entries = Vec::with_capacity(self.files.len());
        for (name, blob) in &self.files {
            let size = blob.lock().map_err(|_| StoreError::LockPoisoned)?.len() as u64;
            entries.push(DirEntry {
                name: name.clone(),
                size,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

impl StoreFile for MemFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let data = self.blob.lock().map_err(|_| StoreError::LockPoisoned)?;
        let start = (self.pos as usize).min(data.len());
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        self.pos += n as u64;
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let mut data = self.blob.lock().map_err(|_| StoreError::LockPoisoned)?;
        let start = self.pos as usize;
        if start > data.len() {
            data.resize(start, 0);
        }
        let overlap = (data.len() - start).min(buf.len());
        data[start..start + overlap].copy_from_slice(&buf[..overlap]);
        data.extend_from_slice(&buf[overlap..]);
        self.pos += buf.len() as u64;
        Ok(buf.len())
    }

    fn seek(&mut self, pos: u64) -> Result<()> {
        self.pos = pos;
        Ok(())
    }

    fn len(&self) -> Result<u64> {
        Ok(self.blob.lock().map_err(|_| StoreError::LockPoisoned)?.len() as u64)
    }

    fn sync(&mut self) -> Result<()> {
        Ok(())
    }
}
