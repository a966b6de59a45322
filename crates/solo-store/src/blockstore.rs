//! Block store abstraction over the recording medium.
//!
//! The instrument sees storage through these two traits so the same engine
//! runs against a directory on a development machine, an SD card behind a
//! filesystem driver, or an in-memory store in tests.

use std::io;

use crate::error::{Result, StoreError};

/// An open file on the store. Reads and writes move an implicit cursor;
/// `seek` is absolute. Dropping the handle closes it.
pub trait StoreFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;
    fn write(&mut self, buf: &[u8]) -> Result<usize>;
    fn seek(&mut self, pos: u64) -> Result<()>;
    fn len(&self) -> Result<u64>;
    /// Flushes buffered writes to the medium.
    fn sync(&mut self) -> Result<()>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read_exact(&mut self, mut buf: &mut [u8]) -> Result<()> {
        while !buf.is_empty() {
            match self.read(buf)? {
                0 => {
                    return Err(StoreError::Io(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "file ended early",
                    )))
                }
                n => buf = &mut buf[n..],
            }
        }
        Ok(())
    }

    fn write_all(&mut self, mut buf: &[u8]) -> Result<()> {
        while !buf.is_empty() {
            match self.write(buf)? {
                0 => {
                    return Err(StoreError::Io(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "store refused the write",
                    )))
                }
                n => buf = &buf[n..],
            }
        }
        Ok(())
    }
}

/// One file listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub size: u64,
}

/// A mountable flat namespace of files.
pub trait BlockStore {
    type File: StoreFile;

    /// Whether a medium is physically present. Cheap, callable any time.
    fn detect(&mut self) -> bool;

    fn mount(&mut self) -> Result<()>;
    fn unmount(&mut self);
    fn is_mounted(&self) -> bool;

    fn open(&mut self, name: &str) -> Result<Self::File>;
    /// Creates or truncates a file.
    fn create(&mut self, name: &str) -> Result<Self::File>;
    fn exists(&mut self, name: &str) -> Result<bool>;
    fn remove(&mut self, name: &str) -> Result<()>;
    fn list(&mut self) -> Result<Vec<DirEntry>>;
}
