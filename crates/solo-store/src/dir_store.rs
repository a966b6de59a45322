//! `BlockStore` backed by one directory on the host filesystem.

use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use crate::blockstore::{BlockStore, DirEntry, StoreFile};
use crate::error::{Result, StoreError};

/// Flat file store rooted at one directory. Mounting checks the directory
/// exists; the directory standing in for the card can disappear and
/// reappear between mounts, like a removable medium.
#[derive(Debug)]
pub struct DirStore {
    root: PathBuf,
    mounted: bool,
}

pub struct DirFile {
    inner: fs::File,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mounted: false,
        }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    fn require_mounted(&self) -> Result<()> {
        if self.mounted {
            Ok(())
        } else {
            Err(StoreError::NotMounted)
        }
    }
}

impl BlockStore for DirStore {
    type File = DirFile;

    fn detect(&mut self) -> bool {
        self.root.is_dir()
    }

    fn mount(&mut self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(StoreError::NoMedium);
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

    fn open(&mut self, name: &str) -> Result<DirFile> {
        self.require_mounted()?;
        let file = fs::File::open(self.path_for(name)?)?;
        Ok(DirFile { inner: file })
    }

    fn create(&mut self, name: &str) -> Result<DirFile> {
        self.require_mounted()?;
        let file = fs::File::create(self.path_for(name)?)?;
        Ok(DirFile { inner: file })
    }

    fn exists(&mut self, name: &str) -> Result<bool> {
        self.require_mounted()?;
        Ok(self.path_for(name)?.is_file())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        self.require_mounted()?;
        fs::remove_file(self.path_for(name)?)?;
        Ok(())
    }

    fn list(&mut self) -> Result<Vec<DirEntry>> {
        self.require_mounted()?;
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let meta = entry.metadata()?;
            if meta.is_file() {
                entries.push(DirEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    size: meta.len(),
                });
            }
        }
        Ok(entries)
    }
}

impl StoreFile for DirFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.inner.read(buf)?)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        Ok(self.inner.write(buf)?)
    }

    fn seek(&mut self, pos: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    fn len(&self) -> Result<u64> {
        Ok(self.inner.metadata()?.len())
    }

    fn sync(&mut self) -> Result<()> {
        self.inner.flush()?;
        self.inner.sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_requires_existing_directory() {
        let mut store = DirStore::new("/definitely/not/a/real/path");
        assert!(!store.detect());
        assert!(matches!(store.mount(), Err(StoreError::NoMedium)));
        assert!(!store.is_mounted());
    }

    #[test]
    fn files_round_trip_through_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirStore::new(dir.path());
        assert!(store.detect());
        store.mount().unwrap();

        let mut f = store.create("take.wav").unwrap();
        f.write_all(b"hello").unwrap();
        f.sync().unwrap();
        drop(f);

        assert!(store.exists("take.wav").unwrap());
        let mut f = store.open("take.wav").unwrap();
        assert_eq!(f.len().unwrap(), 5);
        let mut buf = [0u8; 5];
        f.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"hello");

        let listing = store.list().unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "take.wav");
        assert_eq!(listing[0].size, 5);

        store.remove("take.wav").unwrap();
        assert!(!store.exists("take.wav").unwrap());
    }

    #[test]
    fn unmounted_store_rejects_operations() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirStore::new(dir.path());
        assert!(matches!(store.open("x.wav"), Err(StoreError::NotMounted)));
        assert!(matches!(store.list(), Err(StoreError::NotMounted)));
    }

    #[test]
    fn path_separators_are_invalid_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirStore::new(dir.path());
        store.mount().unwrap();
        assert!(matches!(
            store.open("../escape.wav"),
            Err(StoreError::InvalidName(_))
        ));
    }

    #[test]
    fn seek_positions_reads() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirStore::new(dir.path());
        store.mount().unwrap();
        let mut f = store.create("seek.bin").unwrap();
        f.write_all(&[0, 1, 2, 3, 4, 5]).unwrap();
        drop(f);

        let mut f = store.open("seek.bin").unwrap();
        f.seek(4).unwrap();
        let mut buf = [0u8; 2];
        f.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [4, 5]);
    }
}
