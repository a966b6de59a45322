//! Catalog of loadable files and the recording name series.

use crate::blockstore::{BlockStore, DirEntry};
use crate::error::{Result, StoreError};

/// Longest file name the browser shows.
pub const MAX_NAME_LEN: usize = 31;
/// Most entries one listing returns.
pub const MAX_CATALOG_ENTRIES: usize = 32;
/// Highest number probed in the `RecNNNN.wav` series.
pub const MAX_REC_INDEX: u32 = 9_999;

/// Whether a file name belongs in the browser.
pub fn accepts(name: &str) -> bool {
    !name.starts_with('.')
        && name.len() <= MAX_NAME_LEN
        && name.to_ascii_lowercase().ends_with(".wav")
}

/// Sorted browser listing, capped at `MAX_CATALOG_ENTRIES`.
pub fn scan<S: BlockStore>(store: &mut S) -> Result<Vec<DirEntry>> {
    let mut entries: Vec<DirEntry> = store
        .list()?
        .into_iter()
        .filter(|e| accepts(&e.name))
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries.truncate(MAX_CATALOG_ENTRIES);
    Ok(entries)
}

/// First unused name in the `Rec0001.wav` .. `Rec9999.wav` series.
pub fn probe_free_name<S: BlockStore>(store: &mut S) -> Result<String> {
    for i in 1..=MAX_REC_INDEX {
        let name = format!("Rec{i:04}.wav");
        if !store.exists(&name)? {
            return Ok(name);
        }
    }
    Err(StoreError::NoFreeName)
}
