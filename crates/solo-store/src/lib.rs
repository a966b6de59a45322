//! Storage layer for the solo sampler.
//!
//! # Primary API
//!
//! - [`BlockStore`] / [`StoreFile`]: the seam between the instrument and
//!   its recording medium
//! - [`DirStore`]: host-filesystem store rooted at one directory
//! - [`MemStore`]: in-memory store for tests and the simulator
//! - [`wav`]: 16-bit PCM RIFF/WAVE codec
//! - [`catalog`]: browser listing and the `RecNNNN.wav` name series
//! - [`SdLifecycle`]: detect/mount/retry state machine for removable media

pub mod error;
pub use error::{Result, StoreError};

pub mod blockstore;
pub use blockstore::{BlockStore, DirEntry, StoreFile};

pub mod dir_store;
pub use dir_store::{DirFile, DirStore};

pub mod mem;
pub use mem::{MemFile, MemStore};

pub mod wav;
pub use wav::{WavError, WavInfo, WAV_HEADER_BYTES};

pub mod catalog;

pub mod lifecycle;
pub use lifecycle::{SdLifecycle, SdPhase};
