//! Storage error types.

use thiserror::Error;

pub type Result<T> = core::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// No card in the slot.
    #[error("no storage medium present")]
    NoMedium,

    /// Card present but not ready to mount yet.
    #[error("storage medium not ready")]
    NotReady,

    /// Operation needs a mounted store.
    #[error("storage medium not mounted")]
    NotMounted,

    #[error("invalid file name: {0}")]
    InvalidName(String),

    /// Every probe name in the recording series is taken.
    #[error("no free recording name")]
    NoFreeName,

    #[error("store lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
