//! Engine error types.

use thiserror::Error;

use solo_store::wav::WavError;
use solo_store::StoreError;

pub type Result<T> = core::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Saving needs a committed recording in the bank.
    #[error("no committed recording to save")]
    NothingToSave,

    /// Only one file session may run at a time.
    #[error("another file session is active")]
    Busy,

    #[error("invalid engine config: {0}")]
    Config(String),

    #[error(transparent)]
    Wav(#[from] WavError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
