//! Core types for the solo sampler instrument.
//!
//! # Primary API
//!
//! - [`SampleBank`]: the one sample slot, immutable and `Arc`-swapped
//! - [`TrimWindow`]: normalized playback window over the bank
//! - [`AdsrMarkers`]: envelope stage positions inside the window
//! - [`InstrumentConfig`]: sizes, timers and capability flags
//! - [`AtomicFloat`] / [`AtomicFlag`]: parameter cells shared with the
//!   audio callback

pub mod error;
pub use error::{Error, Result};

pub mod lockfree;
pub use lockfree::{AtomicFlag, AtomicFloat};

pub mod config;
pub use config::{InstrumentConfig, RecordSource, ENGINE_SAMPLE_RATE};

pub mod bank;
pub use bank::{dequantize, quantize, BankOrigin, SampleBank, MAX_BANK_FRAMES};

pub mod trim;
pub use trim::{encoder_step, TrimWindow};

pub mod markers;
pub use markers::AdsrMarkers;

pub mod note;
pub use note::{freq_to_midi, midi_to_freq, note_name};
