//! Real-time engine for the solo sampler.
//!
//! The engine is split into two halves joined by lock-free plumbing:
//!
//! - [`AudioEngine`]: owned by the audio callback; renders the voice,
//!   taps the preview ring, pushes capture samples
//! - [`EngineControl`]: owned by the polling loop; sends commands, drains
//!   the capture ring, swaps banks, owns the file sessions' ring ends
//!
//! File work ([`LoadSession`], [`SaveSession`], [`PreviewSession`]) runs
//! only on the control side, one time-budgeted slice per poll.

pub mod error;
pub use error::{EngineError, Result};

pub mod command;
pub use command::EngineCommand;

pub mod shared;
pub use shared::EngineShared;

pub mod capture;
pub use capture::{CaptureConsumer, CaptureProducer, CaptureRing};

pub mod voice;
pub use voice::{PlaybackVoice, UNISON_NOTE};

pub mod recorder;
pub use recorder::{DrainOutcome, Recorder};

pub mod loader;
pub use loader::{LoadOutcome, LoadSession, LoadStep};

pub mod saver;
pub use saver::{SaveSession, SaveStep};

pub mod preview;
pub use preview::{PreviewProducer, PreviewRing, PreviewSession, PreviewTap};

pub mod engine;
pub use engine::{build, AudioEngine, EngineControl};
