//! Analysis for the solo sampler.
//!
//! # Primary API
//!
//! - [`PitchEstimator`]: autocorrelation pitch estimate over the playback
//!   window, used by the tuner page and the post-record review
//! - [`WaveSketch`]: column min/max waveform reduction for the display

pub mod pitch;
pub use pitch::{PitchEstimator, PitchResult, MAX_PITCH_HZ, MIN_PITCH_HZ, MIN_REGION_FRAMES};

pub mod sketch;
pub use sketch::WaveSketch;
