//! Instrument configuration.

use serde::{Deserialize, Serialize};

use crate::bank::MAX_BANK_FRAMES;
use crate::error::{Error, Result};

/// Fixed output rate of the audio engine in Hz.
pub const ENGINE_SAMPLE_RATE: u32 = 48_000;

/// Which input channel feeds the capture path while recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum RecordSource {
    Left = 0,
    Right = 1,
    /// Equal-gain sum of both input channels.
    #[default]
    Mix = 2,
}

impl From<u8> for RecordSource {
    fn from(value: u8) -> Self {
        match value {
            0 => RecordSource::Left,
            1 => RecordSource::Right,
            _ => RecordSource::Mix,
        }
    }
}

impl RecordSource {
    /// Cycles to the next source, wrapping after `Mix`.
    pub fn next(self) -> Self {
        match self {
            RecordSource::Left => RecordSource::Right,
            RecordSource::Right => RecordSource::Mix,
            RecordSource::Mix => RecordSource::Left,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordSource::Left => "Left",
            RecordSource::Right => "Right",
            RecordSource::Mix => "Mix",
        }
    }
}

/// Tunable parameters for one sampler instrument.
///
/// Capability flags gate optional surfaces of the instrument; everything else
/// sizes buffers and timers. All sizes are in frames unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Engine output rate in Hz (default: 48000)
    pub sample_rate: u32,
    /// Hard cap on one recording take (default: 960000, 20 s at 48 kHz)
    pub record_max_frames: usize,
    /// Capture ring between audio callback and control (default: 16384)
    pub capture_ring_frames: usize,
    /// Preview ring between file reader and audio callback (default: 4096)
    pub preview_ring_frames: usize,
    /// Frames decoded per preview read (default: 512)
    pub preview_chunk_frames: usize,
    /// Frames written per save slice (default: 4096)
    pub save_chunk_frames: usize,
    /// Frames decoded per load slice (default: 4096)
    pub load_chunk_frames: usize,
    /// Columns in the waveform sketch (default: 128)
    pub wave_columns: usize,
    /// Delay between arming and capture start in ms (default: 1000)
    pub countdown_ms: u64,
    /// Mount attempts before the card is declared failed (default: 3)
    pub sd_max_attempts: u32,
    /// Pause between mount attempts in ms (default: 250)
    pub sd_retry_delay_ms: u64,
    /// Minimum time the card overlay stays visible in ms (default: 600)
    pub sd_min_overlay_ms: u64,
    /// Enable file preview while browsing (default: true)
    pub enable_preview: bool,
    /// Enable the delete flow in the browser (default: true)
    pub enable_delete: bool,
    /// Enable envelope marker editing (default: true)
    pub enable_adsr: bool,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            sample_rate: ENGINE_SAMPLE_RATE,
            record_max_frames: 960_000,
            capture_ring_frames: 16_384,
            preview_ring_frames: 4_096,
            preview_chunk_frames: 512,
            save_chunk_frames: 4_096,
            load_chunk_frames: 4_096,
            wave_columns: 128,
            countdown_ms: 1_000,
            sd_max_attempts: 3,
            sd_retry_delay_ms: 250,
            sd_min_overlay_ms: 600,
            enable_preview: true,
            enable_delete: true,
            enable_adsr: true,
        }
    }
}

impl InstrumentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::InvalidConfig("sample_rate must be nonzero".into()));
        }
        if self.record_max_frames == 0 || self.record_max_frames > MAX_BANK_FRAMES {
            return Err(Error::InvalidConfig(format!(
                "record_max_frames must be in 1..={}",
                MAX_BANK_FRAMES
            )));
        }
        if self.capture_ring_frames < 64 || self.preview_ring_frames < 4 {
            return Err(Error::InvalidConfig(
                "ring buffers are too small to cover one callback".into(),
            ));
        }
        if self.preview_chunk_frames == 0
            || self.save_chunk_frames == 0
            || self.load_chunk_frames == 0
        {
            return Err(Error::InvalidConfig("chunk sizes must be nonzero".into()));
        }
        if self.wave_columns == 0 || self.wave_columns > 1_024 {
            return Err(Error::InvalidConfig(
                "wave_columns must be in 1..=1024".into(),
            ));
        }
        if self.sd_max_attempts == 0 {
            return Err(Error::InvalidConfig("sd_max_attempts must be nonzero".into()));
        }
        Ok(())
    }
}
