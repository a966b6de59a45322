//! # Solo - Monophonic Sampler Instrument Engine
//!
//! Record, trim, tune and replay a single sample.
//!
//! ## Architecture
//!
//! Solo is an umbrella crate that coordinates:
//! - **solo-core** - Value types (sample bank, trim window, ADSR markers, config)
//! - **solo-analysis** - Pitch estimation and waveform sketching
//! - **solo-store** - Storage seam (block store, WAV codec, catalog, SD lifecycle)
//! - **solo-engine** - Real-time engine (voice, capture, preview, file sessions)
//! - **solo-ui** - Mode state machine (input events, overlays, redraw tags)
//!
//! ## Quick Start
//!
//! ```ignore
//! use solo::{InstrumentConfig, SoloBuilder};
//!
//! // Split the instrument into its audio and control halves.
//! let (mut audio, mut ui) = SoloBuilder::new()
//!     .config(InstrumentConfig::default())
//!     .build(store, renderer)?;
//!
//! // The audio half goes to the callback thread:
//! //   audio.process(&input, &mut output);
//! // The control half runs in the polling loop:
//! //   ui.handle_event(event, now_ms);
//! //   ui.tick(now_ms);
//! ```

/// Re-export of solo-core for direct access
pub use solo_core as core;
pub use solo_analysis as analysis;
pub use solo_engine as engine;
pub use solo_store as store;
pub use solo_ui as ui;

// Value types
pub use solo_core::bank::{BankOrigin, SampleBank, MAX_BANK_FRAMES};
pub use solo_core::config::{InstrumentConfig, RecordSource, ENGINE_SAMPLE_RATE};
pub use solo_core::markers::AdsrMarkers;
pub use solo_core::trim::TrimWindow;

// Analysis
pub use solo_analysis::{PitchEstimator, PitchResult, WaveSketch};

// Storage
pub use solo_store::{BlockStore, DirStore, MemStore, SdLifecycle, StoreFile};

// Engine halves
pub use solo_engine::{AudioEngine, EngineControl};

// Instrument surface
pub use solo_ui::{ButtonId, EncoderId, InputEvent, Mode, Renderer, UiStateMachine, View};

/// Top-level error: anything that can fail while assembling the instrument.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Engine(#[from] solo_engine::EngineError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Assembles the two halves of the instrument from one configuration.
///
/// `build` hands back the real-time half and the control half separately;
/// the caller moves [`AudioEngine`] to the audio callback and keeps the
/// [`UiStateMachine`] in its polling loop.
#[derive(Debug, Default)]
pub struct SoloBuilder {
    config: InstrumentConfig,
}

impl SoloBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: InstrumentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    pub fn record_max_frames(mut self, frames: usize) -> Self {
        self.config.record_max_frames = frames;
        self
    }

    pub fn build<S: BlockStore, R: Renderer>(
        self,
        store: S,
        renderer: R,
    ) -> Result<(AudioEngine, UiStateMachine<S, R>)> {
        let (audio, control) = solo_engine::build(&self.config)?;
        let ui = UiStateMachine::new(self.config, control, store, renderer);
        Ok((audio, ui))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullRenderer;

    impl Renderer for NullRenderer {
        fn draw(&mut self, _view: &View) {}
    }

    #[test]
    fn builder_splits_the_instrument() {
        let (_audio, ui) = SoloBuilder::new()
            .sample_rate(48_000)
            .build(MemStore::new(), NullRenderer)
            .unwrap();
        assert_eq!(ui.mode(), Mode::Main);
    }

    #[test]
    fn builder_rejects_invalid_config() {
        assert!(SoloBuilder::new()
            .sample_rate(0)
            .build(MemStore::new(), NullRenderer)
            .is_err());
    }
}
