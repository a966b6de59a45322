//! Mode state machine for the solo sampler.
//!
//! # Primary API
//!
//! - [`UiStateMachine`]: the whole instrument surface; feeds on
//!   [`InputEvent`]s and periodic ticks, drives an [`EngineControl`] and a
//!   [`BlockStore`], and emits [`View`] tags to a [`Renderer`]
//! - [`Mode`] / [`Overlay`]: the reachable states
//!
//! [`EngineControl`]: solo_engine::EngineControl
//! [`BlockStore`]: solo_store::BlockStore

pub mod input;
pub use input::{ButtonId, EncoderId, InputEvent};

pub mod mode;
pub use mode::{BrowseIntent, MenuItem, Mode, Overlay, RecordStage, ShiftItem};

pub mod view;
pub use view::{Renderer, View};

pub mod browse;
pub use browse::BrowsePage;

pub mod machine;
pub use machine::UiStateMachine;
