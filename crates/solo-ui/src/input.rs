//! Discrete input events the state machine consumes.
//!
//! Hardware specifics stay outside: encoders arrive as signed detent
//! counts, buttons as press edges, MIDI already decoded to note events.

use serde::{Deserialize, Serialize};

/// The two rotary encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncoderId {
    A,
    B,
}

/// The four buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonId {
    Select,
    Back,
    Play,
    Shift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Accumulated detents since the last event; sign is direction.
    Encoder { id: EncoderId, delta: i32 },
    /// Press edge. Releases are not reported.
    Button(ButtonId),
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
}
