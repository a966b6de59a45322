//! Commands from the control surface into the audio callback.

use crossbeam_channel::{bounded, Receiver, Sender};
use solo_core::config::RecordSource;

/// One instruction for the audio side. Everything is `Copy` so the channel
/// never allocates on the real-time path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineCommand {
    /// Start the voice. `apply_pitch` transposes relative to MIDI note 60;
    /// without it the sample plays at its natural rate regardless of note.
    NoteOn {
        note: u8,
        velocity: u8,
        apply_pitch: bool,
    },
    /// Release the voice if it is still playing this note.
    NoteOff { note: u8 },
    /// Release the voice unconditionally.
    StopVoice,
    /// Begin feeding input into the capture ring.
    StartCapture { source: RecordSource },
    StopCapture,
    /// Adopt a new preview stream at the given playback rate.
    PreviewStart { epoch: u32, rate: f32 },
    /// Stop previewing, unless a newer epoch has already taken over.
    PreviewStop { epoch: u32 },
}

pub fn command_channel(capacity: usize) -> (Sender<EngineCommand>, Receiver<EngineCommand>) {
    bounded(capacity)
}
