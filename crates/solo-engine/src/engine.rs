//! The audio-side engine and its control handle.
//!
//! `AudioEngine::process` is the whole real-time path: drain the command
//! channel, render the voice, tap the preview ring, push capture samples,
//! mix, clamp. No file I/O, no allocation, no locks. Everything slow lives
//! behind `EngineControl` and runs in the polling loop.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::warn;

use solo_core::bank::{dequantize, quantize, SampleBank};
use solo_core::config::{InstrumentConfig, RecordSource};

use crate::capture::{CaptureProducer, CaptureRing};
use crate::command::{command_channel, EngineCommand};
use crate::preview::{PreviewProducer, PreviewRing, PreviewTap};
use crate::recorder::Recorder;
use crate::shared::EngineShared;
use crate::voice::PlaybackVoice;

/// Slots in the command channel. Drained every block, so this only has to
/// cover one block's worth of control traffic.
const COMMAND_SLOTS: usize = 64;

/// Real-time half. Owned by the audio callback.
pub struct AudioEngine {
    shared: Arc<EngineShared>,
    commands: Receiver<EngineCommand>,
    voice: PlaybackVoice,
    capture: CaptureProducer,
    tap: PreviewTap,
    engine_rate: u32,
}

impl AudioEngine {
    /// Renders one block. `input` and `output` are stereo frames; output
    /// is overwritten, not mixed into.
    pub fn process(&mut self, input: &[[f32; 2]], output: &mut [[f32; 2]]) {
        self.drain_commands();

        let bank = self.shared.bank();
        let (start, end) = self.shared.window();
        let capturing = self.shared.capture_active();
        let previewing = self.shared.preview_active();
        let preview_rate = self.shared.preview_rate();
        let source = self.shared.record_source();

        for (i, out) in output.iter_mut().enumerate() {
            let mut frame = [0.0f32; 2];

            if self.voice.is_active() {
                let v = self.voice.render(&bank, start, end);
                frame[0] += v[0];
                frame[1] += v[1];
                if self.voice.is_active() {
                    self.shared.set_playhead(self.voice.phase() as u32);
                } else {
                    self.shared.set_voice_active(false);
                }
            }

            if previewing {
                match self.tap.render(preview_rate) {
                    Some(v) => {
                        frame[0] += v;
                        frame[1] += v;
                    }
                    None => self.shared.report_underrun(),
                }
            }

            if capturing {
                let raw = input.get(i).copied().unwrap_or([0.0; 2]);
                let picked = match source {
                    RecordSource::Left => raw[0],
                    RecordSource::Right => raw[1],
                    RecordSource::Mix => (raw[0] + raw[1]) * 0.5,
                };
                let q = quantize(picked);
                self.capture.push(q);
                // Monitor exactly what was stored.
                let m = dequantize(q);
                frame[0] += m;
                frame[1] += m;
            }

            out[0] = frame[0].clamp(-1.0, 1.0);
            out[1] = frame[1].clamp(-1.0, 1.0);
        }
    }

    fn drain_commands(&mut self) {
        while let Ok(cmd) = self.commands.try_recv() {
            self.apply(cmd);
        }
    }

    fn apply(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::NoteOn {
                note,
                velocity,
                apply_pitch,
            } => {
                let bank = self.shared.bank();
                let (start, end) = self.shared.window();
                let started = self
                    .voice
                    .start(note, velocity, apply_pitch, &bank, start, end, self.engine_rate);
                self.shared.set_voice_active(started);
                if started {
                    self.shared.set_playhead(start);
                }
            }
            EngineCommand::NoteOff { note } => {
                if self.voice.release(note) {
                    self.shared.set_voice_active(false);
                }
            }
            EngineCommand::StopVoice => {
                self.voice.stop();
                self.shared.set_voice_active(false);
            }
            EngineCommand::StartCapture { source } => {
                self.shared.set_record_source(source);
                self.shared.set_capture_active(true);
            }
            EngineCommand::StopCapture => {
                self.shared.set_capture_active(false);
            }
            EngineCommand::PreviewStart { epoch, rate } => {
                self.tap.reset();
                self.shared.set_preview_rate(rate);
                self.shared.set_preview_active(true);
                self.shared.set_preview_ack(epoch);
            }
            EngineCommand::PreviewStop { epoch } => {
                // A newer start may already own the tap; leave it alone.
                if self.shared.preview_ack() == epoch {
                    self.shared.set_preview_active(false);
                    self.tap.reset();
                }
            }
        }
    }
}

/// Control half. Owned by the polling loop; every method is either a
/// non-blocking command send or a plain atomic write.
pub struct EngineControl {
    shared: Arc<EngineShared>,
    sender: Sender<EngineCommand>,
    recorder: Recorder,
    preview_producer: Option<PreviewProducer>,
}

impl EngineControl {
    #[inline]
    pub fn shared(&self) -> &Arc<EngineShared> {
        &self.shared
    }

    /// Snapshot of the installed bank.
    pub fn bank(&self) -> Arc<SampleBank> {
        self.shared.bank()
    }

    /// Swaps in a new bank and publishes its playback window. The retired
    /// bank drops here, on the control side.
    pub fn install_bank(&self, bank: SampleBank, frame_start: u32, frame_end: u32) {
        self.send(EngineCommand::StopVoice);
        self.shared.set_window(frame_start, frame_end);
        let retired = self.shared.install_bank(Arc::new(bank));
        drop(retired);
    }

    pub fn set_window(&self, frame_start: u32, frame_end: u32) {
        self.shared.set_window(frame_start, frame_end);
    }

    pub fn playhead(&self) -> u32 {
        self.shared.playhead()
    }

    pub fn voice_active(&self) -> bool {
        self.shared.voice_active()
    }

    pub fn note_on(&self, note: u8, velocity: u8, apply_pitch: bool) {
        self.send(EngineCommand::NoteOn {
            note,
            velocity,
            apply_pitch,
        });
    }

    pub fn note_off(&self, note: u8) {
        self.send(EngineCommand::NoteOff { note });
    }

    pub fn stop_voice(&self) {
        self.send(EngineCommand::StopVoice);
    }

    /// Arms the recorder and tells the callback to start pushing input.
    pub fn start_capture(&mut self, source: RecordSource) {
        self.recorder.start();
        self.send(EngineCommand::StartCapture { source });
    }

    pub fn stop_capture(&self) {
        self.send(EngineCommand::StopCapture);
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut Recorder {
        &mut self.recorder
    }

    /// Claims an epoch for a new preview and hands out the ring producer.
    /// `None` while a previous preview still owns it.
    pub fn take_preview_producer(&mut self) -> Option<(u32, PreviewProducer)> {
        let producer = self.preview_producer.take()?;
        Some((self.shared.next_preview_epoch(), producer))
    }

    /// Returns the producer after a preview ends or fails to start.
    pub fn return_preview_producer(&mut self, producer: PreviewProducer) {
        self.preview_producer = Some(producer);
    }

    /// Tells the callback to adopt the preview stream.
    pub fn start_preview(&self, epoch: u32, rate: f32) {
        self.send(EngineCommand::PreviewStart { epoch, rate });
    }

    pub fn stop_preview(&self, epoch: u32) {
        self.send(EngineCommand::PreviewStop { epoch });
    }

    /// Whether the callback has adopted this preview epoch. Filling before
    /// this point would race the tap reset.
    pub fn preview_adopted(&self, epoch: u32) -> bool {
        self.shared.preview_ack() == epoch
    }

    pub fn take_underrun_count(&self) -> u64 {
        self.shared.take_underrun_count()
    }

    fn send(&self, cmd: EngineCommand) {
        match self.sender.try_send(cmd) {
            Ok(()) => {}
            Err(TrySendError::Full(cmd)) => {
                warn!(?cmd, "command channel full, dropping");
            }
            Err(TrySendError::Disconnected(cmd)) => {
                warn!(?cmd, "audio engine gone, dropping");
            }
        }
    }
}

/// Builds the two halves from one config.
pub fn build(config: &InstrumentConfig) -> crate::error::Result<(AudioEngine, EngineControl)> {
    config
        .validate()
        .map_err(|e| crate::error::EngineError::Config(e.to_string()))?;

    let shared = Arc::new(EngineShared::new());
    let (sender, receiver) = command_channel(COMMAND_SLOTS);
    let (capture_prod, capture_cons) = CaptureRing::with_capacity(config.capture_ring_frames);
    let (preview_prod, preview_tap) = PreviewRing::with_capacity(config.preview_ring_frames);

    let engine = AudioEngine {
        shared: shared.clone(),
        commands: receiver,
        voice: PlaybackVoice::new(),
        capture: capture_prod,
        tap: preview_tap,
        engine_rate: config.sample_rate,
    };
    let control = EngineControl {
        shared,
        sender,
        recorder: Recorder::new(
            capture_cons,
            config.record_max_frames,
            config.wave_columns,
            config.sample_rate,
        ),
        preview_producer: Some(preview_prod),
    };
    Ok((engine, control))
}
