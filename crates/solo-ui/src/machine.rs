//! The mode state machine.
//!
//! One `handle_event` match per (mode, event) pair and one `tick` that
//! advances timers and budgeted sessions. This is the only place modes
//! change, overlays open and close, and the engine control is driven, so
//! the whole instrument graph is auditable from this file.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use solo_analysis::{PitchEstimator, PitchResult, WaveSketch};
use solo_core::config::{InstrumentConfig, RecordSource};
use solo_core::markers::AdsrMarkers;
use solo_core::trim::TrimWindow;
use solo_engine::loader::{LoadOutcome, LoadSession, LoadStep};
use solo_engine::preview::PreviewSession;
use solo_engine::recorder::DrainOutcome;
use solo_engine::saver::{SaveSession, SaveStep};
use solo_engine::voice::UNISON_NOTE;
use solo_engine::{EngineControl, EngineError};
use solo_store::{catalog, BlockStore, SdLifecycle, StoreError};

use crate::browse::BrowsePage;
use crate::input::{ButtonId, EncoderId, InputEvent};
use crate::mode::{BrowseIntent, MenuItem, Mode, Overlay, RecordStage, ShiftItem};
use crate::view::{Renderer, View};

/// File-session time slice per tick.
const TICK_BUDGET: Duration = Duration::from_millis(2);

pub struct UiStateMachine<S: BlockStore, R: Renderer> {
    config: InstrumentConfig,
    control: EngineControl,
    store: S,
    renderer: R,

    mode: Mode,
    overlay: Option<Overlay>,
    main_cursor: usize,
    shift_cursor: usize,
    adsr_index: usize,
    record_source: RecordSource,

    trim: TrimWindow,
    markers: AdsrMarkers,
    estimator: PitchEstimator,
    pitch: Option<PitchResult>,
    sketch: Option<WaveSketch>,

    browse: BrowsePage,
    sd: SdLifecycle,
    load: Option<LoadSession<S::File>>,
    save: Option<SaveSession<S::File>>,
    preview: Option<PreviewSession<S::File>>,

    message: Option<String>,
}

impl<S: BlockStore, R: Renderer> UiStateMachine<S, R> {
    pub fn new(config: InstrumentConfig, control: EngineControl, store: S, renderer: R) -> Self {
        let sd = SdLifecycle::new(
            config.sd_max_attempts,
            config.sd_retry_delay_ms,
            config.sd_min_overlay_ms,
        );
        Self {
            config,
            control,
            store,
            renderer,
            mode: Mode::Main,
            overlay: None,
            main_cursor: 0,
            shift_cursor: 0,
            adsr_index: 0,
            record_source: RecordSource::default(),
            trim: TrimWindow::full(),
            markers: AdsrMarkers::new(),
            estimator: PitchEstimator::default(),
            pitch: None,
            sketch: None,
            browse: BrowsePage::default(),
            sd,
            load: None,
            save: None,
            preview: None,
            message: None,
        }
    }

    /// Kicks off the power-on mount sequence behind the card overlay.
    pub fn power_on(&mut self, now_ms: u64) {
        self.sd.begin(now_ms);
        self.overlay = Some(Overlay::Sd);
        self.redraw(now_ms);
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    /// Last status line, consumed by the caller.
    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }

    pub fn control(&self) -> &EngineControl {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut EngineControl {
        &mut self.control
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn trim_window(&self) -> &TrimWindow {
        &self.trim
    }

    pub fn pitch(&self) -> Option<PitchResult> {
        self.pitch
    }

    /// Main menu with capability-gated entries.
    pub fn menu_items(&self) -> Vec<MenuItem> {
        let mut items = vec![
            MenuItem::Play,
            MenuItem::Load,
            MenuItem::Record,
            MenuItem::Tune,
        ];
        if self.config.enable_adsr {
            items.push(MenuItem::Adsr);
        }
        if self.config.enable_delete {
            items.push(MenuItem::Delete);
        }
        items
    }

    // ------------------------------------------------------------------
    // Events

    pub fn handle_event(&mut self, event: InputEvent, now_ms: u64) {
        if let Some(overlay) = self.overlay {
            // Overlays own the input; only Back gets through, as abort.
            if event == InputEvent::Button(ButtonId::Back) {
                self.abort_overlay(overlay, now_ms);
            }
            self.redraw(now_ms);
            return;
        }

        match self.mode {
            Mode::Main => self.on_main(event, now_ms),
            Mode::Browse(intent) => self.on_browse(intent, event, now_ms),
            Mode::LoadTarget => self.on_load_target(event),
            Mode::Play => self.on_play(event, now_ms),
            Mode::Record(stage) => self.on_record(stage, event, now_ms),
            Mode::Tune => self.on_tune(event),
            Mode::AdsrSelect => self.on_adsr(event),
            Mode::ShiftMenu => self.on_shift_menu(event, now_ms),
        }
        self.redraw(now_ms);
    }

    fn abort_overlay(&mut self, overlay: Overlay, now_ms: u64) {
        match overlay {
            Overlay::Save => {
                if let Some(session) = self.save.take() {
                    session.abort();
                }
                self.message = Some("save cancelled".into());
            }
            Overlay::Sd => {
                self.sd.abort(now_ms);
                self.message = Some("mount cancelled".into());
            }
        }
        info!(?overlay, "overlay aborted");
        self.overlay = None;
    }

    fn on_main(&mut self, event: InputEvent, now_ms: u64) {
        match event {
            InputEvent::Encoder {
                id: EncoderId::A,
                delta,
            } => {
                let len = self.menu_items().len();
                self.main_cursor =
                    (self.main_cursor as i64 + i64::from(delta)).rem_euclid(len as i64) as usize;
            }
            InputEvent::Button(ButtonId::Select) => {
                let item = self.menu_items()[self.main_cursor];
                self.enter_menu_item(item, now_ms);
            }
            InputEvent::Button(ButtonId::Shift) => self.set_mode(Mode::ShiftMenu),
            _ => {}
        }
    }

    fn enter_menu_item(&mut self, item: MenuItem, now_ms: u64) {
        match item {
            MenuItem::Play => self.set_mode(Mode::Play),
            MenuItem::Load => self.enter_browse(BrowseIntent::Load, now_ms),
            MenuItem::Delete => self.enter_browse(BrowseIntent::Delete, now_ms),
            MenuItem::Record => self.set_mode(Mode::Record(RecordStage::SourceSelect)),
            MenuItem::Tune => {
                self.compute_pitch();
                self.set_mode(Mode::Tune);
            }
            MenuItem::Adsr => {
                let bank = self.control.bank();
                if !bank.loaded() || !self.trim.is_playable(bank.len()) {
                    self.message = Some("no sample".into());
                    return;
                }
                let (s, e) = self.trim.frames(bank.len());
                self.markers.ensure_init(s, e);
                self.adsr_index = 0;
                self.set_mode(Mode::AdsrSelect);
            }
        }
    }

    fn enter_browse(&mut self, intent: BrowseIntent, now_ms: u64) {
        match catalog::scan(&mut self.store) {
            Ok(entries) => {
                self.browse = BrowsePage::new(entries);
                self.set_mode(Mode::Browse(intent));
                if intent == BrowseIntent::Load {
                    self.retarget_preview();
                }
            }
            Err(e) => {
                if !self.storage_gate(&e, now_ms) {
                    warn!("listing failed: {e}");
                    self.message = Some(format!("listing failed: {e}"));
                }
            }
        }
    }

    /// Routes medium-absent conditions into the mount overlay instead of
    /// surfacing them as plain failures. Returns whether it did.
    fn storage_gate(&mut self, err: &StoreError, now_ms: u64) -> bool {
        if matches!(
            err,
            StoreError::NoMedium | StoreError::NotReady | StoreError::NotMounted
        ) {
            self.sd.begin(now_ms);
            self.overlay = Some(Overlay::Sd);
            true
        } else {
            false
        }
    }

    fn on_browse(&mut self, intent: BrowseIntent, event: InputEvent, now_ms: u64) {
        match event {
            InputEvent::Encoder {
                id: EncoderId::A,
                delta,
            } => {
                if self.browse.scroll(delta) && intent == BrowseIntent::Load {
                    self.retarget_preview();
                }
            }
            InputEvent::Button(ButtonId::Select) => match intent {
                BrowseIntent::Load => self.begin_load(),
                BrowseIntent::Delete => self.confirm_or_delete(now_ms),
            },
            InputEvent::Button(ButtonId::Back) => {
                self.stop_preview_session();
                self.set_mode(Mode::Main);
            }
            _ => {}
        }
    }

    fn begin_load(&mut self) {
        let Some(name) = self.browse.selected().map(|e| e.name.clone()) else {
            return;
        };
        self.stop_preview_session();
        let result = self
            .store
            .open(&name)
            .map_err(EngineError::from)
            .and_then(|file| {
                LoadSession::begin(file, self.config.load_chunk_frames).map_err(EngineError::from)
            });
        match result {
            Ok(session) => {
                info!(name = %name, "load started");
                self.load = Some(session);
                self.set_mode(Mode::LoadTarget);
            }
            Err(e) => {
                warn!(name = %name, "load failed: {e}");
                self.message = Some(format!("load failed: {e}"));
            }
        }
    }

    fn confirm_or_delete(&mut self, now_ms: u64) {
        if !self.browse.is_confirming() {
            self.browse.arm_confirm();
            return;
        }
        let Some(name) = self.browse.selected().map(|e| e.name.clone()) else {
            return;
        };
        match self.store.remove(&name) {
            Ok(()) => {
                info!(name = %name, "deleted");
                self.message = Some(format!("deleted {name}"));
                self.enter_browse(BrowseIntent::Delete, now_ms);
            }
            Err(e) => {
                warn!(name = %name, "delete failed: {e}");
                self.browse.disarm_confirm();
                if !self.storage_gate(&e, now_ms) {
                    self.message = Some(format!("delete failed: {e}"));
                }
            }
        }
    }

    fn on_load_target(&mut self, event: InputEvent) {
        if event == InputEvent::Button(ButtonId::Back) {
            // Abort: the session drops here with its file closed.
            self.load = None;
            self.set_mode(Mode::Browse(BrowseIntent::Load));
        }
    }

    fn on_play(&mut self, event: InputEvent, _now_ms: u64) {
        match event {
            InputEvent::Button(ButtonId::Play) => {
                self.control.note_on(UNISON_NOTE, 127, false);
            }
            InputEvent::Button(ButtonId::Back) => {
                self.control.stop_voice();
                self.set_mode(Mode::Main);
            }
            InputEvent::Button(ButtonId::Shift) => self.set_mode(Mode::ShiftMenu),
            InputEvent::Encoder { id, delta } => match id {
                EncoderId::A => self.apply_trim(delta, 0),
                EncoderId::B => self.apply_trim(0, delta),
            },
            InputEvent::NoteOn { note, velocity } => {
                self.control.note_on(note, velocity, true);
            }
            InputEvent::NoteOff { note } => self.control.note_off(note),
            _ => {}
        }
    }

    fn apply_trim(&mut self, start_delta: i32, end_delta: i32) {
        let len = self.control.bank().len();
        if self.trim.adjust(start_delta, end_delta, false, len) {
            let (s, e) = self.trim.frames(len);
            self.control.set_window(s as u32, e as u32);
            self.markers.invalidate();
        }
    }

    fn on_record(&mut self, stage: RecordStage, event: InputEvent, now_ms: u64) {
        match stage {
            RecordStage::SourceSelect => match event {
                InputEvent::Encoder {
                    id: EncoderId::A,
                    delta,
                } if delta != 0 => {
                    self.record_source = if delta > 0 {
                        self.record_source.next()
                    } else {
                        self.record_source.next().next()
                    };
                }
                InputEvent::Button(ButtonId::Select) => {
                    self.set_mode(Mode::Record(RecordStage::Armed));
                }
                InputEvent::Button(ButtonId::Back) => self.set_mode(Mode::Main),
                _ => {}
            },
            RecordStage::Armed => match event {
                InputEvent::Button(ButtonId::Select) => {
                    self.set_mode(Mode::Record(RecordStage::Countdown { started_ms: now_ms }));
                }
                InputEvent::Button(ButtonId::Back) => self.set_mode(Mode::Main),
                _ => {}
            },
            RecordStage::Countdown { .. } => {
                if event == InputEvent::Button(ButtonId::Back) {
                    self.set_mode(Mode::Record(RecordStage::Armed));
                }
            }
            RecordStage::Recording => match event {
                InputEvent::Button(ButtonId::Select) | InputEvent::Button(ButtonId::Play) => {
                    self.finish_take();
                }
                InputEvent::Button(ButtonId::Back) => {
                    self.control.stop_capture();
                    self.control.recorder_mut().discard();
                    self.set_mode(Mode::Record(RecordStage::Armed));
                }
                _ => {}
            },
            RecordStage::Review => match event {
                InputEvent::Button(ButtonId::Select) => self.set_mode(Mode::Play),
                InputEvent::Button(ButtonId::Back) => {
                    self.set_mode(Mode::Record(RecordStage::Armed));
                }
                InputEvent::Button(ButtonId::Play) => {
                    self.control.note_on(UNISON_NOTE, 127, false);
                }
                InputEvent::NoteOn { note, velocity } => {
                    self.control.note_on(note, velocity, true);
                }
                InputEvent::NoteOff { note } => self.control.note_off(note),
                _ => {}
            },
        }
    }

    /// Stops capture and commits the take: bank swapped in, trim reset,
    /// pitch and waveform computed for the review screen.
    fn finish_take(&mut self) {
        self.control.stop_capture();
        match self.control.recorder_mut().commit() {
            Some(bank) => {
                self.trim = TrimWindow::full();
                let (s, e) = self.trim.frames(bank.len());
                self.pitch = self.estimator.estimate_bank(&bank, s, e);
                self.sketch = Some(WaveSketch::from_bank(&bank, s, e, self.config.wave_columns));
                self.markers.invalidate();
                info!(frames = bank.len(), "take committed");
                self.control.install_bank(bank, s as u32, e as u32);
                self.set_mode(Mode::Record(RecordStage::Review));
            }
            None => {
                self.message = Some("nothing captured".into());
                self.set_mode(Mode::Record(RecordStage::Armed));
            }
        }
    }

    fn on_tune(&mut self, event: InputEvent) {
        match event {
            InputEvent::Button(ButtonId::Select) => self.compute_pitch(),
            InputEvent::Button(ButtonId::Back) => self.set_mode(Mode::Main),
            _ => {}
        }
    }

    fn compute_pitch(&mut self) {
        let bank = self.control.bank();
        let (s, e) = self.trim.frames(bank.len());
        self.pitch = self.estimator.estimate_bank(&bank, s, e);
    }

    fn on_adsr(&mut self, event: InputEvent) {
        match event {
            InputEvent::Encoder {
                id: EncoderId::A,
                delta,
            } => {
                self.adsr_index =
                    (self.adsr_index as i64 + i64::from(delta)).clamp(0, 3) as usize;
            }
            InputEvent::Encoder {
                id: EncoderId::B,
                delta,
            } => {
                let len = self.control.bank().len();
                let (s, e) = self.trim.frames(len);
                self.markers.nudge(self.adsr_index, delta, false, s, e);
            }
            InputEvent::Button(ButtonId::Back) => self.set_mode(Mode::Main),
            _ => {}
        }
    }

    fn on_shift_menu(&mut self, event: InputEvent, now_ms: u64) {
        match event {
            InputEvent::Encoder {
                id: EncoderId::A,
                delta,
            } => {
                let len = ShiftItem::ALL.len();
                self.shift_cursor =
                    (self.shift_cursor as i64 + i64::from(delta)).rem_euclid(len as i64) as usize;
            }
            InputEvent::Button(ButtonId::Select) => match ShiftItem::ALL[self.shift_cursor] {
                ShiftItem::Save => self.begin_save(now_ms),
                ShiftItem::RemountSd => {
                    self.sd.begin(now_ms);
                    self.overlay = Some(Overlay::Sd);
                }
            },
            InputEvent::Button(ButtonId::Back) => self.set_mode(Mode::Main),
            _ => {}
        }
    }

    fn begin_save(&mut self, now_ms: u64) {
        let bank = self.control.bank();
        match SaveSession::begin(&mut self.store, bank, self.config.save_chunk_frames) {
            Ok(session) => {
                self.save = Some(session);
                self.overlay = Some(Overlay::Save);
            }
            Err(EngineError::Store(e)) if self.storage_gate(&e, now_ms) => {}
            Err(e) => {
                warn!("save rejected: {e}");
                self.message = Some(format!("save rejected: {e}"));
            }
        }
    }

    // ------------------------------------------------------------------
    // Ticks

    /// One polling-loop iteration: advances the active overlay or mode
    /// timer and gives the active file session a bounded slice.
    pub fn tick(&mut self, now_ms: u64) {
        match self.overlay {
            Some(Overlay::Sd) => self.tick_sd(now_ms),
            Some(Overlay::Save) => self.tick_save(),
            None => {
                match self.mode {
                    Mode::Record(RecordStage::Countdown { started_ms }) => {
                        if now_ms.saturating_sub(started_ms) >= self.config.countdown_ms {
                            let source = self.record_source;
                            self.control.start_capture(source);
                            info!(?source, "recording started");
                            self.set_mode(Mode::Record(RecordStage::Recording));
                        }
                    }
                    Mode::Record(RecordStage::Recording) => {
                        if self.control.recorder_mut().drain() == DrainOutcome::CapReached {
                            self.finish_take();
                        }
                    }
                    Mode::LoadTarget => self.tick_load(),
                    _ => {}
                }
                self.tick_preview();
            }
        }
        self.redraw(now_ms);
    }

    fn tick_sd(&mut self, now_ms: u64) {
        self.sd.step(&mut self.store, now_ms);
        if self.sd.is_terminal() && self.sd.min_display_elapsed(now_ms) {
            self.overlay = None;
            self.message = Some(if self.sd.succeeded() {
                "card ready".into()
            } else {
                "card unavailable".into()
            });
            info!(succeeded = self.sd.succeeded(), "mount sequence finished");
        }
    }

    fn tick_save(&mut self) {
        let Some(session) = self.save.as_mut() else {
            self.overlay = None;
            return;
        };
        match session.step(Instant::now() + TICK_BUDGET) {
            Ok(SaveStep::Working) => return,
            Ok(SaveStep::Done) => {
                info!(name = %session.name(), "save finished");
                self.message = Some(format!("saved {}", session.name()));
            }
            Err(e) => {
                warn!("save failed: {e}");
                self.message = Some(format!("save failed: {e}"));
            }
        }
        self.save = None;
        self.overlay = None;
    }

    fn tick_load(&mut self) {
        let Some(session) = self.load.as_mut() else {
            self.set_mode(Mode::Browse(BrowseIntent::Load));
            return;
        };
        match session.step(Instant::now() + TICK_BUDGET) {
            Ok(LoadStep::Working) => {}
            Ok(LoadStep::Done(outcome)) => {
                self.load = None;
                self.install_loaded(outcome);
            }
            Err(e) => {
                self.load = None;
                warn!("load failed: {e}");
                self.message = Some(format!("load failed: {e}"));
                self.set_mode(Mode::Browse(BrowseIntent::Load));
            }
        }
    }

    fn install_loaded(&mut self, outcome: LoadOutcome) {
        if !outcome.bank.loaded() {
            self.message = Some("load failed: empty file".into());
            self.set_mode(Mode::Browse(BrowseIntent::Load));
            return;
        }
        self.trim = TrimWindow::full();
        let (s, e) = self.trim.frames(outcome.bank.len());
        self.markers.invalidate();
        self.pitch = None;
        self.sketch = Some(WaveSketch::from_bank(
            &outcome.bank,
            s,
            e,
            self.config.wave_columns,
        ));
        info!(
            frames = outcome.bank.len(),
            truncated = outcome.truncated,
            partial = outcome.partial,
            "load finished"
        );
        if outcome.truncated {
            self.message = Some("sample truncated to capacity".into());
        } else if outcome.partial {
            self.message = Some("file shorter than declared".into());
        }
        self.control.install_bank(outcome.bank, s as u32, e as u32);
        self.set_mode(Mode::Play);
    }

    fn tick_preview(&mut self) {
        let Some(session) = self.preview.as_mut() else {
            return;
        };
        if !self.control.preview_adopted(session.epoch()) {
            return;
        }
        if let Err(e) = session.fill(Instant::now() + TICK_BUDGET) {
            warn!("preview read failed: {e}");
            self.stop_preview_session();
        }
    }

    // ------------------------------------------------------------------
    // Preview plumbing

    /// Points the preview at the entry under the browser cursor.
    fn retarget_preview(&mut self) {
        if !self.config.enable_preview {
            return;
        }
        let Some(name) = self.browse.selected().map(|e| e.name.clone()) else {
            self.stop_preview_session();
            return;
        };
        self.stop_preview_session();
        let Some((epoch, producer)) = self.control.take_preview_producer() else {
            return;
        };
        let file = match self.store.open(&name) {
            Ok(file) => file,
            Err(e) => {
                debug!(name = %name, "preview open failed: {e}");
                self.control.return_preview_producer(producer);
                return;
            }
        };
        match PreviewSession::begin(
            file,
            epoch,
            producer,
            self.config.preview_chunk_frames,
            self.config.sample_rate,
        ) {
            Ok(session) => {
                debug!(name = %name, rate = session.rate(), "preview started");
                self.control.start_preview(epoch, session.rate());
                self.preview = Some(session);
            }
            Err((producer, e)) => {
                debug!(name = %name, "preview rejected: {e}");
                self.control.return_preview_producer(producer);
            }
        }
    }

    fn stop_preview_session(&mut self) {
        if let Some(session) = self.preview.take() {
            let (epoch, producer) = session.finish();
            self.control.stop_preview(epoch);
            self.control.return_preview_producer(producer);
        }
    }

    // ------------------------------------------------------------------
    // Output

    fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            debug!(from = ?self.mode, to = ?mode, "mode change");
            self.mode = mode;
        }
    }

    fn redraw(&mut self, now_ms: u64) {
        let view = self.view(now_ms);
        self.renderer.draw(&view);
    }

    fn view(&self, now_ms: u64) -> View {
        if let Some(overlay) = self.overlay {
            return match overlay {
                Overlay::Sd => View::SdOverlay {
                    phase: self.sd.phase(),
                    attempts: self.sd.attempts(),
                },
                Overlay::Save => View::SaveOverlay {
                    progress: self.save.as_ref().map_or(1.0, |s| s.progress()),
                },
            };
        }
        match self.mode {
            Mode::Main => View::Main {
                cursor: self.main_cursor,
                items: self.menu_items().iter().map(|i| i.label()).collect(),
            },
            Mode::Browse(intent) => View::Browse {
                intent,
                cursor: self.browse.cursor(),
                entries: self.browse.len(),
                confirming_delete: self.browse.is_confirming(),
            },
            Mode::LoadTarget => View::Loading {
                progress: self.load.as_ref().map_or(0.0, |l| l.progress()),
            },
            Mode::Play => {
                let len = self.control.bank().len();
                let (s, e) = self.trim.frames(len);
                View::Play {
                    playhead: self.control.playhead(),
                    window: (s as u32, e as u32),
                    voice_active: self.control.voice_active(),
                }
            }
            Mode::Record(stage) => match stage {
                RecordStage::SourceSelect => View::RecordSource {
                    source: self.record_source,
                },
                RecordStage::Armed => View::RecordArmed,
                RecordStage::Countdown { started_ms } => View::RecordCountdown {
                    remaining_ms: self
                        .config
                        .countdown_ms
                        .saturating_sub(now_ms.saturating_sub(started_ms)),
                },
                RecordStage::Recording => {
                    let recorder = self.control.recorder();
                    View::Recording {
                        progress: recorder.position() as f32
                            / self.config.record_max_frames as f32,
                        peak: recorder.sketch().peak(),
                    }
                }
                RecordStage::Review => View::RecordReview {
                    freq_hz: self.pitch.map(|p| p.freq_hz),
                },
            },
            Mode::Tune => View::Tune {
                freq_hz: self.pitch.map(|p| p.freq_hz),
                note: self.pitch.map(|p| p.note_name()),
                cents: self.pitch.map(|p| p.cents),
            },
            Mode::AdsrSelect => View::Adsr {
                index: self.adsr_index,
                points: self.markers.points(),
            },
            Mode::ShiftMenu => View::ShiftMenu {
                cursor: self.shift_cursor,
                items: ShiftItem::ALL.iter().map(|i| i.label()).collect(),
            },
        }
    }
}
