//! Test helpers and fixtures for solo integration tests.
//!
//! Scenario tests drive the instrument through its public seams only: an
//! in-memory store stands in for the card, a tape renderer records every
//! redraw tag, and wall time is a counter the test advances.

#![allow(dead_code)]

use solo::ui::MenuItem;
use solo::{
    AudioEngine, ButtonId, EncoderId, InputEvent, InstrumentConfig, MemStore, Renderer,
    SoloBuilder, UiStateMachine, View,
};

/// Default test sample rate (matches the engine default).
pub const TEST_SAMPLE_RATE: u32 = 48_000;

/// Renderer that records every redraw tag for later inspection.
#[derive(Default)]
pub struct TapeRenderer {
    pub views: Vec<View>,
}

impl Renderer for TapeRenderer {
    fn draw(&mut self, view: &View) {
        self.views.push(view.clone());
    }
}

pub type Ui = UiStateMachine<MemStore, TapeRenderer>;

/// Builds the instrument over an in-memory card.
pub fn build_instrument(config: InstrumentConfig) -> (AudioEngine, Ui) {
    SoloBuilder::new()
        .config(config)
        .build(MemStore::new(), TapeRenderer::default())
        .expect("instrument builds")
}

pub fn press(ui: &mut Ui, button: ButtonId, now: u64) {
    ui.handle_event(InputEvent::Button(button), now);
}

pub fn turn(ui: &mut Ui, id: EncoderId, delta: i32, now: u64) {
    ui.handle_event(InputEvent::Encoder { id, delta }, now);
}

/// Ticks until the current overlay resolves, advancing the clock.
pub fn settle_overlay(ui: &mut Ui, now: &mut u64) {
    for _ in 0..10_000 {
        if ui.overlay().is_none() {
            return;
        }
        ui.tick(*now);
        *now += 10;
    }
    panic!("overlay never cleared");
}

/// Walks the main menu cursor to `item` and selects it, reading the cursor
/// position back from the redraw tags.
pub fn select_menu_item(ui: &mut Ui, item: MenuItem, now: u64) {
    ui.tick(now);
    for _ in 0..8 {
        let (cursor, pos) = match ui.renderer().views.last() {
            Some(View::Main { cursor, items }) => {
                let pos = items
                    .iter()
                    .position(|l| *l == item.label())
                    .unwrap_or_else(|| panic!("{} not in the menu", item.label()));
                (*cursor, pos)
            }
            other => panic!("expected the main menu, got {other:?}"),
        };
        if cursor == pos {
            press(ui, ButtonId::Select, now);
            return;
        }
        turn(ui, EncoderId::A, pos as i32 - cursor as i32, now);
    }
    panic!("menu cursor never converged");
}

/// Sine wave quantized to the bank's sample format.
pub fn generate_sine(frequency: f32, sample_rate: u32, num_samples: usize) -> Vec<i16> {
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            ((2.0 * std::f32::consts::PI * frequency * t).sin() * 0.8 * 32_767.0) as i16
        })
        .collect()
}

pub fn rms(samples: &[[f32; 2]]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|f| f[0] * f[0]).sum();
    (sum / samples.len() as f32).sqrt()
}
