//! Redraw tags handed to the renderer.
//!
//! No pixel data crosses this seam. Each tag names the screen to draw and
//! carries the few values it shows; the renderer owns everything visual.

use solo_core::config::RecordSource;
use solo_store::SdPhase;

use crate::mode::BrowseIntent;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Main {
        cursor: usize,
        items: Vec<&'static str>,
    },
    Browse {
        intent: BrowseIntent,
        cursor: usize,
        entries: usize,
        confirming_delete: bool,
    },
    Loading {
        progress: f32,
    },
    Play {
        playhead: u32,
        window: (u32, u32),
        voice_active: bool,
    },
    RecordSource {
        source: RecordSource,
    },
    RecordArmed,
    RecordCountdown {
        remaining_ms: u64,
    },
    Recording {
        progress: f32,
        peak: f32,
    },
    RecordReview {
        freq_hz: Option<f32>,
    },
    Tune {
        freq_hz: Option<f32>,
        note: Option<String>,
        cents: Option<f32>,
    },
    Adsr {
        index: usize,
        points: [usize; 4],
    },
    ShiftMenu {
        cursor: usize,
        items: Vec<&'static str>,
    },
    SdOverlay {
        phase: SdPhase,
        attempts: u32,
    },
    SaveOverlay {
        progress: f32,
    },
}

/// The drawing collaborator. Implementations rasterize elsewhere; tests
/// record the tags.
pub trait Renderer {
    fn draw(&mut self, view: &View);
}
