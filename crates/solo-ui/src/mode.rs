//! The mode graph as plain tagged enums.
//!
//! Every reachable state is a variant; transitions live in one match in
//! `machine.rs`. Overlays are separate from the mode so they can resolve
//! back to whatever was underneath.

/// What the browser is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseIntent {
    Load,
    Delete,
}

/// Sub-states of the record flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStage {
    /// Choosing the input channel.
    SourceSelect,
    /// Ready; Select starts the countdown.
    Armed,
    Countdown { started_ms: u64 },
    Recording,
    /// Take committed; audition, accept or retake.
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Main,
    Browse(BrowseIntent),
    /// A load session is streaming the selected file in.
    LoadTarget,
    Play,
    Record(RecordStage),
    Tune,
    AdsrSelect,
    ShiftMenu,
}

/// Blocking overlays. While one is up only Back (abort) is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Sd,
    Save,
}

/// Main menu entries. Which ones show depends on capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Play,
    Load,
    Record,
    Tune,
    Adsr,
    Delete,
}

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Play => "Play",
            MenuItem::Load => "Load",
            MenuItem::Record => "Record",
            MenuItem::Tune => "Tune",
            MenuItem::Adsr => "ADSR",
            MenuItem::Delete => "Delete",
        }
    }
}

/// Shift menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftItem {
    Save,
    RemountSd,
}

impl ShiftItem {
    pub const ALL: [ShiftItem; 2] = [ShiftItem::Save, ShiftItem::RemountSd];

    pub fn label(&self) -> &'static str {
        match self {
            ShiftItem::Save => "Save",
            ShiftItem::RemountSd => "Remount card",
        }
    }
}
