//! End-to-end instrument walk: power on, record a take through the audio
//! callback, review, save it to the card, load it back and play it. The
//! recorded signal must survive the whole trip bit-exactly.

mod helpers;

use helpers::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use solo::core::bank::dequantize;
use solo::ui::{BrowseIntent, MenuItem, Mode, Overlay, RecordStage};
use solo::{BankOrigin, BlockStore, ButtonId, InputEvent, InstrumentConfig};

#[test]
fn record_save_load_walkthrough_is_lossless() {
    let config = InstrumentConfig {
        countdown_ms: 100,
        sd_min_overlay_ms: 0,
        ..Default::default()
    };
    let (mut audio, mut ui) = build_instrument(config);
    let mut now: u64 = 0;

    ui.power_on(now);
    settle_overlay(&mut ui, &mut now);
    assert_eq!(ui.take_message().unwrap(), "card ready");
    assert_eq!(ui.mode(), Mode::Main);

    // Arm a take and wait out the countdown.
    select_menu_item(&mut ui, MenuItem::Record, now);
    assert_eq!(ui.mode(), Mode::Record(RecordStage::SourceSelect));
    press(&mut ui, ButtonId::Select, now);
    press(&mut ui, ButtonId::Select, now);
    while ui.mode() != Mode::Record(RecordStage::Recording) {
        now += 10;
        ui.tick(now);
    }

    // Feed a seeded random signal through the audio callback in blocks,
    // draining the capture ring between blocks like the polling loop would.
    let mut rng = StdRng::seed_from_u64(42);
    let samples: Vec<i16> = (0..2_048).map(|_| rng.gen_range(-20_000..=20_000)).collect();
    for chunk in samples.chunks(256) {
        let input: Vec<[f32; 2]> = chunk
            .iter()
            .map(|&s| {
                let v = dequantize(s);
                [v, v]
            })
            .collect();
        let mut output = vec![[0.0f32; 2]; input.len()];
        audio.process(&input, &mut output);
        now += 5;
        ui.tick(now);
    }

    press(&mut ui, ButtonId::Select, now);
    assert_eq!(ui.mode(), Mode::Record(RecordStage::Review));
    let bank = ui.control().bank();
    assert_eq!(bank.origin(), BankOrigin::Recorded);
    assert_eq!(bank.left(), &samples[..], "committed take matches the input");

    // Accept the take, then save it from the shift menu.
    press(&mut ui, ButtonId::Select, now);
    assert_eq!(ui.mode(), Mode::Play);
    press(&mut ui, ButtonId::Shift, now);
    press(&mut ui, ButtonId::Select, now);
    assert_eq!(ui.overlay(), Some(Overlay::Save));
    settle_overlay(&mut ui, &mut now);
    assert_eq!(ui.take_message().unwrap(), "saved Rec0001.wav");
    assert!(ui.store_mut().exists("Rec0001.wav").unwrap());

    // Load the recording back off the card.
    press(&mut ui, ButtonId::Back, now);
    select_menu_item(&mut ui, MenuItem::Load, now);
    assert_eq!(ui.mode(), Mode::Browse(BrowseIntent::Load));
    press(&mut ui, ButtonId::Select, now);
    while ui.mode() == Mode::LoadTarget {
        ui.tick(now);
        now += 1;
    }
    assert_eq!(ui.mode(), Mode::Play);

    let bank = ui.control().bank();
    assert_eq!(bank.origin(), BankOrigin::FromFile);
    assert_eq!(bank.left(), &samples[..], "loaded bank matches the take");

    // Audition at unison: the voice must reach the output.
    press(&mut ui, ButtonId::Play, now);
    let input = vec![[0.0f32; 2]; 256];
    let mut output = vec![[0.0f32; 2]; 256];
    audio.process(&input, &mut output);
    assert!(ui.control().voice_active());
    assert!(rms(&output) > 0.01, "auditioned sample is audible");
}

#[test]
fn loaded_banks_cannot_be_saved_again() {
    let config = InstrumentConfig {
        sd_min_overlay_ms: 0,
        ..Default::default()
    };
    let (_audio, mut ui) = build_instrument(config);
    let mut now: u64 = 0;
    ui.power_on(now);
    settle_overlay(&mut ui, &mut now);
    ui.take_message();

    // Put a file on the card directly and load it.
    use solo::store::wav;
    use solo::{BlockStore, StoreFile};
    let mut f = ui.store_mut().create("ext.wav").unwrap();
    wav::write_header(&mut f, 1, 48_000, 512).unwrap();
    for i in 0..256i16 {
        f.write_all(&(i * 100).to_le_bytes()).unwrap();
    }
    drop(f);

    select_menu_item(&mut ui, MenuItem::Load, now);
    press(&mut ui, ButtonId::Select, now);
    while ui.mode() == Mode::LoadTarget {
        ui.tick(now);
        now += 1;
    }
    assert_eq!(ui.mode(), Mode::Play);

    press(&mut ui, ButtonId::Shift, now);
    press(&mut ui, ButtonId::Select, now);
    assert_eq!(ui.overlay(), None, "save of a loaded bank is refused");
    assert!(ui.take_message().unwrap().contains("save rejected"));
}

#[test]
fn midi_notes_play_and_release_the_loaded_sample() {
    let config = InstrumentConfig {
        sd_min_overlay_ms: 0,
        ..Default::default()
    };
    let (mut audio, mut ui) = build_instrument(config);
    let mut now: u64 = 0;
    ui.power_on(now);
    settle_overlay(&mut ui, &mut now);

    use solo::store::wav;
    use solo::{BlockStore, StoreFile};
    let samples = generate_sine(220.0, TEST_SAMPLE_RATE, 9_600);
    let mut f = ui.store_mut().create("tone.wav").unwrap();
    wav::write_header(&mut f, 1, TEST_SAMPLE_RATE, (samples.len() * 2) as u32).unwrap();
    for s in &samples {
        f.write_all(&s.to_le_bytes()).unwrap();
    }
    drop(f);

    select_menu_item(&mut ui, MenuItem::Load, now);
    press(&mut ui, ButtonId::Select, now);
    while ui.mode() == Mode::LoadTarget {
        ui.tick(now);
        now += 1;
    }

    ui.handle_event(
        InputEvent::NoteOn {
            note: 72,
            velocity: 100,
        },
        now,
    );
    let input = vec![[0.0f32; 2]; 512];
    let mut output = vec![[0.0f32; 2]; 512];
    audio.process(&input, &mut output);
    assert!(ui.control().voice_active());
    assert!(rms(&output) > 0.01);

    ui.handle_event(InputEvent::NoteOff { note: 72 }, now);
    audio.process(&input, &mut output);
    assert!(!ui.control().voice_active());
    assert_eq!(rms(&output), 0.0, "released voice is silent");
}
