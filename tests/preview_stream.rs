//! Preview streaming through the engine: a short file loops through a
//! small ring while the audio callback drains the tap.

use std::time::{Duration, Instant};

use solo::engine::PreviewSession;
use solo::store::wav;
use solo::{BlockStore, InstrumentConfig, MemStore, StoreFile};

fn deadline() -> Instant {
    Instant::now() + Duration::from_millis(50)
}

fn short_file(store: &mut MemStore, name: &str, frames: usize) {
    let mut f = store.create(name).unwrap();
    wav::write_header(&mut f, 1, 48_000, (frames * 2) as u32).unwrap();
    for i in 0..frames as i16 {
        f.write_all(&(i * 300).to_le_bytes()).unwrap();
    }
}

#[test]
fn short_file_loops_repeatedly_while_previewing() {
    // Ring sized to the file so the loop count tracks consumption.
    let config = InstrumentConfig {
        preview_ring_frames: 100,
        ..Default::default()
    };
    let (mut audio, mut control) = solo::engine::build(&config).unwrap();

    let mut store = MemStore::new();
    store.mount().unwrap();
    short_file(&mut store, "loop.wav", 100);

    let (epoch, producer) = control.take_preview_producer().unwrap();
    let file = store.open("loop.wav").unwrap();
    let mut session = PreviewSession::begin(file, epoch, producer, 32, 48_000)
        .unwrap_or_else(|_| panic!("preview begin failed"));
    assert_eq!(session.rate(), 1.0);
    control.start_preview(epoch, session.rate());

    let input = vec![[0.0f32; 2]; 100];
    let mut output = vec![[0.0f32; 2]; 100];

    // First block adopts the epoch; nothing is buffered yet, so the tap
    // underruns for the whole block.
    audio.process(&input, &mut output);
    assert!(control.preview_adopted(epoch));
    assert!(control.take_underrun_count() >= 100);

    let mut heard = 0usize;
    for _ in 0..10 {
        session.fill(deadline()).unwrap();
        audio.process(&input, &mut output);
        heard += output.iter().filter(|f| f[0] != 0.0).count();
    }
    assert!(heard > 700, "preview audio reached the output ({heard})");
    let loops = session.loop_count();
    assert!((8..=12).contains(&loops), "loop count {loops}");

    // Stop hands the producer back for the next preview.
    control.stop_preview(epoch);
    audio.process(&input, &mut output);
    let (_epoch, producer) = session.finish();
    control.return_preview_producer(producer);
    assert!(control.take_preview_producer().is_some());
}

#[test]
fn mismatched_rate_preview_plays_resampled() {
    let config = InstrumentConfig::default();
    let (mut audio, mut control) = solo::engine::build(&config).unwrap();

    let mut store = MemStore::new();
    store.mount().unwrap();
    let mut f = store.create("slow.wav").unwrap();
    wav::write_header(&mut f, 1, 24_000, 400).unwrap();
    for i in 0..200i16 {
        f.write_all(&(i * 100).to_le_bytes()).unwrap();
    }
    drop(f);

    let (epoch, producer) = control.take_preview_producer().unwrap();
    let file = store.open("slow.wav").unwrap();
    let mut session = PreviewSession::begin(file, epoch, producer, 64, 48_000)
        .unwrap_or_else(|_| panic!("preview begin failed"));
    // 24 kHz source over a 48 kHz engine advances half a frame per output.
    assert_eq!(session.rate(), 0.5);
    control.start_preview(epoch, session.rate());

    let input = vec![[0.0f32; 2]; 64];
    let mut output = vec![[0.0f32; 2]; 64];
    audio.process(&input, &mut output);
    session.fill(deadline()).unwrap();
    audio.process(&input, &mut output);
    assert!(output.iter().any(|f| f[0] != 0.0));
}
