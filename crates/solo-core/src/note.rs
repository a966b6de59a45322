//! MIDI note and frequency conversions.

/// Frequency of a MIDI note in Hz, equal temperament around A4 = 440 Hz.
pub fn midi_to_freq(note: u8) -> f32 {
    440.0 * 2f32.powf((note as f32 - 69.0) / 12.0)
}

/// Nearest MIDI note for a frequency, with the remaining offset in cents.
pub fn freq_to_midi(freq: f32) -> (u8, f32) {
    let exact = 69.0 + 12.0 * (freq / 440.0).log2();
    let note = exact.round().clamp(0.0, 127.0);
    let cents = (exact - note) * 100.0;
    (note as u8, cents)
}

/// Note name with sharps, e.g. `A4` or `C#3`.
pub fn note_name(note: u8) -> String {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];
    let octave = (note / 12) as i32 - 1;
    format!("{}{}", NAMES[(note % 12) as usize], octave)
}
