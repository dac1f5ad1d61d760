//! Tiny tone synthesizer for the background music loops
use super::Track;
use std::f32::consts::TAU;

pub(super) const SAMPLE_RATE: u16 = 44_100;

/// Peak level of a rendered loop
const AMPLITUDE: f32 = 0.25;

/// Seconds for a note to swell to full volume
const ATTACK: f32 = 0.01;

/// Seconds over which a note dies away at its end
const RELEASE: f32 = 0.06;

/// MIDI note number standing for silence
const REST: u8 = 0;

/// A melody as (MIDI note, milliseconds) pairs
type Score = &'static [(u8, u16)];

static MENU: Score = &[
    (72, 500),
    (76, 250),
    (79, 250),
    (81, 500),
    (79, 500),
    (76, 250),
    (74, 250),
    (72, 500),
    (REST, 500),
    (69, 500),
    (72, 250),
    (74, 250),
    (76, 500),
    (74, 500),
    (72, 1000),
    (REST, 500),
];

static HERBS: Score = &[
    (67, 200),
    (71, 200),
    (74, 200),
    (71, 200),
    (72, 200),
    (76, 200),
    (79, 400),
    (REST, 200),
    (76, 200),
    (74, 200),
    (72, 200),
    (71, 200),
    (69, 400),
    (67, 400),
    (REST, 200),
];

static ANTIDOTE: Score = &[
    (57, 150),
    (60, 150),
    (64, 150),
    (63, 300),
    (60, 150),
    (57, 150),
    (56, 300),
    (REST, 150),
    (57, 150),
    (60, 150),
    (65, 150),
    (64, 300),
    (63, 150),
    (60, 150),
    (57, 450),
    (REST, 150),
];

fn score(track: Track) -> Score {
    match track {
        Track::Menu => MENU,
        Track::Herbs => HERBS,
        Track::Antidote => ANTIDOTE,
    }
}

/// Frequency in hertz of a MIDI note, with A4 (69) at 440 Hz
fn pitch(note: u8) -> f32 {
    440.0 * ((f32::from(note) - 69.0) / 12.0).exp2()
}

/// Render one pass of `track` as mono samples at [`SAMPLE_RATE`].  Each note
/// is a sine with a softer sine an octave below, shaped by a short attack and
/// release so that consecutive notes & the loop point don't click.
pub(super) fn render(track: Track) -> Vec<f32> {
    let rate = f32::from(SAMPLE_RATE);
    let mut samples = Vec::new();
    for &(note, millis) in score(track) {
        let count = usize::from(SAMPLE_RATE) * usize::from(millis) / 1000;
        if note == REST {
            samples.extend(std::iter::repeat_n(0.0, count));
            continue;
        }
        let length = f32::from(millis) / 1000.0;
        let step = pitch(note) / rate;
        let mut phase = 0.0f32;
        let mut sub_phase = 0.0f32;
        let mut t = 0.0f32;
        for _ in 0..count {
            let envelope = (t / ATTACK).min(1.0) * ((length - t) / RELEASE).clamp(0.0, 1.0);
            let wave = 0.5f32.mul_add((TAU * sub_phase).sin(), (TAU * phase).sin()) / 1.5;
            samples.push(AMPLITUDE * envelope * wave);
            phase = (phase + step).fract();
            sub_phase = (sub_phase + step / 2.0).fract();
            t += 1.0 / rate;
        }
    }
    samples
}
