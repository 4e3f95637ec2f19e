//! The seven voice generators and the sidechain modulator.
//!
//! Every function here is pure in (absolute time, TimeGrid, resolved key
//! material): activity windows are phase predicates, not counters, so the
//! render loop carries no per-voice state. The two noise voices (clap,
//! hat) return their envelope only; the Render Driver multiplies in a
//! sample from its own seeded noise stream so the stream advances exactly
//! once per active noise window.

use std::f64::consts::TAU;

use crate::dsp::{clamp, exp_decay, midi_to_hz};
use crate::types::{TimeGrid, Triad, MELODY_LEN, PROGRESSION_LEN};

// Trigger windows (seconds)
const KICK_WINDOW: f64 = 0.16;
const CLAP_WINDOW: f64 = 0.09;
const HAT_WINDOW: f64 = 0.03;

// Envelope time constants (seconds)
const KICK_AMP_TAU: f64 = 0.07;
const KICK_SWEEP_TAU: f64 = 0.035;
const CLAP_TAU: f64 = 0.035;
const HAT_TAU: f64 = 0.012;
const BASS_TAU: f64 = 0.22;
const MELODY_TAU: f64 = 0.10;

// Kick frequency sweep endpoints (Hz)
const KICK_F_START: f64 = 95.0;
const KICK_F_END: f64 = 52.0;

/// Gain duck emulating the pump of kick-keyed compression: deepest
/// (0.35) right at the beat, relaxing toward 1.0. Never leaves
/// [0.25, 1.0]. Applied to bass and chords, not to tonic or melody.
pub fn sidechain_gain(phase_in_beat: f64) -> f64 {
    clamp(1.0 - 0.65 * exp_decay(phase_in_beat, 0.12), 0.25, 1.0)
}

/// Which progression slot (chord + bass root) is active at time t.
pub fn active_chord_index(t: f64, grid: &TimeGrid) -> usize {
    (t / grid.bar_sec) as usize % PROGRESSION_LEN
}

/// Which of the 8 half-beat melody slots is active within the bar.
pub fn active_melody_index(phase_in_bar: f64, grid: &TimeGrid) -> usize {
    (phase_in_bar / grid.half_beat_sec) as usize % MELODY_LEN
}

/// Kick: one hit per beat — a short sine whose frequency sweeps
/// exponentially from 95 Hz down to 52 Hz under a fast amplitude decay.
/// Zero outside the first 160 ms of the beat.
pub fn kick(phase_in_beat: f64) -> f64 {
    if phase_in_beat >= KICK_WINDOW {
        return 0.0;
    }
    let kt = phase_in_beat;
    let f = KICK_F_END + (KICK_F_START - KICK_F_END) * exp_decay(kt, KICK_SWEEP_TAU);
    exp_decay(kt, KICK_AMP_TAU) * (TAU * f * kt).sin()
}

/// Clap: envelope for the 90 ms noise bursts on beats 1 and 3 of the bar
/// (0-based). None outside both windows.
pub fn clap_envelope(phase_in_bar: f64, grid: &TimeGrid) -> Option<f64> {
    for beat in [1.0, 3.0] {
        let ct = phase_in_bar - grid.beat_sec * beat;
        if (0.0..CLAP_WINDOW).contains(&ct) {
            return Some(exp_decay(ct, CLAP_TAU));
        }
    }
    None
}

/// Hat: envelope for the 30 ms noise tick opening every half-beat.
pub fn hat_envelope(t: f64, grid: &TimeGrid) -> Option<f64> {
    let ht = t % grid.half_beat_sec;
    if ht < HAT_WINDOW {
        Some(exp_decay(ht, HAT_TAU))
    } else {
        None
    }
}

/// Bass: continuous root + second harmonic (0.75/0.25 — a cheap sawtooth
/// feel), envelope retriggered every beat but never fully closing
/// (floor 0.35) so the fundamental stays present for analysis.
pub fn bass(t: f64, phase_in_beat: f64, root_pitch: u8) -> f64 {
    let f = midi_to_hz(root_pitch as f64);
    let env = 0.65 * exp_decay(phase_in_beat, BASS_TAU) + 0.35;
    env * (0.75 * (TAU * f * t).sin() + 0.25 * (TAU * 2.0 * f * t).sin())
}

/// Chords: three sines held for the whole bar, outer voices detuned by
/// ±0.01 semitones to thicken the unison. Returns the raw three-voice
/// sum; the mixer divides the chord weight by 3.
pub fn chord_sum(t: f64, triad: &Triad) -> f64 {
    let mut x = 0.0;
    for (i, pitch) in triad.pitches().iter().enumerate() {
        let detune = (i as f64 - 1.0) * 0.01;
        let f = midi_to_hz(*pitch as f64 + detune);
        x += (TAU * f * t).sin();
    }
    x
}

/// Tonic drone: one quiet sine at the tonic pitch for the whole render.
/// Not sidechained — it anchors the key estimate through the duck.
pub fn tonic_drone(t: f64, tonic_pitch: u8) -> f64 {
    (TAU * midi_to_hz(tonic_pitch as f64) * t).sin()
}

/// Melody: one scale step per half-beat slot, plucked with a 100 ms
/// decay, cycling through the 8-step pattern every bar.
pub fn melody(t: f64, phase_in_bar: f64, grid: &TimeGrid, steps: &[u8; MELODY_LEN]) -> f64 {
    let idx = active_melody_index(phase_in_bar, grid);
    let mt = phase_in_bar % grid.half_beat_sec;
    let f = midi_to_hz(steps[idx] as f64);
    exp_decay(mt, MELODY_TAU) * (TAU * f * t).sin()
}
