//! Shared DSP primitives: decay envelopes, saturating clamp, pitch math.

/// Exponential decay envelope: exp(-t/tau), 1.0 at t=0, falling toward 0.
/// A non-positive time constant yields 0 (a degenerate envelope, not an
/// error — callers treat it as "instantly silent").
pub fn exp_decay(t: f64, tau: f64) -> f64 {
    if tau <= 0.0 {
        return 0.0;
    }
    (-t / tau).exp()
}

/// Saturating clamp of x into [lo, hi].
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// Convert MIDI note number (fractional) to Hz. A4 = MIDI 69 = 440 Hz.
/// Fractional input supports micro-detune (the chord voices shift their
/// outer notes by ±0.01 semitones).
pub fn midi_to_hz(midi: f64) -> f64 {
    440.0 * 2.0_f64.powf((midi - 69.0) / 12.0)
}
