//! Music theory resolver: from a Key to the concrete pitches every voice
//! plays. Pure and total — any (pitch-class, mode) input resolves.
//!
//! The harmonic cycle is a fixed I–IV–V–I, one chord per bar. In minor the
//! tonic and subdominant triads are minor, the dominant stays major (the
//! harmonic-minor raised 7th shows up in the melody's step table instead).

use crate::types::{Key, KeyMaterial, Mode, Triad, MELODY_LEN, PROGRESSION_LEN};

/// Reference octave for the tonic: MIDI 48 + pitch-class puts the tonic
/// around C3, so bass roots land near 130 Hz where the downstream
/// detector's bass heuristics look, while chords (an octave up) stay in
/// the mid band.
const TONIC_BASE: u8 = 48;

/// Semitone offsets of the I–IV–V–I cycle.
const DEGREES: [u8; PROGRESSION_LEN] = [0, 5, 7, 0];

/// Third interval per progression slot: major triads throughout in major
/// mode; minor tonic/subdominant in minor mode, dominant kept major.
const THIRDS_MAJOR: [u8; PROGRESSION_LEN] = [4, 4, 4, 4];
const THIRDS_MINOR: [u8; PROGRESSION_LEN] = [3, 3, 4, 3];

/// Scale-step patterns for the 8-slot melody cycle (one bar of eighth
/// notes). Minor uses the harmonic minor scale (raised 7th).
const STEPS_MAJOR: [u8; MELODY_LEN] = [0, 2, 4, 5, 7, 9, 11, 12];
const STEPS_MINOR: [u8; MELODY_LEN] = [0, 2, 3, 5, 7, 8, 11, 12];

/// Tonic pitch for a key: its pitch-class placed at the fixed reference
/// octave.
pub fn tonic_pitch(key: &Key) -> u8 {
    TONIC_BASE + key.pitch_class.index()
}

/// Resolve a key into the read-only material a render consumes: the
/// 4-triad progression (voiced one octave above the tonic), per-bar bass
/// roots (at the tonic octave), and the 8-step melody (two octaves up).
pub fn resolve(key: &Key) -> KeyMaterial {
    let tonic = tonic_pitch(key);
    let thirds = match key.mode {
        Mode::Major => THIRDS_MAJOR,
        Mode::Minor => THIRDS_MINOR,
    };
    let steps = match key.mode {
        Mode::Major => STEPS_MAJOR,
        Mode::Minor => STEPS_MINOR,
    };

    let mut progression = [Triad {
        root: 0,
        third: 0,
        fifth: 0,
    }; PROGRESSION_LEN];
    let mut bass_roots = [0u8; PROGRESSION_LEN];
    for i in 0..PROGRESSION_LEN {
        let root = tonic + DEGREES[i];
        progression[i] = Triad {
            root: root + 12,
            third: root + 12 + thirds[i],
            fifth: root + 12 + 7,
        };
        bass_roots[i] = root;
    }

    let mut melody = [0u8; MELODY_LEN];
    for i in 0..MELODY_LEN {
        melody[i] = tonic + 24 + steps[i];
    }

    KeyMaterial {
        tonic_pitch: tonic,
        progression,
        bass_roots,
        melody,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PitchClass;

    fn key(pc: u8, mode: Mode) -> Key {
        Key::new(PitchClass::new(pc).unwrap(), mode)
    }

    #[test]
    fn test_csharp_major_voicing() {
        // C# major: tonic C#3 (49), bar-0 chord C#4 F4 G#4
        let m = resolve(&key(1, Mode::Major));
        assert_eq!(m.tonic_pitch, 49);
        assert_eq!(
            m.progression[0],
            Triad {
                root: 61,
                third: 65,
                fifth: 68
            }
        );
        assert_eq!(m.bass_roots[0], 49);
    }

    #[test]
    fn test_a_minor_degree_table() {
        // A minor: i–iv–V–i with minor thirds except the dominant
        let m = resolve(&key(9, Mode::Minor));
        assert_eq!(m.tonic_pitch, 57);
        assert_eq!(m.bass_roots, [57, 62, 64, 57]);
        let thirds: Vec<u8> = m
            .progression
            .iter()
            .map(|t| t.third - t.root)
            .collect();
        assert_eq!(thirds, vec![3, 3, 4, 3]);
    }

    #[test]
    fn test_all_keys_resolve_with_fixed_shapes() {
        for pc in 0..12u8 {
            for mode in [Mode::Major, Mode::Minor] {
                let m = resolve(&key(pc, mode));
                assert_eq!(m.progression.len(), 4);
                assert_eq!(m.melody.len(), 8);
                for (i, triad) in m.progression.iter().enumerate() {
                    // Fifth is always a perfect fifth over the root
                    assert_eq!(triad.fifth - triad.root, 7);
                    // Chord voicing sits one octave above the bass root
                    assert_eq!(triad.root, m.bass_roots[i] + 12);
                }
            }
        }
    }

    #[test]
    fn test_major_thirds_by_degree() {
        let m = resolve(&key(0, Mode::Major));
        for t in &m.progression {
            assert_eq!(t.third - t.root, 4);
        }
    }

    #[test]
    fn test_melody_spans_the_octave() {
        for mode in [Mode::Major, Mode::Minor] {
            let m = resolve(&key(4, mode));
            assert_eq!(m.melody[0], m.tonic_pitch + 24);
            assert_eq!(m.melody[7], m.tonic_pitch + 36);
        }
    }

    #[test]
    fn test_harmonic_minor_raised_seventh() {
        let m = resolve(&key(9, Mode::Minor));
        // 7th melody step is 11 semitones over the tonic, not 10
        assert_eq!(m.melody[6] - (m.tonic_pitch + 24), 11);
    }
}
