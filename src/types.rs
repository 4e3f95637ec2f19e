use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Key identity ───────────────────────────────────────────────────────────

/// One of the 12 chromatic note identities, octave-independent.
/// C = 0 through B = 11; sharp spelling is canonical (flat input is
/// normalized by the key parser before a PitchClass exists).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Build from a chromatic index. Returns None for index >= 12.
    pub fn new(index: u8) -> Option<Self> {
        if index < 12 {
            Some(Self(index))
        } else {
            None
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Mod-12 transposition, safe for negative offsets.
    pub fn transpose(self, semitones: i32) -> Self {
        Self((self.0 as i32 + semitones).rem_euclid(12) as u8)
    }

    /// Canonical sharp-spelled note name ("C", "C#", ... "B").
    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.0 as usize]
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tonal mode of a render. Fixed for the render's whole duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Major,
    Minor,
}

/// A (pitch-class, mode) pair. Immutable once parsed; everything the
/// renderer derives (tonic pitch, progression, bass roots, melody) is a
/// deterministic function of this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub pitch_class: PitchClass,
    pub mode: Mode,
}

impl Key {
    pub fn new(pitch_class: PitchClass, mode: Mode) -> Self {
        Self { pitch_class, mode }
    }

    /// Display label in the detector's spelling: "C#" major, "A#m" minor.
    pub fn label(&self) -> String {
        match self.mode {
            Mode::Major => self.pitch_class.name().to_string(),
            Mode::Minor => format!("{}m", self.pitch_class.name()),
        }
    }

    /// Camelot wheel position ("3B", "8A", ...) for harmonic-mixing
    /// grouping of the fixtures.
    pub fn camelot(&self) -> &'static str {
        let i = self.pitch_class.index() as usize;
        match self.mode {
            Mode::Major => MAJOR_CAMELOT[i],
            Mode::Minor => MINOR_CAMELOT[i],
        }
    }

    /// Seed for this render's noise stream. Distinct per key so batch
    /// renders never share a pseudorandom sequence.
    pub fn noise_seed(&self) -> u64 {
        let mode_offset = match self.mode {
            Mode::Major => 0,
            Mode::Minor => 100,
        };
        42 + self.pitch_class.index() as u64 + mode_offset
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

// ─── Resolved harmonic material ─────────────────────────────────────────────

/// Three-pitch chord as MIDI note numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triad {
    pub root: u8,
    pub third: u8,
    pub fifth: u8,
}

impl Triad {
    pub fn pitches(&self) -> [u8; 3] {
        [self.root, self.third, self.fifth]
    }
}

pub const PROGRESSION_LEN: usize = 4;
pub const MELODY_LEN: usize = 8;

/// Everything the voices need, resolved once per render from the Key and
/// read-only afterwards: tonic pitch, one triad per bar, one bass root per
/// bar, and the 8-step melody cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMaterial {
    pub tonic_pitch: u8,
    pub progression: [Triad; PROGRESSION_LEN],
    pub bass_roots: [u8; PROGRESSION_LEN],
    pub melody: [u8; MELODY_LEN],
}

// ─── Render timing ──────────────────────────────────────────────────────────

/// Beat/bar durations derived from the tempo, computed once per render.
#[derive(Debug, Clone, Copy)]
pub struct TimeGrid {
    pub beat_sec: f64,
    pub half_beat_sec: f64,
    pub bar_sec: f64,
}

impl TimeGrid {
    pub fn new(bpm: f64) -> Self {
        let beat_sec = 60.0 / bpm;
        Self {
            beat_sec,
            half_beat_sec: beat_sec * 0.5,
            bar_sec: beat_sec * 4.0,
        }
    }
}

// ─── Render request / result ────────────────────────────────────────────────

/// Parameters for one render. Validated by the Render Driver before any
/// sample is produced.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub key: Key,
    pub seconds: f64,
    pub bpm: f64,
    pub sample_rate: u32,
}

impl RenderConfig {
    /// Total sample count for this config: round(sr * seconds).
    pub fn num_samples(&self) -> usize {
        (self.sample_rate as f64 * self.seconds).round() as usize
    }
}

/// Summary of a finished render — what the tuning harness needs to treat
/// the WAV as labeled ground truth. Serialized into the batch manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderMetadata {
    /// Expected key label, e.g. "C#" or "A#m"
    pub key: String,
    /// Camelot wheel code, e.g. "3B"
    pub camelot: String,
    pub bpm: f64,
    pub sample_rate: u32,
    pub seconds: f64,
    pub num_samples: usize,
    /// SHA-1 of the little-endian PCM bytes, for regression diffing
    pub pcm_sha1: String,
}

/// A finished render: the mono 16-bit sample buffer plus its metadata.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub samples: Vec<i16>,
    pub metadata: RenderMetadata,
}

// ─── Constants ──────────────────────────────────────────────────────────────

/// Canonical sharp spellings, indexed by pitch-class.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Camelot wheel codes indexed by pitch-class. B = major, A = minor.
pub const MAJOR_CAMELOT: [&str; 12] = [
    "8B", "3B", "10B", "5B", "12B", "7B", "2B", "9B", "4B", "11B", "6B", "1B",
];
pub const MINOR_CAMELOT: [&str; 12] = [
    "5A", "12A", "7A", "2A", "9A", "4A", "11A", "6A", "1A", "8A", "3A", "10A",
];

/// Mix weights. Chosen so the sum stays mostly inside the limiter even
/// with all voices sounding; chords and bass are further reduced by the
/// sidechain duck.
pub const AMP_KICK: f64 = 0.55;
pub const AMP_CLAP: f64 = 0.16;
pub const AMP_HAT: f64 = 0.10;
pub const AMP_BASS: f64 = 0.22;
pub const AMP_CHORD: f64 = 0.18;
pub const AMP_TONIC: f64 = 0.06;
pub const AMP_MELODY: f64 = 0.12;
