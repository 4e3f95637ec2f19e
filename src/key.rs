//! Key-token grammar: "C#", "Dbm", "A# minor", "f maj" → (PitchClass, Mode).
//!
//! The note name is a letter A–G plus an optional accidental; flats are
//! normalized to the canonical sharp spelling (Db → C#). The rest of the
//! token selects the mode: empty/"maj"/"major" is major, "m"/"min"/"minor"
//! is minor. Anything else is rejected — no guessing.

use crate::error::RenderError;
use crate::types::{Key, Mode, PitchClass};

/// Semitone of each natural note letter, A through G.
const NATURALS: [(char, u8); 7] = [
    ('C', 0),
    ('D', 2),
    ('E', 4),
    ('F', 5),
    ('G', 7),
    ('A', 9),
    ('B', 11),
];

/// Parse a key token into a validated Key.
pub fn parse_key(token: &str) -> Result<Key, RenderError> {
    let bad = |reason: &'static str| RenderError::InvalidKeyToken {
        token: token.to_string(),
        reason,
    };

    let trimmed = token.trim();
    let mut chars = trimmed.chars();

    let letter = chars.next().ok_or_else(|| bad("empty token"))?;
    let letter = letter.to_ascii_uppercase();
    let natural = NATURALS
        .iter()
        .find(|&&(l, _)| l == letter)
        .map(|&(_, semis)| semis)
        .ok_or_else(|| bad("note letter must be A-G"))?;

    let rest = chars.as_str();
    let (accidental, rest) = match rest.chars().next() {
        Some('#') => (1i32, &rest[1..]),
        Some('b') => (-1i32, &rest[1..]),
        _ => (0, rest),
    };

    let index = (natural as i32 + accidental).rem_euclid(12) as u8;
    let pitch_class = PitchClass::new(index).ok_or_else(|| bad("note out of range"))?;

    let mode = match rest.trim().to_ascii_lowercase().as_str() {
        "" | "maj" | "major" => Mode::Major,
        "m" | "min" | "minor" => Mode::Minor,
        _ => return Err(bad("mode suffix must be empty, maj(or), or m/min(or)")),
    };

    Ok(Key::new(pitch_class, mode))
}
