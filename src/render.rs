//! Render Driver: the sequential fold that turns a validated RenderConfig
//! into a finished 16-bit sample buffer plus metadata.
//!
//! The key material and time grid are resolved once up front; after that
//! every sample is a pure function of (t, material, grid) except for the
//! noise voices, which draw from the driver's own seeded stream. Two
//! renders with the same config therefore produce byte-identical buffers.

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha1_smol::Sha1;

use crate::dsp::clamp;
use crate::error::RenderError;
use crate::theory;
use crate::types::{
    Key, KeyMaterial, RenderConfig, RenderMetadata, RenderOutput, TimeGrid, AMP_BASS, AMP_CHORD,
    AMP_CLAP, AMP_HAT, AMP_KICK, AMP_MELODY, AMP_TONIC,
};
use crate::voices;

// ─── Noise stream ───────────────────────────────────────────────────────────

/// Per-render white-noise source for the clap and hat voices.
///
/// Owned by the driver and passed down by reference — there is no global
/// RNG state, so batch renders of different keys never perturb each
/// other's streams and a given key always hears the same noise.
pub struct NoiseStream {
    rng: StdRng,
}

impl NoiseStream {
    pub fn for_key(key: &Key) -> Self {
        Self {
            rng: StdRng::seed_from_u64(key.noise_seed()),
        }
    }

    /// Next white-noise sample, uniform in [-1, 1).
    pub fn next_sample(&mut self) -> f64 {
        self.rng.gen::<f64>() * 2.0 - 1.0
    }
}

// ─── Driver ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    Rendering,
    Done,
}

/// One-shot renderer. Construct with a config, call [`Renderer::render`]
/// once; a second call is rejected rather than silently re-rendering.
pub struct Renderer {
    config: RenderConfig,
    stage: Stage,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            stage: Stage::Idle,
        }
    }

    /// Validate, resolve the key once, then fold over the sample index.
    /// Fails fast before producing any samples; never yields a partial
    /// buffer.
    pub fn render(&mut self) -> Result<RenderOutput, RenderError> {
        if self.stage != Stage::Idle {
            return Err(RenderError::InvalidConfiguration(
                "renderer already consumed".into(),
            ));
        }
        self.validate()?;

        let cfg = self.config;
        let material = theory::resolve(&cfg.key);
        let grid = TimeGrid::new(cfg.bpm);
        let mut noise = NoiseStream::for_key(&cfg.key);
        let total = cfg.num_samples();
        let sr = cfg.sample_rate as f64;

        self.stage = Stage::Rendering;
        let mut samples = Vec::with_capacity(total);
        for n in 0..total {
            let t = n as f64 / sr;
            samples.push(mix_sample(t, &grid, &material, &mut noise));
        }
        self.stage = Stage::Done;

        let mut sha = Sha1::new();
        for s in &samples {
            sha.update(&s.to_le_bytes());
        }

        let metadata = RenderMetadata {
            key: cfg.key.label(),
            camelot: cfg.key.camelot().to_string(),
            bpm: cfg.bpm,
            sample_rate: cfg.sample_rate,
            seconds: cfg.seconds,
            num_samples: samples.len(),
            pcm_sha1: sha.digest().to_string(),
        };

        info!(
            "rendered {} ({}) — {} samples, bpm={} sr={} seconds={} sha1={}",
            metadata.key,
            metadata.camelot,
            metadata.num_samples,
            metadata.bpm,
            metadata.sample_rate,
            metadata.seconds,
            metadata.pcm_sha1,
        );

        Ok(RenderOutput { samples, metadata })
    }

    fn validate(&self) -> Result<(), RenderError> {
        let c = &self.config;
        if !(c.seconds > 0.0 && c.seconds.is_finite()) {
            return Err(RenderError::InvalidConfiguration(format!(
                "duration must be positive, got {}",
                c.seconds
            )));
        }
        if !(c.bpm > 0.0 && c.bpm.is_finite()) {
            return Err(RenderError::InvalidConfiguration(format!(
                "tempo must be positive, got {}",
                c.bpm
            )));
        }
        if c.sample_rate == 0 {
            return Err(RenderError::InvalidConfiguration(
                "sample rate must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Mix one output sample: weighted voice sum, sidechain on the tonal bed,
/// hard limit to [-1, 1], quantize half-away-from-zero to i16.
fn mix_sample(t: f64, grid: &TimeGrid, material: &KeyMaterial, noise: &mut NoiseStream) -> i16 {
    let phase_in_beat = t % grid.beat_sec;
    let phase_in_bar = t % grid.bar_sec;

    let sc = voices::sidechain_gain(phase_in_beat);
    let chord_idx = voices::active_chord_index(t, grid);
    let triad = &material.progression[chord_idx];
    let bass_root = material.bass_roots[chord_idx];

    let mut x = AMP_KICK * voices::kick(phase_in_beat);

    // Noise draws happen only inside active windows, clap before hat, so
    // the stream position is a function of time alone.
    if let Some(env) = voices::clap_envelope(phase_in_bar, grid) {
        x += AMP_CLAP * env * noise.next_sample();
    }
    if let Some(env) = voices::hat_envelope(t, grid) {
        x += AMP_HAT * env * noise.next_sample();
    }

    x += sc * AMP_BASS * voices::bass(t, phase_in_beat, bass_root);
    x += sc * (AMP_CHORD / 3.0) * voices::chord_sum(t, triad);
    x += AMP_TONIC * voices::tonic_drone(t, material.tonic_pitch);
    x += AMP_MELODY * voices::melody(t, phase_in_bar, grid, &material.melody);

    (clamp(x, -1.0, 1.0) * 32767.0).round() as i16
}
