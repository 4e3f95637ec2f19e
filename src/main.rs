use tonal_fixture::error::RenderError;
use tonal_fixture::key::parse_key;
use tonal_fixture::render::Renderer;
use tonal_fixture::types::{Key, Mode, PitchClass, RenderConfig, RenderMetadata};
use tonal_fixture::wav_writer;

use clap::Parser;
use log::{error, info};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tonal-fixture")]
#[command(about = "Deterministic tonal house loops for key-detection tuning")]
struct Cli {
    /// Render a single key, e.g. "C#", "Db major", "Am", "F# min"
    #[arg(long)]
    key: Option<String>,

    /// Render all 24 keys (12 pitch classes × major/minor)
    #[arg(long)]
    all_keys: bool,

    /// Duration in seconds
    #[arg(long, default_value_t = 60.0)]
    seconds: f64,

    /// Tempo in beats per minute
    #[arg(long, default_value_t = 124.0)]
    bpm: f64,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 44100)]
    sample_rate: u32,

    /// Output path for --key mode (defaults to a generated name in --out-dir)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Output directory for generated fixtures
    #[arg(long, default_value = "./fixtures")]
    out_dir: PathBuf,
}

/// One line of the batch manifest: where the fixture landed plus its
/// ground-truth metadata.
#[derive(Serialize)]
struct ManifestEntry {
    file: String,
    #[serde(flatten)]
    metadata: RenderMetadata,
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let cli = Cli::parse();

    info!("═══════════════════════════════════════════════");
    info!("  TONAL FIXTURE v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "  bpm={}  sr={}  seconds={}",
        cli.bpm, cli.sample_rate, cli.seconds
    );
    info!("═══════════════════════════════════════════════");

    if let Err(e) = run(&cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), RenderError> {
    match (&cli.key, cli.all_keys) {
        (Some(_), true) => Err(RenderError::InvalidConfiguration(
            "--key and --all-keys are mutually exclusive".into(),
        )),
        (Some(token), false) => render_one(cli, token),
        (None, true) => render_batch(cli),
        (None, false) => Err(RenderError::InvalidConfiguration(
            "select a render mode: --key <KEY> or --all-keys".into(),
        )),
    }
}

fn render_one(cli: &Cli, token: &str) -> Result<(), RenderError> {
    let key = parse_key(token)?;
    let output = Renderer::new(config_for(cli, key)).render()?;
    let path = match &cli.out {
        Some(p) => p.clone(),
        None => cli.out_dir.join(fixture_filename(&key, cli.bpm)),
    };
    wav_writer::write_wav(&output, &path)
}

/// Render every key on the wheel into --out-dir, plus a manifest.json the
/// tuning harness can iterate instead of parsing filenames.
fn render_batch(cli: &Cli) -> Result<(), RenderError> {
    let mut manifest = Vec::with_capacity(24);

    for mode in [Mode::Major, Mode::Minor] {
        for index in 0..12u8 {
            let pc = PitchClass::new(index)
                .ok_or_else(|| RenderError::InvalidConfiguration("pitch class out of range".into()))?;
            let key = Key::new(pc, mode);
            let output = Renderer::new(config_for(cli, key)).render()?;
            let filename = fixture_filename(&key, cli.bpm);
            wav_writer::write_wav(&output, &cli.out_dir.join(&filename))?;
            manifest.push(ManifestEntry {
                file: filename,
                metadata: output.metadata,
            });
        }
    }

    let manifest_path = cli.out_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    std::fs::write(&manifest_path, json)?;
    info!("wrote {:?} ({} fixtures)", manifest_path, manifest.len());
    Ok(())
}

fn config_for(cli: &Cli, key: Key) -> RenderConfig {
    RenderConfig {
        key,
        seconds: cli.seconds,
        bpm: cli.bpm,
        sample_rate: cli.sample_rate,
    }
}

/// Filesystem-safe fixture name: "house_csharp_3B_124bpm.wav",
/// "house_am_8A_124bpm.wav".
fn fixture_filename(key: &Key, bpm: f64) -> String {
    let slug = key.label().to_lowercase().replace('#', "sharp");
    format!("house_{}_{}_{}bpm.wav", slug, key.camelot(), bpm)
}
