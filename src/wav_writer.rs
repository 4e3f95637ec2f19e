//! External-sink glue: writes a finished render to a mono 16-bit PCM WAV.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use log::info;

use crate::error::RenderError;
use crate::types::RenderOutput;

/// Write the render's sample buffer to `path` as mono 16-bit PCM at the
/// render's sample rate. Creates parent directories as needed.
pub fn write_wav(output: &RenderOutput, path: &Path) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate: output.metadata.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &s in &output.samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;

    info!(
        "wrote {:?} — expected key {} (Camelot {})",
        path, output.metadata.key, output.metadata.camelot,
    );
    Ok(())
}
