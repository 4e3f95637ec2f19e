use thiserror::Error;

/// Failure taxonomy for fixture generation.
///
/// Rendering itself is pure and deterministic, so nothing here is
/// transient: every variant is either a bad request (caught before any
/// sample is produced) or an I/O failure in the writer glue. There is no
/// partial-output mode — a render yields a complete buffer or an error.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Non-positive duration/tempo/sample-rate, or conflicting render-mode
    /// selections on the command line.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Key token whose note name or mode suffix could not be parsed.
    #[error("unrecognized key token {token:?}: {reason}")]
    InvalidKeyToken { token: String, reason: &'static str },

    #[error("WAV write failed: {0}")]
    Wav(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
