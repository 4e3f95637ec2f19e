pub mod dsp;
pub mod error;
pub mod key;
pub mod render;
pub mod theory;
pub mod types;
pub mod voices;
pub mod wav_writer;
