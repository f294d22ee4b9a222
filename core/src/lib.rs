//! Morse (CW) codec library
//!
//! Translates text to and from dot/dash code, derives element timing from a
//! words-per-minute speed, decodes timed tone/silence events into text and
//! synthesizes keyed sine-tone audio from text.

pub mod error;
pub mod config;
pub mod code_table;
pub mod timing;
pub mod translator;
pub mod events;
pub mod decoder;
pub mod encoder;

pub use code_table::{CodeTable, Symbol};
pub use config::CwConfig;
pub use decoder::{Decoder, DecoderState};
pub use encoder::Encoder;
pub use error::{CwError, Result};
pub use events::{format_events, parse_events, CwEvent};
pub use timing::{compute_timing, ms_to_samples, TimingParameters};
pub use translator::{code_to_text, text_to_code, Encoded, Translator};

// Speed configuration
pub const DEFAULT_WPM: u32 = 20;
pub const MIN_RECOMMENDED_WPM: u32 = 5;
pub const MAX_RECOMMENDED_WPM: u32 = 40;

// Audio configuration
pub const DEFAULT_TONE_FREQUENCY_HZ: f32 = 700.0;
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
pub const ENVELOPE_MS: f64 = 5.0; // linear rise and fall

// Code string layout
pub const PLACEHOLDER: char = '?';
pub const WORD_SEPARATOR: &str = "/";
