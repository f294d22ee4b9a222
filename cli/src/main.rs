use clap::{Parser, Subcommand};
use hound::WavSpec;
use morsechat_core::{
    compute_timing, format_events, parse_events, CwConfig, Decoder, Encoder, Translator,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "morsechat")]
#[command(about = "Morse (CW) translator, decoder and tone synthesizer")]
struct Cli {
    /// JSON settings file (wpm, tone_frequency_hz, sample_rate_hz)
    #[arg(long, global = true, value_name = "SETTINGS.JSON")]
    config: Option<PathBuf>,

    /// Speed in words per minute
    #[arg(long, global = true)]
    wpm: Option<u32>,

    /// Tone frequency in Hz
    #[arg(long, global = true)]
    tone: Option<f32>,

    /// Output sample rate in Hz
    #[arg(long, global = true)]
    sample_rate: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate text to dot/dash code
    Encode {
        #[arg(value_name = "TEXT", allow_hyphen_values = true)]
        text: String,
    },

    /// Translate dot/dash code to text
    Decode {
        #[arg(value_name = "CODE", allow_hyphen_values = true)]
        code: String,
    },

    /// Print element timing for the configured speed
    Timing {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Synthesize text to a mono WAV file
    Synth {
        #[arg(value_name = "TEXT", allow_hyphen_values = true)]
        text: String,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        /// Write 32-bit float samples instead of 16-bit PCM
        #[arg(long)]
        float: bool,
    },

    /// Print the keying of text as signed milliseconds (+tone -silence)
    Keying {
        #[arg(value_name = "TEXT", allow_hyphen_values = true)]
        text: String,
    },

    /// Feed a keying log into the decoder and print the text
    Replay {
        /// File of signed millisecond events, '-' for stdin
        #[arg(value_name = "EVENTS")]
        input: PathBuf,

        /// Print the decoded text after every event
        #[arg(long)]
        live: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to read settings {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings {path}: {source}")]
    SettingsFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Settings file contents; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Settings {
    wpm: Option<u32>,
    tone_frequency_hz: Option<f32>,
    sample_rate_hz: Option<u32>,
}

#[derive(Serialize)]
struct TimingReport {
    wpm: u32,
    dit_ms: f64,
    dah_ms: f64,
    element_gap_ms: f64,
    letter_gap_ms: f64,
    word_gap_ms: f64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&cli)?;
    config.validate()?;

    match cli.command {
        Commands::Encode { text } => encode_command(&text),
        Commands::Decode { code } => decode_command(&code),
        Commands::Timing { json } => timing_command(config.wpm, json)?,
        Commands::Synth {
            text,
            output,
            float,
        } => synth_command(config, &text, &output, float)?,
        Commands::Keying { text } => keying_command(config, &text)?,
        Commands::Replay { input, live } => replay_command(config, &input, live)?,
    }

    Ok(())
}

/// Defaults, then the settings file, then command-line flags
fn resolve_config(cli: &Cli) -> Result<CwConfig, CliError> {
    let settings = match &cli.config {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };

    let defaults = CwConfig::default();
    Ok(CwConfig {
        wpm: cli.wpm.or(settings.wpm).unwrap_or(defaults.wpm),
        tone_frequency_hz: cli
            .tone
            .or(settings.tone_frequency_hz)
            .unwrap_or(defaults.tone_frequency_hz),
        sample_rate_hz: cli
            .sample_rate
            .or(settings.sample_rate_hz)
            .unwrap_or(defaults.sample_rate_hz),
    })
}

fn load_settings(path: &Path) -> Result<Settings, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::SettingsIo {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = serde_json::from_str(&content).map_err(|source| CliError::SettingsFormat {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded settings from {}: {:?}", path.display(), settings);
    Ok(settings)
}

fn encode_command(text: &str) {
    let encoded = Translator::default().encode_reporting(text);
    if !encoded.dropped.is_empty() {
        let dropped: String = encoded.dropped.iter().collect();
        eprintln!("Dropped unsupported characters: {:?}", dropped);
    }
    println!("{}", encoded.code);
}

fn decode_command(code: &str) {
    println!("{}", Translator::default().decode(code));
}

fn timing_command(wpm: u32, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let timing = compute_timing(wpm as f64)?;

    if json {
        let report = TimingReport {
            wpm,
            dit_ms: timing.dit_ms,
            dah_ms: timing.dah_ms,
            element_gap_ms: timing.element_gap_ms,
            letter_gap_ms: timing.letter_gap_ms,
            word_gap_ms: timing.word_gap_ms,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{} WPM:", wpm);
        println!("  Dit:           {:.1} ms", timing.dit_ms);
        println!("  Dah:           {:.1} ms", timing.dah_ms);
        println!("  Element gap:   {:.1} ms", timing.element_gap_ms);
        println!("  Letter gap:    {:.1} ms", timing.letter_gap_ms);
        println!("  Word gap:      {:.1} ms", timing.word_gap_ms);
    }
    Ok(())
}

fn synth_command(
    config: CwConfig,
    text: &str,
    output_path: &Path,
    float: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let encoder = Encoder::new(config)?;
    let samples = encoder.synthesize(text);
    println!(
        "Encoded {:?} to {} audio samples ({} WPM, {} Hz tone)",
        encoder.translator().encode(text),
        samples.len(),
        config.wpm,
        config.tone_frequency_hz
    );

    let spec = WavSpec {
        channels: 1,
        sample_rate: config.sample_rate_hz,
        bits_per_sample: if float { 32 } else { 16 },
        sample_format: if float {
            hound::SampleFormat::Float
        } else {
            hound::SampleFormat::Int
        },
    };

    let file = File::create(output_path)?;
    let mut writer = hound::WavWriter::new(file, spec)?;

    for sample in samples {
        if float {
            writer.write_sample(sample)?;
        } else {
            // Clamp to [-1.0, 1.0] range to avoid overflow, then scale to i16
            let clamped = sample.clamp(-1.0, 1.0);
            writer.write_sample((clamped * 32767.0) as i16)?;
        }
    }
    writer.finalize()?;

    println!("Wrote {}", output_path.display());
    Ok(())
}

fn keying_command(config: CwConfig, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let encoder = Encoder::new(config)?;
    println!("{}", format_events(&encoder.keying(text)));
    Ok(())
}

fn replay_command(
    config: CwConfig,
    input_path: &Path,
    live: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = if input_path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(input_path)?
    };

    let events = parse_events(&content)?;
    log::info!("replaying {} events at {} WPM", events.len(), config.wpm);

    let mut decoder = Decoder::new(config)?;
    for event in events {
        decoder.on_event(event);
        if live {
            println!("{}", decoder.decoded_text());
        }
    }

    decoder.flush();
    println!("{}", decoder.decoded_text());
    Ok(())
}
