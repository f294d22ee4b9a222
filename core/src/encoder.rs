use crate::code_table::CodeTable;
use crate::config::CwConfig;
use crate::error::Result;
use crate::events::CwEvent;
use crate::timing::{compute_timing, ms_to_samples, TimingParameters};
use crate::translator::Translator;
use crate::ENVELOPE_MS;
use std::f64::consts::PI;
use std::sync::Arc;

/// Morse audio synthesizer
///
/// Text is translated to code and the code string is keyed token by token:
/// - `.` / `-`: tone of one dit / one dah, then one element gap
/// - ` `: extra silence topping the element gap up to a letter gap
/// - `/`: extra silence topping a letter gap up to a word gap
///
/// Tones are full-scale sine bursts with a linear 5 ms rise and fall.
pub struct Encoder {
    translator: Translator,
    wpm: u32,
    tone_frequency_hz: f32,
    sample_rate: u32,
    timing: TimingParameters,
}

impl Encoder {
    pub fn new(config: CwConfig) -> Result<Self> {
        Self::with_table(config, CodeTable::shared())
    }

    pub fn with_table(config: CwConfig, table: Arc<CodeTable>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            translator: Translator::new(table),
            wpm: config.wpm,
            tone_frequency_hz: config.tone_frequency_hz,
            sample_rate: config.sample_rate_hz,
            timing: compute_timing(config.wpm as f64)?,
        })
    }

    /// Synthesize text into mono samples in [-1.0, 1.0]
    ///
    /// Unsupported characters are dropped. The buffer is exactly the keyed
    /// runs back to back, without leading or trailing padding.
    pub fn synthesize(&self, text: &str) -> Vec<f32> {
        let code = self.translator.encode(text);
        let runs = self.element_runs(&code);

        let lengths: Vec<usize> = runs
            .iter()
            .map(|run| ms_to_samples(run.duration_ms(), self.sample_rate))
            .collect();
        let total: usize = lengths.iter().sum();

        let mut samples = vec![0.0f32; total];
        let mut offset = 0;
        for (run, &len) in runs.iter().zip(lengths.iter()) {
            if run.is_tone() {
                self.write_tone(&mut samples[offset..offset + len]);
            }
            offset += len;
        }

        log::debug!(
            "synthesized {:?} as {} samples ({} runs) at {} WPM",
            code,
            total,
            runs.len(),
            self.wpm
        );

        samples
    }

    /// Nominal keying of the text as decoder input, adjacent silences merged
    pub fn keying(&self, text: &str) -> Vec<CwEvent> {
        let code = self.translator.encode(text);
        let t = &self.timing;

        let mut events = Vec::new();
        let mut gap: Option<f64> = None;

        for token in code.chars() {
            match token {
                '.' | '-' => {
                    if let Some(ms) = gap.take() {
                        events.push(CwEvent::Silence(ms));
                    }
                    let ms = if token == '.' { t.dit_ms } else { t.dah_ms };
                    events.push(CwEvent::Tone(ms));
                    gap = Some(t.element_gap_ms);
                }
                // A full gap is used instead of summing the top-up so that
                // boundary durations stay exact
                ' ' => {
                    gap = Some(match gap {
                        Some(g) if g == t.element_gap_ms => t.letter_gap_ms,
                        Some(g) => g + (t.letter_gap_ms - t.element_gap_ms),
                        None => t.letter_gap_ms - t.element_gap_ms,
                    });
                }
                '/' => {
                    gap = Some(match gap {
                        Some(g) if g == t.letter_gap_ms => t.word_gap_ms,
                        Some(g) => g + (t.word_gap_ms - t.letter_gap_ms),
                        None => t.word_gap_ms - t.letter_gap_ms,
                    });
                }
                _ => {}
            }
        }

        if let Some(ms) = gap {
            events.push(CwEvent::Silence(ms));
        }
        events
    }

    /// Nominal transmission time of the text in milliseconds
    pub fn duration_ms(&self, text: &str) -> f64 {
        self.keying(text).iter().map(CwEvent::duration_ms).sum()
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    pub fn timing(&self) -> &TimingParameters {
        &self.timing
    }

    pub fn tone_frequency_hz(&self) -> f32 {
        self.tone_frequency_hz
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// One run per code token, unmerged, in keying order
    fn element_runs(&self, code: &str) -> Vec<CwEvent> {
        let t = &self.timing;
        let mut runs = Vec::with_capacity(code.len() * 2);

        for token in code.chars() {
            match token {
                '.' => {
                    runs.push(CwEvent::Tone(t.dit_ms));
                    runs.push(CwEvent::Silence(t.element_gap_ms));
                }
                '-' => {
                    runs.push(CwEvent::Tone(t.dah_ms));
                    runs.push(CwEvent::Silence(t.element_gap_ms));
                }
                ' ' => runs.push(CwEvent::Silence(t.letter_gap_ms - t.element_gap_ms)),
                '/' => runs.push(CwEvent::Silence(t.word_gap_ms - t.letter_gap_ms)),
                _ => {}
            }
        }
        runs
    }

    /// Fill `out` with a sine tone, shaped when it fits two envelope windows
    fn write_tone(&self, out: &mut [f32]) {
        let omega = 2.0 * PI * self.tone_frequency_hz as f64 / self.sample_rate as f64;
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = (omega * i as f64).sin() as f32;
        }

        let ramp_len = ms_to_samples(ENVELOPE_MS, self.sample_rate);
        let n = out.len();
        if ramp_len < 2 || n <= 2 * ramp_len {
            return;
        }

        // Ramps include both end points: 0 -> 1 and 1 -> 0
        let last = (ramp_len - 1) as f64;
        for i in 0..ramp_len {
            let rise = i as f64 / last;
            out[i] = (out[i] as f64 * rise) as f32;

            let j = n - ramp_len + i;
            out[j] = (out[j] as f64 * (1.0 - rise)) as f32;
        }
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(CwConfig::default()).unwrap()
    }
}
