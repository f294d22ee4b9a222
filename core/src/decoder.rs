use crate::code_table::{symbols_to_string, CodeTable, Symbol};
use crate::config::{validate_wpm, CwConfig};
use crate::error::Result;
use crate::events::CwEvent;
use crate::timing::{compute_timing, TimingParameters};
use crate::PLACEHOLDER;
use std::sync::Arc;

/// Mutable session state of one decoder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderState {
    current_symbols: Vec<Symbol>,
    current_word: String,
    decoded_words: Vec<String>,
}

impl DecoderState {
    /// No pending symbols and no word in progress
    pub fn is_idle(&self) -> bool {
        self.current_symbols.is_empty() && self.current_word.is_empty()
    }

    /// Symbols of the character still being keyed
    pub fn pending_symbols(&self) -> &[Symbol] {
        &self.current_symbols
    }

    /// Characters of the word still being keyed
    pub fn current_word(&self) -> &str {
        &self.current_word
    }

    /// Completed words, oldest first
    pub fn words(&self) -> &[String] {
        &self.decoded_words
    }
}

/// Streaming decoder for timed tone/silence events
///
/// Tones are split into dots and dashes at the midpoint between a dit and a
/// dah. Silences are classified in ascending half-open bands:
/// - below a letter gap: gap inside a character, ignored
/// - below a word gap: closes the pending character
/// - otherwise: closes the pending character and the word
///
/// Unknown symbol sequences decode to `?`; no event can fail.
///
/// A decoder is not synchronized. Use one instance per stream.
pub struct Decoder {
    table: Arc<CodeTable>,
    wpm: u32,
    tone_frequency_hz: f32,
    timing: TimingParameters,
    /// New speed waiting for the pending character to close
    pending_timing: Option<(u32, TimingParameters)>,
    state: DecoderState,
}

impl Decoder {
    pub fn new(config: CwConfig) -> Result<Self> {
        Self::with_table(config, CodeTable::shared())
    }

    pub fn with_table(config: CwConfig, table: Arc<CodeTable>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            table,
            wpm: config.wpm,
            tone_frequency_hz: config.tone_frequency_hz,
            timing: compute_timing(config.wpm as f64)?,
            pending_timing: None,
            state: DecoderState::default(),
        })
    }

    /// Classify a tone and append it to the pending character
    ///
    /// There is no upper bound: an arbitrarily long tone is still a dash.
    pub fn on_tone(&mut self, duration_ms: f64) {
        let symbol = if duration_ms < self.timing.dot_dash_threshold_ms() {
            Symbol::Dot
        } else {
            Symbol::Dash
        };
        self.state.current_symbols.push(symbol);
    }

    /// Classify a silence and close characters or words accordingly
    pub fn on_silence(&mut self, duration_ms: f64) {
        let letter_gap_ms = self.timing.letter_gap_ms;
        let word_gap_ms = self.timing.word_gap_ms;

        if duration_ms < letter_gap_ms {
            return;
        }

        self.close_character();
        if duration_ms >= word_gap_ms {
            self.close_word();
        }

        // The whole silence is classified before a deferred speed takes over
        self.apply_pending_timing();
    }

    pub fn on_event(&mut self, event: CwEvent) {
        match event {
            CwEvent::Tone(ms) => self.on_tone(ms),
            CwEvent::Silence(ms) => self.on_silence(ms),
        }
    }

    pub fn feed<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = CwEvent>,
    {
        for event in events {
            self.on_event(event);
        }
    }

    /// Close the pending character and word as if a word gap had elapsed
    pub fn flush(&mut self) {
        self.close_character();
        self.close_word();
        self.apply_pending_timing();
    }

    /// Text decoded so far
    ///
    /// Completed words, then the word in progress, then the raw dots and
    /// dashes of the unterminated character, joined with single spaces.
    pub fn decoded_text(&self) -> String {
        let pending = symbols_to_string(&self.state.current_symbols);
        let mut parts: Vec<&str> = self.state.decoded_words.iter().map(String::as_str).collect();

        if !self.state.current_word.is_empty() {
            parts.push(&self.state.current_word);
        }
        if !pending.is_empty() {
            parts.push(&pending);
        }

        parts.join(" ")
    }

    /// Drop all session state, keeping the speed
    pub fn reset(&mut self) {
        self.state = DecoderState::default();
        self.apply_pending_timing();
    }

    /// Change the expected speed
    ///
    /// Invalid speeds fail immediately. When a character is being keyed the
    /// new timing takes effect once that character closes, so its symbols
    /// are never classified against two different thresholds.
    pub fn set_wpm(&mut self, wpm: u32) -> Result<()> {
        validate_wpm(wpm)?;
        let timing = compute_timing(wpm as f64)?;

        if self.state.current_symbols.is_empty() {
            self.pending_timing = None;
            self.apply_timing(wpm, timing);
        } else {
            log::debug!("deferring {} WPM until the pending character closes", wpm);
            self.pending_timing = Some((wpm, timing));
        }
        Ok(())
    }

    /// Speed currently used for classification
    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    pub fn timing(&self) -> &TimingParameters {
        &self.timing
    }

    pub fn tone_frequency_hz(&self) -> f32 {
        self.tone_frequency_hz
    }

    pub fn state(&self) -> &DecoderState {
        &self.state
    }

    fn close_character(&mut self) {
        if self.state.current_symbols.is_empty() {
            return;
        }

        let c = self
            .table
            .char_for(&self.state.current_symbols)
            .unwrap_or_else(|| {
                log::debug!(
                    "unrecognized symbols {}",
                    symbols_to_string(&self.state.current_symbols)
                );
                PLACEHOLDER
            });
        self.state.current_word.push(c);
        self.state.current_symbols.clear();
    }

    fn close_word(&mut self) {
        if self.state.current_word.is_empty() {
            return;
        }
        let word = std::mem::take(&mut self.state.current_word);
        self.state.decoded_words.push(word);
    }

    fn apply_pending_timing(&mut self) {
        if self.state.current_symbols.is_empty() {
            if let Some((wpm, timing)) = self.pending_timing.take() {
                self.apply_timing(wpm, timing);
            }
        }
    }

    fn apply_timing(&mut self, wpm: u32, timing: TimingParameters) {
        log::debug!("decoder now at {} WPM (dit {:.1} ms)", wpm, timing.dit_ms);
        self.wpm = wpm;
        self.timing = timing;
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(CwConfig::default()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder_at(wpm: u32) -> Decoder {
        Decoder::new(CwConfig::with_wpm(wpm)).unwrap()
    }

    /// Key one character at 20 WPM: dit 60, dah 180, element gap 60
    fn key(decoder: &mut Decoder, code: &str) {
        for (i, c) in code.chars().enumerate() {
            if i > 0 {
                decoder.on_silence(60.0);
            }
            decoder.on_tone(if c == '.' { 60.0 } else { 180.0 });
        }
    }

    #[test]
    fn test_decoder_creation() {
        assert!(Decoder::new(CwConfig::default()).is_ok());
        assert!(Decoder::new(CwConfig::with_wpm(0)).is_err());
    }

    #[test]
    fn test_tone_classification() {
        let mut decoder = decoder_at(20);
        decoder.on_tone(60.0);
        decoder.on_tone(119.9);
        decoder.on_tone(180.0);
        assert_eq!(
            decoder.state().pending_symbols(),
            &[Symbol::Dot, Symbol::Dot, Symbol::Dash]
        );
    }

    #[test]
    fn test_threshold_tone_is_dash() {
        let mut decoder = decoder_at(20);
        decoder.on_tone(120.0);
        assert_eq!(decoder.state().pending_symbols(), &[Symbol::Dash]);
    }

    #[test]
    fn test_very_long_tone_is_dash() {
        let mut decoder = decoder_at(20);
        decoder.on_tone(10_000.0);
        assert_eq!(decoder.state().pending_symbols(), &[Symbol::Dash]);
    }

    #[test]
    fn test_short_silence_is_absorbed() {
        let mut decoder = decoder_at(20);
        decoder.on_tone(60.0);
        decoder.on_silence(179.9);
        decoder.on_tone(60.0);
        assert_eq!(decoder.state().pending_symbols().len(), 2);
        assert_eq!(decoder.decoded_text(), "..");
    }

    #[test]
    fn test_letter_gap_closes_character() {
        let mut decoder = decoder_at(20);
        key(&mut decoder, "...");
        decoder.on_silence(180.0);
        assert_eq!(decoder.state().current_word(), "S");
        assert!(decoder.state().pending_symbols().is_empty());
        assert!(decoder.state().words().is_empty());
    }

    #[test]
    fn test_word_gap_closes_word() {
        let mut decoder = decoder_at(20);
        key(&mut decoder, "..");
        decoder.on_silence(420.0);
        assert_eq!(decoder.state().words(), &["I".to_string()]);
        assert!(decoder.state().is_idle());
    }

    #[test]
    fn test_just_below_word_gap_is_letter_gap() {
        let mut decoder = decoder_at(20);
        key(&mut decoder, "..");
        decoder.on_silence(419.9);
        assert!(decoder.state().words().is_empty());
        assert_eq!(decoder.state().current_word(), "I");
    }

    #[test]
    fn test_sos() {
        let mut decoder = decoder_at(20);
        key(&mut decoder, "...");
        decoder.on_silence(180.0);
        key(&mut decoder, "---");
        decoder.on_silence(180.0);
        key(&mut decoder, "...");
        decoder.on_silence(420.0);
        assert_eq!(decoder.decoded_text(), "SOS");
    }

    #[test]
    fn test_unknown_sequence_is_placeholder() {
        let mut decoder = decoder_at(20);
        key(&mut decoder, "......");
        decoder.on_silence(180.0);
        assert_eq!(decoder.decoded_text(), "?");
    }

    #[test]
    fn test_word_gap_uses_placeholder_too() {
        let mut decoder = decoder_at(20);
        key(&mut decoder, "......");
        decoder.on_silence(1000.0);
        assert_eq!(decoder.state().words(), &["?".to_string()]);
    }

    #[test]
    fn test_partial_text_shows_pending_symbols() {
        let mut decoder = decoder_at(20);
        key(&mut decoder, "....");
        decoder.on_silence(180.0);
        key(&mut decoder, "..");
        decoder.on_silence(420.0);
        key(&mut decoder, "-");
        decoder.on_silence(180.0);
        key(&mut decoder, ".-");
        assert_eq!(decoder.decoded_text(), "HI T .-");
    }

    #[test]
    fn test_decoded_text_is_read_only() {
        let mut decoder = decoder_at(20);
        key(&mut decoder, ".-");
        let before = decoder.state().clone();
        let _ = decoder.decoded_text();
        let _ = decoder.decoded_text();
        assert_eq!(decoder.state(), &before);
    }

    #[test]
    fn test_silence_without_symbols_changes_nothing() {
        let mut decoder = decoder_at(20);
        decoder.on_silence(180.0);
        decoder.on_silence(5000.0);
        assert!(decoder.state().is_idle());
        assert_eq!(decoder.decoded_text(), "");
    }

    #[test]
    fn test_flush_and_reset() {
        let mut decoder = decoder_at(20);
        key(&mut decoder, "-.-");
        decoder.flush();
        assert_eq!(decoder.decoded_text(), "K");
        decoder.reset();
        assert_eq!(decoder.decoded_text(), "");
        assert_eq!(decoder.wpm(), 20);
    }

    #[test]
    fn test_feed_events() {
        let mut decoder = decoder_at(20);
        decoder.feed(vec![
            CwEvent::Tone(180.0),
            CwEvent::Silence(60.0),
            CwEvent::Tone(60.0),
            CwEvent::Silence(420.0),
        ]);
        assert_eq!(decoder.decoded_text(), "N");
    }

    #[test]
    fn test_set_wpm_when_idle_applies_immediately() {
        let mut decoder = decoder_at(20);
        decoder.set_wpm(10).unwrap();
        assert_eq!(decoder.wpm(), 10);
        assert_eq!(decoder.timing().dit_ms, 120.0);
    }

    #[test]
    fn test_set_wpm_defers_until_character_closes() {
        let mut decoder = decoder_at(20);
        decoder.on_tone(60.0);
        decoder.set_wpm(10).unwrap();
        assert_eq!(decoder.wpm(), 20);

        // Still classified against 20 WPM: 180 ms is a dash, 180 ms closes
        decoder.on_silence(60.0);
        decoder.on_tone(180.0);
        decoder.on_silence(180.0);
        assert_eq!(decoder.state().current_word(), "A");
        assert_eq!(decoder.wpm(), 10);

        // At 10 WPM the threshold is 240 ms
        decoder.on_tone(180.0);
        assert_eq!(decoder.state().pending_symbols(), &[Symbol::Dot]);
    }

    #[test]
    fn test_deferred_speed_keeps_word_gap_of_old_speed() {
        let mut decoder = decoder_at(20);
        decoder.on_tone(60.0);
        decoder.set_wpm(10).unwrap();
        decoder.on_silence(60.0);
        decoder.on_tone(60.0);

        // A 20 WPM word gap, although 10 WPM would only call it a letter gap
        decoder.on_silence(420.0);
        assert_eq!(decoder.state().words(), &["I".to_string()]);
        assert!(decoder.state().current_word().is_empty());
        assert_eq!(decoder.wpm(), 10);
    }

    #[test]
    fn test_deferred_speed_keeps_letter_gap_of_old_speed() {
        let mut decoder = decoder_at(10);
        decoder.on_tone(120.0);
        decoder.set_wpm(40).unwrap();

        // A 10 WPM letter gap, although 40 WPM would call it a word gap
        decoder.on_silence(360.0);
        assert!(decoder.state().words().is_empty());
        assert_eq!(decoder.state().current_word(), "E");
        assert_eq!(decoder.wpm(), 40);
    }

    #[test]
    fn test_set_wpm_rejects_zero() {
        let mut decoder = decoder_at(20);
        assert!(decoder.set_wpm(0).is_err());
        assert_eq!(decoder.wpm(), 20);
    }
}
