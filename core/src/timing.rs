use crate::error::{CwError, Result};

/// Element durations for one speed, in milliseconds
///
/// PARIS standard: the reference word is 50 dit units long, so one dit lasts
/// `1200 / wpm` ms. Every other duration is a fixed multiple of the dit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingParameters {
    pub dit_ms: f64,
    pub dah_ms: f64,
    /// Silence between elements of one character
    pub element_gap_ms: f64,
    /// Silence between characters
    pub letter_gap_ms: f64,
    /// Silence between words
    pub word_gap_ms: f64,
}

/// Derive timing from a speed in words per minute
///
/// The dit is computed first and the other durations are scaled from it.
pub fn compute_timing(wpm: f64) -> Result<TimingParameters> {
    if !wpm.is_finite() || wpm <= 0.0 {
        return Err(CwError::InvalidConfig(format!(
            "WPM must be positive, got {}",
            wpm
        )));
    }

    let dit_ms = 1200.0 / wpm;

    Ok(TimingParameters {
        dit_ms,
        dah_ms: dit_ms * 3.0,
        element_gap_ms: dit_ms,
        letter_gap_ms: dit_ms * 3.0,
        word_gap_ms: dit_ms * 7.0,
    })
}

impl TimingParameters {
    /// Tones shorter than this are dots, anything else is a dash
    pub fn dot_dash_threshold_ms(&self) -> f64 {
        (self.dit_ms + self.dah_ms) / 2.0
    }
}

/// Number of whole samples covering `ms` milliseconds (truncated)
pub fn ms_to_samples(ms: f64, sample_rate: u32) -> usize {
    if ms <= 0.0 {
        return 0;
    }
    (ms * sample_rate as f64 / 1000.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_at_20_wpm() {
        let timing = compute_timing(20.0).unwrap();
        assert_eq!(timing.dit_ms, 60.0);
        assert_eq!(timing.dah_ms, 180.0);
        assert_eq!(timing.element_gap_ms, 60.0);
        assert_eq!(timing.letter_gap_ms, 180.0);
        assert_eq!(timing.word_gap_ms, 420.0);
        assert_eq!(timing.dot_dash_threshold_ms(), 120.0);
    }

    #[test]
    fn test_timing_ratios_hold_across_speeds() {
        for wpm in 1..=60 {
            let timing = compute_timing(wpm as f64).unwrap();
            assert_eq!(timing.dit_ms, 1200.0 / wpm as f64);
            assert_eq!(timing.dah_ms, 3.0 * timing.dit_ms);
            assert_eq!(timing.element_gap_ms, timing.dit_ms);
            assert_eq!(timing.letter_gap_ms, 3.0 * timing.dit_ms);
            assert_eq!(timing.word_gap_ms, 7.0 * timing.dit_ms);
        }
    }

    #[test]
    fn test_fractional_wpm() {
        let timing = compute_timing(12.5).unwrap();
        assert_eq!(timing.dit_ms, 96.0);
    }

    #[test]
    fn test_non_positive_wpm_rejected() {
        assert!(compute_timing(0.0).is_err());
        assert!(compute_timing(-5.0).is_err());
        assert!(compute_timing(f64::NAN).is_err());
        assert!(compute_timing(f64::INFINITY).is_err());
    }

    #[test]
    fn test_ms_to_samples() {
        assert_eq!(ms_to_samples(60.0, 44100), 2646);
        assert_eq!(ms_to_samples(5.0, 44100), 220);
        assert_eq!(ms_to_samples(1000.0, 8000), 8000);
        assert_eq!(ms_to_samples(0.0, 44100), 0);
        assert_eq!(ms_to_samples(-3.0, 44100), 0);
    }
}
