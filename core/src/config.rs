use crate::error::{CwError, Result};
use crate::{
    DEFAULT_SAMPLE_RATE, DEFAULT_TONE_FREQUENCY_HZ, DEFAULT_WPM, MAX_RECOMMENDED_WPM,
    MIN_RECOMMENDED_WPM,
};

/// Settings shared by the decoder and the encoder
///
/// `sample_rate_hz` is only used by the encoder. The decoder keeps the tone
/// frequency for the audio front end that feeds it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CwConfig {
    /// Transmission speed in words per minute (PARIS timing)
    pub wpm: u32,
    /// Sidetone frequency in Hz
    pub tone_frequency_hz: f32,
    /// Output sample rate in Hz
    pub sample_rate_hz: u32,
}

impl Default for CwConfig {
    fn default() -> Self {
        Self {
            wpm: DEFAULT_WPM,
            tone_frequency_hz: DEFAULT_TONE_FREQUENCY_HZ,
            sample_rate_hz: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl CwConfig {
    pub fn with_wpm(wpm: u32) -> Self {
        Self {
            wpm,
            ..Self::default()
        }
    }

    /// Reject values no codec instance can run with
    ///
    /// Speeds outside the recommended range are accepted with a warning.
    pub fn validate(&self) -> Result<()> {
        validate_wpm(self.wpm)?;

        if self.sample_rate_hz == 0 {
            return Err(CwError::InvalidConfig(
                "sample rate must be positive".to_string(),
            ));
        }

        if !self.tone_frequency_hz.is_finite() || self.tone_frequency_hz <= 0.0 {
            return Err(CwError::InvalidConfig(format!(
                "tone frequency must be positive, got {}",
                self.tone_frequency_hz
            )));
        }

        let nyquist = self.sample_rate_hz as f32 / 2.0;
        if self.tone_frequency_hz >= nyquist {
            log::warn!(
                "tone frequency {} Hz is at or above Nyquist ({} Hz), output will alias",
                self.tone_frequency_hz,
                nyquist
            );
        }

        Ok(())
    }
}

pub(crate) fn validate_wpm(wpm: u32) -> Result<()> {
    if wpm == 0 {
        return Err(CwError::InvalidConfig("WPM must be positive".to_string()));
    }
    if !(MIN_RECOMMENDED_WPM..=MAX_RECOMMENDED_WPM).contains(&wpm) {
        log::warn!(
            "{} WPM is outside the recommended {}-{} range",
            wpm,
            MIN_RECOMMENDED_WPM,
            MAX_RECOMMENDED_WPM
        );
    }
    Ok(())
}
