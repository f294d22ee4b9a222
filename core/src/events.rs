use crate::error::{CwError, Result};

/// One segmented keying interval, as delivered by an audio front end
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CwEvent {
    /// Key down for the given milliseconds
    Tone(f64),
    /// Key up for the given milliseconds
    Silence(f64),
}

impl CwEvent {
    pub fn duration_ms(&self) -> f64 {
        match *self {
            CwEvent::Tone(ms) | CwEvent::Silence(ms) => ms,
        }
    }

    pub fn is_tone(&self) -> bool {
        matches!(self, CwEvent::Tone(_))
    }

    /// Signed form: positive for tones, negative for silences
    pub fn to_signed_ms(&self) -> f64 {
        match *self {
            CwEvent::Tone(ms) => ms,
            CwEvent::Silence(ms) => -ms,
        }
    }
}

/// Parse a keying log: `+60 -60 +180 -180 ...`
///
/// Tokens are separated by whitespace or commas. Each token needs an explicit
/// sign, `+` for a tone and `-` for a silence, followed by a finite duration
/// in milliseconds. Lines starting with `#` are comments.
pub fn parse_events(input: &str) -> Result<Vec<CwEvent>> {
    let mut events = Vec::new();

    for line in input.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }

        for token in line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            events.push(parse_token(token)?);
        }
    }

    Ok(events)
}

fn parse_token(token: &str) -> Result<CwEvent> {
    let (is_tone, digits) = if let Some(rest) = token.strip_prefix('+') {
        (true, rest)
    } else if let Some(rest) = token.strip_prefix('-') {
        (false, rest)
    } else {
        return Err(CwError::InvalidEvent(format!(
            "{:?} needs a '+' (tone) or '-' (silence) prefix",
            token
        )));
    };

    let ms: f64 = digits
        .parse()
        .map_err(|_| CwError::InvalidEvent(format!("{:?} is not a duration", token)))?;

    if !ms.is_finite() || ms < 0.0 {
        return Err(CwError::InvalidEvent(format!(
            "{:?} is not a finite non-negative duration",
            token
        )));
    }

    Ok(if is_tone {
        CwEvent::Tone(ms)
    } else {
        CwEvent::Silence(ms)
    })
}

/// Render events in the form read by [`parse_events`]
pub fn format_events(events: &[CwEvent]) -> String {
    events
        .iter()
        .map(|event| {
            let ms = event.to_signed_ms();
            if event.is_tone() {
                format!("+{}", ms)
            } else {
                ms.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
