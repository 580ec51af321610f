//! Duration values in the `[d.]hh:mm[:ss[.fffffff]]` text form.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const NANOS_PER_TICK: u32 = 100;
const MAX_FRACTION_DIGITS: usize = 7;

/// A non-negative duration parsed from `[d.]hh:mm[:ss[.fffffff]]` or a bare day count.
///
/// Examples: `"1.00:00:00"` (one day), `"00:05:00"` (five minutes), `"00:00:01.5"`,
/// `"30"` (thirty days).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeSpan(Duration);

/// Failure to parse a [`TimeSpan`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid duration '{input}': {reason}")]
pub struct TimeSpanParseError {
    input: String,
    reason: &'static str,
}

impl TimeSpan {
    pub const fn new(duration: Duration) -> Self {
        Self(duration)
    }

    pub const fn as_duration(&self) -> Duration {
        self.0
    }
}

impl From<Duration> for TimeSpan {
    fn from(d: Duration) -> Self {
        Self(d)
    }
}

impl From<TimeSpan> for Duration {
    fn from(t: TimeSpan) -> Self {
        t.0
    }
}

impl FromStr for TimeSpan {
    type Err = TimeSpanParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| TimeSpanParseError {
            input: s.to_string(),
            reason,
        };
        let text = s.trim();
        if text.is_empty() {
            return Err(err("empty"));
        }

        if !text.contains(':') {
            let days = parse_component(text, u64::MAX).ok_or_else(|| err("expected a day count"))?;
            let secs = days
                .checked_mul(86_400)
                .ok_or_else(|| err("out of range"))?;
            return Ok(Self(Duration::from_secs(secs)));
        }

        let mut parts = text.split(':');
        let head = parts.next().unwrap_or_default();
        let (days, hours) = match head.split_once('.') {
            Some((d, h)) => (
                parse_component(d, u64::MAX).ok_or_else(|| err("invalid days"))?,
                parse_component(h, 23).ok_or_else(|| err("hours must be 0-23"))?,
            ),
            None => (0, parse_component(head, 23).ok_or_else(|| err("hours must be 0-23"))?),
        };

        let minutes = parts
            .next()
            .and_then(|m| parse_component(m, 59))
            .ok_or_else(|| err("minutes must be 0-59"))?;

        let (seconds, nanos) = match parts.next() {
            None => (0, 0),
            Some(sec) => {
                let (whole, fraction) = match sec.split_once('.') {
                    Some((w, f)) => (w, Some(f)),
                    None => (sec, None),
                };
                let seconds = parse_component(whole, 59).ok_or_else(|| err("seconds must be 0-59"))?;
                let nanos = match fraction {
                    None => 0,
                    Some(f) => parse_fraction(f).ok_or_else(|| err("invalid fraction"))?,
                };
                (seconds, nanos)
            }
        };

        if parts.next().is_some() {
            return Err(err("too many components"));
        }

        let secs = days
            .checked_mul(86_400)
            .and_then(|d| d.checked_add(hours * 3_600 + minutes * 60 + seconds))
            .ok_or_else(|| err("out of range"))?;

        Ok(Self(Duration::new(secs, nanos)))
    }
}

fn parse_component(text: &str, max: u64) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u64>().ok().filter(|v| *v <= max)
}

fn parse_fraction(text: &str) -> Option<u32> {
    if text.is_empty() || text.len() > MAX_FRACTION_DIGITS || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{:0<width$}", text, width = MAX_FRACTION_DIGITS);
    padded.parse::<u32>().ok().map(|ticks| ticks * NANOS_PER_TICK)
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.as_secs();
        let days = total / 86_400;
        let hours = (total % 86_400) / 3_600;
        let minutes = (total % 3_600) / 60;
        let seconds = total % 60;

        if days > 0 {
            write!(f, "{}.", days)?;
        }
        write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)?;

        let ticks = self.0.subsec_nanos() / NANOS_PER_TICK;
        if ticks > 0 {
            write!(f, ".{:07}", ticks)?;
        }
        Ok(())
    }
}

impl Serialize for TimeSpan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSpan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
