//! ISO-8601 durations as used by late-submission periods (`P1D`,
//! `PT36H`, `P1W2DT3H`, ...).

use std::sync::LazyLock;

use chrono::Duration;
use regex::{Captures, Regex};
use thiserror::Error;

/// Seconds in one day.
const DAY: f64 = 86_400.0;

/// `[+-]P[nY][nM][nW][nD][T[nH][nM][nS]]`, any component with a fraction.
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?<sign>[+-])?P",
        r"(?:(?<y>\d+(?:[.,]\d+)?)Y)?",
        r"(?:(?<mo>\d+(?:[.,]\d+)?)M)?",
        r"(?:(?<w>\d+(?:[.,]\d+)?)W)?",
        r"(?:(?<d>\d+(?:[.,]\d+)?)D)?",
        r"(?<time>T",
        r"(?:(?<h>\d+(?:[.,]\d+)?)H)?",
        r"(?:(?<mi>\d+(?:[.,]\d+)?)M)?",
        r"(?:(?<s>\d+(?:[.,]\d+)?)S)?",
        r")?$",
    ))
    .expect("duration pattern is valid")
});

/// Seconds in a year, month, week and day, keyed by capture group.
const DATE_UNITS: [(&str, f64); 4] = [
    ("y", 365.0 * DAY),
    ("mo", 30.0 * DAY),
    ("w", 7.0 * DAY),
    ("d", DAY),
];

/// Seconds in an hour, minute and second, keyed by capture group.
const TIME_UNITS: [(&str, f64); 3] = [("h", 3_600.0), ("mi", 60.0), ("s", 1.0)];

/// Errors raised while reading a duration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    /// Not an ISO-8601 duration.
    #[error("`{input}` is not an ISO-8601 duration")]
    Malformed {
        /// The rejected text.
        input: String,
    },
    /// Too large to represent.
    #[error("`{input}` is out of range")]
    OutOfRange {
        /// The rejected text.
        input: String,
    },
    /// A negative duration where only non-negative ones make sense.
    #[error("`{input}` is negative")]
    Negative {
        /// The rejected text.
        input: String,
    },
}

/// Parses an ISO-8601 duration. Years count as 365 days, months as 30.
pub fn parse_iso8601_duration(input: &str) -> Result<Duration, DurationError> {
    let text = input.trim();
    let malformed = || DurationError::Malformed {
        input: input.to_owned(),
    };

    let caps = DURATION_RE.captures(text).ok_or_else(malformed)?;
    let component = |name: &str| -> Option<f64> {
        caps.name(name)
            .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
    };

    let has_time = TIME_UNITS.iter().any(|(name, _)| matched(&caps, name));
    if caps.name("time").is_some() && !has_time {
        return Err(malformed());
    }
    if !has_time && !DATE_UNITS.iter().any(|(name, _)| matched(&caps, name)) {
        return Err(malformed());
    }

    let mut seconds: f64 = DATE_UNITS
        .iter()
        .chain(TIME_UNITS.iter())
        .filter_map(|(name, unit)| component(name).map(|v| v * unit))
        .sum();
    if caps.name("sign").is_some_and(|s| s.as_str() == "-") {
        seconds = -seconds;
    }

    let millis = (seconds * 1_000.0).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return Err(DurationError::OutOfRange {
            input: input.to_owned(),
        });
    }
    Duration::try_milliseconds(millis as i64).ok_or_else(|| DurationError::OutOfRange {
        input: input.to_owned(),
    })
}

/// Parses a duration that must not be negative.
pub fn parse_non_negative(input: &str) -> Result<Duration, DurationError> {
    let duration = parse_iso8601_duration(input)?;
    if duration < Duration::zero() {
        return Err(DurationError::Negative {
            input: input.to_owned(),
        });
    }
    Ok(duration)
}

/// Whether the named group took part in the match.
fn matched(caps: &Captures<'_>, name: &str) -> bool {
    caps.name(name).is_some()
}
