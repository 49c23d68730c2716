//! Timestamp parsing and duration formatting.
//!
//! Segment timestamps arrive as `MM:SS` or `HH:MM:SS` tokens joined by a
//! dash (`"01:10-01:40"`). Parsing is deliberately lenient: component
//! ranges are not checked and negative values are accepted. Duration
//! calculation never fails; bad input collapses to a fixed fallback.

/// Duration substituted when a range is empty or reversed.
pub const DURATION_FLOOR_SECS: i64 = 30;

/// Duration reported when either token cannot be parsed.
pub const FALLBACK_DURATION: &str = "00:30";

/// End token used when a timestamp range has no `-`.
pub const DEFAULT_END_TOKEN: &str = "00:30";

/// Parse a single `MM:SS` or `HH:MM:SS` token into total seconds.
///
/// Any other number of `:`-separated parts yields `Ok(0)`. Components are
/// trimmed and parsed as base-10 integers; a non-numeric component or an
/// overflowing sum is an error.
///
/// # Examples
/// ```
/// use shorts_models::timestamp::timestamp_to_seconds;
/// assert_eq!(timestamp_to_seconds("01:30").unwrap(), 90);
/// assert_eq!(timestamp_to_seconds("01:02:03").unwrap(), 3723);
/// assert_eq!(timestamp_to_seconds("bad").unwrap(), 0);
/// ```
pub fn timestamp_to_seconds(token: &str) -> Result<i64, TimestampError> {
    let parts: Vec<&str> = token.split(':').collect();
    let weights: &[i64] = match parts.len() {
        2 => &[60, 1],
        3 => &[3600, 60, 1],
        _ => return Ok(0),
    };

    let mut total: i64 = 0;
    for (part, weight) in parts.iter().zip(weights) {
        let value = parse_component(part)?;
        total = value
            .checked_mul(*weight)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(|| TimestampError::Overflow(token.to_string()))?;
    }
    Ok(total)
}

fn parse_component(part: &str) -> Result<i64, TimestampError> {
    let trimmed = part.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| TimestampError::InvalidValue(trimmed.to_string()))
}

/// Compute the `MM:SS` duration between two timestamp tokens.
///
/// Returns [`FALLBACK_DURATION`] if either token fails to parse, and clamps
/// zero or negative ranges to [`DURATION_FLOOR_SECS`].
///
/// # Examples
/// ```
/// use shorts_models::timestamp::calculate_duration;
/// assert_eq!(calculate_duration("00:10", "01:40"), "01:30");
/// assert_eq!(calculate_duration("02:00", "01:00"), "00:30");
/// assert_eq!(calculate_duration("aa:bb", "01:00"), "00:30");
/// ```
pub fn calculate_duration(start: &str, end: &str) -> String {
    let (start_secs, end_secs) = match (timestamp_to_seconds(start), timestamp_to_seconds(end)) {
        (Ok(s), Ok(e)) => (s, e),
        _ => return FALLBACK_DURATION.to_string(),
    };

    let delta = match end_secs.checked_sub(start_secs) {
        Some(d) if d > 0 => d,
        Some(_) => DURATION_FLOOR_SECS,
        None => return FALLBACK_DURATION.to_string(),
    };

    format_duration(delta)
}

/// Format a positive number of seconds as `MM:SS`.
///
/// The minutes field is not wrapped into hours; it simply widens.
pub fn format_duration(total_secs: i64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Split a range such as `"00:10-00:40"` on its first `-`.
///
/// Both tokens are trimmed. A range without a dash ends at
/// [`DEFAULT_END_TOKEN`].
pub fn split_range(range: &str) -> (&str, &str) {
    match range.split_once('-') {
        Some((start, end)) => (start.trim(), end.trim()),
        None => (range.trim(), DEFAULT_END_TOKEN),
    }
}

/// Duration of a full `start-end` range string.
pub fn range_duration(range: &str) -> String {
    let (start, end) = split_range(range);
    calculate_duration(start, end)
}

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// A component was not a base-10 integer
    InvalidValue(String),
    /// Total seconds did not fit in an `i64`
    Overflow(String),
}

impl std::fmt::Display for TimestampError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue(value) => write!(f, "Invalid timestamp component: '{}'", value),
            Self::Overflow(ts) => write!(f, "Timestamp '{}' is out of range", ts),
        }
    }
}

impl std::error::Error for TimestampError {}
