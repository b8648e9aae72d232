//! Parsing and formatting of `HH:MM:SS` durations.

use crate::error::TimerError;

/// Parse a custom duration entered as `HH:MM:SS` into total seconds.
///
/// Segments are non-negative integers of any width. The total must be
/// positive.
pub fn parse_custom_duration(input: &str) -> Result<u64, TimerError> {
    let parts: Vec<&str> = input.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(TimerError::invalid("Invalid time format"));
    }

    let mut values = [0u64; 3];
    for (slot, part) in values.iter_mut().zip(&parts) {
        let part = part.trim();
        *slot = part
            .parse::<u64>()
            .map_err(|_| TimerError::invalid(format!("Invalid number: {}", part)))?;
    }

    let [hours, minutes, seconds] = values;
    let total = hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(seconds))
        .ok_or_else(|| TimerError::invalid("Time is too large"))?;

    if total == 0 {
        return Err(TimerError::invalid("Time must be greater than zero"));
    }
    Ok(total)
}

pub fn split_hms(total_seconds: u64) -> (u64, u64, u64) {
    let hours = total_seconds / 3600;
    let remainder = total_seconds % 3600;
    (hours, remainder / 60, remainder % 60)
}

pub fn format_hms(total_seconds: u64) -> String {
    let (hours, minutes, seconds) = split_hms(total_seconds);
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Insert colons into digit-only entry text, e.g. `"000130"` -> `"00:01:30"`.
///
/// Existing colons are discarded first, so re-formatting is stable.
pub fn auto_format_entry(entry: &str) -> String {
    let digits: Vec<char> = entry.chars().filter(|c| *c != ':').collect();
    let mut formatted = String::with_capacity(digits.len() + 2);
    for (i, c) in digits.iter().enumerate() {
        if i == 2 || i == 4 {
            formatted.push(':');
        }
        formatted.push(*c);
    }
    formatted
}
