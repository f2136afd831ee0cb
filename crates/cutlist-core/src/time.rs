//! Nanosecond time helpers.
//!
//! Trim points are stored as integer nanoseconds so that a playlist written
//! to disk reads back bit-for-bit. Conversions to seconds only happen at the
//! edges: when building transcoder arguments and when showing values to a
//! person.

use crate::error::{CutlistError, Result};

/// Nanoseconds in one second.
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Nanoseconds in one millisecond.
pub const NANOS_PER_MILLI: u64 = 1_000_000;

/// Convert nanoseconds to seconds as f64.
#[inline]
pub fn ns_to_seconds_f64(ns: u64) -> f64 {
    ns as f64 / NANOS_PER_SECOND as f64
}

/// Render nanoseconds as an exact decimal number of seconds.
///
/// Always carries at least one fractional digit and never more than needed:
/// `2_000_000_000` is `"2.0"`, `1_040_000_000` is `"1.04"`.
pub fn format_seconds(ns: u64) -> String {
    let whole = ns / NANOS_PER_SECOND;
    let frac = ns % NANOS_PER_SECOND;
    if frac == 0 {
        return format!("{whole}.0");
    }
    let digits = format!("{frac:09}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Render nanoseconds as `hh:mm:ss.mmm` for listings.
pub fn format_timecode(ns: u64) -> String {
    let total_ms = ns / NANOS_PER_MILLI;
    let h = total_ms / 3_600_000;
    let m = (total_ms / 60_000) % 60;
    let s = (total_ms / 1000) % 60;
    let ms = total_ms % 1000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// Parse a human-entered position into nanoseconds.
///
/// Accepted forms:
/// - `1500000000ns` (raw nanoseconds)
/// - `1500ms`, `1.5ms`
/// - `1.5s` or bare `1.5` (seconds)
/// - `mm:ss(.fff)` and `hh:mm:ss(.fff)`
pub fn parse_position(input: &str) -> Result<u64> {
    let text = input.trim();
    if text.is_empty() {
        return Err(invalid(input, "empty position"));
    }

    if let Some(raw) = text.strip_suffix("ns") {
        return raw
            .parse::<u64>()
            .map_err(|_| invalid(input, "expected an integer number of nanoseconds"));
    }
    if let Some(ms) = text.strip_suffix("ms") {
        return parse_decimal(ms, NANOS_PER_MILLI).ok_or_else(|| invalid(input, "bad milliseconds"));
    }
    if text.contains(':') {
        return parse_clock(text).ok_or_else(|| invalid(input, "expected [hh:]mm:ss[.fff]"));
    }

    let secs = text.strip_suffix('s').unwrap_or(text);
    parse_decimal(secs, NANOS_PER_SECOND).ok_or_else(|| invalid(input, "bad seconds"))
}

fn invalid(input: &str, reason: &str) -> CutlistError {
    CutlistError::InvalidParameter(format!("cannot parse position '{input}': {reason}"))
}

/// Parse `[hh:]mm:ss[.fff]`.
fn parse_clock(text: &str) -> Option<u64> {
    let parts: Vec<&str> = text.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, s] => (0, parse_digits(m)?, *s),
        [h, m, s] => (parse_digits(h)?, parse_digits(m)?, *s),
        _ => return None,
    };
    if parts.len() == 3 && minutes >= 60 {
        return None;
    }
    let seconds_ns = parse_decimal(seconds, NANOS_PER_SECOND)?;
    if seconds_ns >= 60 * NANOS_PER_SECOND {
        return None;
    }
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_mul(NANOS_PER_SECOND)?
        .checked_add(seconds_ns)
}

fn parse_digits(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parse an unsigned decimal and scale it to nanoseconds, truncating below 1ns.
fn parse_decimal(text: &str, scale: u64) -> Option<u64> {
    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    let whole_value = if whole.is_empty() { 0 } else { parse_digits(whole)? };
    let mut total = u128::from(whole_value) * u128::from(scale);

    if !frac.is_empty() {
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Digits past nanosecond precision cannot change the result.
        let kept = &frac[..frac.len().min(18)];
        let numerator: u128 = kept.parse().ok()?;
        let denominator = 10u128.pow(kept.len() as u32);
        total += numerator * u128::from(scale) / denominator;
    }

    u64::try_from(total).ok()
}
