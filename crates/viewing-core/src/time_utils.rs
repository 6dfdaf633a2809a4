use chrono::{DateTime, Duration, NaiveDateTime, TimeZone as _, Timelike, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::error::{Result, ViewingError};

/// Format of the localized hour bucket that replaces the raw start time.
pub const HOUR_BUCKET_FORMAT: &str = "%Y-%m-%d, %H:00:00";

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Reads the zone through the `iana-time-zone` crate without spawning a process.
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Converts UTC export timestamps into one target timezone.
#[derive(Debug, Clone, Copy)]
pub struct TimezoneHandler {
    tz: Tz,
}

impl TimezoneHandler {
    /// Create a handler for `tz_name`.
    ///
    /// Fails with [`ViewingError::InvalidTimezone`] when the name is not a
    /// recognised IANA zone.
    pub fn new(tz_name: &str) -> Result<Self> {
        let tz = tz_name
            .trim()
            .parse::<Tz>()
            .map_err(|_| ViewingError::InvalidTimezone(tz_name.to_string()))?;
        Ok(Self { tz })
    }

    /// Validate that `tz_name` is a recognised IANA timezone identifier.
    pub fn validate_timezone(tz_name: &str) -> bool {
        tz_name.trim().parse::<Tz>().is_ok()
    }

    /// Parse an export timestamp as UTC.
    ///
    /// Naive forms (`"2023-01-05 21:14:03"`, ISO `T` separator, optional
    /// fractional seconds) are taken to be UTC already. RFC 3339 strings with
    /// an explicit offset or `Z` suffix are normalised to UTC.
    pub fn parse_timestamp(&self, s: &str) -> Result<DateTime<Utc>> {
        parse_utc_timestamp(s)
    }

    /// Attach the handler's zone to a UTC instant.
    pub fn localize(&self, dt: DateTime<Utc>) -> DateTime<Tz> {
        dt.with_timezone(&self.tz)
    }

    /// Expose the configured timezone.
    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// IANA name of the configured timezone.
    pub fn name(&self) -> &'static str {
        self.tz.name()
    }
}

/// Parse a timestamp string into a UTC [`DateTime`], treating naive input as UTC.
pub fn parse_utc_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ViewingError::TimestampParse(s.to_string()));
    }

    // Replace trailing 'Z' with '+00:00'.
    let normalised = if let Some(stripped) = trimmed.strip_suffix('Z') {
        format!("{}+00:00", stripped)
    } else {
        trimmed.to_string()
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Ok(dt.with_timezone(&Utc));
    }

    const FMTS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FMTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    warn!("could not parse timestamp \"{}\"", s);
    Err(ViewingError::TimestampParse(s.to_string()))
}

// ── Hour buckets ──────────────────────────────────────────────────────────────

/// Truncate a local instant to the start of its hour, dropping the zone.
pub fn hour_bucket(local: &DateTime<Tz>) -> NaiveDateTime {
    let naive = local.naive_local();
    naive
        .with_minute(0)
        .and_then(|n| n.with_second(0))
        .and_then(|n| n.with_nanosecond(0))
        .unwrap_or(naive)
}

/// Render an hour bucket as `"YYYY-MM-DD, HH:00:00"`.
pub fn format_hour_bucket(bucket: &NaiveDateTime) -> String {
    bucket.format(HOUR_BUCKET_FORMAT).to_string()
}

// ── Durations ─────────────────────────────────────────────────────────────────

/// Split an `H:MM:SS` string into its three numeric parts.
///
/// Minutes and seconds must be below 60. Hours are range-checked when
/// [`parse_duration`] builds the [`Duration`].
fn split_duration(s: &str) -> Result<(i64, i64, i64)> {
    let invalid = || ViewingError::InvalidDuration(s.to_string());
    let parts: Vec<&str> = s.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }
    let mut numbers = [0i64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        *slot = part.parse::<i64>().map_err(|_| invalid())?;
    }
    let [hours, minutes, seconds] = numbers;
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }
    Ok((hours, minutes, seconds))
}

/// Whole minutes in an `H:MM:SS` duration, `hours * 60 + minutes`.
///
/// Seconds are ignored; the result only feeds the minimum-watch threshold.
pub fn duration_minutes(s: &str) -> Result<i64> {
    Ok(parse_duration(s)?.num_minutes())
}

/// Parse an `H:MM:SS` duration into a [`Duration`].
pub fn parse_duration(s: &str) -> Result<Duration> {
    let (hours, minutes, seconds) = split_duration(s)?;
    Duration::try_hours(hours)
        .zip(Duration::try_minutes(minutes))
        .zip(Duration::try_seconds(seconds))
        .and_then(|((h, m), sec)| h.checked_add(&m)?.checked_add(&sec))
        .ok_or_else(|| ViewingError::InvalidDuration(s.to_string()))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
