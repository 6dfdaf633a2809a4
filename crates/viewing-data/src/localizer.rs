//! Re-expresses loaded records in the viewer's timezone.
//!
//! The UTC start instant is converted before the date and weekday are taken,
//! so a late-evening session west of Greenwich lands on the local day.

use chrono::Datelike;
use tracing::debug;

use viewing_core::error::{Result, ViewingError};
use viewing_core::models::{LoadedRecord, LocalizedRecord};
use viewing_core::time_utils::{format_hour_bucket, hour_bucket, parse_duration, TimezoneHandler};

/// Localize every record into `tz_name`.
///
/// Fails with [`ViewingError::InvalidTimezone`] before touching any record
/// when the zone is unknown.
pub fn localize_records(records: &[LoadedRecord], tz_name: &str) -> Result<Vec<LocalizedRecord>> {
    let handler = TimezoneHandler::new(tz_name)?;
    let localized = records
        .iter()
        .map(|record| localize_record(&handler, record))
        .collect::<Result<Vec<_>>>()?;
    debug!(
        "Localized {} records into {}",
        localized.len(),
        handler.name()
    );
    Ok(localized)
}

/// Localize a single record.
pub fn localize_record(handler: &TimezoneHandler, record: &LoadedRecord) -> Result<LocalizedRecord> {
    let start = handler.parse_timestamp(&record.start_time)?;
    let local = handler.localize(start);
    let hour = hour_bucket(&local);

    let duration = parse_duration(&record.duration).map_err(|_| {
        ViewingError::InvalidDuration(format!(
            "{} (session started {})",
            record.duration, record.start_time
        ))
    })?;

    Ok(LocalizedRecord {
        profile_name: record.profile_name.clone(),
        start_time: format_hour_bucket(&hour),
        hour,
        duration,
        day: local.weekday(),
        date: local.date_naive(),
        title: record.title.clone(),
        device_type: record.device_type.clone(),
        country: record.country.clone(),
    })
}
