//! CSV loading for Netflix viewing activity exports.
//!
//! Reads `ViewingActivity.csv`, keeps only primary playback sessions of at
//! least [`MIN_WATCH_MINUTES`] and returns them as [`LoadedRecord`]s with the
//! bookkeeping columns dropped.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde::Deserialize;
use tracing::{debug, info, warn};

use viewing_core::error::{Result, ViewingError};
use viewing_core::models::LoadedRecord;
use viewing_core::time_utils::duration_minutes;

/// File name Netflix uses for the viewing history inside an export.
pub const EXPORT_FILE_NAME: &str = "ViewingActivity.csv";

/// Sessions shorter than this many whole minutes are dropped.
pub const MIN_WATCH_MINUTES: i64 = 5;

/// Columns every export must carry.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "Profile Name",
    "Start Time",
    "Duration",
    "Attributes",
    "Title",
    "Supplemental Video Type",
    "Device Type",
    "Bookmark",
    "Latest Bookmark",
    "Country",
];

// ── Public types ──────────────────────────────────────────────────────────────

/// Row counts gathered while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows_read: usize,
    pub supplemental_dropped: usize,
    pub short_dropped: usize,
    pub kept: usize,
}

/// Output of the loader.
#[derive(Debug, Clone)]
pub struct LoadedExport {
    pub records: Vec<LoadedRecord>,
    pub stats: LoadStats,
}

/// The subset of export columns the pipeline keeps.
#[derive(Debug, Deserialize)]
struct ExportRow {
    #[serde(rename = "Profile Name")]
    profile_name: String,
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "Duration")]
    duration: String,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Supplemental Video Type")]
    supplemental_video_type: Option<String>,
    #[serde(rename = "Device Type")]
    device_type: String,
    #[serde(rename = "Country")]
    country: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load an export from disk.
pub fn load_from_path(path: &Path) -> Result<LoadedExport> {
    let file = File::open(path).map_err(|source| ViewingError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let export = load_from_reader(file)?;
    info!(
        "Loaded {} viewing sessions from {}",
        export.stats.kept,
        path.display()
    );
    Ok(export)
}

/// Load an export from any reader, e.g. an uploaded file handle.
pub fn load_from_reader<R: Read>(reader: R) -> Result<LoadedExport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = normalise_headers(csv_reader.headers()?);
    check_required_columns(&headers)?;

    let mut stats = LoadStats::default();
    let mut records = Vec::new();
    let mut raw = StringRecord::new();

    while csv_reader.read_record(&mut raw).map_err(record_error)? {
        stats.rows_read += 1;
        let line = raw.position().map(|p| p.line()).unwrap_or(0);

        let row: ExportRow =
            raw.deserialize(Some(&headers))
                .map_err(|err| ViewingError::MalformedRow {
                    line,
                    reason: err.to_string(),
                })?;

        if is_present(row.supplemental_video_type.as_deref()) {
            stats.supplemental_dropped += 1;
            continue;
        }

        let minutes = duration_minutes(&row.duration).map_err(|_| ViewingError::MalformedRow {
            line,
            reason: format!("duration \"{}\" is not a valid H:MM:SS", row.duration),
        })?;
        if minutes < MIN_WATCH_MINUTES {
            stats.short_dropped += 1;
            continue;
        }

        records.push(LoadedRecord {
            profile_name: row.profile_name,
            start_time: row.start_time,
            duration: row.duration,
            title: row.title.filter(|t| is_present(Some(t))),
            device_type: row.device_type,
            country: row.country,
        });
    }

    stats.kept = records.len();
    debug!(
        "Read {} rows: kept {}, dropped {} supplemental and {} under {} minutes",
        stats.rows_read,
        stats.kept,
        stats.supplemental_dropped,
        stats.short_dropped,
        MIN_WATCH_MINUTES
    );

    Ok(LoadedExport { records, stats })
}

/// Find `ViewingActivity.csv` inside an unpacked Netflix export directory.
///
/// The shallowest match wins; ties are broken by path order.
pub fn find_viewing_activity(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        warn!("Export directory does not exist: {}", dir.display());
        return Err(ViewingError::NoExportFound(dir.to_path_buf()));
    }

    let mut candidates: Vec<(usize, PathBuf)> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .map(|name| name.eq_ignore_ascii_case(EXPORT_FILE_NAME))
                    .unwrap_or(false)
        })
        .map(|entry| (entry.depth(), entry.into_path()))
        .collect();

    candidates.sort();
    candidates
        .into_iter()
        .next()
        .map(|(_, path)| path)
        .ok_or_else(|| ViewingError::NoExportFound(dir.to_path_buf()))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Strip a UTF-8 byte order mark and surrounding whitespace from header names.
fn normalise_headers(headers: &StringRecord) -> StringRecord {
    headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .collect()
}

fn check_required_columns(headers: &StringRecord) -> Result<()> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ViewingError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

/// Report a row with the wrong number of fields as [`ViewingError::MalformedRow`].
fn record_error(err: csv::Error) -> ViewingError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = err.kind()
    {
        return ViewingError::MalformedRow {
            line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
            reason: format!("expected {expected_len} fields, found {len}"),
        };
    }
    err.into()
}

/// Empty cells count as absent, matching how the export marks "no value".
fn is_present(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "Profile Name,Start Time,Duration,Attributes,Title,Supplemental Video Type,Device Type,Bookmark,Latest Bookmark,Country";

    fn csv_of(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.push('\n');
        out
    }

    fn load(rows: &[&str]) -> Result<LoadedExport> {
        load_from_reader(csv_of(rows).as_bytes())
    }

    #[test]
    fn test_keeps_primary_sessions() {
        let export = load(&[
            "Alice,2023-01-05 21:14:03,0:45:10,,Dark: Season 1: Secrets (Episode 1),,Smart TV,0:45:10,0:45:10,US (United States)",
        ])
        .unwrap();

        assert_eq!(export.records.len(), 1);
        let record = &export.records[0];
        assert_eq!(record.profile_name, "Alice");
        assert_eq!(record.start_time, "2023-01-05 21:14:03");
        assert_eq!(record.duration, "0:45:10");
        assert_eq!(
            record.title.as_deref(),
            Some("Dark: Season 1: Secrets (Episode 1)")
        );
        assert_eq!(record.device_type, "Smart TV");
        assert_eq!(record.country, "US (United States)");
    }

    #[test]
    fn test_drops_supplemental_video() {
        let export = load(&[
            "Alice,2023-01-05 21:14:03,0:45:10,,Dark: Season 1: Secrets,,Smart TV,0:45:10,0:45:10,US",
            "Alice,2023-01-05 21:10:00,0:12:00,,Dark (Trailer),TRAILER,Smart TV,0:12:00,0:12:00,US",
            "Bob,2023-01-06 10:00:00,0:30:00,,Dark: Season 1: Lies,HOOK,Phone,0:30:00,0:30:00,US",
        ])
        .unwrap();

        assert_eq!(export.records.len(), 1);
        assert_eq!(export.stats.supplemental_dropped, 2);
        assert!(export
            .records
            .iter()
            .all(|r| r.title.as_deref() != Some("Dark (Trailer)")));
    }

    #[test]
    fn test_drops_sessions_under_five_minutes() {
        let export = load(&[
            "Alice,2023-01-05 21:14:03,0:04:59,,Short,,Smart TV,0:04:59,0:04:59,US",
            "Alice,2023-01-05 22:14:03,0:05:00,,Exactly Five,,Smart TV,0:05:00,0:05:00,US",
            "Alice,2023-01-05 23:14:03,1:02:00,,Long,,Smart TV,1:02:00,1:02:00,US",
        ])
        .unwrap();

        let titles: Vec<_> = export
            .records
            .iter()
            .map(|r| r.title.clone().unwrap())
            .collect();
        assert_eq!(titles, vec!["Exactly Five", "Long"]);
        assert_eq!(export.stats.short_dropped, 1);
        for record in &export.records {
            assert!(duration_minutes(&record.duration).unwrap() >= MIN_WATCH_MINUTES);
        }
    }

    #[test]
    fn test_stats_add_up() {
        let export = load(&[
            "A,2023-01-01 10:00:00,0:20:00,,T1,,TV,0:20:00,0:20:00,US",
            "A,2023-01-01 11:00:00,0:01:00,,T2,,TV,0:01:00,0:01:00,US",
            "A,2023-01-01 12:00:00,0:20:00,,T3,TEASER_TRAILER,TV,0:20:00,0:20:00,US",
        ])
        .unwrap();
        let stats = export.stats;
        assert_eq!(stats.rows_read, 3);
        assert_eq!(stats.kept, 1);
        assert_eq!(
            stats.kept + stats.short_dropped + stats.supplemental_dropped,
            stats.rows_read
        );
    }

    #[test]
    fn test_missing_title_becomes_none() {
        let export = load(&["A,2023-01-01 10:00:00,0:20:00,,,,TV,0:20:00,0:20:00,US"]).unwrap();
        assert_eq!(export.records[0].title, None);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let input = "Profile Name,Start Time,Duration,Title,Device Type,Country\nA,2023-01-01 10:00:00,0:20:00,T,TV,US\n";
        let err = load_from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ViewingError::MissingColumn(ref c) if c == "Attributes"));
    }

    #[test]
    fn test_malformed_duration_is_reported_with_line() {
        let err = load(&[
            "A,2023-01-01 10:00:00,0:20:00,,T1,,TV,0:20:00,0:20:00,US",
            "A,2023-01-01 11:00:00,twenty,,T2,,TV,0:20:00,0:20:00,US",
        ])
        .unwrap_err();
        match err {
            ViewingError::MalformedRow { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("twenty"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_duration_is_reported_with_line() {
        for duration in ["0:75:99", "3000000000000:00:00"] {
            let row = format!("A,2023-01-01 11:00:00,{duration},,T2,,TV,0:20:00,0:20:00,US");
            match load(&[row.as_str()]).unwrap_err() {
                ViewingError::MalformedRow { line, reason } => {
                    assert_eq!(line, 2);
                    assert!(reason.contains(duration));
                }
                other => panic!("unexpected error for {duration}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_short_row_is_reported_with_line() {
        let err = load(&[
            "A,2023-01-01 10:00:00,0:20:00,,T1,,TV,0:20:00,0:20:00,US",
            "A,2023-01-01 11:00:00,0:20:00",
        ])
        .unwrap_err();
        match err {
            ViewingError::MalformedRow { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("expected 10 fields, found 3"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_duration_in_supplemental_row_is_ignored() {
        let export = load(&["A,2023-01-01 11:00:00,n/a,,Trailer,TRAILER,TV,,,US"]).unwrap();
        assert!(export.records.is_empty());
    }

    #[test]
    fn test_header_with_byte_order_mark() {
        let input = format!(
            "\u{feff}{}",
            csv_of(&["A,2023-01-01 10:00:00,0:20:00,,T1,,TV,0:20:00,0:20:00,US"])
        );
        let export = load_from_reader(input.as_bytes()).unwrap();
        assert_eq!(export.records.len(), 1);
    }

    #[test]
    fn test_quoted_title_with_commas() {
        let export = load(&[
            "A,2023-01-01 10:00:00,1:50:00,,\"Crouching Tiger, Hidden Dragon\",,TV,1:50:00,1:50:00,US",
        ])
        .unwrap();
        assert_eq!(
            export.records[0].title.as_deref(),
            Some("Crouching Tiger, Hidden Dragon")
        );
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let err = load_from_path(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, ViewingError::FileRead { .. }));
    }

    #[test]
    fn test_load_from_path_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(EXPORT_FILE_NAME);
        std::fs::write(
            &path,
            csv_of(&["A,2023-01-01 10:00:00,0:20:00,,T1,,TV,0:20:00,0:20:00,US"]),
        )
        .unwrap();
        let export = load_from_path(&path).unwrap();
        assert_eq!(export.stats.kept, 1);
    }

    #[test]
    fn test_find_viewing_activity_prefers_shallowest() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("netflix-report").join("CONTENT_INTERACTION");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join(EXPORT_FILE_NAME), HEADER).unwrap();
        let deeper = nested.join("old");
        std::fs::create_dir_all(&deeper).unwrap();
        std::fs::write(deeper.join(EXPORT_FILE_NAME), HEADER).unwrap();

        let found = find_viewing_activity(tmp.path()).unwrap();
        assert_eq!(found, nested.join(EXPORT_FILE_NAME));
    }

    #[test]
    fn test_find_viewing_activity_none() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("other.csv"), HEADER).unwrap();
        let err = find_viewing_activity(tmp.path()).unwrap_err();
        assert!(matches!(err, ViewingError::NoExportFound(_)));
    }
}
