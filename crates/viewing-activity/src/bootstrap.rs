use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Context};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use viewing_core::settings::Settings;
use viewing_core::time_utils::TimezoneHandler;
use viewing_data::reader::find_viewing_activity;

const APP_DIR: &str = ".viewing-activity";
const LOG_FILE: &str = "viewing-activity.log";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// `~/.viewing-activity/`, or `./.viewing-activity/` without a home directory.
pub fn app_dir() -> PathBuf {
    app_dir_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
}

fn app_dir_in(home: &Path) -> PathBuf {
    home.join(APP_DIR)
}

/// Where charts exported from the TUI are written.
pub fn exports_dir() -> PathBuf {
    app_dir().join("exports")
}

/// Log file used in TUI mode when `--log-file` is not given.
pub fn default_log_file() -> PathBuf {
    app_dir().join("logs").join(LOG_FILE)
}

/// Ensure the `~/.viewing-activity/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.viewing-activity/`
/// - `~/.viewing-activity/logs/`
/// - `~/.viewing-activity/exports/`
pub fn ensure_directories() -> anyhow::Result<()> {
    ensure_directories_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
}

fn ensure_directories_in(home: &Path) -> anyhow::Result<()> {
    let dir = app_dir_in(home);
    std::fs::create_dir_all(dir.join("logs"))?;
    std::fs::create_dir_all(dir.join("exports"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to an [`EnvFilter`] directive.
///
/// Accepts DEBUG/INFO/WARNING/ERROR/CRITICAL in any case; anything else is
/// passed through so full directives like `viewing_data=trace` work too.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With `log_file` the output is appended to that file without ANSI colours,
/// which keeps the TUI screen clean. Otherwise it goes to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
    }

    Ok(())
}

// ── Input discovery ────────────────────────────────────────────────────────────

/// The export file to open: `--file`, else the `ViewingActivity.csv` found
/// under `--export-dir`. `--file` already carries the last used file when
/// neither flag was given.
pub fn resolve_input(settings: &Settings) -> anyhow::Result<PathBuf> {
    if let Some(file) = &settings.file {
        if !file.is_file() {
            bail!("export file not found: {}", file.display());
        }
        return Ok(file.clone());
    }
    if let Some(dir) = &settings.export_dir {
        return find_viewing_activity(dir)
            .with_context(|| format!("no viewing activity export under {}", dir.display()));
    }
    bail!("no input given: pass --file <ViewingActivity.csv> or --export-dir <netflix-report>")
}

// ── Timezone choices ───────────────────────────────────────────────────────────

/// Read the timezone list offered in the TUI, one identifier per line.
///
/// Blank lines and `#` comments are skipped and unknown zones are dropped with
/// a warning. A missing or empty file yields every zone chrono-tz knows.
pub fn load_time_zone_choices(path: &Path) -> Vec<String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "timezone list unavailable; offering all zones");
            return all_time_zones();
        }
    };

    let zones: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| {
            let valid = TimezoneHandler::validate_timezone(line);
            if !valid {
                tracing::warn!(timezone = line, "skipping unknown timezone");
            }
            valid
        })
        .map(str::to_string)
        .collect();

    if zones.is_empty() {
        all_time_zones()
    } else {
        zones
    }
}

fn all_time_zones() -> Vec<String> {
    chrono_tz::TZ_VARIANTS
        .iter()
        .map(|tz| tz.name().to_string())
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Settings parsed without touching the real last-used file.
    fn settings(args: &[&str]) -> Settings {
        let tmp = TempDir::new().expect("tempdir");
        let mut argv = vec![std::ffi::OsString::from("viewing-activity")];
        argv.extend(args.iter().map(std::ffi::OsString::from));
        Settings::load_with_last_used_impl(argv, &tmp.path().join("last_used.json"))
    }

    // ── Directories ──────────────────────────────────────────────────────────

    #[test]
    fn test_ensure_directories() {
        let tmp = TempDir::new().expect("tempdir");
        ensure_directories_in(tmp.path()).expect("ensure_directories should succeed");

        let dir = tmp.path().join(".viewing-activity");
        assert!(dir.is_dir(), ".viewing-activity dir must exist");
        assert!(dir.join("logs").is_dir(), "logs subdir must exist");
        assert!(dir.join("exports").is_dir(), "exports subdir must exist");

        // Second run is a no-op.
        ensure_directories_in(tmp.path()).expect("idempotent");
    }

    #[test]
    fn test_default_paths_live_under_app_dir() {
        assert!(exports_dir().starts_with(app_dir()));
        assert!(default_log_file().ends_with("logs/viewing-activity.log"));
    }

    // ── Logging ──────────────────────────────────────────────────────────────

    #[test]
    fn test_level_directive() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("CRITICAL"), "error");
        assert_eq!(level_directive("viewing_data=trace"), "viewing_data=trace");
    }

    // ── Input ────────────────────────────────────────────────────────────────

    #[test]
    fn test_resolve_input_prefers_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("ViewingActivity.csv");
        std::fs::write(&file, "Profile Name\n").unwrap();

        let s = settings(&["--file", file.to_str().unwrap()]);
        assert_eq!(resolve_input(&s).unwrap(), file);
    }

    #[test]
    fn test_resolve_input_missing_file() {
        let s = settings(&["--file", "/definitely/not/here.csv"]);
        let err = resolve_input(&s).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_resolve_input_searches_export_dir() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("netflix-report").join("CONTENT_INTERACTION");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("ViewingActivity.csv"), "Profile Name\n").unwrap();

        let s = settings(&["--export-dir", tmp.path().to_str().unwrap()]);
        assert_eq!(
            resolve_input(&s).unwrap(),
            nested.join("ViewingActivity.csv")
        );
    }

    #[test]
    fn test_resolve_input_requires_a_source() {
        let s = settings(&[]);
        assert!(resolve_input(&s).is_err());
    }

    // ── Timezone choices ─────────────────────────────────────────────────────

    #[test]
    fn test_load_time_zone_choices_filters_lines() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("time_zones.txt");
        std::fs::write(
            &path,
            "# zones\nUTC\n\n  America/New_York  \nMars/Olympus\nAsia/Tokyo\n",
        )
        .unwrap();

        assert_eq!(
            load_time_zone_choices(&path),
            vec!["UTC", "America/New_York", "Asia/Tokyo"]
        );
    }

    #[test]
    fn test_load_time_zone_choices_falls_back_to_all() {
        let tmp = TempDir::new().unwrap();
        let zones = load_time_zone_choices(&tmp.path().join("missing.txt"));
        assert!(zones.len() > 300);
        assert!(zones.iter().any(|z| z == "Europe/Berlin"));

        let empty = tmp.path().join("empty.txt");
        std::fs::write(&empty, "# nothing\n").unwrap();
        assert_eq!(load_time_zone_choices(&empty).len(), zones.len());
    }
}
