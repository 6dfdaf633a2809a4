use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::selection::{
    AnalysisKind, ContentFilter, ProfileFilter, Selection, TitleFilter, ALL_PROFILES, ALL_TITLES,
    ALL_TYPES,
};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Descriptive analysis of a Netflix viewing activity export
#[derive(Parser, Debug, Clone)]
#[command(
    name = "viewing-activity",
    about = "Descriptive analysis of a Netflix viewing activity export",
    version
)]
pub struct Settings {
    /// Path to ViewingActivity.csv
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Unpacked Netflix export directory to search for ViewingActivity.csv
    #[arg(long, conflicts_with = "file")]
    pub export_dir: Option<PathBuf>,

    /// Timezone to localize viewing times into (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Profile to analyse
    #[arg(long, default_value = ALL_PROFILES)]
    pub profile: String,

    /// Content type to analyse ("All Types", "Movie", "TV Show")
    #[arg(long, default_value = ALL_TYPES)]
    pub content_type: String,

    /// Title to analyse
    #[arg(long, default_value = ALL_TITLES)]
    pub title: String,

    /// Run one analysis, print it and exit instead of opening the TUI
    #[arg(long)]
    pub analysis: Option<String>,

    /// Print the one-shot chart as JSON
    #[arg(long, requires = "analysis")]
    pub json: bool,

    /// Write the one-shot chart as JSON to this path
    #[arg(long, requires = "analysis")]
    pub output: Option<PathBuf>,

    /// File listing selectable timezones, one per line
    #[arg(long, default_value = "data/time_zones.txt")]
    pub time_zones_file: PathBuf,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.viewing-activity/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    /// Uses `~/.viewing-activity/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".viewing-activity").join("last_used.json")
    }

    /// Load persisted params from the default path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load persisted params from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to the default path, creating parent directories
    /// if needed.
    pub fn save(&self) -> std::result::Result<(), std::io::Error> {
        self.save_to(&Self::config_path())
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, resolve `"auto"` values, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Takes the args and the last-used file path explicitly so tests can
    /// point it at a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::resolve_auto_values(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "timezone") {
            if let Some(v) = last.timezone {
                settings.timezone = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        // An explicit export directory also counts as choosing the input.
        if settings.file.is_none() && settings.export_dir.is_none() {
            settings.file = last.file.filter(|p| p.exists());
        }

        settings = Self::resolve_auto_values(settings);

        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// Resolve `"auto"` sentinel values and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            settings.timezone = crate::time_utils::get_system_timezone();
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }

    /// The filter selectors requested on the command line.
    pub fn selection(&self) -> Result<Selection> {
        Ok(Selection::new(
            ProfileFilter::from_label(&self.profile),
            self.content_type.parse::<ContentFilter>()?,
            TitleFilter::from_label(&self.title),
        ))
    }

    /// The one-shot analysis, if `--analysis` was given.
    pub fn analysis_kind(&self) -> Option<Result<AnalysisKind>> {
        self.analysis
            .as_deref()
            .map(|label| label.parse::<AnalysisKind>())
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            timezone: Some(s.timezone.clone()),
            file: s.file.clone(),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
