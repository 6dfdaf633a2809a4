//! One interactive session over a single uploaded export.
//!
//! The loaded rows are kept as read; the localized and classified table is
//! built on demand for the current timezone and cached per zone so switching
//! back and forth does not redo the work.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use viewing_core::error::Result;
use viewing_core::models::ViewingRecord;
use viewing_core::selection::{AnalysisKind, Selection};
use viewing_data::analysis::{analyze, dispatch, prepare_records};
use viewing_data::chart::Chart;
use viewing_data::filters::{
    apply_selection, apply_selection_strict, profile_choices, title_choices,
};
use viewing_data::reader::{load_from_path, LoadStats, LoadedExport};

use crate::history::AnalysisHistory;

/// Loaded export plus the per-timezone table cache.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use viewing_runtime::session::ViewingSession;
///
/// let session = ViewingSession::open(Path::new("ViewingActivity.csv"), "Europe/Berlin")?;
/// println!("{} profiles", session.profiles().len() - 1);
/// # Ok::<(), viewing_core::ViewingError>(())
/// ```
pub struct ViewingSession {
    /// File the export was read from, if any.
    source: Option<PathBuf>,
    export: LoadedExport,
    /// Zone the current table is expressed in.
    timezone: String,
    /// Prepared tables keyed by timezone name.
    cache: HashMap<String, Vec<ViewingRecord>>,
}

impl ViewingSession {
    /// Load `path` and prepare it for `timezone`.
    pub fn open(path: &Path, timezone: &str) -> Result<Self> {
        let export = load_from_path(path)?;
        let mut session = Self::from_export(export, timezone)?;
        session.source = Some(path.to_path_buf());
        Ok(session)
    }

    /// Wrap an already loaded export.
    pub fn from_export(export: LoadedExport, timezone: &str) -> Result<Self> {
        let mut session = Self {
            source: None,
            export,
            timezone: String::new(),
            cache: HashMap::new(),
        };
        session.set_timezone(timezone)?;
        Ok(session)
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Switch to `timezone`, preparing its table if it is not cached.
    ///
    /// On failure the previous timezone stays active.
    pub fn set_timezone(&mut self, timezone: &str) -> Result<()> {
        if !self.cache.contains_key(timezone) {
            let table = prepare_records(&self.export.records, timezone)?;
            tracing::debug!(
                timezone,
                rows = table.len(),
                "prepared viewing table"
            );
            self.cache.insert(timezone.to_string(), table);
        }
        self.timezone = timezone.to_string();
        Ok(())
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn stats(&self) -> LoadStats {
        self.export.stats
    }

    /// The full table in the current timezone.
    pub fn records(&self) -> &[ViewingRecord] {
        self.cache
            .get(&self.timezone)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// `"All Profiles"` and every profile name.
    pub fn profiles(&self) -> Vec<String> {
        profile_choices(self.records())
    }

    /// `"All Titles"` and every title left by the profile and content type.
    pub fn titles(&self, selection: &Selection) -> Vec<String> {
        title_choices(self.records(), selection)
    }

    /// Rows matching `selection`.
    pub fn records_for(&self, selection: &Selection) -> Vec<ViewingRecord> {
        apply_selection(self.records(), selection)
    }

    /// Run `kind` and return the chart, empty if nothing matches.
    pub fn chart(&self, kind: AnalysisKind, selection: &Selection) -> Chart {
        analyze(self.records(), kind, selection)
    }

    /// Like [`chart`](Self::chart) but fails with
    /// [`ViewingError::EmptyResult`](viewing_core::ViewingError::EmptyResult)
    /// when the selection matches no rows.
    pub fn chart_strict(&self, kind: AnalysisKind, selection: &Selection) -> Result<Chart> {
        let rows = apply_selection_strict(self.records(), selection)?;
        Ok(dispatch(&rows, kind, selection))
    }

    /// Run `kind`, record the chart in `history` and return a copy.
    pub fn run_analysis(
        &self,
        kind: AnalysisKind,
        selection: &Selection,
        history: &mut AnalysisHistory,
    ) -> Chart {
        let chart = self.chart(kind, selection);
        if chart.is_empty() {
            tracing::warn!(
                analysis = %kind,
                selection = %selection.describe(),
                "analysis produced an empty chart"
            );
        }
        history.push(chart.clone(), selection.clone(), &self.timezone);
        chart
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
