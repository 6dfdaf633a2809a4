//! Ordered record of the charts produced during one session.
//!
//! The history is owned by the caller and handed to
//! [`ViewingSession::run_analysis`](crate::session::ViewingSession::run_analysis)
//! by mutable reference. It is never persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;

use viewing_core::selection::Selection;
use viewing_data::chart::Chart;

/// One produced chart and the inputs it was produced from.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub chart: Chart,
    pub selection: Selection,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Display label of the analysis, e.g. `"Viewing Heat Map"`.
    pub fn label(&self) -> &'static str {
        self.chart.kind.label()
    }
}

/// Charts in the order they were produced.
#[derive(Debug, Clone, Default)]
pub struct AnalysisHistory {
    entries: Vec<HistoryEntry>,
}

impl AnalysisHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chart: Chart, selection: Selection, timezone: &str) {
        self.entries.push(HistoryEntry {
            chart,
            selection,
            timezone: timezone.to_string(),
            created_at: Utc::now(),
        });
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        tracing::debug!(entries = self.entries.len(), "clearing analysis history");
        self.entries.clear();
    }

    /// Entries with the most recent first, as they are displayed.
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// The `index`-th entry counting from the newest.
    pub fn get_newest(&self, index: usize) -> Option<&HistoryEntry> {
        self.newest_first().nth(index)
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewing_core::selection::AnalysisKind;
    use viewing_data::chart::{Bar, ChartBody, Orientation};

    fn chart(kind: AnalysisKind) -> Chart {
        Chart {
            kind,
            title: kind.label().to_string(),
            x_label: String::new(),
            y_label: String::new(),
            body: ChartBody::Bars {
                orientation: Orientation::Vertical,
                bars: vec![Bar::new("Alice", 1)],
            },
        }
    }

    #[test]
    fn test_push_and_newest_first() {
        let mut history = AnalysisHistory::new();
        assert!(history.is_empty());
        assert!(history.latest().is_none());

        history.push(chart(AnalysisKind::Countries), Selection::default(), "UTC");
        history.push(chart(AnalysisKind::Duration), Selection::default(), "Asia/Tokyo");

        assert_eq!(history.len(), 2);
        let labels: Vec<&str> = history.newest_first().map(HistoryEntry::label).collect();
        assert_eq!(labels, vec!["Duration", "Countries"]);
        assert_eq!(history.latest().unwrap().timezone, "Asia/Tokyo");
        assert_eq!(history.get_newest(1).unwrap().label(), "Countries");
        assert!(history.get_newest(2).is_none());
    }

    #[test]
    fn test_clear() {
        let mut history = AnalysisHistory::new();
        history.push(chart(AnalysisKind::Countries), Selection::default(), "UTC");
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.newest_first().count(), 0);
    }

    #[test]
    fn test_same_analysis_can_repeat() {
        let mut history = AnalysisHistory::new();
        history.push(chart(AnalysisKind::Countries), Selection::default(), "UTC");
        history.push(chart(AnalysisKind::Countries), Selection::default(), "UTC");
        assert_eq!(history.len(), 2);
    }
}
