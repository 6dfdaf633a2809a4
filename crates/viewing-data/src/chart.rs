//! In-memory chart artifacts returned by the analysis dispatcher.
//!
//! A [`Chart`] carries the aggregated values and labels only; drawing it is
//! left to the presentation layer.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use viewing_core::selection::AnalysisKind;

/// Direction bars grow in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// One labelled count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub value: u64,
}

impl Bar {
    pub fn new(label: impl Into<String>, value: u64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// One category's counts across every profile in a stacked chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSeries {
    /// Category value, e.g. a country or a duration bucket.
    pub label: String,
    /// Count per profile, aligned with [`StackedBars::profiles`].
    pub values: Vec<u64>,
    /// Offset the series is drawn from; `None` for the first series.
    pub baseline: Option<Vec<u64>>,
}

/// Per-profile bars split by a categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackedBars {
    pub profiles: Vec<String>,
    pub series: Vec<StackSeries>,
}

impl StackedBars {
    /// Count for `profile` summed over every series.
    pub fn profile_total(&self, profile_index: usize) -> u64 {
        self.series
            .iter()
            .filter_map(|s| s.values.get(profile_index))
            .sum()
    }
}

/// Count of sessions started on one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// Count of sessions started in one local hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyCount {
    pub hour: NaiveDateTime,
    pub count: u64,
}

/// Weekday × hour-of-day session counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatMapGrid {
    /// Rows Monday..Sunday, columns 0..23.
    pub counts: [[u64; 24]; 7],
    /// First and last hour bucket of the dense range, if any data exists.
    pub span: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl HeatMapGrid {
    pub fn empty() -> Self {
        Self {
            counts: [[0; 24]; 7],
            span: None,
        }
    }

    pub fn max(&self) -> u64 {
        self.counts
            .iter()
            .flat_map(|row| row.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flat_map(|row| row.iter()).sum()
    }
}

/// Aggregated values of one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartBody {
    Bars {
        orientation: Orientation,
        bars: Vec<Bar>,
    },
    Stacked(StackedBars),
    Timeline { days: Vec<DailyCount> },
    HeatMap(HeatMapGrid),
}

/// The artifact one analysis produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chart {
    pub kind: AnalysisKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub body: ChartBody,
}

impl Chart {
    /// True when the chart has nothing to draw.
    pub fn is_empty(&self) -> bool {
        match &self.body {
            ChartBody::Bars { bars, .. } => bars.is_empty(),
            ChartBody::Stacked(stacked) => stacked.series.is_empty(),
            ChartBody::Timeline { days } => days.is_empty(),
            ChartBody::HeatMap(grid) => grid.span.is_none(),
        }
    }

    /// Sum of every counted session in the chart.
    pub fn total(&self) -> u64 {
        match &self.body {
            ChartBody::Bars { bars, .. } => bars.iter().map(|b| b.value).sum(),
            ChartBody::Stacked(stacked) => stacked
                .series
                .iter()
                .flat_map(|s| s.values.iter())
                .sum(),
            ChartBody::Timeline { days } => days.iter().map(|d| d.count).sum(),
            ChartBody::HeatMap(grid) => grid.total(),
        }
    }
}
