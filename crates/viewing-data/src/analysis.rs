//! Pipeline glue and the analysis dispatcher.
//!
//! [`prepare_records`] runs the localize and classify stages over a loaded
//! export; [`dispatch`] turns an already filtered table into one [`Chart`].
//! Every analysis is a pure function of its rows and the selection.

use tracing::{debug, warn};

use viewing_core::error::Result;
use viewing_core::models::{ContentType, LoadedRecord, ViewingRecord};
use viewing_core::selection::{AnalysisKind, Selection};

use crate::aggregator::{DurationScheme, ViewingAggregator, TOP_N};
use crate::chart::{Bar, Chart, ChartBody, Orientation};
use crate::classifier::classify_records;
use crate::filters::apply_selection;
use crate::localizer::localize_records;
use crate::titles::{axis_labels, chart_title};

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Localize `loaded` into `tz_name` and classify every row.
pub fn prepare_records(loaded: &[LoadedRecord], tz_name: &str) -> Result<Vec<ViewingRecord>> {
    let localized = localize_records(loaded, tz_name)?;
    Ok(classify_records(localized))
}

/// Filter `table` by `selection`, then run `kind` on what is left.
///
/// An empty filter result still yields a chart, with nothing in it.
pub fn analyze(table: &[ViewingRecord], kind: AnalysisKind, selection: &Selection) -> Chart {
    let rows = apply_selection(table, selection);
    dispatch(&rows, kind, selection)
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

/// Run `kind` over `records`, which must already be filtered by `selection`.
pub fn dispatch(records: &[ViewingRecord], kind: AnalysisKind, selection: &Selection) -> Chart {
    debug!("Running {} over {} records", kind, records.len());

    let stacked = selection.profile.is_all()
        && matches!(
            kind,
            AnalysisKind::Countries | AnalysisKind::DeviceTypes | AnalysisKind::Duration
        );

    let body = match kind {
        AnalysisKind::Countries => countries(records, stacked),
        AnalysisKind::DeviceTypes => device_types(records, stacked),
        AnalysisKind::ViewingFrequency => viewing_frequency(records),
        AnalysisKind::ViewingActivityTimeline => activity_timeline(records),
        AnalysisKind::ViewingHeatMap => heat_map(records),
        AnalysisKind::MostWatchedMovies => most_watched_movies(records),
        AnalysisKind::MostWatchedShows => most_watched_shows(records),
        AnalysisKind::MostWatchedEpisodes => most_watched_episodes(records),
        AnalysisKind::MostWatchedDays => most_watched_days(records),
        AnalysisKind::Duration => {
            duration(records, DurationScheme::for_content(selection.content_type), stacked)
        }
    };

    let (x_label, y_label) = axis_labels(kind, stacked);
    Chart {
        kind,
        title: chart_title(kind, selection),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        body,
    }
}

/// Dispatch by display label. Unknown labels produce no chart.
pub fn dispatch_label(
    records: &[ViewingRecord],
    label: &str,
    selection: &Selection,
) -> Option<Chart> {
    match AnalysisKind::from_label(label) {
        Some(kind) => Some(dispatch(records, kind, selection)),
        None => {
            warn!("Ignoring unknown analysis {:?}", label);
            None
        }
    }
}

// ── Analyses ──────────────────────────────────────────────────────────────────

fn vertical(bars: Vec<Bar>) -> ChartBody {
    ChartBody::Bars {
        orientation: Orientation::Vertical,
        bars,
    }
}

fn countries(records: &[ViewingRecord], stacked: bool) -> ChartBody {
    if stacked {
        ChartBody::Stacked(ViewingAggregator::stacked_by_profile(records, |r| {
            r.country.clone()
        }))
    } else {
        vertical(ViewingAggregator::value_counts(
            records.iter().map(|r| r.country.as_str()),
        ))
    }
}

fn device_types(records: &[ViewingRecord], stacked: bool) -> ChartBody {
    if stacked {
        ChartBody::Stacked(ViewingAggregator::stacked_by_profile(records, |r| {
            r.device_type.clone()
        }))
    } else {
        ChartBody::Bars {
            orientation: Orientation::Horizontal,
            bars: ViewingAggregator::value_counts(records.iter().map(|r| r.device_type.as_str())),
        }
    }
}

fn viewing_frequency(records: &[ViewingRecord]) -> ChartBody {
    vertical(ViewingAggregator::value_counts(
        records.iter().map(|r| r.profile_name.as_str()),
    ))
}

fn activity_timeline(records: &[ViewingRecord]) -> ChartBody {
    ChartBody::Timeline {
        days: ViewingAggregator::dense_daily(records),
    }
}

fn heat_map(records: &[ViewingRecord]) -> ChartBody {
    ChartBody::HeatMap(ViewingAggregator::heat_map(records))
}

fn ranked_names(records: &[ViewingRecord], content_type: ContentType) -> ChartBody {
    vertical(ViewingAggregator::top_n(
        records
            .iter()
            .filter(|r| r.content_type == content_type)
            .filter_map(|r| r.name.as_deref()),
        TOP_N,
    ))
}

fn most_watched_movies(records: &[ViewingRecord]) -> ChartBody {
    ranked_names(records, ContentType::Movie)
}

fn most_watched_shows(records: &[ViewingRecord]) -> ChartBody {
    ranked_names(records, ContentType::TvShow)
}

fn most_watched_episodes(records: &[ViewingRecord]) -> ChartBody {
    vertical(ViewingAggregator::top_n(
        records.iter().filter_map(|r| r.episode.as_deref()),
        TOP_N,
    ))
}

fn most_watched_days(records: &[ViewingRecord]) -> ChartBody {
    vertical(ViewingAggregator::weekday_counts(records))
}

fn duration(records: &[ViewingRecord], scheme: DurationScheme, stacked: bool) -> ChartBody {
    if stacked {
        ChartBody::Stacked(ViewingAggregator::stacked_durations(records, scheme))
    } else {
        vertical(ViewingAggregator::duration_counts(records, scheme))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
