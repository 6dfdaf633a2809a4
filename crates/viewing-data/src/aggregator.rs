//! Counting primitives shared by the analyses: value counts, dense time
//! series, the weekday × hour grid, per-profile stacks and duration buckets.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

use viewing_core::models::{ViewingRecord, DAY_NAMES};
use viewing_core::selection::ContentFilter;

use crate::chart::{Bar, DailyCount, HeatMapGrid, HourlyCount, StackSeries, StackedBars};

/// Bars shown by the "Most Watched" rankings.
pub const TOP_N: usize = 10;

// ── DurationScheme ────────────────────────────────────────────────────────────

/// Bucket boundaries used by the duration analysis, chosen by content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationScheme {
    /// Seven half-hour bins up to three hours.
    AllTypes,
    /// Five bins with a 1.5 hour floor.
    Movie,
    /// Three bins with a 30 minute floor.
    TvShow,
}

const ALL_TYPES_BUCKETS: [(i64, &str); 7] = [
    (30, "< 0.5 hrs."),
    (60, "0.5-1 hrs."),
    (90, "1-1.5 hrs."),
    (120, "1.5-2 hrs."),
    (150, "2-2.5 hrs."),
    (180, "2.5-3 hrs."),
    (i64::MAX, "> 3 hrs."),
];

const MOVIE_BUCKETS: [(i64, &str); 5] = [
    (90, "< 1.5 hrs."),
    (120, "1.5-2 hrs."),
    (150, "2-2.5 hrs."),
    (180, "2.5-3 hrs."),
    (i64::MAX, "> 3 hrs."),
];

const TV_SHOW_BUCKETS: [(i64, &str); 3] = [
    (30, "< 0.5 hrs."),
    (60, "0.5-1 hrs."),
    (i64::MAX, "> 1 hr."),
];

impl DurationScheme {
    pub fn for_content(content_type: ContentFilter) -> Self {
        match content_type {
            ContentFilter::All => DurationScheme::AllTypes,
            ContentFilter::Movie => DurationScheme::Movie,
            ContentFilter::TvShow => DurationScheme::TvShow,
        }
    }

    /// `(exclusive upper bound in minutes, label)` pairs in ascending order.
    fn buckets(&self) -> &'static [(i64, &'static str)] {
        match self {
            DurationScheme::AllTypes => &ALL_TYPES_BUCKETS,
            DurationScheme::Movie => &MOVIE_BUCKETS,
            DurationScheme::TvShow => &TV_SHOW_BUCKETS,
        }
    }

    /// Bucket labels, shortest first.
    pub fn labels(&self) -> Vec<&'static str> {
        self.buckets().iter().map(|(_, label)| *label).collect()
    }

    /// Label of the bucket holding `duration`. Lower bounds are inclusive.
    pub fn bucket(&self, duration: Duration) -> &'static str {
        let seconds = duration.num_seconds();
        let buckets = self.buckets();
        buckets
            .iter()
            .find(|(upper, _)| *upper == i64::MAX || seconds < upper * 60)
            .map_or(buckets[buckets.len() - 1].1, |(_, label)| *label)
    }
}

// ── ViewingAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that turns record slices into chart series.
pub struct ViewingAggregator;

impl ViewingAggregator {
    /// Occurrences of each value, most frequent first; ties by label.
    pub fn value_counts<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<Bar> {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for value in values {
            *counts.entry(value).or_default() += 1;
        }
        let mut bars: Vec<Bar> = counts
            .into_iter()
            .map(|(label, value)| Bar::new(label, value))
            .collect();
        bars.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
        bars
    }

    /// The `n` most frequent values.
    pub fn top_n<'a>(values: impl IntoIterator<Item = &'a str>, n: usize) -> Vec<Bar> {
        let mut bars = Self::value_counts(values);
        bars.truncate(n);
        bars
    }

    /// Sessions per weekday, Monday through Sunday, including empty days.
    pub fn weekday_counts(records: &[ViewingRecord]) -> Vec<Bar> {
        let mut counts = [0u64; 7];
        for record in records {
            counts[record.day.num_days_from_monday() as usize] += 1;
        }
        DAY_NAMES
            .iter()
            .zip(counts)
            .map(|(name, count)| Bar::new(*name, count))
            .collect()
    }

    /// Sessions per bucket in bucket order, skipping empty buckets.
    pub fn duration_counts(records: &[ViewingRecord], scheme: DurationScheme) -> Vec<Bar> {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for record in records {
            *counts.entry(scheme.bucket(record.duration)).or_default() += 1;
        }
        scheme
            .labels()
            .into_iter()
            .filter_map(|label| counts.get(label).map(|count| Bar::new(label, *count)))
            .collect()
    }

    /// Sessions per local date from the first to the last active day, with
    /// zero entries for idle days in between.
    pub fn dense_daily(records: &[ViewingRecord]) -> Vec<DailyCount> {
        let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for record in records {
            *counts.entry(record.date).or_default() += 1;
        }
        let (Some(first), Some(last)) = (
            counts.keys().next().copied(),
            counts.keys().next_back().copied(),
        ) else {
            return Vec::new();
        };

        first
            .iter_days()
            .take_while(|date| *date <= last)
            .map(|date| DailyCount {
                date,
                count: counts.get(&date).copied().unwrap_or(0),
            })
            .collect()
    }

    /// Sessions per local hour bucket from the first to the last active hour,
    /// zero filled.
    pub fn dense_hourly(records: &[ViewingRecord]) -> Vec<HourlyCount> {
        let mut counts: BTreeMap<NaiveDateTime, u64> = BTreeMap::new();
        for record in records {
            *counts.entry(record.hour).or_default() += 1;
        }
        let (Some(first), Some(last)) = (
            counts.keys().next().copied(),
            counts.keys().next_back().copied(),
        ) else {
            return Vec::new();
        };

        let mut series = Vec::new();
        let mut hour = first;
        while hour <= last {
            series.push(HourlyCount {
                hour,
                count: counts.get(&hour).copied().unwrap_or(0),
            });
            hour += Duration::hours(1);
        }
        series
    }

    /// Fold the dense hourly series into weekday rows and hour-of-day columns.
    pub fn heat_map(records: &[ViewingRecord]) -> HeatMapGrid {
        let series = Self::dense_hourly(records);
        let mut grid = HeatMapGrid::empty();
        for point in &series {
            let row = point.hour.weekday().num_days_from_monday() as usize;
            let col = point.hour.hour() as usize;
            grid.counts[row][col] += point.count;
        }
        grid.span = series
            .first()
            .zip(series.last())
            .map(|(first, last)| (first.hour, last.hour));
        grid
    }

    /// Per-profile counts of `category`, one series per category value in
    /// sorted order.
    pub fn stacked_by_profile<F>(records: &[ViewingRecord], category: F) -> StackedBars
    where
        F: Fn(&ViewingRecord) -> String,
    {
        let present: BTreeSet<String> = records.iter().map(&category).collect();
        Self::stack(records, category, present.into_iter().collect())
    }

    /// Duration buckets stacked per profile, in bucket order.
    pub fn stacked_durations(records: &[ViewingRecord], scheme: DurationScheme) -> StackedBars {
        let present: BTreeSet<&str> = records.iter().map(|r| scheme.bucket(r.duration)).collect();
        let order = scheme
            .labels()
            .into_iter()
            .filter(|label| present.contains(label))
            .map(str::to_string)
            .collect();
        Self::stack(records, |r| scheme.bucket(r.duration).to_string(), order)
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Each series after the first is based on the previous series' values.
    fn stack<F>(records: &[ViewingRecord], category: F, categories: Vec<String>) -> StackedBars
    where
        F: Fn(&ViewingRecord) -> String,
    {
        let profiles: Vec<String> = records
            .iter()
            .map(|r| r.profile_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut counts: HashMap<(String, String), u64> = HashMap::new();
        for record in records {
            *counts
                .entry((category(record), record.profile_name.clone()))
                .or_default() += 1;
        }

        let mut series: Vec<StackSeries> = Vec::with_capacity(categories.len());
        for label in categories {
            let values: Vec<u64> = profiles
                .iter()
                .map(|profile| {
                    counts
                        .get(&(label.clone(), profile.clone()))
                        .copied()
                        .unwrap_or(0)
                })
                .collect();
            let baseline = series.last().map(|previous| previous.values.clone());
            series.push(StackSeries {
                label,
                values,
                baseline,
            });
        }

        StackedBars { profiles, series }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
