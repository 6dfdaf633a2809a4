use chrono::{Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// Display names for each weekday, indexed by days from Monday.
pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Whether a record is a film or an episode of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "Movie")]
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl ContentType {
    /// Label as it appears in the classified table.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "Movie",
            ContentType::TvShow => "TV Show",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A primary-playback row as it leaves the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRecord {
    pub profile_name: String,
    /// Raw UTC start time, e.g. `"2023-01-05 21:14:03"`.
    pub start_time: String,
    /// Raw `H:MM:SS` duration.
    pub duration: String,
    pub title: Option<String>,
    pub device_type: String,
    pub country: String,
}

/// A row whose temporal fields are expressed in the viewer's timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedRecord {
    pub profile_name: String,
    /// Local hour bucket, formatted `"YYYY-MM-DD, HH:00:00"`.
    pub start_time: String,
    /// The same hour bucket as a naive local datetime.
    pub hour: NaiveDateTime,
    pub duration: Duration,
    pub day: Weekday,
    pub date: NaiveDate,
    pub title: Option<String>,
    pub device_type: String,
    pub country: String,
}

/// A fully annotated row: localized and classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewingRecord {
    pub profile_name: String,
    pub start_time: String,
    pub hour: NaiveDateTime,
    pub duration: Duration,
    pub day: Weekday,
    pub date: NaiveDate,
    pub title: Option<String>,
    pub device_type: String,
    pub country: String,
    /// Series name for TV shows, full title for movies.
    pub name: Option<String>,
    pub season: Option<String>,
    pub episode: Option<String>,
    pub content_type: ContentType,
}
