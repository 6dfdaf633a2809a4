//! Movie / TV show classification from the raw title string.
//!
//! Titles are read with the grammar
//! `name[":" season ":" episode [" (" note ")"]]`: two or more colons make a
//! TV show episode, anything else is a movie. Movie titles that happen to
//! contain two colons are classified as shows; there is no metadata lookup.

use viewing_core::models::{ContentType, LocalizedRecord, ViewingRecord};

/// Name parts extracted from one title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub name: Option<String>,
    pub season: Option<String>,
    pub episode: Option<String>,
    pub content_type: ContentType,
}

/// Classify a single title.
///
/// A missing title is a movie without a name.
pub fn classify_title(title: Option<&str>) -> Classification {
    let Some(title) = title else {
        return Classification {
            name: None,
            season: None,
            episode: None,
            content_type: ContentType::Movie,
        };
    };

    if title.matches(':').count() >= 2 {
        let mut parts = title.split(':');
        let name = parts.next().unwrap_or_default();
        let season = parts.next().unwrap_or_default();
        let episode = parts.next().unwrap_or_default();
        let episode = episode.split(" (").next().unwrap_or_default();
        Classification {
            name: Some(name.to_string()),
            season: Some(season.to_string()),
            episode: Some(episode.to_string()),
            content_type: ContentType::TvShow,
        }
    } else {
        Classification {
            name: Some(title.to_string()),
            season: None,
            episode: None,
            content_type: ContentType::Movie,
        }
    }
}

/// Attach a classification to every record.
pub fn classify_records(records: Vec<LocalizedRecord>) -> Vec<ViewingRecord> {
    records.into_iter().map(classify_record).collect()
}

/// Attach a classification to one record.
pub fn classify_record(record: LocalizedRecord) -> ViewingRecord {
    let Classification {
        name,
        season,
        episode,
        content_type,
    } = classify_title(record.title.as_deref());

    ViewingRecord {
        profile_name: record.profile_name,
        start_time: record.start_time,
        hour: record.hour,
        duration: record.duration,
        day: record.day,
        date: record.date,
        title: record.title,
        device_type: record.device_type,
        country: record.country,
        name,
        season,
        episode,
        content_type,
    }
}
