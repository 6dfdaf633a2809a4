//! User-facing selectors: which profile, content type and title to analyse,
//! and which analysis to run.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ViewingError;
use crate::models::ContentType;

pub const ALL_PROFILES: &str = "All Profiles";
pub const ALL_TYPES: &str = "All Types";
pub const ALL_TITLES: &str = "All Titles";

// ── ProfileFilter ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProfileFilter {
    #[default]
    All,
    Named(String),
}

impl ProfileFilter {
    /// `"All Profiles"` maps to [`ProfileFilter::All`], anything else is a name.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_PROFILES {
            ProfileFilter::All
        } else {
            ProfileFilter::Named(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ProfileFilter::All => ALL_PROFILES,
            ProfileFilter::Named(name) => name,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, ProfileFilter::All)
    }

    pub fn matches(&self, profile_name: &str) -> bool {
        match self {
            ProfileFilter::All => true,
            ProfileFilter::Named(name) => name == profile_name,
        }
    }
}

// ── ContentFilter ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContentFilter {
    #[default]
    All,
    Movie,
    TvShow,
}

impl ContentFilter {
    /// Choices in the order they are offered to the user.
    pub const ALL: [ContentFilter; 3] = [ContentFilter::All, ContentFilter::Movie, ContentFilter::TvShow];

    pub fn label(&self) -> &'static str {
        match self {
            ContentFilter::All => ALL_TYPES,
            ContentFilter::Movie => ContentType::Movie.as_str(),
            ContentFilter::TvShow => ContentType::TvShow.as_str(),
        }
    }

    pub fn matches(&self, content_type: ContentType) -> bool {
        match self {
            ContentFilter::All => true,
            ContentFilter::Movie => content_type == ContentType::Movie,
            ContentFilter::TvShow => content_type == ContentType::TvShow,
        }
    }
}

impl FromStr for ContentFilter {
    type Err = ViewingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all types" | "all" => Ok(ContentFilter::All),
            "movie" | "movies" => Ok(ContentFilter::Movie),
            "tv show" | "tv-show" | "tv" | "show" | "shows" => Ok(ContentFilter::TvShow),
            _ => Err(ViewingError::UnknownContentType(s.to_string())),
        }
    }
}

// ── TitleFilter ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TitleFilter {
    #[default]
    All,
    Named(String),
}

impl TitleFilter {
    pub fn from_label(label: &str) -> Self {
        if label == ALL_TITLES {
            TitleFilter::All
        } else {
            TitleFilter::Named(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TitleFilter::All => ALL_TITLES,
            TitleFilter::Named(name) => name,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, TitleFilter::All)
    }

    /// Records without a name only pass the `All` filter.
    pub fn matches(&self, name: Option<&str>) -> bool {
        match self {
            TitleFilter::All => true,
            TitleFilter::Named(wanted) => name == Some(wanted.as_str()),
        }
    }
}

// ── Selection ─────────────────────────────────────────────────────────────────

/// The three filter selectors applied before an analysis runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub profile: ProfileFilter,
    pub content_type: ContentFilter,
    pub title: TitleFilter,
}

impl Selection {
    pub fn new(profile: ProfileFilter, content_type: ContentFilter, title: TitleFilter) -> Self {
        Self {
            profile,
            content_type,
            title,
        }
    }

    /// Human-readable summary, e.g. `"Alice / Movie / All Titles"`.
    pub fn describe(&self) -> String {
        format!(
            "{} / {} / {}",
            self.profile.label(),
            self.content_type.label(),
            self.title.label()
        )
    }
}

// ── AnalysisKind ──────────────────────────────────────────────────────────────

/// The ten analyses the dispatcher can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisKind {
    ViewingFrequency,
    ViewingActivityTimeline,
    ViewingHeatMap,
    MostWatchedDays,
    Duration,
    MostWatchedMovies,
    MostWatchedShows,
    MostWatchedEpisodes,
    DeviceTypes,
    Countries,
}

impl AnalysisKind {
    /// Every kind, in menu order.
    pub const ALL: [AnalysisKind; 10] = [
        AnalysisKind::ViewingFrequency,
        AnalysisKind::ViewingActivityTimeline,
        AnalysisKind::ViewingHeatMap,
        AnalysisKind::MostWatchedDays,
        AnalysisKind::Duration,
        AnalysisKind::MostWatchedMovies,
        AnalysisKind::MostWatchedShows,
        AnalysisKind::MostWatchedEpisodes,
        AnalysisKind::DeviceTypes,
        AnalysisKind::Countries,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisKind::ViewingFrequency => "Viewing Frequency",
            AnalysisKind::ViewingActivityTimeline => "Viewing Activity Timeline",
            AnalysisKind::ViewingHeatMap => "Viewing Heat Map",
            AnalysisKind::MostWatchedDays => "Most Watched Days",
            AnalysisKind::Duration => "Duration",
            AnalysisKind::MostWatchedMovies => "Most Watched Movies",
            AnalysisKind::MostWatchedShows => "Most Watched Shows",
            AnalysisKind::MostWatchedEpisodes => "Most Watched Episodes",
            AnalysisKind::DeviceTypes => "Device Types",
            AnalysisKind::Countries => "Countries",
        }
    }

    /// Exact-label lookup. Returns `None` for anything unrecognised.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    /// Lower snake case file stem, e.g. `"viewing_heat_map"`.
    pub fn file_stem(&self) -> String {
        self.label().replace(' ', "_").to_lowercase()
    }

    /// Analyses that make sense for the given content type and title.
    ///
    /// Movie drops the show and episode rankings; TV Show drops the movie
    /// ranking, and the episode ranking too until a single show is chosen.
    pub fn available_for(content_type: ContentFilter, title: &TitleFilter) -> Vec<AnalysisKind> {
        Self::ALL
            .into_iter()
            .filter(|kind| match content_type {
                ContentFilter::All => true,
                ContentFilter::Movie => !matches!(
                    kind,
                    AnalysisKind::MostWatchedEpisodes | AnalysisKind::MostWatchedShows
                ),
                ContentFilter::TvShow => match kind {
                    AnalysisKind::MostWatchedMovies => false,
                    AnalysisKind::MostWatchedEpisodes => !title.is_all(),
                    _ => true,
                },
            })
            .collect()
    }
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnalysisKind {
    type Err = ViewingError;

    /// Accepts the display label or its kebab/snake case form
    /// (`"viewing-heat-map"`, `"most_watched_days"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(kind) = Self::from_label(s) {
            return Ok(kind);
        }
        let normalised = s.trim().replace(['-', '_'], " ").to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().to_lowercase() == normalised)
            .ok_or_else(|| ViewingError::UnknownAnalysis(s.to_string()))
    }
}
