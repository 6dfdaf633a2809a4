//! Chart headings and axis labels.

use viewing_core::selection::{AnalysisKind, ContentFilter, Selection, TitleFilter};

/// What the filtered rows cover, as worded in headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subject<'a> {
    Everything,
    Movies,
    TvShows,
    Title(&'a str),
}

impl<'a> Subject<'a> {
    fn of(selection: &'a Selection) -> Self {
        match (&selection.title, selection.content_type) {
            // A named title wins under every content type, All Types included.
            // The web app kept its content-type wording there instead.
            (TitleFilter::Named(title), _) => Subject::Title(title),
            (TitleFilter::All, ContentFilter::All) => Subject::Everything,
            (TitleFilter::All, ContentFilter::Movie) => Subject::Movies,
            (TitleFilter::All, ContentFilter::TvShow) => Subject::TvShows,
        }
    }

    fn quoted(title: &str) -> String {
        format!("'{title}'")
    }

    /// `"Netflix"`, `"Movies"`, `"TV Shows"` or the quoted title.
    fn object(&self) -> String {
        match self {
            Subject::Everything => "Netflix".to_string(),
            Subject::Movies => "Movies".to_string(),
            Subject::TvShows => "TV Shows".to_string(),
            Subject::Title(title) => Self::quoted(title),
        }
    }

    /// Adjective placed before "Viewing ...", with a trailing space.
    fn adjective(&self) -> &'static str {
        match self {
            Subject::Movies => "Movie ",
            Subject::TvShows => "TV Show ",
            Subject::Everything | Subject::Title(_) => "",
        }
    }

    /// `" for 'Title'"` when a single title is selected.
    fn title_suffix(&self) -> String {
        match self {
            Subject::Title(title) => format!(" for {}", Self::quoted(title)),
            _ => String::new(),
        }
    }
}

/// Heading for `kind` run against `selection`.
pub fn chart_title(kind: AnalysisKind, selection: &Selection) -> String {
    let who = selection.profile.label();
    let subject = Subject::of(selection);

    match kind {
        AnalysisKind::Countries => format!("Where {who} Watched {}", subject.object()),
        AnalysisKind::DeviceTypes => {
            format!("Devices {who} Used to Watch {}", subject.object())
        }
        AnalysisKind::ViewingFrequency => format!(
            "Netflix {}Viewing Frequency of {who}{}",
            subject.adjective(),
            subject.title_suffix()
        ),
        AnalysisKind::ViewingActivityTimeline => format!(
            "Netflix {}Viewing Activity Timeline of {who}{}",
            subject.adjective(),
            subject.title_suffix()
        ),
        AnalysisKind::ViewingHeatMap => format!(
            "Heatmap of Netflix {}Viewing Activity of {who}{}",
            subject.adjective(),
            subject.title_suffix()
        ),
        AnalysisKind::MostWatchedMovies => format!("Most Watched Movies by {who}"),
        AnalysisKind::MostWatchedShows => format!("Most Watched TV Shows by {who}"),
        AnalysisKind::MostWatchedEpisodes => match subject {
            Subject::Title(title) => {
                format!("Most Watched Episodes of {} by {who}", Subject::quoted(title))
            }
            _ => format!("Most Watched Episodes by {who}"),
        },
        AnalysisKind::MostWatchedDays => match subject {
            Subject::Everything => format!("Most Watched Days by {who}"),
            _ => format!("Most Watched Days for {} by {who}", subject.object()),
        },
        AnalysisKind::Duration => match subject {
            Subject::Everything => format!("Duration of Content {who} Watched on Netflix"),
            Subject::Title(title) if !selection.profile.is_all() => {
                format!("Duration of {} Watched By {who}", Subject::quoted(title))
            }
            _ => format!("Duration of {} {who} Watched on Netflix", subject.object()),
        },
    }
}

/// `(x, y)` axis labels for `kind`. Stacked per-profile charts put profiles
/// on the x axis.
pub fn axis_labels(kind: AnalysisKind, stacked: bool) -> (&'static str, &'static str) {
    if stacked {
        return ("Profiles", "Frequency");
    }
    match kind {
        AnalysisKind::Countries => ("Countries", "Frequency"),
        AnalysisKind::DeviceTypes => ("Frequency", "Devices"),
        AnalysisKind::ViewingFrequency => ("Profile Names", "Frequency"),
        AnalysisKind::ViewingActivityTimeline => ("Date", "Frequency"),
        AnalysisKind::ViewingHeatMap => ("Hour of Day", "Day of Week"),
        AnalysisKind::MostWatchedMovies => ("Movies", "Frequency"),
        AnalysisKind::MostWatchedShows => ("Shows", "Frequency"),
        AnalysisKind::MostWatchedEpisodes => ("Episodes", "Frequency"),
        AnalysisKind::MostWatchedDays => ("Day of Week", "Frequency"),
        AnalysisKind::Duration => ("Duration", "Frequency"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewing_core::selection::ProfileFilter;

    fn selection(profile: &str, content: ContentFilter, title: &str) -> Selection {
        Selection::new(
            ProfileFilter::from_label(profile),
            content,
            TitleFilter::from_label(title),
        )
    }

    #[test]
    fn test_countries_titles() {
        assert_eq!(
            chart_title(
                AnalysisKind::Countries,
                &selection("All Profiles", ContentFilter::All, "All Titles")
            ),
            "Where All Profiles Watched Netflix"
        );
        assert_eq!(
            chart_title(
                AnalysisKind::Countries,
                &selection("Alice", ContentFilter::TvShow, "All Titles")
            ),
            "Where Alice Watched TV Shows"
        );
        assert_eq!(
            chart_title(
                AnalysisKind::Countries,
                &selection("Alice", ContentFilter::TvShow, "Dark")
            ),
            "Where Alice Watched 'Dark'"
        );
    }

    #[test]
    fn test_named_title_wins_under_all_types() {
        let named = selection("Alice", ContentFilter::All, "Dark");
        assert_eq!(
            chart_title(AnalysisKind::Countries, &named),
            "Where Alice Watched 'Dark'"
        );
        assert_eq!(
            chart_title(AnalysisKind::ViewingHeatMap, &named),
            "Heatmap of Netflix Viewing Activity of Alice for 'Dark'"
        );
    }

    #[test]
    fn test_frequency_and_heat_map_titles() {
        assert_eq!(
            chart_title(
                AnalysisKind::ViewingFrequency,
                &selection("Alice", ContentFilter::Movie, "All Titles")
            ),
            "Netflix Movie Viewing Frequency of Alice"
        );
        assert_eq!(
            chart_title(
                AnalysisKind::ViewingHeatMap,
                &selection("Bob", ContentFilter::TvShow, "Dark")
            ),
            "Heatmap of Netflix Viewing Activity of Bob for 'Dark'"
        );
        assert_eq!(
            chart_title(
                AnalysisKind::ViewingActivityTimeline,
                &selection("All Profiles", ContentFilter::All, "All Titles")
            ),
            "Netflix Viewing Activity Timeline of All Profiles"
        );
    }

    #[test]
    fn test_days_and_rankings_titles() {
        assert_eq!(
            chart_title(
                AnalysisKind::MostWatchedDays,
                &selection("Alice", ContentFilter::Movie, "All Titles")
            ),
            "Most Watched Days for Movies by Alice"
        );
        assert_eq!(
            chart_title(
                AnalysisKind::MostWatchedShows,
                &selection("All Profiles", ContentFilter::All, "All Titles")
            ),
            "Most Watched TV Shows by All Profiles"
        );
        assert_eq!(
            chart_title(
                AnalysisKind::MostWatchedEpisodes,
                &selection("Bob", ContentFilter::TvShow, "Dark")
            ),
            "Most Watched Episodes of 'Dark' by Bob"
        );
    }

    #[test]
    fn test_duration_titles() {
        assert_eq!(
            chart_title(
                AnalysisKind::Duration,
                &selection("All Profiles", ContentFilter::Movie, "All Titles")
            ),
            "Duration of Movies All Profiles Watched on Netflix"
        );
        assert_eq!(
            chart_title(
                AnalysisKind::Duration,
                &selection("Alice", ContentFilter::All, "All Titles")
            ),
            "Duration of Content Alice Watched on Netflix"
        );
        assert_eq!(
            chart_title(
                AnalysisKind::Duration,
                &selection("Alice", ContentFilter::Movie, "Heat")
            ),
            "Duration of 'Heat' Watched By Alice"
        );
    }

    #[test]
    fn test_axis_labels() {
        assert_eq!(
            axis_labels(AnalysisKind::Countries, true),
            ("Profiles", "Frequency")
        );
        assert_eq!(
            axis_labels(AnalysisKind::DeviceTypes, false),
            ("Frequency", "Devices")
        );
        assert_eq!(
            axis_labels(AnalysisKind::ViewingHeatMap, false),
            ("Hour of Day", "Day of Week")
        );
    }
}
