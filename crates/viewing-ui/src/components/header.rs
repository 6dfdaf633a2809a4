use crate::themes::Theme;
use ratatui::text::{Line, Span};

use viewing_core::formatting::format_count;

/// Decorative string placed either side of the application title.
pub const MARQUEE: &str = "▶ ▷ ▶";

/// Viewer header rendering four lines:
///
/// 1. Application title between marquee decorations (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Source, timezone and session count as `[ file | timezone | N sessions ]`.
/// 4. An empty line.
pub struct Header<'a> {
    /// File name of the loaded export.
    pub source: &'a str,
    /// IANA timezone the table is expressed in.
    pub timezone: &'a str,
    /// Sessions kept by the loader.
    pub sessions: usize,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, timezone: &'a str, sessions: usize, theme: &'a Theme) -> Self {
        Self {
            source,
            timezone,
            sessions,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);
        let noun = if self.sessions == 1 {
            "session"
        } else {
            "sessions"
        };

        vec![
            Line::from(vec![
                Span::styled(MARQUEE, self.theme.header_accent),
                Span::styled(" NETFLIX VIEWING ACTIVITY ", self.theme.header),
                Span::styled(MARQUEE, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.timezone, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(
                    format!("{} {noun}", format_count(self.sessions as u64)),
                    self.theme.value,
                ),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_has_four_lines() {
        let theme = Theme::dark();
        let header = Header::new("ViewingActivity.csv", "UTC", 12, &theme);
        assert_eq!(header.to_lines().len(), 4);
    }

    #[test]
    fn test_header_title_line() {
        let theme = Theme::dark();
        let lines = Header::new("ViewingActivity.csv", "UTC", 12, &theme).to_lines();
        let title = text(&lines[0]);
        assert!(title.contains("NETFLIX VIEWING ACTIVITY"), "got: {title}");
        assert!(title.starts_with(MARQUEE));
    }

    #[test]
    fn test_header_separator_line() {
        let theme = Theme::dark();
        let lines = Header::new("a.csv", "UTC", 0, &theme).to_lines();
        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), 60);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_info_line() {
        let theme = Theme::dark();
        let lines = Header::new("ViewingActivity.csv", "America/New_York", 12_345, &theme)
            .to_lines();
        assert_eq!(
            text(&lines[2]),
            "[ ViewingActivity.csv | America/New_York | 12,345 sessions ]"
        );
    }

    #[test]
    fn test_header_singular_session() {
        let theme = Theme::dark();
        let lines = Header::new("a.csv", "UTC", 1, &theme).to_lines();
        assert!(text(&lines[2]).contains("1 session ]"));
    }

    #[test]
    fn test_header_empty_fourth_line() {
        let theme = Theme::dark();
        let lines = Header::new("a.csv", "UTC", 1, &theme).to_lines();
        assert!(text(&lines[3]).is_empty());
    }
}
