//! Drawing of analysis charts.
//!
//! [`render_chart`] picks a widget for each [`ChartBody`] variant. Plain bars
//! and the timeline use [`BarChart`]; stacked charts and the heat map are
//! delegated to [`crate::table_view`]. [`text_report`] produces the same
//! content as plain lines for non-interactive output.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Bar as BarWidget, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use viewing_core::formatting::{format_count, percentage};
use viewing_core::models::DAY_NAMES;
use viewing_data::chart::{Bar, Chart, ChartBody, DailyCount, Orientation};

use crate::components::selector::truncate;
use crate::table_view::{render_heat_map, render_no_data, render_stacked_table};
use crate::themes::Theme;

const MAX_HORIZONTAL_LABEL: usize = 24;

/// Draw `chart` into `area`, or a placeholder when it has no data.
pub fn render_chart(frame: &mut Frame, area: Rect, chart: &Chart, theme: &Theme) {
    if chart.is_empty() {
        render_no_data(frame, area, "No viewing data for this selection", theme);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(chart.title.clone(), theme.chart_title))),
        chunks[0],
    );

    let block_title = format!("{} · {}", chart.kind, chart.y_label);
    match &chart.body {
        ChartBody::Bars { orientation, bars } => {
            render_bars(frame, chunks[1], &block_title, bars, *orientation, theme)
        }
        ChartBody::Stacked(stacked) => {
            render_stacked_table(frame, chunks[1], &block_title, stacked, theme)
        }
        ChartBody::Timeline { days } => render_timeline(frame, chunks[1], days, theme),
        ChartBody::HeatMap(grid) => render_heat_map(frame, chunks[1], &block_title, grid, theme),
    }

    let footer = Line::from(vec![
        Span::styled(format!("x: {}", chart.x_label), theme.axis),
        Span::styled("   ", theme.dim),
        Span::styled(format!("y: {}", chart.y_label), theme.axis),
        Span::styled("   ", theme.dim),
        Span::styled(
            format!("{} sessions", format_count(chart.total())),
            theme.value,
        ),
    ]);
    frame.render_widget(Paragraph::new(footer), chunks[2]);
}

/// Width of each vertical bar so `count` bars fill `width` columns.
fn vertical_bar_width(width: u16, count: usize) -> u16 {
    if count == 0 {
        return 1;
    }
    let per_bar = width.saturating_sub(2) / count as u16;
    per_bar.saturating_sub(1).clamp(1, 12)
}

fn render_bars(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    bars: &[Bar],
    orientation: Orientation,
    theme: &Theme,
) {
    let (direction, bar_width, label_width) = match orientation {
        Orientation::Vertical => {
            let width = vertical_bar_width(area.width, bars.len());
            (Direction::Vertical, width, width as usize)
        }
        Orientation::Horizontal => (Direction::Horizontal, 1, MAX_HORIZONTAL_LABEL),
    };

    let widgets: Vec<BarWidget> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            BarWidget::default()
                .value(bar.value)
                .label(Line::from(truncate(&bar.label, label_width)))
                .style(ratatui::style::Style::default().fg(theme.series_color(i)))
                .value_style(theme.bar_value)
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {title} ")),
        )
        .data(BarGroup::default().bars(&widgets))
        .direction(direction)
        .bar_width(bar_width)
        .bar_gap(1);

    frame.render_widget(chart, area);
}

/// Days that fit in `width` columns, most recent last.
fn visible_days(days: &[DailyCount], width: u16) -> &[DailyCount] {
    let columns = width.saturating_sub(2) as usize;
    &days[days.len().saturating_sub(columns)..]
}

fn render_timeline(frame: &mut Frame, area: Rect, days: &[DailyCount], theme: &Theme) {
    let shown = visible_days(days, area.width);
    let title = match (shown.first(), shown.last()) {
        (Some(first), Some(last)) => format!(" {} – {} ", first.date, last.date),
        _ => " Timeline ".to_string(),
    };

    let widgets: Vec<BarWidget> = shown
        .iter()
        .map(|day| {
            BarWidget::default()
                .value(day.count)
                .text_value(String::new())
                .style(ratatui::style::Style::default().fg(theme.series_color(0)))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(BarGroup::default().bars(&widgets))
        .bar_width(1)
        .bar_gap(0);

    frame.render_widget(chart, area);
}

// ── Plain text ───────────────────────────────────────────────────────────────

/// Render `chart` as plain text lines: title, body, then a total.
pub fn text_report(chart: &Chart) -> Vec<String> {
    let mut lines = vec![chart.title.clone(), "-".repeat(chart.title.width())];

    if chart.is_empty() {
        lines.push("No viewing data for this selection.".to_string());
        return lines;
    }

    match &chart.body {
        ChartBody::Bars { bars, .. } => {
            let width = bars.iter().map(|b| b.label.width()).max().unwrap_or(0);
            let total = chart.total() as f64;
            lines.extend(bars.iter().map(|b| {
                let pad = width - b.label.width();
                let share = percentage(b.value as f64, total, 1);
                format!(
                    "{}{}  {:>8}  {:>5.1}%",
                    b.label,
                    " ".repeat(pad),
                    format_count(b.value),
                    share
                )
            }));
        }
        ChartBody::Stacked(stacked) => {
            let mut header = format!("{:<16}", "Profile");
            for series in &stacked.series {
                header.push_str(&format!(" {:>12}", truncate(&series.label, 12)));
            }
            header.push_str(&format!(" {:>12}", "Total"));
            lines.push(header);

            for (p, profile) in stacked.profiles.iter().enumerate() {
                let mut row = format!("{:<16}", truncate(profile, 16));
                for series in &stacked.series {
                    let value = series.values.get(p).copied().unwrap_or(0);
                    row.push_str(&format!(" {:>12}", format_count(value)));
                }
                row.push_str(&format!(" {:>12}", format_count(stacked.profile_total(p))));
                lines.push(row);
            }
        }
        ChartBody::Timeline { days } => {
            lines.extend(
                days.iter()
                    .map(|d| format!("{}  {:>6}", d.date, format_count(d.count))),
            );
        }
        ChartBody::HeatMap(grid) => {
            let mut header = String::from("    ");
            for hour in 0..24 {
                header.push_str(&format!("{hour:>4}"));
            }
            lines.push(header);
            for (row, day) in grid.counts.iter().zip(DAY_NAMES) {
                let mut line = format!("{:<4}", &day[..3]);
                for count in row {
                    line.push_str(&format!("{count:>4}"));
                }
                lines.push(line);
            }
        }
    }

    lines.push(format!("Total: {} sessions", format_count(chart.total())));
    lines
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use viewing_core::selection::AnalysisKind;
    use viewing_data::chart::{HeatMapGrid, StackSeries, StackedBars};

    fn chart(kind: AnalysisKind, body: ChartBody) -> Chart {
        Chart {
            kind,
            title: format!("{kind} of All Profiles"),
            x_label: "Profiles".into(),
            y_label: "Frequency".into(),
            body,
        }
    }

    fn frequency() -> Chart {
        chart(
            AnalysisKind::ViewingFrequency,
            ChartBody::Bars {
                orientation: Orientation::Vertical,
                bars: vec![Bar::new("Alice", 12), Bar::new("Bob", 3)],
            },
        )
    }

    fn timeline() -> Chart {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let days = (0..5)
            .map(|i| DailyCount {
                date: start + chrono::Duration::days(i),
                count: if i == 0 || i == 4 { 1 } else { 0 },
            })
            .collect();
        chart(AnalysisKind::ViewingActivityTimeline, ChartBody::Timeline { days })
    }

    fn draw(chart: &Chart, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_chart(frame, frame.area(), chart, &theme))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    #[test]
    fn test_render_vertical_bars() {
        let text = draw(&frequency(), 60, 16);
        assert!(text.contains("Viewing Frequency of All Profiles"));
        assert!(text.contains("15 sessions"));
    }

    #[test]
    fn test_render_horizontal_bars() {
        let devices = chart(
            AnalysisKind::DeviceTypes,
            ChartBody::Bars {
                orientation: Orientation::Horizontal,
                bars: vec![Bar::new("Smart TV", 4), Bar::new("iPhone", 1)],
            },
        );
        let text = draw(&devices, 60, 12);
        assert!(text.contains("Smart TV"));
    }

    #[test]
    fn test_render_timeline_and_heat_map() {
        draw(&timeline(), 40, 10);

        let mut grid = HeatMapGrid::empty();
        grid.counts[0][21] = 2;
        grid.span = Some((
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap().and_hms_opt(21, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap().and_hms_opt(21, 0, 0).unwrap(),
        ));
        let text = draw(&chart(AnalysisKind::ViewingHeatMap, ChartBody::HeatMap(grid)), 70, 14);
        assert!(text.contains("Mon"));
    }

    #[test]
    fn test_render_empty_chart_shows_placeholder() {
        let empty = chart(
            AnalysisKind::ViewingFrequency,
            ChartBody::Bars {
                orientation: Orientation::Vertical,
                bars: Vec::new(),
            },
        );
        let text = draw(&empty, 60, 8);
        assert!(text.contains("No viewing data for this selection"));
    }

    #[test]
    fn test_render_tiny_area_does_not_panic() {
        draw(&frequency(), 4, 3);
        draw(&timeline(), 3, 2);
    }

    // ── Layout helpers ───────────────────────────────────────────────────────

    #[test]
    fn test_vertical_bar_width() {
        assert_eq!(vertical_bar_width(62, 2), 12);
        assert_eq!(vertical_bar_width(22, 5), 3);
        assert_eq!(vertical_bar_width(5, 10), 1);
        assert_eq!(vertical_bar_width(40, 0), 1);
    }

    #[test]
    fn test_visible_days_keeps_most_recent() {
        let ChartBody::Timeline { days } = timeline().body else {
            panic!("expected timeline");
        };
        let shown = visible_days(&days, 5);
        assert_eq!(shown.len(), 3);
        assert_eq!(shown[2].date, NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
        assert_eq!(visible_days(&days, 80).len(), 5);
    }

    // ── Text report ──────────────────────────────────────────────────────────

    #[test]
    fn test_text_report_bars() {
        let lines = text_report(&frequency());
        assert_eq!(lines[0], "Viewing Frequency of All Profiles");
        assert_eq!(lines[2], "Alice        12   80.0%");
        assert_eq!(lines[3], "Bob           3   20.0%");
        assert_eq!(lines.last().unwrap(), "Total: 15 sessions");
    }

    #[test]
    fn test_text_report_timeline_lists_every_day() {
        let lines = text_report(&timeline());
        assert_eq!(lines.len(), 2 + 5 + 1);
        assert_eq!(lines[3], "2023-01-02       0");
    }

    #[test]
    fn test_text_report_stacked() {
        let stacked = chart(
            AnalysisKind::Countries,
            ChartBody::Stacked(StackedBars {
                profiles: vec!["Alice".into(), "Bob".into()],
                series: vec![StackSeries {
                    label: "US".into(),
                    values: vec![2, 1],
                    baseline: None,
                }],
            }),
        );
        let lines = text_report(&stacked);
        assert!(lines[2].starts_with("Profile"));
        assert!(lines[3].starts_with("Alice"));
        assert!(lines[3].trim_end().ends_with('2'));
        assert_eq!(lines.last().unwrap(), "Total: 3 sessions");
    }

    #[test]
    fn test_text_report_heat_map_has_seven_rows() {
        let mut grid = HeatMapGrid::empty();
        grid.counts[6][23] = 7;
        grid.span = Some((
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(23, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(23, 0, 0).unwrap(),
        ));
        let lines = text_report(&chart(AnalysisKind::ViewingHeatMap, ChartBody::HeatMap(grid)));
        // title, rule, hour header, 7 days, total
        assert_eq!(lines.len(), 11);
        assert!(lines[9].starts_with("Sun"));
        assert!(lines[9].ends_with("   7"));
    }

    #[test]
    fn test_text_report_empty() {
        let empty = chart(
            AnalysisKind::Countries,
            ChartBody::Stacked(StackedBars {
                profiles: Vec::new(),
                series: Vec::new(),
            }),
        );
        let lines = text_report(&empty);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "No viewing data for this selection.");
    }
}
