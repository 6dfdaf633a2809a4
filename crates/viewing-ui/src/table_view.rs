//! Table renderings for charts that do not fit a single bar series.
//!
//! Stacked charts become one row per profile with a column per series plus a
//! highlighted totals row. The heat map becomes a weekday × hour grid of
//! coloured cells.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use viewing_core::formatting::format_count;
use viewing_core::models::DAY_NAMES;
use viewing_data::chart::{HeatMapGrid, StackedBars};

use crate::components::selector::truncate;
use crate::themes::Theme;

const PROFILE_COLUMN: u16 = 16;
const SERIES_COLUMN: u16 = 12;

/// Render a stacked chart as a profile × series table.
pub fn render_stacked_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    stacked: &StackedBars,
    theme: &Theme,
) {
    let label_width = SERIES_COLUMN as usize - 1;
    let mut header_cells = vec![Cell::from("Profile").style(theme.table_header)];
    header_cells.extend(stacked.series.iter().enumerate().map(|(i, s)| {
        Cell::from(truncate(&s.label, label_width))
            .style(theme.table_header.fg(theme.series_color(i)))
    }));
    header_cells.push(Cell::from("Total").style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let mut rows: Vec<Row> = stacked
        .profiles
        .iter()
        .enumerate()
        .map(|(p, profile)| {
            let mut cells = vec![Cell::from(truncate(profile, PROFILE_COLUMN as usize - 1))];
            cells.extend(
                stacked
                    .series
                    .iter()
                    .map(|s| Cell::from(format_count(s.values.get(p).copied().unwrap_or(0)))),
            );
            cells.push(Cell::from(format_count(stacked.profile_total(p))));
            Row::new(cells).style(theme.row_style(p))
        })
        .collect();

    let mut total_cells = vec![Cell::from("TOTAL")];
    total_cells.extend(
        stacked
            .series
            .iter()
            .map(|s| Cell::from(format_count(s.values.iter().sum()))),
    );
    let grand_total: u64 = (0..stacked.profiles.len())
        .map(|p| stacked.profile_total(p))
        .sum();
    total_cells.push(Cell::from(format_count(grand_total)));
    rows.push(Row::new(total_cells).style(theme.table_total));

    let mut widths = vec![Constraint::Length(PROFILE_COLUMN)];
    widths.extend(stacked.series.iter().map(|_| Constraint::Length(SERIES_COLUMN)));
    widths.push(Constraint::Length(SERIES_COLUMN));

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {title} ")),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render the weekday × hour grid. Each cell is two columns wide and coloured
/// by its count relative to the busiest cell.
pub fn render_heat_map(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    grid: &HeatMapGrid,
    theme: &Theme,
) {
    let max = grid.max();

    let mut header_cells = vec![Cell::from("")];
    header_cells.extend((0..24).map(|h| {
        let label = if h % 3 == 0 { format!("{h:02}") } else { String::new() };
        Cell::from(label).style(theme.axis)
    }));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = grid
        .counts
        .iter()
        .zip(DAY_NAMES)
        .map(|(row, day)| {
            let mut cells = vec![Cell::from(&day[..3]).style(theme.axis)];
            cells.extend(row.iter().map(|&count| {
                Cell::from("  ").style(Style::default().bg(theme.heat_color(count, max)))
            }));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(4)];
    widths.extend((0..24).map(|_| Constraint::Length(2)));

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(0)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {title} ")),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Placeholder shown when a chart has nothing to draw or none was run yet.
pub fn render_no_data(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Pick a different profile, content type or title.",
            theme.dim,
        )),
        Line::from(Span::styled("Press Enter to run the selected analysis", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Viewing Activity "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use viewing_data::chart::StackSeries;

    fn stacked() -> StackedBars {
        StackedBars {
            profiles: vec!["Alice".into(), "Bob".into()],
            series: vec![
                StackSeries {
                    label: "DE (Germany)".into(),
                    values: vec![3, 0],
                    baseline: None,
                },
                StackSeries {
                    label: "US (United States)".into(),
                    values: vec![1, 4],
                    baseline: Some(vec![3, 0]),
                },
            ],
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_render_stacked_table_shows_totals() {
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| {
                render_stacked_table(frame, frame.area(), "Countries", &stacked(), &theme)
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Alice"));
        assert!(text.contains("TOTAL"));
        assert!(text.contains("DE (German…"));
    }

    #[test]
    fn test_render_stacked_table_empty_series() {
        let mut terminal = Terminal::new(TestBackend::new(40, 6)).unwrap();
        let theme = Theme::dark();
        let empty = StackedBars {
            profiles: Vec::new(),
            series: Vec::new(),
        };
        terminal
            .draw(|frame| render_stacked_table(frame, frame.area(), "Countries", &empty, &theme))
            .unwrap();
    }

    #[test]
    fn test_render_heat_map_labels_days() {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        let theme = Theme::dark();
        let mut grid = HeatMapGrid::empty();
        grid.counts[6][21] = 5;
        terminal
            .draw(|frame| render_heat_map(frame, frame.area(), "Heatmap", &grid, &theme))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Mon"));
        assert!(text.contains("Sun"));
    }

    #[test]
    fn test_render_heat_map_small_area() {
        let mut terminal = Terminal::new(TestBackend::new(10, 3)).unwrap();
        let theme = Theme::classic();
        terminal
            .draw(|frame| {
                render_heat_map(frame, frame.area(), "Heatmap", &HeatMapGrid::empty(), &theme)
            })
            .unwrap();
    }

    #[test]
    fn test_render_no_data() {
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_no_data(frame, frame.area(), "No viewing data", &theme))
            .unwrap();
        assert!(buffer_text(&terminal).contains("No viewing data"));
    }
}
