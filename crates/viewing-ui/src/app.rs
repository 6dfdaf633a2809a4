//! Interactive viewer: selectors, analysis history and the TUI event loop.
//!
//! [`App`] owns the [`ViewingSession`] and the [`AnalysisHistory`]. Every
//! state change goes through [`App::handle_key`] so the behaviour can be
//! exercised without a terminal.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};

use viewing_core::selection::{
    AnalysisKind, ContentFilter, ProfileFilter, Selection, TitleFilter,
};
use viewing_core::formatting::format_watch_time;
use viewing_runtime::export::export_chart;
use viewing_runtime::history::{AnalysisHistory, HistoryEntry};
use viewing_runtime::session::ViewingSession;

use crate::chart_view;
use crate::components::header::Header;
use crate::components::selector::Selector;
use crate::table_view;
use crate::themes::Theme;

const SIDEBAR_WIDTH: u16 = 34;

/// Leave raw mode and the alternate screen.
///
/// For callers that abandon [`App::run`] early, e.g. on a signal.
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

// ── Focus ─────────────────────────────────────────────────────────────────────

/// Which selector receives Up/Down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Timezone,
    Profile,
    ContentType,
    Title,
    Analysis,
}

impl Focus {
    const ORDER: [Focus; 5] = [
        Focus::Timezone,
        Focus::Profile,
        Focus::ContentType,
        Focus::Title,
        Focus::Analysis,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

// ── Status line ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    fn success(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Success,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub theme: Theme,
    session: ViewingSession,
    history: AnalysisHistory,
    timezones: Selector,
    profiles: Selector,
    content_types: Selector,
    titles: Selector,
    analyses: Selector,
    focus: Focus,
    /// Index into the history counted from the newest entry.
    viewing: usize,
    export_dir: PathBuf,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl App {
    /// Build the app around an opened session.
    ///
    /// The session's current timezone is added to `timezone_choices` when it
    /// is missing so the selector always shows the active zone.
    pub fn new(
        session: ViewingSession,
        theme_name: &str,
        mut timezone_choices: Vec<String>,
        export_dir: PathBuf,
    ) -> Self {
        let current = session.timezone().to_string();
        if !timezone_choices.contains(&current) {
            timezone_choices.insert(0, current.clone());
        }
        let mut timezones = Selector::new("Timezone", timezone_choices);
        timezones.select(&current);

        let content_types = Selector::new(
            "Content Type",
            ContentFilter::ALL.iter().map(|c| c.label().to_string()).collect(),
        );

        let mut app = Self {
            theme: Theme::from_name(theme_name),
            profiles: Selector::new("Profile", session.profiles()),
            titles: Selector::new("Title", Vec::new()),
            analyses: Selector::new("Analysis", Vec::new()),
            session,
            history: AnalysisHistory::new(),
            timezones,
            content_types,
            focus: Focus::Analysis,
            viewing: 0,
            export_dir,
            status: None,
            should_quit: false,
        };
        app.refresh_titles();
        app.refresh_analyses();
        app
    }

    /// Preselect the given filters. Names that are not offered are ignored.
    pub fn preselect(&mut self, selection: &Selection) {
        self.profiles.select(selection.profile.label());
        if let Some(index) = ContentFilter::ALL
            .iter()
            .position(|c| *c == selection.content_type)
        {
            self.content_types.select_index(index);
        }
        self.refresh_titles();
        self.titles.select(selection.title.label());
        self.refresh_analyses();
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn session(&self) -> &ViewingSession {
        &self.session
    }

    pub fn history(&self) -> &AnalysisHistory {
        &self.history
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The filters currently chosen in the sidebar.
    pub fn selection(&self) -> Selection {
        let content_type = ContentFilter::ALL
            .get(self.content_types.index())
            .copied()
            .unwrap_or_default();
        Selection::new(
            ProfileFilter::from_label(self.profiles.selected()),
            content_type,
            TitleFilter::from_label(self.titles.selected()),
        )
    }

    pub fn selected_analysis(&self) -> Option<AnalysisKind> {
        AnalysisKind::from_label(self.analyses.selected())
    }

    /// The history entry on screen.
    pub fn current_entry(&self) -> Option<&HistoryEntry> {
        self.history.get_newest(self.viewing)
    }

    /// Choices of the selector with the given focus.
    pub fn choices(&self, focus: Focus) -> &[String] {
        self.selector(focus).options()
    }

    fn selector(&self, focus: Focus) -> &Selector {
        match focus {
            Focus::Timezone => &self.timezones,
            Focus::Profile => &self.profiles,
            Focus::ContentType => &self.content_types,
            Focus::Title => &self.titles,
            Focus::Analysis => &self.analyses,
        }
    }

    fn selector_mut(&mut self, focus: Focus) -> &mut Selector {
        match focus {
            Focus::Timezone => &mut self.timezones,
            Focus::Profile => &mut self.profiles,
            Focus::ContentType => &mut self.content_types,
            Focus::Title => &mut self.titles,
            Focus::Analysis => &mut self.analyses,
        }
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Left => self.focus = self.focus.previous(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Enter | KeyCode::Char('r') => self.run_selected(),
            KeyCode::Char('c') => self.clear_history(),
            KeyCode::Char('e') => self.export_current(),
            KeyCode::PageDown | KeyCode::Char(']') => self.show_older(),
            KeyCode::PageUp | KeyCode::Char('[') => self.show_newer(),
            _ => {}
        }
    }

    fn move_selection(&mut self, forward: bool) {
        let focus = self.focus;
        let previous = self.selector(focus).selected().to_string();
        let selector = self.selector_mut(focus);
        let changed = if forward {
            selector.next()
        } else {
            selector.previous()
        };
        if changed {
            self.on_selection_changed(focus, &previous);
        }
    }

    fn on_selection_changed(&mut self, focus: Focus, previous: &str) {
        match focus {
            Focus::Timezone => {
                let timezone = self.timezones.selected().to_string();
                match self.session.set_timezone(&timezone) {
                    Ok(()) => {
                        self.profiles.set_options(self.session.profiles());
                        self.refresh_titles();
                        self.refresh_analyses();
                        self.status = Some(StatusMessage::info(format!("Timezone: {timezone}")));
                    }
                    Err(e) => {
                        tracing::warn!(timezone, error = %e, "timezone switch failed");
                        self.timezones.select(previous);
                        self.status = Some(StatusMessage::error(e.to_string()));
                    }
                }
            }
            Focus::Profile | Focus::ContentType => {
                self.refresh_titles();
                self.refresh_analyses();
            }
            Focus::Title => self.refresh_analyses(),
            Focus::Analysis => {}
        }
    }

    /// Offer the titles left by the profile and content type selectors.
    fn refresh_titles(&mut self) {
        let selection = self.selection();
        let titles = self.session.titles(&selection);
        self.titles.set_options(titles);
    }

    /// Offer the analyses that make sense for the content type and title.
    fn refresh_analyses(&mut self) {
        let selection = self.selection();
        let kinds = AnalysisKind::available_for(selection.content_type, &selection.title);
        self.analyses
            .set_options(kinds.iter().map(|k| k.label().to_string()).collect());
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    /// Run the selected analysis and show its chart.
    pub fn run_selected(&mut self) {
        let Some(kind) = self.selected_analysis() else {
            self.status = Some(StatusMessage::error("No analysis selected"));
            return;
        };
        let selection = self.selection();
        let chart = self
            .session
            .run_analysis(kind, &selection, &mut self.history);
        self.viewing = 0;
        self.status = Some(if chart.is_empty() {
            StatusMessage::error(format!("{kind}: no viewing data for {}", selection.describe()))
        } else {
            let watched = self
                .session
                .records_for(&selection)
                .iter()
                .fold(chrono::Duration::zero(), |acc, r| acc + r.duration);
            StatusMessage::success(format!(
                "{kind}: {} · {} watched",
                selection.describe(),
                format_watch_time(watched)
            ))
        });
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.viewing = 0;
        self.status = Some(StatusMessage::info("History cleared"));
    }

    /// Write the chart on screen to the exports directory.
    pub fn export_current(&mut self) {
        let Some(entry) = self.current_entry() else {
            self.status = Some(StatusMessage::error("Nothing to export"));
            return;
        };
        self.status = Some(match export_chart(&entry.chart, &self.export_dir) {
            Ok(path) => StatusMessage::success(format!("Exported {}", path.display())),
            Err(e) => {
                tracing::error!(error = %e, "chart export failed");
                StatusMessage::error(format!("Export failed: {e}"))
            }
        });
    }

    fn show_older(&mut self) {
        if self.viewing + 1 < self.history.len() {
            self.viewing += 1;
        }
    }

    fn show_newer(&mut self) {
        self.viewing = self.viewing.saturating_sub(1);
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the TUI until `q`, `Esc` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the caller can
    /// race this future against a signal handler.
    pub async fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
            tokio::task::yield_now().await;
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(area);

        let source = self
            .session
            .source()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "(in memory)".to_string());
        let header = Header::new(
            &source,
            self.session.timezone(),
            self.session.records().len(),
            &self.theme,
        );
        frame.render_widget(Paragraph::new(header.to_lines()), rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(rows[1]);

        self.render_sidebar(frame, columns[0]);

        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(8)])
            .split(columns[1]);

        match self.current_entry() {
            Some(entry) => chart_view::render_chart(frame, main[0], &entry.chart, &self.theme),
            None => table_view::render_no_data(frame, main[0], "No analysis run yet", &self.theme),
        }
        self.render_history(frame, main[1]);
        self.render_status(frame, rows[2]);
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(5),
                Constraint::Length(5),
                Constraint::Min(5),
                Constraint::Length(12),
            ])
            .split(area);

        for (focus, chunk) in Focus::ORDER.into_iter().zip(chunks.iter()) {
            self.selector(focus)
                .render(frame, *chunk, focus == self.focus, &self.theme);
        }
    }

    fn render_history(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .history
            .newest_first()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        entry.created_at.format("%H:%M:%S ").to_string(),
                        self.theme.dim,
                    ),
                    Span::styled(entry.label(), self.theme.value),
                    Span::styled(
                        format!("  {} · {}", entry.selection.describe(), entry.timezone),
                        self.theme.text,
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" History ({}) ", self.history.len())),
            )
            .highlight_style(self.theme.selected);

        let mut state = ListState::default();
        if !self.history.is_empty() {
            state.select(Some(self.viewing));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.status {
            Some(status) => {
                let style = match status.level {
                    StatusLevel::Info => self.theme.info,
                    StatusLevel::Success => self.theme.success,
                    StatusLevel::Error => self.theme.error,
                };
                Line::from(Span::styled(status.text.clone(), style))
            }
            None => Line::from(Span::styled(
                "Tab: next selector  ↑/↓: choose  Enter: run  [/]: history  e: export  c: clear  q: quit",
                self.theme.dim,
            )),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
