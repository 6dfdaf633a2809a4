//! Single-choice list used for every sidebar selector.

use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::themes::Theme;

/// A labelled list of choices with one selected.
#[derive(Debug, Clone)]
pub struct Selector {
    pub label: &'static str,
    options: Vec<String>,
    index: usize,
}

impl Selector {
    pub fn new(label: &'static str, options: Vec<String>) -> Self {
        Self {
            label,
            options,
            index: 0,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Currently selected choice, or `""` when there are none.
    pub fn selected(&self) -> &str {
        self.options
            .get(self.index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Move down one choice. Returns `true` if the selection changed.
    pub fn next(&mut self) -> bool {
        if self.index + 1 < self.options.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Move up one choice. Returns `true` if the selection changed.
    pub fn previous(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Select `choice` if it is offered.
    pub fn select(&mut self, choice: &str) -> bool {
        match self.options.iter().position(|o| o == choice) {
            Some(index) => {
                self.index = index;
                true
            }
            None => false,
        }
    }

    pub fn select_index(&mut self, index: usize) {
        if index < self.options.len() {
            self.index = index;
        }
    }

    /// Replace the choices, keeping the current one when it is still offered.
    pub fn set_options(&mut self, options: Vec<String>) {
        let current = self.selected().to_string();
        self.options = options;
        self.index = self
            .options
            .iter()
            .position(|o| *o == current)
            .unwrap_or(0);
    }

    /// Draw the selector, scrolled so the selected choice is visible.
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        let inner_width = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = self
            .options
            .iter()
            .map(|o| ListItem::new(Line::from(truncate(o, inner_width))))
            .collect();

        let border = if focused {
            theme.focused_border
        } else {
            theme.unfocused_border
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(format!(" {} ", self.label)),
            )
            .style(theme.text)
            .highlight_style(theme.selected);

        let mut state = ListState::default().with_selected(Some(self.index));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// Cut `text` to at most `width` terminal columns, ending in `…` when cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
