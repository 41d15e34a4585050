//! Chat pane showing the tail of the cluster chat log.

use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use crate::theme::Theme;

pub struct SidePanel<'a> {
    chat_lines: &'a [String],
    refreshed_at: Option<DateTime<Local>>,
    theme: &'a Theme,
}

impl<'a> SidePanel<'a> {
    pub fn new(chat_lines: &'a [String], theme: &'a Theme) -> Self {
        Self {
            chat_lines,
            refreshed_at: None,
            theme,
        }
    }

    /// Stamp the title with the last refresh time.
    pub fn refreshed_at(mut self, at: DateTime<Local>) -> Self {
        self.refreshed_at = Some(at);
        self
    }

    fn title(&self) -> String {
        match self.refreshed_at {
            Some(at) => format!(" Chat ({}) ", at.format("%H:%M:%S")),
            None => " Chat ".to_string(),
        }
    }

    /// Build the content lines for the pane.
    pub fn build_lines(&self) -> Vec<Line<'static>> {
        self.chat_lines
            .iter()
            .map(|raw| {
                // Placeholder lines from the reader render dimmed.
                let style = if raw.starts_with("No chat messages")
                    || raw.starts_with("Chat log not found")
                    || raw.starts_with("Error reading chat log")
                {
                    Style::default().fg(self.theme.text_dim)
                } else {
                    Style::default().fg(self.theme.text)
                };
                Line::from(Span::styled(raw.clone(), style))
            })
            .collect()
    }
}

impl Widget for SidePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.border));

        Paragraph::new(self.build_lines())
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
