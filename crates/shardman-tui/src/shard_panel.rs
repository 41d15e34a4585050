//! Shard list panel with per-row action cursors.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use shardman_core::Shard;

use crate::selection::{Focus, RowAction, Selection};
use crate::theme::Theme;

/// Widest shard name the panel pads to before action buttons.
const NAME_WIDTH: usize = 12;

/// One row per shard: status dot, name, enabled marker, action buttons.
pub struct ShardPanel<'a> {
    shards: &'a [Shard],
    selection: &'a Selection,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> ShardPanel<'a> {
    pub fn new(shards: &'a [Shard], selection: &'a Selection, theme: &'a Theme) -> Self {
        Self {
            shards,
            selection,
            theme,
            focused: false,
        }
    }

    /// Set whether the selection currently sits in this panel.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn status_span(&self, shard: &Shard) -> Span<'static> {
        if shard.is_running {
            Span::styled("● ", Style::default().fg(self.theme.running))
        } else {
            Span::styled("○ ", Style::default().fg(self.theme.stopped))
        }
    }

    fn action_spans(&self, row: usize) -> Vec<Span<'static>> {
        let focused_action = match self.selection.focus() {
            Focus::Shard(focus_row) if self.focused && focus_row == row => {
                Some(self.selection.row_action())
            }
            _ => None,
        };

        let mut spans = Vec::new();
        for action in RowAction::ALL {
            let style = if focused_action == Some(action) {
                Style::default()
                    .fg(self.theme.highlight_fg)
                    .bg(self.theme.highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.text_dim)
            };
            spans.push(Span::styled(format!("[{}]", action.label()), style));
            spans.push(Span::raw(" "));
        }
        spans
    }

    /// Build the content lines for the panel.
    pub fn build_lines(&self) -> Vec<Line<'static>> {
        if self.shards.is_empty() {
            return vec![Line::from(Span::styled(
                "No shards configured. Add entries to shards.conf.",
                Style::default().fg(self.theme.text_dim),
            ))];
        }

        self.shards
            .iter()
            .enumerate()
            .map(|(row, shard)| {
                let mut spans = vec![self.status_span(shard)];

                let name_style = if shard.is_running {
                    Style::default().fg(self.theme.text)
                } else {
                    Style::default().fg(self.theme.text_dim)
                };
                spans.push(Span::styled(
                    format!("{:<NAME_WIDTH$}", shard.name),
                    name_style,
                ));

                let marker = if shard.is_enabled { "[on boot] " } else { "          " };
                spans.push(Span::styled(
                    marker.to_string(),
                    Style::default().fg(self.theme.text_dim),
                ));

                spans.extend(self.action_spans(row));
                Line::from(spans)
            })
            .collect()
    }
}

impl Widget for ShardPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.focused {
            self.theme.border_focus
        } else {
            self.theme.border
        };
        let block = Block::default()
            .title(" Shards ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        Paragraph::new(self.build_lines()).block(block).render(area, buf);
    }
}
