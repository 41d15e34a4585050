//! Global fleet action grid, three rows of two cells.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::selection::{Focus, GlobalAction, Selection};
use crate::theme::Theme;

/// Cell label width, keeping the two columns aligned.
const CELL_WIDTH: usize = 14;

pub struct GlobalPanel<'a> {
    selection: &'a Selection,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> GlobalPanel<'a> {
    pub fn new(selection: &'a Selection, theme: &'a Theme) -> Self {
        Self {
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

    fn cell_span(&self, cell: usize) -> Span<'static> {
        let action = GlobalAction::ALL[cell];
        let is_focused = self.focused
            && matches!(self.selection.focus(), Focus::Global(focus) if focus == cell);
        let style = if is_focused {
            Style::default()
                .fg(self.theme.highlight_fg)
                .bg(self.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.text)
        };
        Span::styled(format!("{:^CELL_WIDTH$}", format!("[ {} ]", action.label())), style)
    }

    /// Build the grid lines, one per grid row.
    pub fn build_lines(&self) -> Vec<Line<'static>> {
        (0..GlobalAction::ALL.len())
            .step_by(2)
            .map(|left| {
                Line::from(vec![
                    self.cell_span(left),
                    Span::raw("  "),
                    self.cell_span(left + 1),
                ])
            })
            .collect()
    }
}

impl Widget for GlobalPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.focused {
            self.theme.border_focus
        } else {
            self.theme.border
        };
        let block = Block::default()
            .title(" All shards ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        Paragraph::new(self.build_lines())
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlighted_cells(panel: &GlobalPanel<'_>, theme: &Theme) -> usize {
        panel
            .build_lines()
            .iter()
            .flat_map(|line| line.spans.iter())
            .filter(|s| s.style.bg == Some(theme.highlight_bg))
            .count()
    }

    #[test]
    fn test_three_rows_of_two() {
        let selection = Selection::new();
        let theme = Theme::default();
        let lines = GlobalPanel::new(&selection, &theme).build_lines();
        assert_eq!(lines.len(), 3);
        let text: String = lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .map(|s| s.content.as_ref())
            .collect();
        for label in ["Start", "Stop", "Enable", "Disable", "Restart", "Update"] {
            assert!(text.contains(label), "missing {label}");
        }
    }

    #[test]
    fn test_exactly_one_cell_highlighted_when_focused() {
        let mut selection = Selection::new();
        selection.move_down(0); // enter the grid
        selection.cycle_right();
        let theme = Theme::default();
        let panel = GlobalPanel::new(&selection, &theme).focused(true);
        assert_eq!(highlighted_cells(&panel, &theme), 1);
    }

    #[test]
    fn test_no_highlight_when_selection_in_shard_region() {
        let selection = Selection::new();
        let theme = Theme::default();
        let panel = GlobalPanel::new(&selection, &theme).focused(false);
        assert_eq!(highlighted_cells(&panel, &theme), 0);
    }
}
