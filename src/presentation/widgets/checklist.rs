//! Multi-select list.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// One row of a [`Checklist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    pub label: String,
    pub checked: bool,
}

impl ChecklistItem {
    #[must_use]
    pub fn new(label: impl Into<String>, checked: bool) -> Self {
        Self {
            label: label.into(),
            checked,
        }
    }
}

/// Bordered list of `[x] label` rows with an optional cursor.
pub struct Checklist<'a> {
    title: &'a str,
    items: Vec<ChecklistItem>,
    cursor: usize,
    focused: bool,
    empty_text: &'a str,
}

impl<'a> Checklist<'a> {
    #[must_use]
    pub fn new(title: &'a str, items: Vec<ChecklistItem>) -> Self {
        Self {
            title,
            items,
            cursor: 0,
            focused: false,
            empty_text: "Nothing to choose from",
        }
    }

    #[must_use]
    pub const fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    #[must_use]
    pub const fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    #[must_use]
    pub const fn empty_text(mut self, text: &'a str) -> Self {
        self.empty_text = text;
        self
    }

    fn lines(&self, height: usize) -> Vec<Line<'static>> {
        if self.items.is_empty() {
            return vec![Line::from(Span::styled(
                self.empty_text.to_string(),
                Style::default().fg(Color::DarkGray),
            ))];
        }

        let first = self.cursor.saturating_sub(height.saturating_sub(1));
        self.items
            .iter()
            .enumerate()
            .skip(first)
            .take(height.max(1))
            .map(|(i, item)| {
                let mark = if item.checked { "[x] " } else { "[ ] " };
                let mut style = Style::default();
                if item.checked {
                    style = style.fg(Color::Green);
                }
                if self.focused && i == self.cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Line::from(Span::styled(format!("{mark}{}", item.label), style))
            })
            .collect()
    }
}

impl Widget for Checklist<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused { Color::Cyan } else { Color::Gray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(self.title);
        let inner = block.inner(area);
        let lines = self.lines(usize::from(inner.height));

        block.render(area, buf);
        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_row_stays_visible() {
        let items = (0..10)
            .map(|i| ChecklistItem::new(format!("Item {i}"), i == 7))
            .collect();
        let list = Checklist::new("Classes", items).cursor(7).focused(true);

        let lines = list.lines(3);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].to_string(), "[x] Item 7");
    }

    #[test]
    fn test_empty_list() {
        let list = Checklist::new("Subjects", Vec::new()).empty_text("Select a class first");
        assert_eq!(list.lines(5)[0].to_string(), "Select a class first");
    }
}
