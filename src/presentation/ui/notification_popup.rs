use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::domain::{Notification, NotificationLevel};

/// Toast drawn in the top-right corner.
pub struct NotificationPopup<'a> {
    notification: &'a Notification,
}

impl<'a> NotificationPopup<'a> {
    #[must_use]
    pub const fn new(notification: &'a Notification) -> Self {
        Self { notification }
    }
}

const fn level_color(level: NotificationLevel) -> Color {
    match level {
        NotificationLevel::Info => Color::Cyan,
        NotificationLevel::Success => Color::Green,
        NotificationLevel::Warn => Color::Yellow,
        NotificationLevel::Error => Color::Red,
    }
}

impl Widget for NotificationPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(" {} ", self.notification.title);
        let message = &self.notification.message;

        let max_popup_width = 60.min(area.width.saturating_sub(2));
        let width = u16::try_from(message.width())
            .unwrap_or(u16::MAX)
            .max(u16::try_from(title.width()).unwrap_or(0))
            .saturating_add(4)
            .min(max_popup_width);

        let inner_width = width.saturating_sub(2).max(1);
        let content_width = u16::try_from(message.width()).unwrap_or(0);
        let lines = content_width.div_ceil(inner_width);
        let height = lines.saturating_add(2).clamp(3, 10);

        let x = area.x + area.width.saturating_sub(width).saturating_sub(2);
        let popup_area = Rect::new(x, area.y + 1, width, height);

        let intersection = area.intersection(popup_area);
        if intersection.area() == 0 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().fg(level_color(self.notification.level)));

        let para = Paragraph::new(message.as_str())
            .block(block)
            .wrap(Wrap { trim: true })
            .style(Style::default().add_modifier(Modifier::BOLD));

        Clear.render(intersection, buf);
        para.render(intersection, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(buf: &Buffer) -> String {
        buf.content().iter().map(ratatui::buffer::Cell::symbol).collect()
    }

    #[test]
    fn test_renders_title_and_message() {
        let notification =
            Notification::new(NotificationLevel::Error, "Exams", "Failed to load classes");
        let area = Rect::new(0, 0, 80, 10);
        let mut buf = Buffer::empty(area);

        NotificationPopup::new(&notification).render(area, &mut buf);

        let text = rendered(&buf);
        assert!(text.contains("Exams"));
        assert!(text.contains("Failed to load classes"));
    }

    #[test]
    fn test_tiny_area_does_not_panic() {
        let notification = Notification::new(NotificationLevel::Info, "T", "message");
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);

        NotificationPopup::new(&notification).render(area, &mut buf);
    }
}
