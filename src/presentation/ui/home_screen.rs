//! Signed-in landing screen with dashboard counters.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::application::dto::Session;
use crate::domain::ports::DashboardSummary;

/// Request raised by a key on the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAction {
    None,
    NewExam,
    AddStudent,
    Refresh,
    Logout,
    Quit,
}

pub struct HomeScreen<'a> {
    session: &'a Session,
    summary: Option<&'a DashboardSummary>,
    refreshed_at: Option<DateTime<Local>>,
}

impl<'a> HomeScreen<'a> {
    #[must_use]
    pub const fn new(
        session: &'a Session,
        summary: Option<&'a DashboardSummary>,
        refreshed_at: Option<DateTime<Local>>,
    ) -> Self {
        Self {
            session,
            summary,
            refreshed_at,
        }
    }

    #[must_use]
    pub const fn handle_key(key: &KeyEvent) -> HomeAction {
        match key.code {
            KeyCode::Char('e') => HomeAction::NewExam,
            KeyCode::Char('s') => HomeAction::AddStudent,
            KeyCode::Char('r') => HomeAction::Refresh,
            KeyCode::Char('l') => HomeAction::Logout,
            KeyCode::Char('q') | KeyCode::Esc => HomeAction::Quit,
            _ => HomeAction::None,
        }
    }

    fn stat_lines(&self) -> Vec<Line<'static>> {
        let Some(summary) = self.summary else {
            return vec![Line::from(Span::styled(
                "Loading dashboard...",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))];
        };

        let value = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        [
            ("Students", summary.total_students),
            ("Teachers", summary.total_teachers),
            ("Upcoming exams", summary.upcoming_exams),
            ("Unread messages", summary.unread_messages),
            ("Pending fees", summary.pending_fees),
        ]
        .into_iter()
        .map(|(label, count)| {
            Line::from(vec![
                Span::raw(format!("{label:<18}")),
                Span::styled(count.to_string(), value),
            ])
        })
        .collect()
    }
}

impl Widget for HomeScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let user = &self.session.user;
        let mut title = vec![
            Span::styled(
                "SchoolDesk",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::raw(user.display_name().to_string()),
        ];
        if let Some(role) = user.role() {
            title.push(Span::styled(
                format!(" ({role})"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if let Some(school) = &self.session.school_id {
            title.push(Span::styled(
                format!("  school {school}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Paragraph::new(Line::from(title))
            .block(Block::default().borders(Borders::BOTTOM))
            .render(header, buf);

        let refreshed = self.refreshed_at.map_or_else(
            || " Dashboard ".to_string(),
            |at| format!(" Dashboard (updated {}) ", at.format("%H:%M:%S")),
        );
        Paragraph::new(self.stat_lines())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(refreshed),
            )
            .render(body, buf);

        let hint = Style::default().fg(Color::DarkGray);
        Paragraph::new(Line::from(vec![
            Span::styled("e: New exam", hint),
            Span::raw(" | "),
            Span::styled("s: Add student", hint),
            Span::raw(" | "),
            Span::styled("r: Refresh", hint),
            Span::raw(" | "),
            Span::styled("l: Logout", hint),
            Span::raw(" | "),
            Span::styled("q: Quit", hint),
        ]))
        .render(footer, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UserProfile;
    use crossterm::event::KeyModifiers;
    use test_case::test_case;

    fn rendered(buf: &Buffer) -> String {
        buf.content().iter().map(ratatui::buffer::Cell::symbol).collect()
    }

    #[test_case('e', HomeAction::NewExam)]
    #[test_case('s', HomeAction::AddStudent)]
    #[test_case('r', HomeAction::Refresh)]
    #[test_case('l', HomeAction::Logout)]
    #[test_case('q', HomeAction::Quit)]
    #[test_case('x', HomeAction::None)]
    fn test_key_mapping(c: char, expected: HomeAction) {
        let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        assert_eq!(HomeScreen::handle_key(&key), expected);
    }

    #[test]
    fn test_renders_counters() {
        let session = Session::new(
            UserProfile::new("u1", "Asha Rao", "asha@school.test").with_role("SCHOOL_ADMIN"),
            None,
            None,
        );
        let summary = DashboardSummary {
            total_students: 412,
            ..DashboardSummary::default()
        };
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);

        HomeScreen::new(&session, Some(&summary), None).render(area, &mut buf);

        let text = rendered(&buf);
        assert!(text.contains("Asha Rao"));
        assert!(text.contains("412"));
    }
}
