//! Login and one-time code screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::application::dto::LoginRequest;
use crate::domain::ports::{PendingVerification, Portal};
use crate::presentation::events::is_ctrl;
use crate::presentation::widgets::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Input,
    Validating,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Email,
    Password,
}

/// What the app should do after a key press.
#[derive(Debug, Clone)]
pub enum LoginAction {
    None,
    Quit,
    Submit(LoginRequest),
    Verify {
        pending: PendingVerification,
        code: String,
    },
    Resend(PendingVerification),
}

/// Login screen UI.
pub struct LoginScreen {
    email_input: TextInput,
    password_input: TextInput,
    code_input: TextInput,
    focus: Focus,
    portal: Portal,
    remember_me: bool,
    pending: Option<PendingVerification>,
    state: LoginState,
    error_message: Option<String>,
    info_message: Option<String>,
}

impl LoginScreen {
    /// Creates new login screen.
    #[must_use]
    pub fn new(remember_me: bool) -> Self {
        let mut email_input = TextInput::new("Email").placeholder("admin@school.edu");
        email_input.set_focused(true);

        Self {
            email_input,
            password_input: TextInput::new("Password").password(),
            code_input: TextInput::new("Verification Code")
                .placeholder("6-digit code")
                .max_chars(8),
            focus: Focus::Email,
            portal: Portal::default(),
            remember_me,
            pending: None,
            state: LoginState::Input,
            error_message: None,
            info_message: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> LoginState {
        self.state
    }

    #[must_use]
    pub const fn portal(&self) -> Portal {
        self.portal
    }

    #[must_use]
    pub const fn remember_me(&self) -> bool {
        self.remember_me
    }

    #[must_use]
    pub const fn is_verifying(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set_validating(&mut self) {
        self.state = LoginState::Validating;
        self.error_message = None;
        self.info_message = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state = LoginState::Error;
        self.error_message = Some(message.into());
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.state = LoginState::Input;
        self.info_message = Some(message.into());
    }

    /// Resets to input state.
    pub fn reset(&mut self) {
        self.state = LoginState::Input;
        self.error_message = None;
    }

    /// Switches to code entry for `pending`.
    pub fn require_verification(&mut self, pending: PendingVerification) {
        self.pending = Some(pending);
        self.code_input.clear();
        self.code_input.set_focused(true);
        self.password_input.clear();
        self.reset();
        self.info_message = Some("A verification code was sent to your email".to_string());
    }

    fn cancel_verification(&mut self) {
        self.pending = None;
        self.code_input.clear();
        self.info_message = None;
        self.set_focus(Focus::Password);
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.email_input.set_focused(focus == Focus::Email);
        self.password_input.set_focused(focus == Focus::Password);
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            Focus::Email => &mut self.email_input,
            Focus::Password => &mut self.password_input,
        }
    }

    /// Handles key event, returns action.
    pub fn handle_key(&mut self, key: KeyEvent) -> LoginAction {
        if self.state == LoginState::Validating {
            return LoginAction::None;
        }

        if self.state == LoginState::Error {
            self.reset();
            return LoginAction::None;
        }

        if self.pending.is_some() {
            return self.handle_verification_key(&key);
        }

        match key.code {
            KeyCode::Esc => return LoginAction::Quit,
            KeyCode::Enter => {
                let email = self.email_input.value().trim();
                if email.is_empty() {
                    self.set_focus(Focus::Email);
                } else if self.password_input.value().is_empty() {
                    self.set_focus(Focus::Password);
                } else {
                    return LoginAction::Submit(
                        LoginRequest::new(self.portal, email, self.password_input.value())
                            .remembered(self.remember_me),
                    );
                }
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                let next = match self.focus {
                    Focus::Email => Focus::Password,
                    Focus::Password => Focus::Email,
                };
                self.set_focus(next);
            }
            KeyCode::F(2) => self.portal = self.portal.toggled(),
            KeyCode::F(3) => self.remember_me = !self.remember_me,
            _ if is_ctrl(&key, 'p') => self.portal = self.portal.toggled(),
            _ if is_ctrl(&key, 'r') => self.remember_me = !self.remember_me,
            _ => {
                self.focused_input().handle_key(&key);
            }
        }

        LoginAction::None
    }

    fn handle_verification_key(&mut self, key: &KeyEvent) -> LoginAction {
        let Some(pending) = self.pending.clone() else {
            return LoginAction::None;
        };

        match key.code {
            KeyCode::Esc => self.cancel_verification(),
            KeyCode::Enter if !self.code_input.value().is_empty() => {
                return LoginAction::Verify {
                    pending,
                    code: self.code_input.value().to_string(),
                };
            }
            KeyCode::F(5) => return LoginAction::Resend(pending),
            _ if is_ctrl(key, 'r') => return LoginAction::Resend(pending),
            KeyCode::Char(c) if !c.is_ascii_digit() => {}
            _ if key.modifiers.contains(KeyModifiers::CONTROL) => {}
            _ => {
                self.code_input.handle_key(key);
            }
        }

        LoginAction::None
    }

    fn status_line(&self) -> Line<'_> {
        let hint = Style::default().fg(Color::DarkGray);
        match self.state {
            LoginState::Input => {
                if let Some(info) = &self.info_message {
                    return Line::from(Span::styled(info.as_str(), Style::default().fg(Color::Green)));
                }
                if self.pending.is_some() {
                    Line::from(vec![
                        Span::styled("Enter: Verify", hint),
                        Span::raw(" | "),
                        Span::styled("Ctrl+R: Resend", hint),
                        Span::raw(" | "),
                        Span::styled("Esc: Back", hint),
                    ])
                } else {
                    Line::from(vec![
                        Span::styled("Enter: Login", hint),
                        Span::raw(" | "),
                        Span::styled("Tab: Next field", hint),
                        Span::raw(" | "),
                        Span::styled("Esc: Quit", hint),
                    ])
                }
            }
            LoginState::Validating => Line::from(Span::styled(
                "Signing in...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )),
            LoginState::Error => {
                let msg = self.error_message.as_deref().unwrap_or("Unknown error");
                Line::from(Span::styled(
                    format!("Error: {msg}"),
                    Style::default().fg(Color::Red),
                ))
            }
        }
    }

    fn render_inner(&self, area: Rect, buf: &mut Buffer) {
        let vertical = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(15),
            Constraint::Fill(1),
        ]);
        let [_, center, _] = vertical.areas(area);

        let horizontal = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Min(56),
            Constraint::Fill(1),
        ]);
        let [_, content_area, _] = horizontal.areas(center);

        Clear.render(content_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" SchoolDesk Login ");

        let inner = block.inner(content_area);
        block.render(content_area, buf);

        let [title, first, second, _, options, _, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        if let Some(pending) = &self.pending {
            Paragraph::new(format!("Enter the code sent to {}", pending.email))
                .style(Style::default().fg(Color::White))
                .render(title, buf);
            (&self.code_input).render(first, buf);
        } else {
            Paragraph::new("Sign in to manage your school")
                .style(Style::default().fg(Color::White))
                .render(title, buf);
            (&self.email_input).render(first, buf);
            (&self.password_input).render(second, buf);

            let checkbox = if self.remember_me { "[x]" } else { "[ ]" };
            let lines = vec![
                Line::from(vec![
                    Span::raw("Portal: "),
                    Span::styled(self.portal.label(), Style::default().fg(Color::Yellow)),
                    Span::styled(" (Ctrl+P to switch)", Style::default().fg(Color::DarkGray)),
                ]),
                Line::from(vec![
                    Span::styled(checkbox, Style::default().fg(Color::Yellow)),
                    Span::raw(" Remember me (Ctrl+R to toggle)"),
                ]),
            ];
            Paragraph::new(lines).render(options, buf);
        }

        Paragraph::new(self.status_line()).render(status, buf);
    }
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Widget for &LoginScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_inner(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(screen: &mut LoginScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn pending() -> PendingVerification {
        PendingVerification {
            portal: Portal::School,
            email: "admin@school.test".to_string(),
            session_id: Some("otp-session".to_string()),
            user_id: None,
            remember_me: false,
        }
    }

    #[test]
    fn test_initial_state() {
        let screen = LoginScreen::new(true);
        assert_eq!(screen.state(), LoginState::Input);
        assert_eq!(screen.portal(), Portal::Admin);
        assert!(screen.remember_me());
        assert!(!screen.is_verifying());
    }

    #[test]
    fn test_submit_carries_credentials() {
        let mut screen = LoginScreen::new(false);
        type_text(&mut screen, "a@b.c");
        screen.handle_key(key(KeyCode::Tab));
        type_text(&mut screen, "pw");
        screen.handle_key(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL));
        screen.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));

        let LoginAction::Submit(request) = screen.handle_key(key(KeyCode::Enter)) else {
            panic!("expected submit");
        };
        assert_eq!(request.credentials.email, "a@b.c");
        assert_eq!(request.credentials.password.as_str(), "pw");
        assert_eq!(request.credentials.portal, Portal::School);
        assert!(request.remember_me);
    }

    #[test]
    fn test_enter_with_missing_password_moves_focus() {
        let mut screen = LoginScreen::new(false);
        type_text(&mut screen, "a@b.c");

        assert!(matches!(screen.handle_key(key(KeyCode::Enter)), LoginAction::None));
        type_text(&mut screen, "x");
        assert_eq!(screen.password_input.value(), "x");
    }

    #[test]
    fn test_escape_quits() {
        let mut screen = LoginScreen::new(false);
        assert!(matches!(screen.handle_key(key(KeyCode::Esc)), LoginAction::Quit));
    }

    #[test]
    fn test_verification_accepts_digits_only() {
        let mut screen = LoginScreen::new(false);
        screen.require_verification(pending());

        type_text(&mut screen, "12a34");

        let LoginAction::Verify { code, pending } = screen.handle_key(key(KeyCode::Enter)) else {
            panic!("expected verify");
        };
        assert_eq!(code, "1234");
        assert_eq!(pending.session_id.as_deref(), Some("otp-session"));
    }

    #[test]
    fn test_verification_resend_and_cancel() {
        let mut screen = LoginScreen::new(false);
        screen.require_verification(pending());

        assert!(matches!(
            screen.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            LoginAction::Resend(_)
        ));

        screen.handle_key(key(KeyCode::Esc));
        assert!(!screen.is_verifying());
    }

    #[test]
    fn test_error_state_resets_on_key() {
        let mut screen = LoginScreen::new(false);
        screen.set_error("invalid credentials");

        assert!(matches!(screen.handle_key(key(KeyCode::Char('x'))), LoginAction::None));
        assert_eq!(screen.state(), LoginState::Input);
    }

    #[test]
    fn test_validating_ignores_keys() {
        let mut screen = LoginScreen::new(false);
        screen.set_validating();
        assert!(matches!(screen.handle_key(key(KeyCode::Esc)), LoginAction::None));
    }
}
