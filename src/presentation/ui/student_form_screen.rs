//! Add/edit student dialog.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::application::services::{
    ClassResolution, ClassSectionCache, EditorMode, StudentEditor, StudentForm,
};
use crate::domain::entities::Student;
use crate::domain::ports::StudentPayload;
use crate::presentation::widgets::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    FirstName,
    LastName,
    Class,
    Section,
    Phone,
    Address,
    Email,
    DateOfBirth,
    Guardian,
}

impl FormField {
    const ORDER: [Self; 9] = [
        Self::FirstName,
        Self::LastName,
        Self::Class,
        Self::Section,
        Self::Phone,
        Self::Address,
        Self::Email,
        Self::DateOfBirth,
        Self::Guardian,
    ];

    fn step(self, forward: bool) -> Self {
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let len = Self::ORDER.len();
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        Self::ORDER[next]
    }
}

/// Request raised by a key in the student dialog.
#[derive(Debug, Clone)]
pub enum StudentFormAction {
    None,
    Close,
    /// Load the sections of this class.
    ResolveClass(String),
    Submit {
        mode: EditorMode,
        payload: StudentPayload,
    },
}

pub struct StudentFormScreen {
    editor: StudentEditor,
    focus: FormField,
    first_name: TextInput,
    last_name: TextInput,
    class_name: TextInput,
    phone: TextInput,
    address: TextInput,
    email: TextInput,
    date_of_birth: TextInput,
    guardian_name: TextInput,
    resolving: Option<String>,
    saving: bool,
    error: Option<String>,
}

impl StudentFormScreen {
    #[must_use]
    pub fn add(cache: Arc<ClassSectionCache>) -> Self {
        Self::from_editor(StudentEditor::add(cache))
    }

    #[must_use]
    pub fn edit(cache: Arc<ClassSectionCache>, student: &Student) -> Self {
        Self::from_editor(StudentEditor::edit(cache, student))
    }

    fn from_editor(editor: StudentEditor) -> Self {
        let form = editor.form().clone();
        let mut screen = Self {
            editor,
            focus: FormField::FirstName,
            first_name: TextInput::new("First Name *").with_value(form.first_name),
            last_name: TextInput::new("Last Name *").with_value(form.last_name),
            class_name: TextInput::new("Class *")
                .placeholder("Grade 5")
                .with_value(form.class_name),
            phone: TextInput::new("Phone *").with_value(form.phone),
            address: TextInput::new("Address *").with_value(form.address),
            email: TextInput::new("Email").with_value(form.email),
            date_of_birth: TextInput::new("Date of Birth")
                .placeholder("YYYY-MM-DD")
                .with_value(form.date_of_birth),
            guardian_name: TextInput::new("Guardian Name").with_value(form.guardian_name),
            resolving: None,
            saving: false,
            error: None,
        };
        screen.set_focus(FormField::FirstName);
        screen
    }

    #[must_use]
    pub const fn editor(&self) -> &StudentEditor {
        &self.editor
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Class whose sections should be loaded when the dialog opens.
    pub fn initial_class(&mut self) -> Option<String> {
        let name = self.editor.form().class_name.trim().to_string();
        if name.is_empty() {
            return None;
        }
        self.resolving = Some(name.clone());
        Some(name)
    }

    /// Applies loaded sections if they still belong to the typed class.
    pub fn apply_class_resolution(&mut self, class_name: &str, resolution: &ClassResolution) {
        if self.editor.apply_class_resolution(class_name, resolution)
            && self.resolving.as_deref() == Some(class_name)
        {
            self.resolving = None;
        } else if matches!(resolution, ClassResolution::Superseded)
            && self.resolving.as_deref() == Some(class_name)
        {
            self.resolving = None;
        }
    }

    pub fn set_save_error(&mut self, message: impl Into<String>) {
        self.saving = false;
        self.error = Some(message.into());
    }

    fn set_focus(&mut self, focus: FormField) {
        self.focus = focus;
        self.first_name.set_focused(focus == FormField::FirstName);
        self.last_name.set_focused(focus == FormField::LastName);
        self.class_name.set_focused(focus == FormField::Class);
        self.phone.set_focused(focus == FormField::Phone);
        self.address.set_focused(focus == FormField::Address);
        self.email.set_focused(focus == FormField::Email);
        self.date_of_birth
            .set_focused(focus == FormField::DateOfBirth);
        self.guardian_name.set_focused(focus == FormField::Guardian);
    }

    fn input_mut(&mut self, field: FormField) -> Option<&mut TextInput> {
        match field {
            FormField::FirstName => Some(&mut self.first_name),
            FormField::LastName => Some(&mut self.last_name),
            FormField::Class => Some(&mut self.class_name),
            FormField::Section => None,
            FormField::Phone => Some(&mut self.phone),
            FormField::Address => Some(&mut self.address),
            FormField::Email => Some(&mut self.email),
            FormField::DateOfBirth => Some(&mut self.date_of_birth),
            FormField::Guardian => Some(&mut self.guardian_name),
        }
    }

    fn sync_form(&mut self) {
        let form: &mut StudentForm = self.editor.form_mut();
        form.first_name = self.first_name.value().to_string();
        form.last_name = self.last_name.value().to_string();
        form.phone = self.phone.value().to_string();
        form.address = self.address.value().to_string();
        form.email = self.email.value().to_string();
        form.date_of_birth = self.date_of_birth.value().to_string();
        form.guardian_name = self.guardian_name.value().to_string();
    }

    fn class_changed(&self) -> Option<String> {
        let typed = self.class_name.value().trim();
        (typed != self.editor.form().class_name).then(|| typed.to_string())
    }

    fn start_class_change(&mut self, name: String) -> StudentFormAction {
        self.editor.begin_class_change(&name);
        if name.is_empty() {
            self.resolving = None;
            return StudentFormAction::None;
        }
        self.resolving = Some(name.clone());
        StudentFormAction::ResolveClass(name)
    }

    fn move_focus(&mut self, forward: bool) -> StudentFormAction {
        let leaving_class = self.focus == FormField::Class;
        self.set_focus(self.focus.step(forward));

        if leaving_class {
            if let Some(name) = self.class_changed() {
                return self.start_class_change(name);
            }
        }
        StudentFormAction::None
    }

    fn submit(&mut self) -> StudentFormAction {
        if let Some(name) = self.class_changed() {
            if let action @ StudentFormAction::ResolveClass(_) = self.start_class_change(name) {
                return action;
            }
        }
        if self.resolving.is_some() {
            self.error = Some("Sections are still loading".to_string());
            return StudentFormAction::None;
        }

        self.sync_form();
        match self.editor.payload() {
            Ok(payload) => {
                self.saving = true;
                self.error = None;
                StudentFormAction::Submit {
                    mode: self.editor.mode().clone(),
                    payload,
                }
            }
            Err(e) => {
                self.error = Some(e.to_string());
                StudentFormAction::None
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> StudentFormAction {
        if self.saving {
            return StudentFormAction::None;
        }

        match key.code {
            KeyCode::Esc => StudentFormAction::Close,
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::Down => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false),
            KeyCode::Left | KeyCode::Right if self.focus == FormField::Section => {
                self.editor.cycle_section(key.code == KeyCode::Right);
                self.error = None;
                StudentFormAction::None
            }
            _ => {
                let focus = self.focus;
                if let Some(input) = self.input_mut(focus) {
                    if input.handle_key(&key) {
                        self.sync_form();
                    }
                }
                StudentFormAction::None
            }
        }
    }

    fn render_section(&self, area: Rect, buf: &mut Buffer) {
        let focused = self.focus == FormField::Section;
        let border = if focused { Color::Cyan } else { Color::Gray };
        let section = self.editor.form().section.as_str();

        let value = if self.resolving.is_some() {
            Span::styled(
                "Loading sections...",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else if section.is_empty() {
            Span::styled("Select a section", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(section.to_string())
        };

        let offered = self
            .editor
            .sections()
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Paragraph::new(Line::from(vec![
            Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
            value,
            Span::styled(" ▶  ", Style::default().fg(Color::DarkGray)),
            Span::styled(offered, Style::default().fg(Color::DarkGray)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(" Section * "),
        )
        .render(area, buf);
    }
}

impl Widget for &StudentFormScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let title = match self.editor.mode() {
            EditorMode::Add => " Add Student ",
            EditorMode::Edit { .. } => " Edit Student ",
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        let [left, right, footer] = {
            let [body, footer] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(2)]).areas(inner);
            let [left, right] =
                Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .areas(body);
            [left, right, footer]
        };

        let left_rows = Layout::vertical([Constraint::Length(3); 5]).split(left);
        (&self.first_name).render(left_rows[0], buf);
        (&self.last_name).render(left_rows[1], buf);
        (&self.class_name).render(left_rows[2], buf);
        self.render_section(left_rows[3], buf);
        (&self.phone).render(left_rows[4], buf);

        let right_rows = Layout::vertical([Constraint::Length(3); 4]).split(right);
        (&self.address).render(right_rows[0], buf);
        (&self.email).render(right_rows[1], buf);
        (&self.date_of_birth).render(right_rows[2], buf);
        (&self.guardian_name).render(right_rows[3], buf);

        let status = if let Some(error) = &self.error {
            Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
        } else if self.saving {
            Line::from(Span::styled(
                "Saving...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ))
        } else {
            Line::from(Span::styled(
                "Tab: Next field | ←/→: Section | Enter: Save | Esc: Cancel",
                Style::default().fg(Color::DarkGray),
            ))
        };
        Paragraph::new(status)
            .wrap(Wrap { trim: true })
            .render(footer, buf);
    }
}
