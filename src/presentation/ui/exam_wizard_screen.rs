//! Key handling and rendering for the examination wizard.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Widget, Wrap},
};

use crate::application::services::{ExamWizard, WizardError, WizardOptions, WizardStep};
use crate::domain::entities::{ExamType, Examination, SlotField};
use crate::domain::errors::ApiError;
use crate::domain::ports::CreateExaminationRequest;
use crate::presentation::events::is_ctrl;
use crate::presentation::widgets::{Checklist, ChecklistItem, TextInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailsField {
    Name,
    Type,
    Year,
    Start,
    End,
    Description,
}

impl DetailsField {
    const ORDER: [Self; 6] = [
        Self::Name,
        Self::Type,
        Self::Year,
        Self::Start,
        Self::End,
        Self::Description,
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListFocus {
    Classes,
    Subjects,
}

/// Request raised by a key in the wizard.
#[derive(Debug, Clone)]
pub enum WizardAction {
    None,
    Close,
    Submit(CreateExaminationRequest),
}

pub struct ExamWizardScreen {
    wizard: ExamWizard,
    details_focus: DetailsField,
    name_input: TextInput,
    start_input: TextInput,
    end_input: TextInput,
    description_input: TextInput,
    list_focus: ListFocus,
    class_cursor: usize,
    subject_cursor: usize,
    slot_row: usize,
    slot_field: SlotField,
}

fn step_index<T: PartialEq>(options: &[T], current: &T, forward: bool) -> Option<usize> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    Some(match options.iter().position(|o| o == current) {
        Some(index) if forward => (index + 1) % len,
        Some(index) => (index + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    })
}

impl ExamWizardScreen {
    #[must_use]
    pub fn new(options: WizardOptions) -> Self {
        let mut name_input = TextInput::new("Exam Name").placeholder("Term 1 Finals");
        name_input.set_focused(true);

        Self {
            wizard: ExamWizard::new(options),
            details_focus: DetailsField::Name,
            name_input,
            start_input: TextInput::new("Start Date").placeholder("YYYY-MM-DD"),
            end_input: TextInput::new("End Date").placeholder("YYYY-MM-DD"),
            description_input: TextInput::new("Description"),
            list_focus: ListFocus::Classes,
            class_cursor: 0,
            subject_cursor: 0,
            slot_row: 0,
            slot_field: SlotField::Date,
        }
    }

    #[must_use]
    pub const fn wizard(&self) -> &ExamWizard {
        &self.wizard
    }

    /// Records the backend's answer to the submitted request.
    ///
    /// A failure goes straight back to the schedule step with its message on show.
    ///
    /// # Errors
    /// Returns the submission failure; the wizard keeps its data.
    pub fn finish_submit(
        &mut self,
        result: Result<Examination, ApiError>,
    ) -> Result<Examination, WizardError> {
        let outcome = self.wizard.finish_submit(result);
        if outcome.is_err() {
            self.wizard.return_to_schedule();
        }
        outcome
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> WizardAction {
        match self.wizard.step() {
            WizardStep::Details => self.handle_details_key(&key),
            WizardStep::ClassesSubjects => self.handle_selection_key(&key),
            WizardStep::Schedule => self.handle_schedule_key(&key),
            WizardStep::Submitting => WizardAction::None,
            WizardStep::Done => match key.code {
                KeyCode::Enter | KeyCode::Esc => WizardAction::Close,
                _ => WizardAction::None,
            },
            WizardStep::Error => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    self.wizard.return_to_schedule();
                }
                WizardAction::None
            }
        }
    }

    fn advance(&mut self) {
        // The wizard records the failure in `last_error`.
        let _ = self.wizard.next();
    }

    fn go_back(&mut self) {
        let _ = self.wizard.back();
    }

    fn set_details_focus(&mut self, field: DetailsField) {
        self.details_focus = field;
        self.name_input.set_focused(field == DetailsField::Name);
        self.start_input.set_focused(field == DetailsField::Start);
        self.end_input.set_focused(field == DetailsField::End);
        self.description_input
            .set_focused(field == DetailsField::Description);
    }

    fn cycle_exam_type(&mut self, forward: bool) {
        let details = self.wizard.details_mut();
        details.exam_type = Some(match details.exam_type {
            Some(current) => current.cycle(forward),
            None if forward => ExamType::ALL[0],
            None => ExamType::ALL[ExamType::ALL.len() - 1],
        });
    }

    fn cycle_year(&mut self, forward: bool) {
        let mut options: Vec<Option<String>> = vec![None];
        options.extend(
            self.wizard
                .academic_years()
                .iter()
                .map(|year| Some(year.id.clone())),
        );

        let current = self.wizard.details().academic_year_id.clone();
        if let Some(index) = step_index(&options, &current, forward) {
            self.wizard.details_mut().academic_year_id = options[index].clone();
        }
    }

    fn sync_details(&mut self) {
        let name = self.name_input.value().to_string();
        let start = self.start_input.value().to_string();
        let end = self.end_input.value().to_string();
        let description = self.description_input.value().to_string();

        let details = self.wizard.details_mut();
        details.name = name;
        details.start_date = start;
        details.end_date = end;
        details.description = description;
    }

    fn handle_details_key(&mut self, key: &KeyEvent) -> WizardAction {
        match key.code {
            KeyCode::Esc => return WizardAction::Close,
            KeyCode::Enter => self.advance(),
            KeyCode::Tab | KeyCode::Down => self.set_details_focus(self.details_focus.step(true)),
            KeyCode::BackTab | KeyCode::Up => {
                self.set_details_focus(self.details_focus.step(false));
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                match self.details_focus {
                    DetailsField::Type => self.cycle_exam_type(forward),
                    DetailsField::Year => self.cycle_year(forward),
                    _ => self.edit_details_input(key),
                }
            }
            _ => self.edit_details_input(key),
        }
        WizardAction::None
    }

    fn edit_details_input(&mut self, key: &KeyEvent) {
        let input = match self.details_focus {
            DetailsField::Name => &mut self.name_input,
            DetailsField::Start => &mut self.start_input,
            DetailsField::End => &mut self.end_input,
            DetailsField::Description => &mut self.description_input,
            DetailsField::Type | DetailsField::Year => return,
        };
        if input.handle_key(key) {
            self.sync_details();
        }
    }

    fn handle_selection_key(&mut self, key: &KeyEvent) -> WizardAction {
        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Enter => self.advance(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.list_focus = match self.list_focus {
                    ListFocus::Classes => ListFocus::Subjects,
                    ListFocus::Subjects => ListFocus::Classes,
                };
            }
            KeyCode::Up => self.move_list_cursor(false),
            KeyCode::Down => self.move_list_cursor(true),
            KeyCode::Char(' ') => self.toggle_under_cursor(),
            _ => {}
        }
        WizardAction::None
    }

    fn move_list_cursor(&mut self, forward: bool) {
        let (cursor, len) = match self.list_focus {
            ListFocus::Classes => (&mut self.class_cursor, self.wizard.classes().len()),
            ListFocus::Subjects => (
                &mut self.subject_cursor,
                self.wizard.available_subjects().len(),
            ),
        };
        if forward {
            *cursor = (*cursor + 1).min(len.saturating_sub(1));
        } else {
            *cursor = cursor.saturating_sub(1);
        }
    }

    fn toggle_under_cursor(&mut self) {
        match self.list_focus {
            ListFocus::Classes => {
                if let Some(id) = self
                    .wizard
                    .classes()
                    .get(self.class_cursor)
                    .map(|c| c.id.clone())
                {
                    self.wizard.toggle_class(&id);
                }
            }
            ListFocus::Subjects => {
                let id = self
                    .wizard
                    .available_subjects()
                    .get(self.subject_cursor)
                    .map(|s| s.id.clone());
                if let Some(id) = id {
                    self.wizard.toggle_subject(&id);
                }
            }
        }

        let subjects = self.wizard.available_subjects().len();
        self.subject_cursor = self.subject_cursor.min(subjects.saturating_sub(1));
    }

    fn handle_schedule_key(&mut self, key: &KeyEvent) -> WizardAction {
        if is_ctrl(key, 'n') {
            self.wizard.add_slot();
            self.slot_row = self.wizard.slots().len() - 1;
            return WizardAction::None;
        }
        if is_ctrl(key, 'd') {
            if let Some(id) = self.wizard.slots().get(self.slot_row).map(|s| s.id) {
                self.wizard.remove_slot(id);
            }
            self.slot_row = self.slot_row.min(self.wizard.slots().len().saturating_sub(1));
            return WizardAction::None;
        }

        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Enter => {
                if let Ok(request) = self.wizard.begin_submit() {
                    return WizardAction::Submit(request);
                }
            }
            KeyCode::Up => self.slot_row = self.slot_row.saturating_sub(1),
            KeyCode::Down => {
                self.slot_row = (self.slot_row + 1).min(self.wizard.slots().len().saturating_sub(1));
            }
            KeyCode::Tab | KeyCode::BackTab => {
                let forward = key.code == KeyCode::Tab;
                if let Some(index) = step_index(&SlotField::ALL, &self.slot_field, forward) {
                    self.slot_field = SlotField::ALL[index];
                }
            }
            KeyCode::Left | KeyCode::Right => {
                self.cycle_slot_choice(key.code == KeyCode::Right);
            }
            KeyCode::Backspace => self.edit_slot_text(None),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.edit_slot_text(Some(c));
            }
            _ => {}
        }
        WizardAction::None
    }

    fn slot_choices(&self, field: SlotField) -> Vec<String> {
        let ids: &[String] = match field {
            SlotField::SubjectId => self.wizard.selected_subject_ids(),
            SlotField::ClassId => self.wizard.selected_class_ids(),
            _ => return Vec::new(),
        };
        std::iter::once(String::new())
            .chain(ids.iter().cloned())
            .collect()
    }

    fn cycle_slot_choice(&mut self, forward: bool) {
        let Some(slot) = self.wizard.slots().get(self.slot_row) else {
            return;
        };
        let choices = self.slot_choices(self.slot_field);
        let current = slot.get(self.slot_field).to_string();
        let id = slot.id;

        if let Some(index) = step_index(&choices, &current, forward) {
            self.wizard
                .update_slot(id, self.slot_field, choices[index].clone());
        }
    }

    fn edit_slot_text(&mut self, c: Option<char>) {
        if matches!(self.slot_field, SlotField::SubjectId | SlotField::ClassId) {
            return;
        }
        let Some(slot) = self.wizard.slots().get(self.slot_row) else {
            return;
        };

        let mut value = slot.get(self.slot_field).to_string();
        match c {
            Some(c) => value.push(c),
            None => {
                value.pop();
            }
        }
        let id = slot.id;
        self.wizard.update_slot(id, self.slot_field, value);
    }

    fn class_name(&self, id: &str) -> String {
        self.wizard
            .classes()
            .iter()
            .find(|c| c.id == id)
            .map_or_else(|| id.to_string(), |c| c.name.clone())
    }

    fn subject_name(&self, id: &str) -> String {
        self.wizard
            .available_subjects()
            .into_iter()
            .find(|s| s.id == id)
            .map_or_else(|| id.to_string(), |s| s.name.clone())
    }

    fn render_cycler(&self, label: &str, value: &str, focused: bool, area: Rect, buf: &mut Buffer) {
        let border = if focused { Color::Cyan } else { Color::DarkGray };
        Paragraph::new(Line::from(vec![
            Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
            Span::raw(value.to_string()),
            Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(format!(" {label} ")),
        )
        .render(area, buf);
    }

    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let rows = Layout::vertical([Constraint::Length(3); 6]).split(area);

        (&self.name_input).render(rows[0], buf);

        let exam_type = self
            .wizard
            .details()
            .exam_type
            .map_or("Select type", ExamType::label);
        self.render_cycler(
            "Exam Type",
            exam_type,
            self.details_focus == DetailsField::Type,
            rows[1],
            buf,
        );

        let year = self
            .wizard
            .details()
            .academic_year_id
            .as_deref()
            .and_then(|id| self.wizard.academic_years().iter().find(|y| y.id == id))
            .map_or("None", |y| y.name.as_str());
        self.render_cycler(
            "Academic Year",
            year,
            self.details_focus == DetailsField::Year,
            rows[2],
            buf,
        );

        (&self.start_input).render(rows[3], buf);
        (&self.end_input).render(rows[4], buf);
        (&self.description_input).render(rows[5], buf);
    }

    fn render_selection(&self, area: Rect, buf: &mut Buffer) {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(area);

        let selected_classes = self.wizard.selected_class_ids();
        let classes = self
            .wizard
            .classes()
            .iter()
            .map(|c| ChecklistItem::new(c.name.clone(), selected_classes.contains(&c.id)))
            .collect();
        Checklist::new("Classes", classes)
            .cursor(self.class_cursor)
            .focused(self.list_focus == ListFocus::Classes)
            .empty_text("No classes available")
            .render(left, buf);

        let selected_subjects = self.wizard.selected_subject_ids();
        let subjects = self
            .wizard
            .available_subjects()
            .into_iter()
            .map(|s| ChecklistItem::new(s.name.clone(), selected_subjects.contains(&s.id)))
            .collect();
        Checklist::new("Subjects", subjects)
            .cursor(self.subject_cursor)
            .focused(self.list_focus == ListFocus::Subjects)
            .empty_text("Select a class first")
            .render(right, buf);
    }

    fn render_schedule(&self, area: Rect, buf: &mut Buffer) {
        let header = Row::new(SlotField::ALL.map(|field| {
            Cell::from(field.label()).style(Style::default().add_modifier(Modifier::BOLD))
        }));

        let rows = self.wizard.slots().iter().enumerate().map(|(row, slot)| {
            Row::new(SlotField::ALL.map(|field| {
                let text = match field {
                    SlotField::SubjectId if !slot.subject_id.is_empty() => {
                        self.subject_name(&slot.subject_id)
                    }
                    SlotField::ClassId if !slot.class_id.is_empty() => {
                        self.class_name(&slot.class_id)
                    }
                    _ => slot.get(field).to_string(),
                };
                let style = if row == self.slot_row && field == self.slot_field {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else if row == self.slot_row {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                };
                Cell::from(text).style(style)
            }))
        });

        let widths = [
            Constraint::Length(12),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Fill(1),
        ];

        Widget::render(
            Table::new(rows, widths).header(header).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Schedule (rows without date, start and end are skipped) "),
            ),
            area,
            buf,
        );
    }

    fn render_result(&self, area: Rect, buf: &mut Buffer) {
        let line = match self.wizard.step() {
            WizardStep::Submitting => Line::from(Span::styled(
                "Creating examination...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )),
            WizardStep::Done => {
                let name = self.wizard.created().map_or("", |e| e.name.as_str());
                Line::from(Span::styled(
                    format!("Examination \"{name}\" created"),
                    Style::default().fg(Color::Green),
                ))
            }
            _ => Line::from(""),
        };
        Paragraph::new(line).render(area, buf);
    }

    fn footer(&self) -> Line<'_> {
        if let Some(error) = self.wizard.last_error() {
            return Line::from(Span::styled(error, Style::default().fg(Color::Red)));
        }

        let hint = match self.wizard.step() {
            WizardStep::Details => "Tab: Next field | ←/→: Change | Enter: Next | Esc: Cancel",
            WizardStep::ClassesSubjects => {
                "Tab: Switch list | Space: Toggle | Enter: Next | Esc: Back"
            }
            WizardStep::Schedule => {
                "Tab: Column | ←/→: Pick | Ctrl+N: Add row | Ctrl+D: Remove row | Enter: Create | Esc: Back"
            }
            WizardStep::Submitting => "",
            WizardStep::Done => "Enter: Close",
            WizardStep::Error => "Enter: Back to schedule",
        };
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)))
    }
}

impl Widget for &ExamWizardScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let step = self.wizard.step();
        let title = match step.number() {
            Some(n) => format!(" New Examination - Step {n}/3: {} ", step.title()),
            None => format!(" New Examination - {} ", step.title()),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        let [body, footer] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(2)]).areas(inner);

        match step {
            WizardStep::Details => self.render_details(body, buf),
            WizardStep::ClassesSubjects => self.render_selection(body, buf),
            WizardStep::Schedule | WizardStep::Error => self.render_schedule(body, buf),
            WizardStep::Submitting | WizardStep::Done => self.render_result(body, buf),
        }

        Paragraph::new(self.footer())
            .wrap(Wrap { trim: true })
            .render(footer, buf);
    }
}
