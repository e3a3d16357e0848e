//! Main application orchestrator.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures_util::StreamExt;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::application::dto::{LoginOutcome, Session};
use crate::application::services::{
    ClassResolution, ClassSectionCache, NotificationManager, SessionStorage, StudentEditor,
    WizardError, WizardOptions, load_wizard_options,
};
use crate::application::use_cases::{LoginUseCase, RestoreSessionUseCase, VerifyOtpUseCase};
use crate::domain::entities::{Examination, Student};
use crate::domain::errors::{ApiError, AuthError};
use crate::domain::ports::{
    AuthPort, ClassDirectoryPort, DashboardPort, DashboardSummary, ExaminationPort, StudentPort,
};
use crate::infrastructure::Poller;
use crate::presentation::events::{EventResult, is_quit_event};
use crate::presentation::ui::{
    ExamWizardScreen, HomeAction, HomeScreen, LoginAction, LoginScreen, NotificationPopup,
    StudentFormAction, StudentFormScreen, WizardAction,
};

const TICK_RATE: Duration = Duration::from_millis(250);

/// Results of background work, delivered back to the event loop.
#[derive(Debug)]
enum Action {
    SessionRestored(Option<Session>),
    LoginFinished(Result<LoginOutcome, AuthError>),
    VerificationFinished(Result<Session, AuthError>),
    CodeResent(Result<(), AuthError>),
    DashboardLoaded(Result<DashboardSummary, ApiError>),
    WizardOptionsLoaded(WizardOptions),
    ExamSubmitted(Result<Examination, ApiError>),
    ClassResolved {
        class_name: String,
        resolution: ClassResolution,
    },
    StudentSaved(Result<Student, ApiError>),
    LoggedOut,
}

enum Screen {
    Login(LoginScreen),
    Home,
    ExamWizard(Box<ExamWizardScreen>),
    StudentForm(Box<StudentFormScreen>),
}

/// Backend adapters the app talks to.
#[derive(Clone)]
pub struct AppPorts {
    pub auth: Arc<dyn AuthPort>,
    pub examinations: Arc<dyn ExaminationPort>,
    pub classes: Arc<dyn ClassDirectoryPort>,
    pub students: Arc<dyn StudentPort>,
    pub dashboard: Arc<dyn DashboardPort>,
}

/// User-facing settings taken from the configuration.
#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    pub remember_me: bool,
    pub poll_interval: Option<Duration>,
    pub notification_duration: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            remember_me: false,
            poll_interval: Some(Duration::from_secs(30)),
            notification_duration: Duration::from_secs(5),
        }
    }
}

pub struct App {
    screen: Screen,
    exiting: bool,
    session: Option<Session>,
    dashboard: Option<DashboardSummary>,
    refreshed_at: Option<DateTime<Local>>,
    loading_wizard: bool,
    login_use_case: LoginUseCase,
    verify_otp_use_case: VerifyOtpUseCase,
    restore_session_use_case: Arc<RestoreSessionUseCase>,
    ports: AppPorts,
    class_cache: Arc<ClassSectionCache>,
    notifications: NotificationManager,
    poller: Option<Poller>,
    options: AppOptions,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    #[must_use]
    pub fn new(ports: AppPorts, storage: SessionStorage, options: AppOptions) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            screen: Screen::Login(LoginScreen::new(options.remember_me)),
            exiting: false,
            session: None,
            dashboard: None,
            refreshed_at: None,
            loading_wizard: false,
            login_use_case: LoginUseCase::new(ports.auth.clone(), storage.clone()),
            verify_otp_use_case: VerifyOtpUseCase::new(ports.auth.clone(), storage.clone()),
            restore_session_use_case: Arc::new(RestoreSessionUseCase::new(storage)),
            class_cache: Arc::new(ClassSectionCache::new(ports.classes.clone())),
            ports,
            notifications: NotificationManager::new(options.notification_duration),
            poller: None,
            options,
            action_tx,
            action_rx,
        }
    }

    /// # Errors
    /// Returns error if the terminal cannot be drawn.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        self.restore_session();

        let mut terminal_events = EventStream::new();
        let mut ticker = interval(TICK_RATE);

        terminal.draw(|frame| self.render(frame))?;

        while !self.exiting {
            let terminal_event = terminal_events.next();

            tokio::select! {
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                }

                Some(Ok(event)) = terminal_event => {
                    if let Event::Key(key) = event
                        && key.kind == KeyEventKind::Press
                        && self.handle_key(key) == EventResult::Exit
                    {
                        self.exiting = true;
                    }
                }

                _ = ticker.tick() => {
                    self.notifications.tick();
                }
            }

            terminal.draw(|frame| self.render(frame))?;
        }

        self.stop_polling();
        info!("Application exiting normally");
        Ok(())
    }

    fn spawn_action<F>(&self, task: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(task.await);
        });
    }

    fn restore_session(&self) {
        if let Screen::Login(_) = self.screen {
            let restore = self.restore_session_use_case.clone();
            self.spawn_action(async move {
                let session = restore.execute().await.unwrap_or_else(|e| {
                    warn!(error = %e, "Could not read saved session");
                    None
                });
                Action::SessionRestored(session)
            });
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        if is_quit_event(&key) {
            return EventResult::Exit;
        }

        if self.notifications.has_notifications() && key.code == crossterm::event::KeyCode::F(1) {
            self.notifications.dismiss();
            return EventResult::Continue;
        }

        match &mut self.screen {
            Screen::Login(screen) => {
                let action = screen.handle_key(key);
                self.handle_login_action(action)
            }
            Screen::Home => self.handle_home_action(HomeScreen::handle_key(&key)),
            Screen::ExamWizard(screen) => {
                match screen.handle_key(key) {
                    WizardAction::None => {}
                    WizardAction::Close => self.close_dialog(),
                    WizardAction::Submit(request) => {
                        let port = self.ports.examinations.clone();
                        self.spawn_action(async move {
                            Action::ExamSubmitted(port.create_examination(&request).await)
                        });
                    }
                }
                EventResult::Continue
            }
            Screen::StudentForm(screen) => {
                let action = screen.handle_key(key);
                self.handle_student_form_action(action);
                EventResult::Continue
            }
        }
    }

    fn handle_login_action(&mut self, action: LoginAction) -> EventResult {
        match action {
            LoginAction::None => {}
            LoginAction::Quit => return EventResult::Exit,
            LoginAction::Submit(request) => {
                self.set_login_validating();
                let login = self.login_use_case.clone();
                self.spawn_action(async move { Action::LoginFinished(login.execute(request).await) });
            }
            LoginAction::Verify { pending, code } => {
                self.set_login_validating();
                let verify = self.verify_otp_use_case.clone();
                self.spawn_action(async move {
                    Action::VerificationFinished(verify.execute(&pending, &code).await)
                });
            }
            LoginAction::Resend(pending) => {
                let verify = self.verify_otp_use_case.clone();
                self.spawn_action(async move { Action::CodeResent(verify.resend(&pending).await) });
            }
        }
        EventResult::Continue
    }

    fn handle_home_action(&mut self, action: HomeAction) -> EventResult {
        match action {
            HomeAction::None => {}
            HomeAction::Quit => return EventResult::Exit,
            HomeAction::NewExam => self.open_wizard(),
            HomeAction::AddStudent => {
                self.screen = Screen::StudentForm(Box::new(StudentFormScreen::add(
                    self.class_cache.clone(),
                )));
            }
            HomeAction::Refresh => self.refresh_dashboard(),
            HomeAction::Logout => self.logout(),
        }
        EventResult::Continue
    }

    fn handle_student_form_action(&mut self, action: StudentFormAction) {
        match action {
            StudentFormAction::None => {}
            StudentFormAction::Close => self.close_dialog(),
            StudentFormAction::ResolveClass(class_name) => self.resolve_class(class_name),
            StudentFormAction::Submit { mode, payload } => {
                let port = self.ports.students.clone();
                self.spawn_action(async move {
                    Action::StudentSaved(StudentEditor::save(&mode, &payload, port.as_ref()).await)
                });
            }
        }
    }

    /// Opens the edit dialog for an existing student and loads its class sections.
    pub fn open_student_editor(&mut self, student: &Student) {
        let mut screen = StudentFormScreen::edit(self.class_cache.clone(), student);
        let initial = screen.initial_class();
        self.screen = Screen::StudentForm(Box::new(screen));
        if let Some(class_name) = initial {
            self.resolve_class(class_name);
        }
    }

    fn resolve_class(&self, class_name: String) {
        let cache = self.class_cache.clone();
        self.spawn_action(async move {
            let resolution = cache.resolve(&class_name).await;
            Action::ClassResolved {
                class_name,
                resolution,
            }
        });
    }

    fn set_login_validating(&mut self) {
        if let Screen::Login(screen) = &mut self.screen {
            screen.set_validating();
        }
    }

    fn set_login_error(&mut self, error: &AuthError) {
        if let Screen::Login(screen) = &mut self.screen {
            screen.set_error(error.to_string());
        }
    }

    fn open_wizard(&mut self) {
        if self.loading_wizard {
            return;
        }
        self.loading_wizard = true;

        let port = self.ports.examinations.clone();
        self.spawn_action(async move {
            Action::WizardOptionsLoaded(load_wizard_options(port.as_ref()).await)
        });
    }

    fn close_dialog(&mut self) {
        self.class_cache.clear();
        if self.session.is_some() {
            self.screen = Screen::Home;
        }
    }

    fn enter_home(&mut self, session: Session) {
        info!(user_id = %session.user.id(), "Signed in");
        self.session = Some(session);
        self.screen = Screen::Home;
        self.start_polling();
    }

    fn start_polling(&mut self) {
        self.stop_polling();

        let Some(period) = self.options.poll_interval else {
            self.refresh_dashboard();
            return;
        };

        let port = self.ports.dashboard.clone();
        let tx = self.action_tx.clone();
        self.poller = Some(Poller::spawn("dashboard", period, move || {
            let port = port.clone();
            let tx = tx.clone();
            async move {
                let _ = tx.send(Action::DashboardLoaded(port.summary().await));
            }
        }));
    }

    fn stop_polling(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }

    fn refresh_dashboard(&self) {
        let port = self.ports.dashboard.clone();
        self.spawn_action(async move { Action::DashboardLoaded(port.summary().await) });
    }

    fn logout(&mut self) {
        self.stop_polling();
        let login = self.login_use_case.clone();
        self.spawn_action(async move {
            if let Err(e) = login.logout().await {
                warn!(error = %e, "Failed to clear stored session");
            }
            Action::LoggedOut
        });
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::SessionRestored(Some(session)) => {
                if matches!(self.screen, Screen::Login(_)) && self.session.is_none() {
                    self.enter_home(session);
                }
            }
            Action::SessionRestored(None) => debug!("No saved session"),
            Action::LoginFinished(result) => match result {
                Ok(LoginOutcome::Authenticated(session)) => self.enter_home(session),
                Ok(LoginOutcome::VerificationRequired(pending)) => {
                    if let Screen::Login(screen) = &mut self.screen {
                        screen.require_verification(pending);
                    }
                }
                Err(e) => {
                    error!(error = %e, "Login failed");
                    self.set_login_error(&e);
                }
            },
            Action::VerificationFinished(result) => match result {
                Ok(session) => self.enter_home(session),
                Err(e) => {
                    warn!(error = %e, "Verification failed");
                    self.set_login_error(&e);
                }
            },
            Action::CodeResent(result) => match result {
                Ok(()) => {
                    if let Screen::Login(screen) = &mut self.screen {
                        screen.set_info("A new verification code was sent");
                    }
                }
                Err(e) => self.set_login_error(&e),
            },
            Action::DashboardLoaded(result) => match result {
                Ok(summary) => {
                    if self.session.is_some() {
                        self.dashboard = Some(summary);
                        self.refreshed_at = Some(Local::now());
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Dashboard refresh failed");
                    self.notifications.api_error("Dashboard", &e);
                }
            },
            Action::WizardOptionsLoaded(options) => {
                self.loading_wizard = false;
                for failure in &options.failures {
                    self.notifications.api_error("Exams", failure);
                }
                if matches!(self.screen, Screen::Home) {
                    self.screen = Screen::ExamWizard(Box::new(ExamWizardScreen::new(options)));
                }
            }
            Action::ExamSubmitted(result) => {
                let Screen::ExamWizard(screen) = &mut self.screen else {
                    debug!("Examination result arrived after the wizard closed");
                    return;
                };
                match screen.finish_submit(result) {
                    Ok(exam) => {
                        self.notifications
                            .success("Exams", format!("Created \"{}\"", exam.name));
                        self.close_dialog();
                        self.refresh_dashboard();
                    }
                    Err(WizardError::Submit(e)) => self.notifications.api_error("Exams", &e),
                    Err(e) => self.notifications.error("Exams", e.to_string()),
                }
            }
            Action::ClassResolved {
                class_name,
                resolution,
            } => {
                if let Screen::StudentForm(screen) = &mut self.screen {
                    screen.apply_class_resolution(&class_name, &resolution);
                }
            }
            Action::StudentSaved(result) => match result {
                Ok(student) => {
                    let name = format!("{} {}", student.first_name, student.last_name);
                    self.notifications
                        .success("Students", format!("Saved {}", name.trim()));
                    if matches!(self.screen, Screen::StudentForm(_)) {
                        self.close_dialog();
                    }
                    self.refresh_dashboard();
                }
                Err(e) => {
                    if let Screen::StudentForm(screen) = &mut self.screen {
                        screen.set_save_error(e.message());
                    }
                    self.notifications.api_error("Students", &e);
                }
            },
            Action::LoggedOut => {
                self.stop_polling();
                self.session = None;
                self.dashboard = None;
                self.refreshed_at = None;
                self.class_cache.clear();
                self.screen = Screen::Login(LoginScreen::new(self.options.remember_me));
                info!("Signed out");
            }
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        match &self.screen {
            Screen::Login(screen) => frame.render_widget(screen, area),
            Screen::Home | Screen::ExamWizard(_) | Screen::StudentForm(_) => {
                if let Some(session) = &self.session {
                    frame.render_widget(
                        HomeScreen::new(session, self.dashboard.as_ref(), self.refreshed_at),
                        area,
                    );
                }
                let dialog = centered(area, 90, 24);
                match &self.screen {
                    Screen::ExamWizard(screen) => frame.render_widget(screen.as_ref(), dialog),
                    Screen::StudentForm(screen) => frame.render_widget(screen.as_ref(), dialog),
                    _ => {}
                }
            }
        }

        if let Some(notification) = self.notifications.current_notification() {
            frame.render_widget(NotificationPopup::new(notification), area);
        }
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, cell, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::WizardStep;
    use crate::domain::ports::mocks::{
        MockAuthPort, MockClassDirectory, MockDashboard, MockExaminationPort, MockKeyValueStore,
        MockStudentPort, VALID_OTP,
    };
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn storage() -> SessionStorage {
        SessionStorage::new(
            Arc::new(MockKeyValueStore::new()),
            Arc::new(MockKeyValueStore::new()),
        )
    }

    fn app_with(auth: MockAuthPort, exams: Arc<MockExaminationPort>) -> App {
        let ports = AppPorts {
            auth: Arc::new(auth),
            examinations: exams,
            classes: Arc::new(
                MockClassDirectory::new().with_class("Grade 1", Some("uuid-1"), &["A", "B"]),
            ),
            students: Arc::new(MockStudentPort::default()),
            dashboard: Arc::new(MockDashboard::default()),
        };
        let options = AppOptions {
            poll_interval: None,
            ..AppOptions::default()
        };
        App::new(ports, storage(), options)
    }

    fn app() -> App {
        app_with(
            MockAuthPort::authenticating(),
            Arc::new(MockExaminationPort::new()),
        )
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    async fn pump(app: &mut App) {
        let action = app.action_rx.recv().await.unwrap();
        app.handle_action(action);
    }

    async fn sign_in(app: &mut App) {
        type_text(app, "admin@school.test");
        app.handle_key(key(KeyCode::Tab));
        type_text(app, "secret");
        app.handle_key(key(KeyCode::Enter));
        pump(app).await;
    }

    #[tokio::test]
    async fn test_login_enters_home_and_loads_dashboard() {
        let mut app = app();

        sign_in(&mut app).await;
        assert!(matches!(app.screen, Screen::Home));
        assert!(app.session.is_some());

        pump(&mut app).await;
        assert_eq!(app.dashboard.as_ref().map(|d| d.unread_messages), Some(1));
    }

    #[tokio::test]
    async fn test_otp_flow() {
        let mut app = app_with(
            MockAuthPort::requiring_otp(),
            Arc::new(MockExaminationPort::new()),
        );

        sign_in(&mut app).await;
        let Screen::Login(screen) = &app.screen else {
            panic!("expected login screen");
        };
        assert!(screen.is_verifying());

        type_text(&mut app, VALID_OTP);
        app.handle_key(key(KeyCode::Enter));
        pump(&mut app).await;

        assert!(matches!(app.screen, Screen::Home));
    }

    #[tokio::test]
    async fn test_rejected_login_shows_error() {
        let mut app = app_with(
            MockAuthPort::rejecting(401, "invalid credentials"),
            Arc::new(MockExaminationPort::new()),
        );

        sign_in(&mut app).await;

        let Screen::Login(screen) = &app.screen else {
            panic!("expected login screen");
        };
        assert_eq!(screen.state(), crate::presentation::ui::LoginState::Error);
    }

    #[tokio::test]
    async fn test_wizard_opens_after_options_load() {
        let mut app = app();
        sign_in(&mut app).await;
        pump(&mut app).await;

        app.handle_key(key(KeyCode::Char('e')));
        pump(&mut app).await;

        let Screen::ExamWizard(screen) = &app.screen else {
            panic!("expected wizard");
        };
        assert!(!screen.wizard().classes().is_empty());
    }

    #[tokio::test]
    async fn test_failed_exam_submission_notifies_and_keeps_data() {
        let mut app = app();
        sign_in(&mut app).await;
        pump(&mut app).await;

        let mut screen = ExamWizardScreen::new(WizardOptions::default());
        for c in "Finals".chars() {
            screen.handle_key(key(KeyCode::Char(c)));
        }
        app.screen = Screen::ExamWizard(Box::new(screen));

        app.handle_action(Action::ExamSubmitted(Err(ApiError::new(
            409,
            "an exam with this name already exists",
        ))));

        assert_eq!(app.notifications.len(), 1);
        let Screen::ExamWizard(screen) = &app.screen else {
            panic!("expected wizard");
        };
        assert_eq!(screen.wizard().step(), WizardStep::Schedule);
        assert!(screen.wizard().last_error().unwrap().contains("already exists"));
        assert_eq!(screen.wizard().details().name, "Finals");
    }

    #[tokio::test]
    async fn test_created_exam_closes_wizard() {
        let mut app = app();
        sign_in(&mut app).await;
        pump(&mut app).await;
        app.screen = Screen::ExamWizard(Box::new(ExamWizardScreen::new(WizardOptions::default())));

        app.handle_action(Action::ExamSubmitted(Ok(Examination {
            id: "exam-1".to_string(),
            name: "Finals".to_string(),
            exam_type: None,
            start_date: None,
            end_date: None,
        })));

        assert!(matches!(app.screen, Screen::Home));
        assert_eq!(app.notifications.len(), 1);
    }

    #[tokio::test]
    async fn test_student_form_resolves_class_sections() {
        let mut app = app();
        sign_in(&mut app).await;
        pump(&mut app).await;

        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "Grade 1");
        app.handle_key(key(KeyCode::Tab));
        pump(&mut app).await;

        let Screen::StudentForm(screen) = &app.screen else {
            panic!("expected student form");
        };
        assert_eq!(screen.editor().class_id(), Some("uuid-1"));

        app.handle_key(key(KeyCode::Esc));
        assert!(matches!(app.screen, Screen::Home));
        assert_eq!(app.class_cache.cached("Grade 1"), None);
    }

    #[tokio::test]
    async fn test_logout_returns_to_login() {
        let mut app = app();
        sign_in(&mut app).await;
        pump(&mut app).await;

        app.handle_key(key(KeyCode::Char('l')));
        pump(&mut app).await;

        assert!(matches!(app.screen, Screen::Login(_)));
        assert!(app.session.is_none());
        assert!(app.poller.is_none());
    }

    #[tokio::test]
    async fn test_configuration_errors_are_not_toasted() {
        let mut app = app();
        app.handle_action(Action::DashboardLoaded(Err(
            ApiError::network("blocked by CORS policy").with_code("CORS_ERROR"),
        )));
        assert!(app.notifications.is_empty());
    }

    #[tokio::test]
    async fn test_ctrl_c_exits() {
        let mut app = app();
        let result = app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(result, EventResult::Exit);
    }
}
