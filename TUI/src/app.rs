use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::action::Action;
use crate::command::CommandParser;
use crate::config::{Config, COMMANDS};
use crate::contact::{ContactForm, SubmitOutcome, SubmitStatus};
use crate::content::ROLES;
use crate::dispatch::Dispatcher;
use crate::page::{PageLayout, Section};
use crate::reveal::{RevealEvent, ScriptedReveal, TimerSlot};
use crate::scripts::{self, TerminalKind, CV_COMMAND};
use crate::session::SessionStore;
use crate::typewriter::Typewriter;
use crate::ui_state::{Focus, UIState};

/// Wait between the last injected line and the follow-up action.
const FOLLOW_UP_DELAY: Duration = Duration::from_millis(500);

/// A command and its output, appended to the hero terminal once it is done.
#[derive(Debug, Clone)]
pub struct Injection {
    pub command: String,
    pub lines: Vec<String>,
    /// File to open once the output has been printed.
    pub open_after: Option<PathBuf>,
}

/// Handle for pushing commands into the hero terminal.
#[derive(Clone)]
pub struct InjectionSender(Sender<Injection>);

impl InjectionSender {
    pub fn send(&self, injection: Injection) -> bool {
        self.0.send(injection).is_ok()
    }
}

pub fn injection_channel() -> (InjectionSender, Receiver<Injection>) {
    let (tx, rx) = mpsc::channel();
    (InjectionSender(tx), rx)
}

/// The "view CV" action.
pub struct CvLauncher {
    sender: InjectionSender,
    path: PathBuf,
}

impl CvLauncher {
    pub fn new(sender: InjectionSender, path: PathBuf) -> Self {
        Self { sender, path }
    }

    pub fn launch(&self) -> bool {
        self.sender.send(Injection {
            command: CV_COMMAND.to_string(),
            lines: scripts::cv_output(),
            open_after: Some(self.path.clone()),
        })
    }
}

pub struct App {
    pub config: Config,
    pub ui: UIState,
    pub page: PageLayout,
    pub hero: ScriptedReveal,
    pub skills: ScriptedReveal,
    pub projects: ScriptedReveal,
    pub philosophy: ScriptedReveal,
    pub typewriter: Typewriter,
    pub contact: ContactForm,
    pub session: SessionStore,
    pub animation_frame: usize,
    pub animation_tick: u64,
    pub should_quit: bool,
    dispatcher: Dispatcher,
    cv_launcher: CvLauncher,
    injections: Receiver<Injection>,
    follow_up: TimerSlot,
    follow_up_path: Option<PathBuf>,
}

impl App {
    pub fn new(config: Config, session: SessionStore, dispatcher: Dispatcher, now: Instant) -> Self {
        let (sender, injections) = injection_channel();
        let cv_launcher = CvLauncher::new(sender, config.cv_path.clone());
        let mut contact = ContactForm::new(config.form_timing());
        if !config.honeypot.is_empty() {
            debug!("Hidden contact field pre-filled");
            contact.set_honeypot(&config.honeypot);
        }

        let mut app = Self {
            config,
            ui: UIState::new(),
            page: PageLayout::new(),
            hero: scripts::terminal(TerminalKind::Hero),
            skills: scripts::terminal(TerminalKind::Skills),
            projects: scripts::terminal(TerminalKind::Projects),
            philosophy: scripts::terminal(TerminalKind::Philosophy),
            typewriter: Typewriter::new(ROLES, now),
            contact,
            session,
            animation_frame: 0,
            animation_tick: 0,
            should_quit: false,
            dispatcher,
            cv_launcher,
            injections,
            follow_up: TimerSlot::default(),
            follow_up_path: None,
        };
        app.mount_hero(now);
        app
    }

    fn mount_hero(&mut self, now: Instant) {
        if self.session.hero_complete() {
            debug!("Hero already completed this session");
            self.hero.finish_immediately();
        } else {
            self.hero.start(now);
        }
    }

    /// Navigation and scrolling stay locked until the hero terminal is done.
    pub fn is_page_locked(&self) -> bool {
        !self.session.hero_complete()
    }

    pub fn terminal(&self, kind: TerminalKind) -> &ScriptedReveal {
        match kind {
            TerminalKind::Hero => &self.hero,
            TerminalKind::Skills => &self.skills,
            TerminalKind::Projects => &self.projects,
            TerminalKind::Philosophy => &self.philosophy,
        }
    }

    pub fn current_section(&self) -> Section {
        self.page.section_at(self.ui.scroll)
    }

    pub fn set_viewport(&mut self, height: u16) {
        self.ui.viewport_height = height;
        self.ui.scroll = self.ui.scroll.min(self.page.max_scroll(height));
    }

    pub fn tick(&mut self, now: Instant) {
        self.animation_tick += 1;
        self.animation_frame = (self.animation_frame + 1) % self.config.animation_frame_mod.max(1);

        if self.ui.status_message.is_some() {
            self.ui.status_ticks += 1;
            if self.ui.status_ticks >= self.config.status_timeout_ticks {
                self.ui.status_message = None;
            }
        }

        self.typewriter.advance(now);
        self.drain_injections(now);

        for event in self.hero.advance(now) {
            if event == RevealEvent::Completed {
                self.on_hero_complete();
            }
        }

        self.observe_visibility(now);
        for (kind, events) in [
            (TerminalKind::Skills, self.skills.advance(now)),
            (TerminalKind::Projects, self.projects.advance(now)),
            (TerminalKind::Philosophy, self.philosophy.advance(now)),
        ] {
            if events.contains(&RevealEvent::Completed) {
                debug!("{} terminal completed", kind.title());
            }
        }

        match self.contact.tick(now) {
            Some(SubmitStatus::Success) => self.ui.set_status("Message sent"),
            Some(SubmitStatus::Error) => self.ui.set_status("Message delivery failed"),
            _ => {}
        }

        if self.follow_up.take_due(now).is_some() {
            if let Some(path) = self.follow_up_path.take() {
                self.open_file(&path);
            }
        }
    }

    fn drain_injections(&mut self, now: Instant) {
        while let Ok(injection) = self.injections.try_recv() {
            match self.hero.inject(&injection.command, &injection.lines, now) {
                Some(total) => {
                    info!("Injected `{}` into hero terminal", injection.command);
                    if let Some(path) = injection.open_after {
                        self.follow_up.arm(now + total + FOLLOW_UP_DELAY);
                        self.follow_up_path = Some(path);
                    }
                }
                None => warn!("Hero terminal busy, dropped `{}`", injection.command),
            }
        }
    }

    fn observe_visibility(&mut self, now: Instant) {
        let scroll = self.ui.scroll;
        let viewport = self.ui.viewport_height;
        let margin = self.config.visibility_margin;
        for (section, reveal) in [
            (Section::Skills, &mut self.skills),
            (Section::Projects, &mut self.projects),
            (Section::Philosophy, &mut self.philosophy),
        ] {
            let ratio = self.page.visible_ratio(section, scroll, viewport, margin);
            if reveal.observe_visibility(ratio, now) {
                debug!("{} terminal visible ({:.2})", section.title(), ratio);
            }
        }
    }

    fn on_hero_complete(&mut self) {
        info!("Hero terminal complete, unlocking navigation");
        if let Err(e) = self.session.set_hero_complete(true) {
            warn!("Failed to persist session state: {}", e);
        }
        self.ui.set_status("Navigation unlocked");
    }

    fn open_file(&mut self, path: &Path) {
        if self.config.cv_opener.is_empty() {
            self.ui.set_status(format!("CV ready: {}", path.display()));
            return;
        }
        let spawned = Command::new(&self.config.cv_opener)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(_) => self.ui.set_status(format!("Opened {}", path.display())),
            Err(e) => {
                warn!("Could not open {}: {}", path.display(), e);
                self.ui.set_status(format!("CV ready: {}", path.display()));
            }
        }
    }

    pub fn scroll_up(&mut self, rows: u16) {
        if self.is_page_locked() {
            return;
        }
        self.ui.scroll = self.ui.scroll.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: u16) {
        if self.is_page_locked() {
            return;
        }
        let max = self.page.max_scroll(self.ui.viewport_height);
        self.ui.scroll = self.ui.scroll.saturating_add(rows).min(max);
    }

    pub fn goto(&mut self, section: Section) {
        if self.is_page_locked() {
            self.ui.set_status("Navigation unlocks when the intro finishes");
            return;
        }
        let max = self.page.max_scroll(self.ui.viewport_height);
        self.ui.scroll = self.page.top_of(section).min(max);
    }

    pub fn view_cv(&mut self) {
        if self.is_page_locked() {
            self.ui.set_status("Navigation unlocks when the intro finishes");
            return;
        }
        if self.hero.has_pending_injection() || self.follow_up.is_armed() {
            self.ui.set_status("CV generator already running");
            return;
        }
        if self.cv_launcher.launch() {
            self.goto(Section::Home);
        }
    }

    pub fn focus_form(&mut self) {
        if self.is_page_locked() {
            self.ui.set_status("Navigation unlocks when the intro finishes");
            return;
        }
        self.goto(Section::Contact);
        self.ui.focus = Focus::Form;
    }

    pub fn submit_form(&mut self, now: Instant) {
        match self.contact.submit(now, &self.dispatcher) {
            SubmitOutcome::Absorbed | SubmitOutcome::Sending => {
                self.ui.set_status("Sending message...")
            }
            SubmitOutcome::RateLimited => {
                self.ui.set_status("ERR: Too many attempts. Please try again later")
            }
            SubmitOutcome::LockedOut => {
                self.ui.set_status("Contact form locked for this session")
            }
            SubmitOutcome::Invalid => self.ui.set_status("Fix the highlighted fields"),
            SubmitOutcome::Busy => {}
        }
    }

    /// Drop and recreate every terminal, as if the page had been reloaded.
    pub fn replay(&mut self, now: Instant) {
        for reveal in [
            &mut self.hero,
            &mut self.skills,
            &mut self.projects,
            &mut self.philosophy,
        ] {
            reveal.cancel();
        }
        while self.injections.try_recv().is_ok() {}
        self.follow_up.cancel();
        self.follow_up_path = None;

        if let Err(e) = self.session.set_hero_complete(false) {
            warn!("Failed to persist session state: {}", e);
        }
        self.hero = scripts::terminal(TerminalKind::Hero);
        self.skills = scripts::terminal(TerminalKind::Skills);
        self.projects = scripts::terminal(TerminalKind::Projects);
        self.philosophy = scripts::terminal(TerminalKind::Philosophy);
        self.ui.scroll = 0;
        self.ui.focus = Focus::Page;
        self.mount_hero(now);
        info!("Terminals replayed");
    }

    pub fn perform(&mut self, action: Action, now: Instant) {
        match action {
            Action::Help => self.ui.show_help = true,
            Action::Goto { section } => self.goto(section),
            Action::ViewCv => self.view_cv(),
            Action::Contact => self.focus_form(),
            Action::Replay => self.replay(now),
            Action::Quit => self.should_quit = true,
        }
    }

    /// Check if command popup should be shown
    pub fn showing_command_popup(&self) -> bool {
        self.ui.focus == Focus::Command
            && self.ui.command_input.starts_with('/')
            && !self.ui.command_input.contains(' ')
    }

    /// Get filtered commands based on current input
    pub fn get_filtered_commands(&self) -> Vec<(&'static str, &'static str)> {
        if !self.ui.command_input.starts_with('/') {
            return vec![];
        }
        let filter = &self.ui.command_input[1..];
        COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd[1..].starts_with(filter))
            .copied()
            .collect()
    }

    /// Move selection up in command popup
    pub fn command_select_up(&mut self) {
        let filtered = self.get_filtered_commands();
        if filtered.is_empty() {
            return;
        }

        // Cycle: None -> last command -> ... -> 0 -> None
        self.ui.command_selection = match self.ui.command_selection {
            None => Some(filtered.len() - 1),
            Some(0) => None,
            Some(n) => Some(n - 1),
        };
    }

    /// Move selection down in command popup
    pub fn command_select_down(&mut self) {
        let filtered = self.get_filtered_commands();
        if filtered.is_empty() {
            return;
        }

        // Cycle: None -> 0 -> 1 -> ... -> last -> None
        self.ui.command_selection = match self.ui.command_selection {
            None => Some(0),
            Some(n) if n >= filtered.len() - 1 => None,
            Some(n) => Some(n + 1),
        };
    }

    /// Apply selected command to input
    pub fn apply_command_selection(&mut self) {
        if let Some(idx) = self.ui.command_selection {
            let filtered = self.get_filtered_commands();
            if let Some((cmd, _)) = filtered.get(idx) {
                self.ui.command_input = cmd.to_string();
            }
        }
        self.ui.command_selection = None;
    }

    pub fn reset_command_selection(&mut self) {
        self.ui.command_selection = None;
    }

    pub fn open_command_line(&mut self) {
        self.ui.focus = Focus::Command;
        self.ui.command_input = "/".to_string();
        self.ui.command_selection = None;
    }

    pub fn close_command_line(&mut self) {
        self.ui.focus = Focus::Page;
        self.ui.command_input.clear();
        self.ui.command_selection = None;
    }

    pub fn submit_command(&mut self, now: Instant) {
        let input = std::mem::take(&mut self.ui.command_input);
        self.close_command_line();
        if input.trim() == "/" {
            return;
        }
        match CommandParser::parse(&input) {
            Ok(action) => self.perform(action, now),
            Err(message) => self.ui.set_status(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Field;
    use crate::reveal::Phase;

    fn test_config() -> Config {
        Config {
            cv_opener: String::new(),
            ..Config::default()
        }
    }

    fn app(now: Instant) -> App {
        let mut app = App::new(
            test_config(),
            SessionStore::in_memory(),
            Dispatcher::simulated(),
            now,
        );
        app.set_viewport(24);
        app
    }

    fn unlocked_app(now: Instant) -> App {
        let mut session = SessionStore::in_memory();
        session.set_hero_complete(true).unwrap();
        let mut app = App::new(test_config(), session, Dispatcher::simulated(), now);
        app.set_viewport(24);
        app
    }

    #[test]
    fn test_page_locked_until_hero_completes() {
        let t0 = Instant::now();
        let mut app = app(t0);
        assert!(app.is_page_locked());
        assert_eq!(app.hero.phase(), Phase::TypingCommand);

        app.scroll_down(10);
        assert_eq!(app.ui.scroll, 0);
        app.goto(Section::Contact);
        assert_eq!(app.ui.scroll, 0);

        app.tick(t0 + Duration::from_secs(60));
        assert_eq!(app.hero.phase(), Phase::Done);
        assert!(!app.is_page_locked());
        assert!(app.session.hero_complete());

        app.scroll_down(10);
        assert_eq!(app.ui.scroll, 10);
    }

    #[test]
    fn test_completed_session_skips_hero_animation() {
        let app = unlocked_app(Instant::now());
        assert_eq!(app.hero.phase(), Phase::Done);
        assert_eq!(app.hero.output_lines().len(), app.hero.script().lines.len());
        assert!(!app.is_page_locked());
    }

    #[test]
    fn test_section_terminals_wait_for_visibility() {
        let t0 = Instant::now();
        let mut app = unlocked_app(t0);
        app.tick(t0);
        assert_eq!(app.skills.phase(), Phase::Idle);

        app.goto(Section::Skills);
        app.tick(t0 + Duration::from_millis(16));
        assert_ne!(app.skills.phase(), Phase::Idle);
        assert_eq!(app.philosophy.phase(), Phase::Idle);
    }

    #[test]
    fn test_section_terminals_start_in_short_terminal() {
        let t0 = Instant::now();
        let mut app = unlocked_app(t0);
        // 18-row terminal
        app.set_viewport(crate::ui::page_height(18));
        app.tick(t0);

        app.goto(Section::Projects);
        app.tick(t0 + Duration::from_millis(16));
        assert_ne!(app.projects.phase(), Phase::Idle);

        app.goto(Section::Philosophy);
        app.tick(t0 + Duration::from_millis(32));
        assert_ne!(app.philosophy.phase(), Phase::Idle);
    }

    #[test]
    fn test_view_cv_injects_into_hero() {
        let t0 = Instant::now();
        let mut app = unlocked_app(t0);
        let before = app.hero.output_lines().len();

        app.view_cv();
        app.tick(t0);
        assert_eq!(
            app.hero.output_lines().last().map(String::as_str),
            Some("$ generate-cv --format=pdf --output=NazmulHassanResume.pdf")
        );

        app.view_cv();
        assert_eq!(
            app.ui.status_message.as_deref(),
            Some("CV generator already running")
        );

        app.tick(t0 + Duration::from_secs(10));
        assert_eq!(app.hero.output_lines().len(), before + 1 + 6);
        assert_eq!(
            app.ui.status_message.as_deref(),
            Some("CV ready: NazmulHassanResume.pdf")
        );
    }

    #[test]
    fn test_view_cv_blocked_while_locked() {
        let t0 = Instant::now();
        let mut app = app(t0);
        app.view_cv();
        app.tick(t0);
        assert!(!app
            .hero
            .output_lines()
            .iter()
            .any(|l| l.contains("generate-cv")));
    }

    #[test]
    fn test_replay_restarts_terminals() {
        let t0 = Instant::now();
        let mut app = unlocked_app(t0);
        app.goto(Section::Projects);
        app.tick(t0 + Duration::from_secs(1));

        app.replay(t0 + Duration::from_secs(2));
        assert!(app.is_page_locked());
        assert_eq!(app.ui.scroll, 0);
        assert_eq!(app.hero.phase(), Phase::TypingCommand);
        assert_eq!(app.projects.phase(), Phase::Idle);
    }

    #[test]
    fn test_command_popup_filtering() {
        let mut app = unlocked_app(Instant::now());
        app.open_command_line();
        app.ui.command_input.push('c');
        assert!(app.showing_command_popup());
        let filtered = app.get_filtered_commands();
        assert_eq!(filtered.iter().map(|(c, _)| *c).collect::<Vec<_>>(), ["/cv", "/contact"]);

        app.command_select_down();
        app.command_select_down();
        app.apply_command_selection();
        assert_eq!(app.ui.command_input, "/contact");
    }

    #[test]
    fn test_commands_drive_actions() {
        let t0 = Instant::now();
        let mut app = unlocked_app(t0);

        app.open_command_line();
        app.ui.command_input = "/goto contact".to_string();
        app.submit_command(t0);
        assert_eq!(app.current_section(), Section::Contact);
        assert_eq!(app.ui.focus, Focus::Page);

        app.open_command_line();
        app.ui.command_input = "/nope".to_string();
        app.submit_command(t0);
        assert!(app
            .ui
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Unknown command")));

        app.perform(Action::Contact, t0);
        assert_eq!(app.ui.focus, Focus::Form);

        app.perform(Action::Quit, t0);
        assert!(app.should_quit);
    }

    #[test]
    fn test_form_submission_through_app() {
        let t0 = Instant::now();
        let mut app = unlocked_app(t0);
        app.focus_form();
        for (field, text) in [
            (Field::Name, "ada lovelace"),
            (Field::Email, "ada@example.com"),
            (Field::Subject, "analytical engine"),
            (Field::Message, "notes on the engine, part one."),
        ] {
            app.contact.focus = field;
            app.contact.input_str(text);
        }
        app.submit_form(t0);
        assert_eq!(app.contact.status, SubmitStatus::Submitting);

        let mut now = t0;
        for _ in 0..500 {
            now += Duration::from_millis(16);
            app.tick(now);
            if app.contact.status != SubmitStatus::Submitting {
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(app.contact.status, SubmitStatus::Success);
        assert_eq!(app.ui.status_message.as_deref(), Some("Message sent"));
    }

    #[test]
    fn test_configured_honeypot_absorbs_submission() {
        let t0 = Instant::now();
        let mut session = SessionStore::in_memory();
        session.set_hero_complete(true).unwrap();
        let config = Config {
            honeypot: "http://spam.example".to_string(),
            ..test_config()
        };
        let mut app = App::new(config, session, Dispatcher::simulated(), t0);
        app.set_viewport(24);
        app.focus_form();
        app.contact.focus = Field::Name;
        app.contact.input_str("spam bot");

        app.submit_form(t0);
        assert_eq!(app.contact.status, SubmitStatus::Submitting);
        app.tick(t0 + Duration::from_millis(1500));
        assert_eq!(app.contact.status, SubmitStatus::Success);
        assert_eq!(app.contact.state.name, "Spam Bot");
        assert!(app.contact.errors.is_empty());
    }

    #[test]
    fn test_status_message_times_out() {
        let t0 = Instant::now();
        let mut app = unlocked_app(t0);
        app.ui.set_status("hello");
        for i in 0..app.config.status_timeout_ticks {
            app.tick(t0 + Duration::from_millis(i));
        }
        assert!(app.ui.status_message.is_none());
    }
}
