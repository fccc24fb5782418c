mod action;
mod app;
mod command;
mod config;
mod contact;
mod content;
mod dispatch;
mod form;
mod format;
mod page;
mod rate_limit;
mod reveal;
mod sanitize;
mod scripts;
mod session;
mod typewriter;
mod ui;
mod ui_state;
mod validation;

use std::env;
use std::fs::File;
use std::io;
use std::sync::Arc;
use std::time::Instant;

use arboard::Clipboard;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use env_logger::{Builder, Env, Target};
use log::{info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::App;
use crate::config::{Config, DispatchMode};
use crate::dispatch::{CommandDispatch, Dispatcher};
use crate::page::Section;
use crate::session::SessionStore;
use crate::ui::{draw, page_height};
use crate::ui_state::Focus;

const DEFAULT_CONFIG: &str = "termfolio";

fn main() -> io::Result<()> {
    // Parse command line args
    let args: Vec<String> = env::args().collect();
    let config_path = args
        .iter()
        .position(|a| a == "--config" || a == "-c")
        .and_then(|i| args.get(i + 1))
        .map_or(DEFAULT_CONFIG, String::as_str);
    let reset_session = args.iter().any(|a| a == "--reset");
    let force_simulated = args.iter().any(|a| a == "--simulate");

    let (mut config, config_error) = match Config::load(config_path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    if force_simulated {
        config.dispatch_mode = DispatchMode::Simulated;
    }

    init_logging(&config);
    if let Some(e) = config_error {
        warn!("Invalid configuration ({}), using defaults", e);
    }

    // An empty path keeps the session flag in memory only.
    let mut session = if config.session_file.as_os_str().is_empty() {
        SessionStore::in_memory()
    } else {
        SessionStore::open(&config.session_file)
    };
    if let Some(path) = session.path() {
        info!("Session file: {}", path.display());
    }
    if reset_session {
        if let Err(e) = session.set_hero_complete(false) {
            warn!("Failed to reset session: {}", e);
        }
    }
    let dispatcher = build_dispatcher(&config);
    info!("termfolio starting (dispatch: {})", dispatcher.transport_name());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(config, session, dispatcher, Instant::now());

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    app.contact.cancel();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    // The terminal is ours; logs go to a file or nowhere.
    match File::create(&config.log_file) {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.target(Target::Pipe(Box::new(io::sink())));
        }
    }
    let _ = builder.try_init();
}

fn build_dispatcher(config: &Config) -> Dispatcher {
    match config.dispatch_mode {
        DispatchMode::Simulated => Dispatcher::simulated(),
        DispatchMode::Command => Dispatcher::new(Arc::new(
            CommandDispatch::new(config.dispatch_program.clone(), config.dispatch_args.clone())
                .with_timeout(config.dispatch_timeout()),
        )),
    }
}

/// Single-line text from the clipboard or a bracketed paste.
fn flatten_paste(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '\r')
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

/// Only the message field keeps line breaks.
fn paste(app: &mut App, text: &str) {
    match app.ui.focus {
        Focus::Command => {
            app.ui.command_input.push_str(&flatten_paste(text));
            app.reset_command_selection();
        }
        Focus::Form if app.contact.focus == form::Field::Message => {
            app.contact.input_str(&text.replace('\r', ""))
        }
        Focus::Form => app.contact.input_str(&flatten_paste(text)),
        Focus::Page => {}
    }
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    let tick_rate = app.config.tick_rate();
    loop {
        app.set_viewport(page_height(terminal.size()?.height));
        app.tick(Instant::now());

        terminal.draw(|frame| draw(frame, app))?;

        if app.should_quit {
            return Ok(());
        }

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key(app, key) {
                        return Ok(());
                    }
                }
                Event::Paste(text) => paste(app, &text),
                _ => {}
            }
        }
    }
}

/// Returns true when the app should exit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return true;
    }
    if ctrl && key.code == KeyCode::Char('v') {
        // Ctrl+V: Get clipboard content
        if let Ok(mut clipboard) = Clipboard::new() {
            if let Ok(text) = clipboard.get_text() {
                paste(app, &text);
            }
        }
        return false;
    }

    if app.ui.show_help {
        app.ui.show_help = false;
        return false;
    }

    let now = Instant::now();
    match app.ui.focus {
        Focus::Command => match key.code {
            KeyCode::Esc => {
                if app.showing_command_popup() && app.ui.command_selection.is_some() {
                    app.reset_command_selection();
                } else {
                    app.close_command_line();
                }
            }
            KeyCode::Enter => {
                if app.showing_command_popup() && app.ui.command_selection.is_some() {
                    app.apply_command_selection();
                } else {
                    app.submit_command(now);
                }
            }
            KeyCode::Tab => {
                if app.showing_command_popup() && app.ui.command_selection.is_some() {
                    app.apply_command_selection();
                }
            }
            KeyCode::Backspace => {
                app.ui.command_input.pop();
                app.reset_command_selection();
                if app.ui.command_input.is_empty() {
                    app.close_command_line();
                }
            }
            KeyCode::Up => app.command_select_up(),
            KeyCode::Down => app.command_select_down(),
            KeyCode::Char(c) => {
                app.ui.command_input.push(c);
                app.reset_command_selection();
            }
            _ => {}
        },
        Focus::Form => match key.code {
            KeyCode::Esc => app.ui.focus = Focus::Page,
            KeyCode::Char('s') if ctrl => app.submit_form(now),
            KeyCode::Enter => {
                if app.contact.focus == form::Field::Message {
                    app.contact.input_char('\n');
                } else {
                    app.contact.focus_next();
                }
            }
            KeyCode::Tab | KeyCode::Down => app.contact.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.contact.focus_prev(),
            KeyCode::Backspace => app.contact.backspace(),
            KeyCode::Char(c) if !ctrl => app.contact.input_char(c),
            _ => {}
        },
        Focus::Page => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return true,
            KeyCode::Char('/') => app.open_command_line(),
            KeyCode::Char('?') => app.ui.show_help = true,
            KeyCode::Char('v') => app.view_cv(),
            KeyCode::Tab => app.focus_form(),
            KeyCode::Up => app.scroll_up(1),
            KeyCode::Down => app.scroll_down(1),
            KeyCode::PageUp => app.scroll_up(app.config.scroll_step),
            KeyCode::PageDown => app.scroll_down(app.config.scroll_step),
            KeyCode::Home => app.goto(Section::Home),
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                if let Some(section) = Section::from_index(index) {
                    app.goto(section);
                }
            }
            _ => {}
        },
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Dispatcher;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn unlocked_app() -> App {
        let mut session = SessionStore::in_memory();
        session.set_hero_complete(true).unwrap();
        let mut app = App::new(Config::default(), session, Dispatcher::simulated(), Instant::now());
        app.set_viewport(24);
        app
    }

    #[test]
    fn test_flatten_paste() {
        assert_eq!(flatten_paste("a\r\nb\nc"), "a b c");
    }

    #[test]
    fn test_number_keys_jump_to_sections() {
        let mut app = unlocked_app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_section(), Section::Projects);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.ui.scroll, 0);
    }

    #[test]
    fn test_form_keys() {
        let mut app = unlocked_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.ui.focus, Focus::Form);
        for c in "ada".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.contact.state.name, "Ada");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.contact.focus, form::Field::Email);
        // 'q' is text inside the form, not quit
        assert!(!press(&mut app, KeyCode::Char('q')));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.ui.focus, Focus::Page);
        assert!(press(&mut app, KeyCode::Esc));
    }

    #[test]
    fn test_enter_in_message_inserts_newline() {
        let mut app = unlocked_app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.contact.focus, form::Field::Email);

        app.contact.focus = form::Field::Message;
        for c in "first line".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        for c in "second".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.contact.state.message, "First line\nsecond");
        assert_eq!(app.contact.status, contact::SubmitStatus::Idle);

        // Ctrl+S still submits; the other fields are empty
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(app.ui.status_message.as_deref(), Some("Fix the highlighted fields"));
    }

    #[test]
    fn test_paste_keeps_newlines_in_message_only() {
        let mut app = unlocked_app();
        press(&mut app, KeyCode::Tab);
        paste(&mut app, "ada\r\nlovelace");
        assert_eq!(app.contact.raw(form::Field::Name), "ada lovelace");

        app.contact.focus = form::Field::Message;
        paste(&mut app, "hi there.\r\nsee you");
        assert_eq!(app.contact.raw(form::Field::Message), "hi there.\nsee you");
    }

    #[test]
    fn test_command_line_keys() {
        let mut app = unlocked_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.ui.focus, Focus::Command);
        for c in "goto 5".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.ui.focus, Focus::Page);
        assert_eq!(app.current_section(), Section::Philosophy);
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let mut app = unlocked_app();
        press(&mut app, KeyCode::Tab);
        assert!(handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
    }
}
