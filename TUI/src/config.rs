//! Application configuration and constants.
//!
//! Every field has a default; `termfolio.toml` and `TERMFOLIO_*` environment
//! variables override them.

use std::path::PathBuf;
use std::time::Duration;

use ::config::{Config as Settings, ConfigError, Environment, File};
use serde::Deserialize;

use crate::contact::FormTiming;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Accept submissions without sending anything.
    Simulated,
    /// Pipe each submission to `dispatch_program`.
    Command,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Main loop tick rate in milliseconds (target 60 FPS = ~16ms)
    pub tick_rate_ms: u64,

    /// How many ticks to show status messages (180 = ~3s at 60fps)
    pub status_timeout_ticks: u64,

    /// Modulo for animation frame counter
    pub animation_frame_mod: usize,

    /// Rows to scroll per PageUp/PageDown
    pub scroll_step: u16,

    /// Extra rows counted as visible above and below the viewport
    pub visibility_margin: u16,

    pub log_file: PathBuf,
    pub session_file: PathBuf,

    /// Opened after the CV has been "generated"
    pub cv_path: PathBuf,
    pub cv_opener: String,

    pub dispatch_mode: DispatchMode,
    pub dispatch_program: String,
    pub dispatch_args: Vec<String>,
    /// Seconds before a hanging `dispatch_program` is killed
    pub dispatch_timeout_secs: u64,

    /// Pre-filled hidden field; any value makes submissions bot traffic
    pub honeypot: String,

    pub rate_limit_max: usize,
    pub rate_limit_window_secs: u64,
    pub lockout_after: usize,
    pub submit_delay_ms: u64,
    pub success_reset_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let state_dir = std::env::temp_dir();
        Self {
            tick_rate_ms: 16,
            status_timeout_ticks: 180,
            animation_frame_mod: 360,
            scroll_step: 10,
            visibility_margin: 3,
            log_file: state_dir.join("termfolio.log"),
            session_file: state_dir.join("termfolio-session.json"),
            cv_path: PathBuf::from(crate::content::CV_FILE),
            cv_opener: default_opener().to_string(),
            dispatch_mode: DispatchMode::Simulated,
            dispatch_program: String::new(),
            dispatch_args: Vec::new(),
            dispatch_timeout_secs: 30,
            honeypot: String::new(),
            rate_limit_max: 2,
            rate_limit_window_secs: 10,
            lockout_after: 5,
            submit_delay_ms: 1500,
            success_reset_ms: 5000,
        }
    }
}

fn default_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "explorer"
    } else {
        "xdg-open"
    }
}

impl Config {
    /// Load `path` (optional file) with environment overrides on top.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let settings = Settings::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("TERMFOLIO").try_parsing(true))
            .build()?;
        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::Message("tick_rate_ms must be greater than 0".into()));
        }
        if self.rate_limit_max == 0 {
            return Err(ConfigError::Message("rate_limit_max must be greater than 0".into()));
        }
        if self.rate_limit_window_secs == 0 {
            return Err(ConfigError::Message(
                "rate_limit_window_secs must be greater than 0".into(),
            ));
        }
        if self.dispatch_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "dispatch_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.dispatch_mode == DispatchMode::Command && self.dispatch_program.trim().is_empty() {
            return Err(ConfigError::Message(
                "dispatch_program is required when dispatch_mode = \"command\"".into(),
            ));
        }
        Ok(())
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch_timeout_secs)
    }

    pub fn form_timing(&self) -> FormTiming {
        FormTiming {
            submit_delay: Duration::from_millis(self.submit_delay_ms),
            success_reset: Duration::from_millis(self.success_reset_ms),
            rate_limit_max: self.rate_limit_max,
            rate_limit_window: Duration::from_secs(self.rate_limit_window_secs),
            lockout_after: self.lockout_after,
        }
    }
}

/// Slash commands shown in the popup
pub const COMMANDS: &[(&str, &str)] = &[
    ("/help", "Show keys and commands"),
    ("/goto", "Jump to a section"),
    ("/cv", "Generate and open the CV"),
    ("/contact", "Open the contact form"),
    ("/replay", "Replay the terminals"),
    ("/quit", "Exit termfolio"),
];
