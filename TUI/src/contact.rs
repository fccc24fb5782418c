//! Contact form state machine.
//!
//! Each keystroke rebuilds the stored value from the raw buffer
//! (sanitize, then format) and re-runs the live check for that field.
//! Submission goes through the honeypot, the rate limiter and full
//! validation before the request is handed to the dispatcher.

use std::collections::BTreeMap;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::dispatch::{ContactRequest, DispatchError, DispatchResult, Dispatcher};
use crate::form::{Field, FormState};
use crate::format::format_field;
use crate::rate_limit::RateLimiter;
use crate::reveal::TimerSlot;
use crate::sanitize::sanitize;
use crate::validation::{validate_field_live, validate_form, ValidationError, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Success,
    Error,
}

/// What a call to [`ContactForm::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Honeypot filled: fake success, nothing sent.
    Absorbed,
    RateLimited,
    LockedOut,
    Invalid,
    Sending,
    Busy,
}

#[derive(Debug, Clone)]
pub struct FormTiming {
    pub submit_delay: Duration,
    pub success_reset: Duration,
    pub rate_limit_max: usize,
    pub rate_limit_window: Duration,
    pub lockout_after: usize,
}

impl Default for FormTiming {
    fn default() -> Self {
        Self {
            submit_delay: Duration::from_millis(1500),
            success_reset: Duration::from_millis(5000),
            rate_limit_max: 2,
            rate_limit_window: Duration::from_secs(10),
            lockout_after: 5,
        }
    }
}

enum Delivery {
    Fabricated,
    Waiting(Receiver<DispatchResult>),
    Finished(DispatchResult),
}

struct PendingSubmission {
    ready_at: Instant,
    delivery: Delivery,
}

pub struct ContactForm {
    pub state: FormState,
    pub errors: ValidationErrors,
    pub status: SubmitStatus,
    pub focus: Field,
    pub terminal_lines: Vec<String>,
    raw: BTreeMap<Field, String>,
    limiter: RateLimiter,
    timing: FormTiming,
    pending: Option<PendingSubmission>,
    reset_timer: TimerSlot,
}

impl ContactForm {
    pub fn new(timing: FormTiming) -> Self {
        Self {
            state: FormState::new(),
            errors: ValidationErrors::default(),
            status: SubmitStatus::Idle,
            focus: Field::Name,
            terminal_lines: Vec::new(),
            raw: BTreeMap::new(),
            limiter: RateLimiter::new(
                timing.rate_limit_max,
                timing.rate_limit_window,
                timing.lockout_after,
            ),
            timing,
            pending: None,
            reset_timer: TimerSlot::default(),
        }
    }

    pub fn raw(&self, field: Field) -> &str {
        self.raw.get(&field).map_or("", String::as_str)
    }

    pub fn is_locked_out(&self) -> bool {
        self.limiter.is_locked_out()
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmitStatus::Submitting
    }

    /// Replace the raw text of `field` and recompute its stored value.
    pub fn set_raw(&mut self, field: Field, raw: String) {
        let value = format_field(&sanitize(&raw), field);
        self.raw.insert(field, raw);
        self.errors.clear_field(field);

        if let Some(err) = validate_field_live(field, &value) {
            if err == ValidationError::SuspiciousContent {
                warn!("{} in {} field", err.code(), field.label());
                self.errors.set_general(ValidationError::SecurityAlert);
            }
            self.errors.set(field, err);
        }
        self.state.set(field, value);
    }

    pub fn input_char(&mut self, c: char) {
        let mut raw = self.raw(self.focus).to_string();
        raw.push(c);
        self.set_raw(self.focus, raw);
    }

    pub fn input_str(&mut self, text: &str) {
        let mut raw = self.raw(self.focus).to_string();
        raw.push_str(text);
        self.set_raw(self.focus, raw);
    }

    pub fn backspace(&mut self) {
        let mut raw = self.raw(self.focus).to_string();
        if raw.pop().is_some() {
            self.set_raw(self.focus, raw);
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Hidden field; only automated clients ever fill it.
    pub fn set_honeypot(&mut self, value: &str) {
        self.state.honeypot = sanitize(value);
    }

    pub fn submit(&mut self, now: Instant, dispatcher: &Dispatcher) -> SubmitOutcome {
        if self.is_submitting() {
            return SubmitOutcome::Busy;
        }

        if self.state.is_bot_submission() {
            warn!("Bot submission detected");
            self.status = SubmitStatus::Submitting;
            self.pending = Some(PendingSubmission {
                ready_at: now + self.timing.submit_delay,
                delivery: Delivery::Fabricated,
            });
            return SubmitOutcome::Absorbed;
        }

        if self.limiter.is_locked_out() {
            warn!(
                "Contact form locked after {} attempts",
                self.limiter.total_attempts()
            );
            self.errors.set_general(ValidationError::RateLimit);
            return SubmitOutcome::LockedOut;
        }

        if !self.limiter.is_allowed(now) {
            let wait = self.limiter.retry_after(now).unwrap_or_default();
            warn!("Contact form rate limited, window frees in {} ms", wait.as_millis());
            self.errors.set_general(ValidationError::RateLimit);
            return SubmitOutcome::RateLimited;
        }

        self.errors = validate_form(&self.state);
        if !self.errors.is_empty() {
            return SubmitOutcome::Invalid;
        }

        self.reset_timer.cancel();
        self.status = SubmitStatus::Submitting;
        self.terminal_lines = vec![
            "Initializing secure contact request...".to_string(),
            "Performing security checks...".to_string(),
            "Validating input integrity...".to_string(),
            format!("From: {} <{}>", self.state.name, self.state.email),
            format!("Subject: {}", self.state.subject),
            "Encrypting message content...".to_string(),
            "Establishing secure connection...".to_string(),
        ];

        let request = ContactRequest::from_form(&self.state);
        info!("Dispatching contact request via {}", dispatcher.transport_name());
        self.pending = Some(PendingSubmission {
            ready_at: now + self.timing.submit_delay,
            delivery: Delivery::Waiting(dispatcher.spawn(request)),
        });
        SubmitOutcome::Sending
    }

    /// Advance pending timers. Returns the new status if it changed.
    pub fn tick(&mut self, now: Instant) -> Option<SubmitStatus> {
        if self.reset_timer.take_due(now).is_some() {
            self.status = SubmitStatus::Idle;
            self.terminal_lines.clear();
            return Some(SubmitStatus::Idle);
        }

        let pending = self.pending.as_mut()?;
        if let Delivery::Waiting(rx) = &pending.delivery {
            match rx.try_recv() {
                Ok(result) => pending.delivery = Delivery::Finished(result),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    pending.delivery = Delivery::Finished(Err(DispatchError::Io(
                        std::io::Error::other("dispatch worker disconnected"),
                    )));
                }
            }
        }
        if now < pending.ready_at || matches!(pending.delivery, Delivery::Waiting(_)) {
            return None;
        }

        let finished = self.pending.take()?;
        match finished.delivery {
            // Fields and token stay as the bot left them.
            Delivery::Fabricated => self.status = SubmitStatus::Success,
            Delivery::Finished(Ok(())) => {
                info!("Contact request delivered");
                self.terminal_lines.push("Security verification complete".to_string());
                self.terminal_lines.push("Message delivered successfully!".to_string());
                self.reset_fields();
                self.status = SubmitStatus::Success;
            }
            Delivery::Finished(Err(_)) => {
                self.terminal_lines.push("Error: Message delivery failed.".to_string());
                self.status = SubmitStatus::Error;
            }
            Delivery::Waiting(_) => return None,
        }

        if self.status == SubmitStatus::Success {
            self.reset_timer.arm(now + self.timing.success_reset);
        }
        Some(self.status)
    }

    /// Drop pending timers; a result arriving later is ignored.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.reset_timer.cancel();
    }

    fn reset_fields(&mut self) {
        self.state = FormState::new();
        self.raw.clear();
        self.errors.clear();
        self.focus = Field::Name;
    }
}
