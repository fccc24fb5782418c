//! Scripted terminal reveal.
//!
//! A command is typed character by character, held for a moment, then the
//! script's output lines appear one at a time with content-dependent delays.
//! Every delay is a deadline in a [`TimerSlot`]; the owner drives the machine
//! by calling [`ScriptedReveal::advance`] with the current instant.

use std::collections::VecDeque;
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A command followed by its output.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalScript {
    pub command: String,
    pub lines: Vec<String>,
}

/// Output lines that are themselves commands get typed out before they appear.
#[derive(Debug, Clone)]
pub struct SubCommandPacing {
    pub is_sub_command: fn(&str) -> bool,
    pub typing_ms: RangeInclusive<u64>,
    pub pause: Duration,
}

/// Timing profile of one terminal instance.
#[derive(Debug, Clone)]
pub struct Pacing {
    pub typing_ms: RangeInclusive<u64>,
    pub command_pause: Duration,
    pub line_delay: fn(&str) -> Duration,
    pub sub_command: Option<SubCommandPacing>,
    pub completion_delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    TypingCommand,
    PausedAfterCommand,
    RevealingOutput,
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RevealEvent {
    Started,
    CommandTyped,
    LineRevealed { index: usize },
    /// One-shot, `completion_delay` after the last line.
    Completed,
    LineInjected,
}

/// A cancellable one-shot deadline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimerSlot {
    deadline: Option<Instant>,
}

impl TimerSlot {
    pub fn arm(&mut self, at: Instant) {
        self.deadline = Some(at);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarm and return the deadline if it has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<Instant> {
        match self.deadline {
            Some(at) if at <= now => {
                self.deadline = None;
                Some(at)
            }
            _ => None,
        }
    }
}

/// Fires once, the first time a visible ratio reaches the threshold.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityTrigger {
    threshold: f32,
    fired: bool,
}

impl VisibilityTrigger {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            fired: false,
        }
    }

    pub fn observe(&mut self, ratio: f32) -> bool {
        if self.fired || ratio < self.threshold {
            return false;
        }
        self.fired = true;
        true
    }
}

#[derive(Debug, Default)]
struct SubCommandProgress {
    typed_chars: usize,
    holding: bool,
}

pub struct ScriptedReveal {
    script: TerminalScript,
    pacing: Pacing,
    trigger: VisibilityTrigger,
    phase: Phase,
    command_text: String,
    output_lines: Vec<String>,
    current_line: usize,
    sub_command: Option<SubCommandProgress>,
    step: TimerSlot,
    completion: TimerSlot,
    completed: bool,
    cancelled: bool,
    injected: VecDeque<(Instant, String)>,
    rng: StdRng,
}

impl ScriptedReveal {
    pub fn new(script: TerminalScript, pacing: Pacing, threshold: f32) -> Self {
        Self::with_rng(script, pacing, threshold, StdRng::from_entropy())
    }

    pub fn with_rng(script: TerminalScript, pacing: Pacing, threshold: f32, rng: StdRng) -> Self {
        Self {
            script,
            pacing,
            trigger: VisibilityTrigger::new(threshold),
            phase: Phase::Idle,
            command_text: String::new(),
            output_lines: Vec::new(),
            current_line: 0,
            sub_command: None,
            step: TimerSlot::default(),
            completion: TimerSlot::default(),
            completed: false,
            cancelled: false,
            injected: VecDeque::new(),
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn command_text(&self) -> &str {
        &self.command_text
    }

    pub fn output_lines(&self) -> &[String] {
        &self.output_lines
    }

    pub fn current_line(&self) -> usize {
        self.current_line
    }

    pub fn script(&self) -> &TerminalScript {
        &self.script
    }

    /// Whether the completion event has fired.
    pub fn has_completed(&self) -> bool {
        self.completed
    }

    /// The partially typed sub-command, while one is being typed.
    pub fn typing_sub_command(&self) -> Option<&str> {
        let progress = self.sub_command.as_ref()?;
        let line = self.script.lines.get(self.current_line)?;
        let end = line
            .char_indices()
            .nth(progress.typed_chars)
            .map_or(line.len(), |(i, _)| i);
        Some(&line[..end])
    }

    /// Report how much of the panel is on screen. Starts the sequence the
    /// first time the ratio reaches the threshold.
    pub fn observe_visibility(&mut self, ratio: f32, now: Instant) -> bool {
        if self.phase != Phase::Idle || self.cancelled {
            return false;
        }
        if self.trigger.observe(ratio) {
            self.start(now);
            return true;
        }
        false
    }

    /// Leave `Idle` without waiting for visibility.
    pub fn start(&mut self, now: Instant) {
        if self.phase != Phase::Idle || self.cancelled {
            return;
        }
        debug!("Terminal started: {}", self.script.command);
        self.phase = Phase::TypingCommand;
        if self.script.command.is_empty() {
            self.phase = Phase::PausedAfterCommand;
            self.step.arm(now + self.pacing.command_pause);
        } else {
            let delay = self.jitter(self.pacing.typing_ms.clone());
            self.step.arm(now + delay);
        }
    }

    /// Jump straight to `Done` with the whole script shown. No events fire.
    pub fn finish_immediately(&mut self) {
        if self.cancelled {
            return;
        }
        self.trigger.fired = true;
        self.command_text = self.script.command.clone();
        self.output_lines = self.script.lines.clone();
        self.current_line = self.script.lines.len();
        self.sub_command = None;
        self.step.cancel();
        self.completion.cancel();
        self.completed = true;
        self.phase = Phase::Done;
    }

    /// Clear every pending timer. Nothing fires afterwards.
    pub fn cancel(&mut self) {
        self.step.cancel();
        self.completion.cancel();
        self.injected.clear();
        self.cancelled = true;
    }

    /// Append a command and its output after the script has finished.
    ///
    /// The command line appears at once; output lines follow after 300 ms
    /// and then every 200-500 ms. Returns the total scheduled delay, or
    /// `None` if the script is still running.
    pub fn inject(&mut self, command: &str, lines: &[String], now: Instant) -> Option<Duration> {
        if self.phase != Phase::Done || self.cancelled {
            return None;
        }
        self.output_lines.push(format!("$ {}", command));

        let mut delay = Duration::from_millis(300);
        for line in lines {
            self.injected.push_back((now + delay, line.clone()));
            delay += self.jitter(200..=500);
        }
        Some(delay)
    }

    pub fn has_pending_injection(&self) -> bool {
        !self.injected.is_empty()
    }

    /// Run every timer that is due at `now`, in deadline order.
    pub fn advance(&mut self, now: Instant) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        if self.cancelled {
            return events;
        }

        loop {
            if let Some(at) = self.step.take_due(now) {
                self.fire_step(at, &mut events);
                continue;
            }
            if self.completion.take_due(now).is_some() {
                self.completed = true;
                events.push(RevealEvent::Completed);
                continue;
            }
            match self.injected.front() {
                Some((at, _)) if *at <= now => {
                    if let Some((_, line)) = self.injected.pop_front() {
                        self.output_lines.push(line);
                        events.push(RevealEvent::LineInjected);
                    }
                }
                _ => break,
            }
        }

        events
    }

    fn fire_step(&mut self, at: Instant, events: &mut Vec<RevealEvent>) {
        match self.phase {
            Phase::Idle | Phase::Done => {}
            Phase::TypingCommand => {
                if self.command_text.is_empty() {
                    events.push(RevealEvent::Started);
                }
                let typed = self.command_text.chars().count();
                if let Some(ch) = self.script.command.chars().nth(typed) {
                    self.command_text.push(ch);
                }
                if self.command_text.len() >= self.script.command.len() {
                    events.push(RevealEvent::CommandTyped);
                    self.phase = Phase::PausedAfterCommand;
                    self.step.arm(at + self.pacing.command_pause);
                } else {
                    let delay = self.jitter(self.pacing.typing_ms.clone());
                    self.step.arm(at + delay);
                }
            }
            Phase::PausedAfterCommand => {
                self.phase = Phase::RevealingOutput;
                self.schedule_line(at);
            }
            Phase::RevealingOutput => {
                if let Some(progress) = self.sub_command.as_mut() {
                    if !progress.holding {
                        progress.typed_chars += 1;
                        let total = self
                            .script
                            .lines
                            .get(self.current_line)
                            .map_or(0, |l| l.chars().count());
                        let Some(sub) = self.pacing.sub_command.as_ref() else {
                            return;
                        };
                        if progress.typed_chars >= total {
                            progress.holding = true;
                            let pause = sub.pause;
                            self.step.arm(at + pause);
                        } else {
                            let range = sub.typing_ms.clone();
                            let delay = self.jitter(range);
                            self.step.arm(at + delay);
                        }
                        return;
                    }
                }
                self.sub_command = None;
                self.reveal_line(at, events);
            }
        }
    }

    fn reveal_line(&mut self, at: Instant, events: &mut Vec<RevealEvent>) {
        let Some(line) = self.script.lines.get(self.current_line) else {
            return;
        };
        self.output_lines.push(line.clone());
        events.push(RevealEvent::LineRevealed {
            index: self.current_line,
        });
        self.current_line += 1;
        self.schedule_line(at);
    }

    /// Arm the timer for the line under the cursor, or finish.
    fn schedule_line(&mut self, at: Instant) {
        let Some(line) = self.script.lines.get(self.current_line) else {
            self.phase = Phase::Done;
            self.completion.arm(at + self.pacing.completion_delay);
            debug!("Terminal finished: {}", self.script.command);
            return;
        };

        let sub = self
            .pacing
            .sub_command
            .as_ref()
            .filter(|sub| (sub.is_sub_command)(line))
            .map(|sub| sub.typing_ms.clone());

        let delay = match sub {
            Some(range) => {
                self.sub_command = Some(SubCommandProgress::default());
                self.jitter(range)
            }
            None => (self.pacing.line_delay)(line),
        };
        self.step.arm(at + delay);
    }

    fn jitter(&mut self, range: RangeInclusive<u64>) -> Duration {
        Duration::from_millis(self.rng.gen_range(range))
    }
}
