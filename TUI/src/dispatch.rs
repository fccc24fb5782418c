// Contact request delivery. Runs off the UI thread; the result comes back
// over a channel.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use log::{error, info, warn};
use thiserror::Error;

use crate::form::FormState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(rename = "securityToken")]
    pub security_token: String,
}

impl ContactRequest {
    pub fn from_form(state: &FormState) -> Self {
        Self {
            name: state.name.clone(),
            email: state.email.clone(),
            subject: state.subject.clone(),
            message: state.message.clone(),
            security_token: state.security_token.clone(),
        }
    }

    pub fn check_required(&self) -> Result<(), DispatchError> {
        let fields = [&self.name, &self.email, &self.subject, &self.message];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(DispatchError::MissingFields);
        }
        Ok(())
    }
}

/// What the mail transport receives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingMail {
    pub subject: String,
    pub from_name: String,
    pub reply_to: String,
    pub body: String,
    pub security_token: String,
    pub timestamp: String,
}

impl OutgoingMail {
    pub fn from_request(request: &ContactRequest) -> Self {
        Self {
            subject: format!("Portfolio Contact: {}", request.subject),
            from_name: request.name.clone(),
            reply_to: request.email.clone(),
            body: request.message.clone(),
            security_token: request.security_token.clone(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("All fields are required")]
    MissingFields,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Transport exited with status {0}")]
    Rejected(i32),
    #[error("Transport terminated by signal")]
    Terminated,
    #[error("Transport did not finish within {0:?}")]
    TimedOut(Duration),
}

pub trait Dispatch: Send + Sync {
    fn name(&self) -> &str;
    fn send(&self, request: &ContactRequest) -> Result<(), DispatchError>;
}

/// Accepts every request without delivering it.
pub struct SimulatedDispatch;

impl Dispatch for SimulatedDispatch {
    fn name(&self) -> &str {
        "simulated"
    }

    fn send(&self, request: &ContactRequest) -> Result<(), DispatchError> {
        request.check_required()?;
        info!(
            "Simulated delivery: {}",
            OutgoingMail::from_request(request).subject
        );
        Ok(())
    }
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const WAIT_POLL: Duration = Duration::from_millis(20);

/// Pipes the mail as JSON to an external program's stdin. Exit status 0
/// means delivered. A program still running after `timeout` is killed.
pub struct CommandDispatch {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandDispatch {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Dispatch for CommandDispatch {
    fn name(&self) -> &str {
        &self.program
    }

    fn send(&self, request: &ContactRequest) -> Result<(), DispatchError> {
        request.check_required()?;
        let payload = serde_json::to_string(&OutgoingMail::from_request(request))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        // The exit status decides the outcome even if the program stopped
        // reading early.
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = writeln!(stdin, "{}", payload).and_then(|_| stdin.flush()) {
                warn!("{} did not take the whole request: {}", self.program, e);
            }
        }

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                warn!("{} timed out after {:?}, killing it", self.program, self.timeout);
                let _ = child.kill();
                let _ = child.wait();
                return Err(DispatchError::TimedOut(self.timeout));
            }
            thread::sleep(WAIT_POLL);
        };
        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(DispatchError::Rejected(code)),
            None => Err(DispatchError::Terminated),
        }
    }
}

pub type DispatchResult = Result<(), DispatchError>;

/// Hands requests to a worker thread.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Dispatch>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Dispatch>) -> Self {
        Self { transport }
    }

    pub fn simulated() -> Self {
        Self::new(Arc::new(SimulatedDispatch))
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    pub fn spawn(&self, request: ContactRequest) -> Receiver<DispatchResult> {
        let (tx, rx) = mpsc::channel();
        let transport = Arc::clone(&self.transport);
        thread::spawn(move || {
            let result = transport.send(&request);
            if let Err(e) = &result {
                error!("Contact delivery via {} failed: {}", transport.name(), e);
            }
            let _ = tx.send(result);
        });
        rx
    }
}
