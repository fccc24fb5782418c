//! Session-scoped persisted state.
//!
//! One flag survives restarts within a session: whether the landing terminal
//! has finished. It is read once when the store is opened and written through
//! on every change (temp file, then rename).

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default, rename = "heroTerminalComplete")]
    pub hero_terminal_complete: bool,
}

pub struct SessionStore {
    path: Option<PathBuf>,
    state: SessionState,
}

impl SessionStore {
    /// Open the store at `path`. A missing or unreadable file starts fresh.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let state = match Self::read(&path) {
            Ok(Some(state)) => state,
            Ok(None) => SessionState::default(),
            Err(e) => {
                warn!("Ignoring session file {}: {}", path.display(), e);
                SessionState::default()
            }
        };
        debug!("Session loaded: {:?}", state);
        Self {
            path: Some(path),
            state,
        }
    }

    /// A store that never touches the disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: SessionState::default(),
        }
    }

    fn read(path: &Path) -> Result<Option<SessionState>, SessionError> {
        if !path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(path)?);
        Ok(Some(serde_json::from_reader(reader)?))
    }

    pub fn hero_complete(&self) -> bool {
        self.state.hero_terminal_complete
    }

    pub fn set_hero_complete(&mut self, complete: bool) -> Result<(), SessionError> {
        if self.state.hero_terminal_complete == complete {
            return Ok(());
        }
        self.state.hero_terminal_complete = complete;
        self.flush()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn flush(&self) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut tmp = path.clone();
        tmp.set_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, &self.state)?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;
        debug!("Session saved to {}", path.display());
        Ok(())
    }
}
