use crate::page::Section;

/// User actions that can be triggered by commands or UI events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Show keys and commands
    Help,
    /// Scroll to a section
    Goto { section: Section },
    /// Run the CV generator in the hero terminal
    ViewCv,
    /// Focus the contact form
    Contact,
    /// Restart every terminal from scratch
    Replay,
    /// Quit application
    Quit,
}
