#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Page,
    Command,
    Form,
}

#[derive(Default)]
pub struct UIState {
    pub focus: Focus,
    pub scroll: u16,
    pub viewport_height: u16,
    pub status_message: Option<String>,
    pub status_ticks: u64,

    // Command popup state
    pub command_input: String,
    pub command_selection: Option<usize>,

    pub show_help: bool,
}

impl UIState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_ticks = 0;
    }
}
