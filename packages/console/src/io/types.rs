//! Values exchanged between the console core and its host.

/// A line typed by the user.
#[derive(Debug, Clone)]
pub struct InputLine {
    pub line: String,
}

/// Ctrl+C or Ctrl+D.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Interrupt,
    Eof,
}

/// Text for the host to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    pub style: OutputStyle,
}

impl Output {
    pub fn normal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: OutputStyle::Normal,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: OutputStyle::Error,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: OutputStyle::Info,
        }
    }

    pub fn banner(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: OutputStyle::Banner,
        }
    }
}

/// Rendering hint. Hosts without color may ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStyle {
    /// Command output, may already contain ANSI codes.
    #[default]
    Normal,
    /// Failure; terminal hosts print it in red.
    Error,
    /// Status notification.
    Info,
    Banner,
}

/// What the prompt should show before the next line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptConfig {
    /// Objects in the last loaded list.
    pub object_count: usize,
    /// Name of the object under edit, if any.
    pub editing: Option<String>,
}

/// Why the console loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// `exit` or `quit`.
    UserExit,
    /// Ctrl+D.
    Eof,
}
