//! I/O boundary of the console.
//!
//! The console core talks to the user only through [`IoHost`]. The terminal
//! host uses reedline; tests use the in-memory [`TestHost`].

pub mod types;

#[cfg(test)]
pub mod test_host;

pub use types::*;

#[cfg(test)]
pub use test_host::TestHost;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(String),
}

/// Host side of the console loop.
pub trait IoHost {
    /// Block until the user has entered a line or sent a signal.
    fn wait_for_input(&mut self) -> Result<(), IoError>;

    /// The line entered since the last wait, if any.
    fn read_input(&mut self) -> Result<Option<InputLine>, IoError>;

    /// The signal received since the last wait, if any.
    fn read_signal(&mut self) -> Result<Option<Signal>, IoError>;

    fn write_output(&mut self, output: Output) -> Result<(), IoError>;

    /// Prompt to render before the next line.
    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError>;

    fn flush(&mut self) -> Result<(), IoError> {
        Ok(())
    }
}
