//! # restcrud-console
//!
//! Interactive console over a REST collection.
//!
//! ## Usage
//!
//! ```bash
//! restcrud --base-url https://api.restful-api.dev
//!
//! # Inside the console:
//! > list
//! > add Widget | color:blue, price:9
//! > edit 3
//! > save Widget v2 | color:red
//! > rm 3
//! ```
//!
//! Status messages from each operation are printed after the command,
//! failures in red.

pub mod commands;
pub mod completer;
pub mod context;
pub mod highlighter;
pub mod host;
pub mod io;
pub mod repl;

use restcrud_core::ManagerConfig;

pub use context::{ConsoleContext, ContextError};
pub use repl::ReplCore;

#[derive(thiserror::Error, Debug)]
pub enum ConsoleError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error(transparent)]
    Io(#[from] io::IoError),
}

/// Run the console on the terminal until the user exits.
pub fn run(config: ManagerConfig) -> Result<(), ConsoleError> {
    let ctx = ConsoleContext::connect(config)?;
    let mut host = host::TerminalHost::new()?;
    ReplCore::new(ctx).run(&mut host)?;
    Ok(())
}
