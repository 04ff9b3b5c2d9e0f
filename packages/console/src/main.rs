use clap::Parser;
use tracing_subscriber::EnvFilter;

use restcrud_console::host::terminal::EDIT_MODE_VAR;
use restcrud_core::config::{ENV_BASE_URL, ENV_COLLECTION, ENV_SLOTS, ENV_TIMEOUT_MS};
use restcrud_core::{ConfigError, ManagerConfig};

/// restcrud - interactive console for a REST object collection
#[derive(Parser, Debug)]
#[command(name = "restcrud")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the API (overrides RESTCRUD_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Collection path segment (overrides RESTCRUD_COLLECTION)
    #[arg(long)]
    collection: Option<String>,

    /// Per-request timeout in milliseconds (overrides RESTCRUD_TIMEOUT_MS)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Match field keys to slot names instead of filling slots in order
    #[arg(long)]
    keyed_slots: bool,

    /// Force vi editing mode
    #[arg(long, conflicts_with = "emacs")]
    vi: bool,

    /// Force emacs editing mode
    #[arg(long)]
    emacs: bool,
}

impl Args {
    /// Flag value for an environment variable, if the flag was given.
    fn flag(&self, name: &str) -> Option<String> {
        match name {
            ENV_BASE_URL => self.base_url.clone(),
            ENV_COLLECTION => self.collection.clone(),
            ENV_TIMEOUT_MS => self.timeout_ms.map(|millis| millis.to_string()),
            ENV_SLOTS if self.keyed_slots => Some("keyed".to_string()),
            _ => None,
        }
    }

    /// Environment configuration with flags taking precedence.
    fn config(&self) -> Result<ManagerConfig, ConfigError> {
        ManagerConfig::from_lookup(|name| self.flag(name).or_else(|| std::env::var(name).ok()))
    }
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.vi {
        std::env::set_var(EDIT_MODE_VAR, "vi");
    } else if args.emacs {
        std::env::set_var(EDIT_MODE_VAR, "emacs");
    }

    let config = match args.config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = restcrud_console::run(config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_environment_names() {
        let args = Args::parse_from([
            "restcrud",
            "--base-url",
            "http://localhost:3000",
            "--timeout-ms",
            "1500",
            "--keyed-slots",
        ]);

        assert_eq!(args.flag(ENV_BASE_URL).as_deref(), Some("http://localhost:3000"));
        assert_eq!(args.flag(ENV_TIMEOUT_MS).as_deref(), Some("1500"));
        assert_eq!(args.flag(ENV_SLOTS).as_deref(), Some("keyed"));
        assert_eq!(args.flag(ENV_COLLECTION), None);
    }

    #[test]
    fn vi_and_emacs_conflict() {
        assert!(Args::try_parse_from(["restcrud", "--vi", "--emacs"]).is_err());
    }
}
