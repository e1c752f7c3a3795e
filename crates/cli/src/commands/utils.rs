//! Error type and terminal output shared by the subcommands.

use rpcbench_core::BenchError;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Engine(#[from] BenchError),

    #[error("filesystem: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not render output: {0}")]
    Render(String),
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        Self::Render(error.to_string())
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Render(error.to_string())
    }
}

pub type CliResult<T> = Result<T, CliError>;

pub fn print_success(message: impl Display) {
    println!("ok    {message}");
}

pub fn print_info(message: impl Display) {
    println!("info  {message}");
}

pub fn print_error(message: impl Display) {
    eprintln!("error {message}");
}

/// Machine-readable output for `--json`.
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Table cell for a value a provider did not report.
pub fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
