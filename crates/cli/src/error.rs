//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: simulation error (bad dimensions, bad parameter values)
//! - 11: I/O error (snapshot, sidecar, frame directory)
//! - 12: input error (malformed --params JSON, unreadable replay file)
//! - 13: serialization error
//! - 14: runtime error (simulation thread died)

use flowfield_core::SimError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
pub enum CliError {
    Sim(SimError),
    Io(String),
    Input(String),
    Serialization(String),
    Runtime(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Sim(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
            CliError::Runtime(_) => 14,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Sim(e) => write!(f, "{e}"),
            CliError::Io(msg)
            | CliError::Input(msg)
            | CliError::Serialization(msg)
            | CliError::Runtime(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<SimError> for CliError {
    fn from(e: SimError) -> Self {
        match e {
            SimError::Io(msg) => CliError::Io(msg),
            other => CliError::Sim(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}
