//! Abstractions for the two raw-text inputs the engine reads.
//!
//! Every acquisition goes through `TextSource`: reading a kernel pseudo-file
//! or capturing the stdout of an external command. The trait allows the
//! collectors to run against the real system or against an in-memory mock
//! for testing.

use std::io;
use std::path::Path;
use std::process::Command;

/// Error produced when running an external command.
///
/// Kept separate from `io::Error` so callers can tell a missing executable
/// or failed command apart from an unreadable file.
#[derive(Debug)]
pub enum CommandError {
    /// The executable was not found on the search path.
    NotFound(String),
    /// The process could not be spawned or its output collected.
    Spawn(io::Error),
    /// The command ran but exited with a non-zero status.
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::NotFound(program) => write!(f, "command not found: {}", program),
            CommandError::Spawn(e) => write!(f, "failed to spawn command: {}", e),
            CommandError::Failed {
                program,
                code,
                stderr,
            } => match code {
                Some(code) => write!(f, "{} exited with status {}: {}", program, code, stderr),
                None => write!(f, "{} terminated by signal: {}", program, stderr),
            },
        }
    }
}

impl std::error::Error for CommandError {}

/// Abstraction over the raw-text sources the engine consumes.
pub trait TextSource: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Runs `argv[0]` with the remaining arguments and captures stdout.
    ///
    /// No retries and no timeout: each source is a single bounded call,
    /// and callers bound latency externally.
    fn run_command(&self, argv: &[&str]) -> Result<String, CommandError>;
}

/// Reads real files and spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealSource;

impl RealSource {
    /// Creates a new `RealSource` instance.
    pub fn new() -> Self {
        Self
    }
}

impl TextSource for RealSource {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn run_command(&self, argv: &[&str]) -> Result<String, CommandError> {
        let Some((program, args)) = argv.split_first() else {
            return Err(CommandError::Spawn(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty argv",
            )));
        };

        let output = Command::new(program).args(args).output().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                CommandError::NotFound((*program).to_string())
            } else {
                CommandError::Spawn(e)
            }
        })?;

        if !output.status.success() {
            return Err(CommandError::Failed {
                program: (*program).to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
