//! In-memory mock text source for testing collectors without a real system.
//!
//! `MockSource` simulates both input primitives: files are a path -> content
//! map and commands are an argv -> stdout map, so tests can exercise the
//! full acquisition path on any platform.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::collector::traits::{CommandError, TextSource};

/// In-memory text source for testing.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Map from argv to captured stdout.
    commands: HashMap<Vec<String>, String>,
}

impl MockSource {
    /// Creates a new empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files
            .insert(path.as_ref().to_path_buf(), content.into());
    }

    /// Adds a command with canned stdout.
    pub fn add_command(&mut self, argv: &[&str], stdout: impl Into<String>) {
        let argv = argv.iter().map(|a| a.to_string()).collect();
        self.commands.insert(argv, stdout.into());
    }

    /// Removes a file, making subsequent reads fail.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        self.files.remove(path.as_ref());
    }
}

impl TextSource for MockSource {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn run_command(&self, argv: &[&str]) -> Result<String, CommandError> {
        let key: Vec<String> = argv.iter().map(|a| a.to_string()).collect();
        self.commands.get(&key).cloned().ok_or_else(|| {
            CommandError::NotFound(argv.first().copied().unwrap_or_default().to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_source_add_file() {
        let mut source = MockSource::new();
        source.add_file("/proc/meminfo", "MemTotal: 16384 kB\n");

        let content = source.read_to_string(Path::new("/proc/meminfo")).unwrap();
        assert_eq!(content, "MemTotal: 16384 kB\n");
    }

    #[test]
    fn test_mock_source_file_not_found() {
        let source = MockSource::new();
        let result = source.read_to_string(Path::new("/nonexistent"));
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_mock_source_remove_file() {
        let mut source = MockSource::new();
        source.add_file("/proc/loadavg", "0.1 0.2 0.3 1/10 42\n");
        source.remove_file("/proc/loadavg");

        assert!(source.read_to_string(Path::new("/proc/loadavg")).is_err());
    }

    #[test]
    fn test_mock_source_add_command() {
        let mut source = MockSource::new();
        source.add_command(&["df"], "Filesystem 1K-blocks Used Available Use% Mounted on\n");

        let stdout = source.run_command(&["df"]).unwrap();
        assert!(stdout.starts_with("Filesystem"));
    }

    #[test]
    fn test_mock_source_command_argv_is_exact() {
        let mut source = MockSource::new();
        source.add_command(&["df"], "stdout\n");

        // Different argv does not match
        let result = source.run_command(&["df", "--total"]);
        assert!(matches!(result, Err(CommandError::NotFound(_))));
    }
}
