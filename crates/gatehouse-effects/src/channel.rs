//! Error channel handlers

use gatehouse_core::ErrorChannel;
use std::io::Write;

/// Writes each message as one line on the process's standard error
///
/// Standard output carries the data-plane protocol, so errors never go there.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrChannel;

impl ErrorChannel for StderrChannel {
    fn write(&mut self, message: &str) {
        let mut stderr = std::io::stderr().lock();
        // Nothing useful can be reported if stderr itself is gone.
        let _ = writeln!(stderr, "{message}");
        let _ = stderr.flush();
    }
}

/// Records messages in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryChannel {
    lines: Vec<String>,
}

impl MemoryChannel {
    /// Create an empty channel
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages written so far, oldest first
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether nothing has been written
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl ErrorChannel for MemoryChannel {
    fn write(&mut self, message: &str) {
        self.lines.push(message.to_owned());
    }
}
