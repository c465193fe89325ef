//! Request arguments as delivered by the remote shell transport

use crate::errors::{GateError, GateResult};

/// Arguments of the remote command, parsed once when a session begins
///
/// Concrete workflows derive the repository path from these in whatever way
/// their command line requires.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestArgs {
    argv: Vec<String>,
}

impl RequestArgs {
    /// Build from an already-split argument vector
    pub fn from_argv<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a remote command string using POSIX shell quoting rules
    ///
    /// Unbalanced quotes and trailing backslashes are rejected as
    /// [`GateError::InvalidRequest`].
    pub fn parse_command(command: &str) -> GateResult<Self> {
        let argv = shell_words::split(command).map_err(|err| {
            GateError::invalid_request(format!(
                "Unable to parse remote command \"{command}\": {err}."
            ))
        })?;
        Ok(Self { argv })
    }

    /// All arguments, command name first
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Argument at `index`
    pub fn get(&self, index: usize) -> Option<&str> {
        self.argv.get(index).map(String::as_str)
    }

    /// Command name (first argument)
    pub fn command(&self) -> Option<&str> {
        self.get(0)
    }

    /// Value following `flag`, e.g. `-R <repo>`
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.argv
            .iter()
            .position(|arg| arg == flag)
            .and_then(|idx| self.get(idx + 1))
    }

    /// Whether `flag` appears anywhere in the arguments
    pub fn has_flag(&self, flag: &str) -> bool {
        self.argv.iter().any(|arg| arg == flag)
    }

    /// Whether there are no arguments at all
    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}
