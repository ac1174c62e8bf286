//! Ready-to-execute command lines.
//!
//! Platform discovery resolves the player launch command and the host
//! shutdown command once at startup. The core only ever sees them as
//! opaque [`CommandLine`] values.

use std::ffi::OsString;
use std::fmt;

use tokio::process::Command;

/// A program plus its argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Executable name or path.
    pub program: OsString,
    /// Arguments passed verbatim (no shell interpretation).
    pub args: Vec<OsString>,
}

impl CommandLine {
    /// Creates a command line from a program and its arguments.
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits a single command string on whitespace.
    ///
    /// Returns `None` for a blank string. Quoting is not supported.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }

    /// Builds a tokio [`Command`] for this command line.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_on_whitespace() {
        let cmd = CommandLine::parse("shutdown -s -f  -t 0").unwrap();
        assert_eq!(cmd.program, OsString::from("shutdown"));
        assert_eq!(cmd.args, vec!["-s", "-f", "-t", "0"]);
    }

    #[test]
    fn parse_rejects_blank_line() {
        assert!(CommandLine::parse("   ").is_none());
    }

    #[test]
    fn display_joins_program_and_args() {
        let cmd = CommandLine::new("vlc", ["--http-port=9090", "--fullscreen"]);
        assert_eq!(cmd.to_string(), "vlc --http-port=9090 --fullscreen");
    }
}
