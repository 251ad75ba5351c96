//! Launch a stored command line as a child process that owns the terminal.

use std::{
    fmt, io,
    process::{Command, ExitStatus, Stdio},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("cannot parse command line: {0}")]
    Parse(#[from] shell_words::ParseError),
    #[error("command line is empty")]
    Empty,
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// A tokenized command line, ready to spawn.
///
/// Parsing happens before the terminal is released, so a quoting mistake
/// leaves the session running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCommand {
    line: String,
    program: String,
    args: Vec<String>,
}

impl PreparedCommand {
    /// Split `line` with shell quoting rules; the first word is the program.
    pub fn parse(line: &str) -> Result<Self, ExecError> {
        let mut words = shell_words::split(line)?.into_iter();
        let program = words.next().ok_or(ExecError::Empty)?;
        Ok(Self {
            line: line.to_string(),
            program,
            args: words.collect(),
        })
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Run to completion with this process's stdin, stdout, and stderr attached.
    pub fn run(&self) -> Result<ExitStatus, ExecError> {
        tracing::info!(program = %self.program, args = self.args.len(), "launching command");
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| ExecError::Launch {
                program: self.program.clone(),
                source,
            })?;
        tracing::info!(program = %self.program, %status, "command finished");
        Ok(status)
    }
}

impl fmt::Display for PreparedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}
