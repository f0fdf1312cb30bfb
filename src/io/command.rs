//! Turning a pipe command string into a spawnable command.

use std::process::Command;

use crate::error::CommandError;

/// Characters that make a command run through the shell instead of directly.
///
/// This is convenience routing for trusted command strings, not sandboxing.
pub const SHELL_METACHARACTERS: [char; 5] = ['|', '<', '>', '`', ';'];

/// Returns true if `cmd` contains any of [`SHELL_METACHARACTERS`].
pub fn needs_shell(cmd: &str) -> bool {
    cmd.contains(SHELL_METACHARACTERS)
}

/// A program and its argument vector, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    /// Whether the original command was wrapped as `shell -c <command>`
    pub via_shell: bool,
}

impl CommandLine {
    /// Parse a command string.
    ///
    /// Commands containing shell metacharacters become `[shell, "-c", cmd]`
    /// with `cmd` passed through untouched as a single argument. Everything
    /// else is split with POSIX shell-word rules and executed directly.
    pub fn parse(cmd: &str, shell: &str) -> Result<Self, CommandError> {
        let cmd = cmd.trim();
        if cmd.is_empty() {
            return Err(CommandError::Empty);
        }

        if needs_shell(cmd) {
            return Ok(Self {
                program: shell.to_string(),
                args: vec!["-c".to_string(), cmd.to_string()],
                via_shell: true,
            });
        }

        let mut parts = shell_words::split(cmd)?.into_iter();
        let program = parts.next().ok_or(CommandError::Empty)?;
        let args: Vec<String> = parts.collect();
        tracing::trace!(%program, ?args, "split pipe command");

        Ok(Self {
            program,
            args,
            via_shell: false,
        })
    }

    /// Build a `std::process::Command` with no stdio configured.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// The command as one shell-quoted string, for logs.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, shell_words::join(&self.args))
        }
    }
}
