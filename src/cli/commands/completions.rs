//! Shell completions command implementation.

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{Shell as CompleteShell, generate};

use crate::cli::{Cli, Shell};
use crate::error::Result;

const BIN_NAME: &str = "haven";

impl From<&Shell> for CompleteShell {
    fn from(shell: &Shell) -> Self {
        match shell {
            Shell::Bash => Self::Bash,
            Shell::Zsh => Self::Zsh,
            Shell::Fish => Self::Fish,
            Shell::PowerShell => Self::PowerShell,
            Shell::Elvish => Self::Elvish,
        }
    }
}

/// Write completions for `shell` to `out`.
pub fn write_completions(shell: &Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(CompleteShell::from(shell), &mut cmd, BIN_NAME, out);
}

/// Generate shell completions for the specified shell.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed.
pub fn execute(shell: &Shell) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write_completions(shell, &mut stdout);
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completions_list_commands() {
        let mut out = Vec::new();
        write_completions(&Shell::Bash, &mut out);
        let script = String::from_utf8(out).unwrap();

        assert!(script.contains(BIN_NAME));
        for command in ["export", "import", "redirect"] {
            assert!(script.contains(command), "missing {command}");
        }
    }
}
