//! Yes/no confirmation prompt
//!
//! Blocks until the operator answers. Empty input selects the default.

use std::io::{self, BufRead, Write};

use crate::error::{BackupError, BackupResult};

/// Ask `prompt` on the terminal
pub fn confirm(prompt: &str, default: bool) -> BackupResult<bool> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    confirm_with(&mut stdin.lock(), &mut stdout, prompt, default)
}

/// Ask `prompt` on `output`, reading answers from `input`
///
/// Accepts `y`, `yes`, `n` and `no` in any case. Anything else prints a short
/// hint and asks again. Fails only when `input` is closed.
pub fn confirm_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    default: bool,
) -> BackupResult<bool> {
    let choices = if default { "[Y/n]" } else { "[y/N]" };

    loop {
        write!(output, "{} {}: ", prompt, choices).map_err(prompt_error)?;
        output.flush().map_err(prompt_error)?;

        let mut answer = String::new();
        if input.read_line(&mut answer).map_err(prompt_error)? == 0 {
            return Err(BackupError::Prompt("input closed before an answer was given".into()));
        }

        match answer.trim().to_ascii_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please enter y or n.").map_err(prompt_error)?,
        }
    }
}

fn prompt_error(err: io::Error) -> BackupError {
    BackupError::Prompt(err.to_string())
}
