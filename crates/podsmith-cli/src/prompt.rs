//! Confirmation and selection prompts.
//!
//! With the `interactive` feature and a terminal on stdin the prompts are
//! drawn by `dialoguer`. Otherwise a line is read from stdin; end of input
//! takes the default answer.

use std::io::{self, BufRead, Write};

use crate::error::{CliError, CliResult, IntoCli};

/// Ask a yes/no question.
pub fn confirm(question: &str, default: bool) -> CliResult<bool> {
    if let Some(answer) = terminal::confirm(question, default) {
        return answer;
    }
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    let answer = ask_line(&format!("{question} {hint} "))?;
    Ok(parse_yes_no(answer.as_deref(), default))
}

/// Pick one of `items`; returns its index.
pub fn select(question: &str, items: &[String]) -> CliResult<usize> {
    if let Some(answer) = terminal::select(question, items) {
        return answer;
    }
    let mut menu = format!("{question}\n");
    for (i, item) in items.iter().enumerate() {
        menu.push_str(&format!("  {}. {item}\n", i + 1));
    }
    menu.push_str(&format!("Select [1-{}]: ", items.len()));

    let answer = ask_line(&menu)?.ok_or(CliError::Cancelled)?;
    parse_choice(&answer, items.len()).ok_or_else(|| CliError::InvalidInput {
        message: format!(
            "'{}' is not a number between 1 and {}",
            answer.trim(),
            items.len()
        ),
    })
}

/// `dialoguer` prompts; `None` when stdin is not a terminal.
#[cfg(feature = "interactive")]
mod terminal {
    use std::io::{self, IsTerminal};

    use crate::error::{CliError, CliResult};

    fn prompt_failed(e: dialoguer::Error) -> CliError {
        CliError::InvalidInput {
            message: format!("prompt failed: {e}"),
        }
    }

    pub fn confirm(question: &str, default: bool) -> Option<CliResult<bool>> {
        if !io::stdin().is_terminal() {
            return None;
        }
        Some(
            dialoguer::Confirm::new()
                .with_prompt(question)
                .default(default)
                .interact()
                .map_err(prompt_failed),
        )
    }

    pub fn select(question: &str, items: &[String]) -> Option<CliResult<usize>> {
        if !io::stdin().is_terminal() {
            return None;
        }
        Some(
            dialoguer::Select::new()
                .with_prompt(question)
                .items(items)
                .default(0)
                .interact()
                .map_err(prompt_failed),
        )
    }
}

#[cfg(not(feature = "interactive"))]
mod terminal {
    use crate::error::CliResult;

    pub fn confirm(_question: &str, _default: bool) -> Option<CliResult<bool>> {
        None
    }

    pub fn select(_question: &str, _items: &[String]) -> Option<CliResult<usize>> {
        None
    }
}

/// Print `prompt` to stderr and read one line. `None` at end of input.
fn ask_line(prompt: &str) -> CliResult<Option<String>> {
    let mut stderr = io::stderr().lock();
    write!(stderr, "{prompt}").with_cli_context(|| "failed to write prompt")?;
    stderr
        .flush()
        .with_cli_context(|| "failed to flush prompt")?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .with_cli_context(|| "failed to read answer")?;
    Ok((read > 0).then_some(line))
}

fn parse_yes_no(answer: Option<&str>, default: bool) -> bool {
    match answer.map(|a| a.trim().to_ascii_lowercase()).as_deref() {
        Some("y" | "yes") => true,
        Some("n" | "no") => false,
        _ => default,
    }
}

fn parse_choice(answer: &str, len: usize) -> Option<usize> {
    let n: usize = answer.trim().parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_answers() {
        assert!(parse_yes_no(Some("y\n"), false));
        assert!(parse_yes_no(Some("YES"), false));
        assert!(!parse_yes_no(Some("n"), true));
        assert!(parse_yes_no(Some("\n"), true));
        assert!(!parse_yes_no(None, false));
        assert!(!parse_yes_no(Some("maybe"), false));
    }

    #[test]
    fn choices_are_one_based() {
        assert_eq!(parse_choice("1\n", 3), Some(0));
        assert_eq!(parse_choice(" 3 ", 3), Some(2));
        assert_eq!(parse_choice("0", 3), None);
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("two", 3), None);
    }
}
