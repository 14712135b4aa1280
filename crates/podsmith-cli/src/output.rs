//! Terminal output: result lines, status marks, JSON and spinners.

use std::io::{self, IsTerminal};
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::cli::global::{GlobalArgs, OutputFormat};

pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs) -> Self {
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    /// Informational line; dropped by `--quiet` and in JSON mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet || self.is_json() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// A value the caller asked for. Printed even with `--quiet`.
    pub fn result(&self, msg: &str) -> io::Result<()> {
        self.term.write_line(msg)
    }

    pub fn json(&self, value: &serde_json::Value) -> io::Result<()> {
        let body = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&body)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.marked(Mark::Success, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.marked(Mark::Warning, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.marked(Mark::Info, msg)
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.no_color {
            self.print(text)
        } else {
            self.print(&text.cyan().bold().to_string())
        }
    }

    /// `  label  value`, with the label padded to `width`.
    pub fn field(&self, label: &str, value: &str, width: usize) -> io::Result<()> {
        let label = format!("{label:<width$}");
        if self.no_color {
            self.print(&format!("  {label}  {value}"))
        } else {
            self.print(&format!("  {}  {value}", label.dimmed()))
        }
    }

    fn marked(&self, mark: Mark, msg: &str) -> io::Result<()> {
        let symbol = mark.symbol();
        if self.no_color {
            return self.print(&format!("{symbol} {msg}"));
        }
        let line = match mark {
            Mark::Success => format!("{} {}", symbol.green().bold(), msg.green()),
            Mark::Warning => format!("{} {}", symbol.yellow().bold(), msg.yellow()),
            Mark::Info => format!("{} {}", symbol.blue().bold(), msg),
        };
        self.print(&line)
    }

    /// Spinner on stderr while a slow step runs; hidden unless human output.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.quiet || self.resolved_format != OutputFormat::Human {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }
}

#[derive(Clone, Copy)]
enum Mark {
    Success,
    Warning,
    Info,
}

impl Mark {
    fn symbol(self) -> &'static str {
        match self {
            Mark::Success => "\u{2713}",
            Mark::Warning => "\u{26a0}",
            Mark::Info => "\u{2139}",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_manager(quiet: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            quiet,
            no_color: false,
            output_format: format,
            ..GlobalArgs::for_tests()
        };
        OutputManager::new(&args)
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, OutputFormat::Plain);
        assert!(out.print("hello").is_ok());
        assert!(out.is_quiet());
    }

    #[test]
    fn plain_output_has_no_color() {
        assert!(!make_manager(false, OutputFormat::Plain).supports_color());
        assert!(make_manager(false, OutputFormat::Human).supports_color());
    }

    #[test]
    fn spinner_is_hidden_outside_human_output() {
        let plain = make_manager(false, OutputFormat::Plain);
        assert!(plain.spinner("x").is_hidden());
        let quiet = make_manager(true, OutputFormat::Human);
        assert!(quiet.spinner("x").is_hidden());
    }

    #[test]
    fn json_format_is_reported() {
        assert!(make_manager(false, OutputFormat::Json).is_json());
        assert!(!make_manager(false, OutputFormat::Human).is_json());
    }
}
