//! Process runner adapter using `std::process`.
//!
//! Streaming runs read stdout and stderr on two scoped threads that feed a
//! bounded channel. The calling thread drains the channel until both readers
//! hit EOF and only then waits for the child, so neither pipe can fill up and
//! block the process. Each stream keeps its own order; the two interleave.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, SyncSender};
use std::thread;

use tracing::{debug, instrument};

use podsmith_core::{
    application::{ApplicationError, ports::CommandRunner},
    domain::{CommandOutput, CommandSpec, OutputLine, OutputStream},
    error::PodsmithResult,
};

/// Lines buffered between the reader threads and the consumer.
const CHANNEL_CAPACITY: usize = 64;

/// Prefix put in front of echoed stderr lines.
const STDERR_PREFIX: &str = "! ";

/// Production command runner.
#[derive(Debug, Clone, Copy)]
pub struct ProcessRunner {
    echo: bool,
}

impl ProcessRunner {
    /// Runner that echoes streamed output to the terminal.
    pub fn new() -> Self {
        Self { echo: true }
    }

    /// Runner that only captures streamed output.
    pub fn silent() -> Self {
        Self { echo: false }
    }

    fn command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn echo_line(&self, line: &OutputLine) {
        if !self.echo {
            return;
        }
        // Echo failures are ignored.
        let _ = match line.stream {
            OutputStream::Stdout => writeln!(io::stdout().lock(), "{}", line.text),
            OutputStream::Stderr => {
                writeln!(io::stderr().lock(), "{STDERR_PREFIX}{}", line.text)
            }
        };
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for ProcessRunner {
    #[instrument(skip_all, fields(command = %spec))]
    fn run(&self, spec: &CommandSpec) -> PodsmithResult<CommandOutput> {
        let output = Self::command(spec)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(spec, e))?;

        debug!(status = ?output.status.code(), "Command finished");
        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            lines: Vec::new(),
        })
    }

    #[instrument(skip_all, fields(command = %spec))]
    fn stream(&self, spec: &CommandSpec) -> PodsmithResult<CommandOutput> {
        let mut child = Self::command(spec)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(spec, e))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let mut captured = CommandOutput::default();

        thread::scope(|scope| {
            let (tx, rx) = mpsc::sync_channel::<OutputLine>(CHANNEL_CAPACITY);
            if let Some(pipe) = stdout {
                let tx = tx.clone();
                scope.spawn(move || forward_lines(pipe, OutputStream::Stdout, tx));
            }
            if let Some(pipe) = stderr {
                let tx = tx.clone();
                scope.spawn(move || forward_lines(pipe, OutputStream::Stderr, tx));
            }
            // Only the readers hold senders now; the loop ends when both finish.
            drop(tx);

            for line in rx {
                self.echo_line(&line);
                let buffer = match line.stream {
                    OutputStream::Stdout => &mut captured.stdout,
                    OutputStream::Stderr => &mut captured.stderr,
                };
                buffer.push_str(&line.text);
                buffer.push('\n');
                captured.lines.push(line);
            }
        });

        let status = child.wait().map_err(|e| spawn_error(spec, e))?;
        captured.status = exit_code(status);
        debug!(status = ?captured.status, lines = captured.lines.len(), "Command finished");
        Ok(captured)
    }

    #[instrument(skip_all, fields(command = %spec))]
    fn run_attached(&self, spec: &CommandSpec) -> PodsmithResult<Option<i32>> {
        let status = Self::command(spec)
            .status()
            .map_err(|e| spawn_error(spec, e))?;
        Ok(exit_code(status))
    }
}

fn forward_lines(pipe: impl Read, stream: OutputStream, tx: SyncSender<OutputLine>) {
    for line in BufReader::new(pipe).lines() {
        let Ok(text) = line else { break };
        if tx.send(OutputLine { stream, text }).is_err() {
            break;
        }
    }
}

fn exit_code(status: ExitStatus) -> Option<i32> {
    status.code()
}

fn spawn_error(spec: &CommandSpec, e: io::Error) -> podsmith_core::error::PodsmithError {
    ApplicationError::ToolNotFound {
        program: spec.program.clone(),
        reason: e.to_string(),
    }
    .into()
}
