//! Text generators.
//!
//! A generator is the only boundary between foreman and the underlying
//! language model. The default implementation shells out to a configured
//! command, feeding the prompt on stdin and capturing stdout, so any model
//! CLI can be plugged in without code changes.

use crate::error::{ForemanError, Result};
use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// Produces the continuation of a transcript for a prompt.
///
/// `stop` lists stop sequences: the returned text must end before the first
/// occurrence of any of them. Implementations that cannot instruct the
/// underlying model to stop early may generate past a stop sequence; the
/// output is truncated here so callers never see text beyond one.
pub trait Generator {
    fn generate(&self, prompt: &str, stop: &[&str]) -> Result<String>;
}

/// Runs an external command as the generator.
///
/// The command string is split with shell quoting rules. The prompt is
/// written to the child's stdin, stdout is captured as the generation, and
/// stderr is discarded. The child is killed if it exceeds the timeout.
pub struct CommandGenerator {
    command: String,
    timeout: Duration,
}

impl CommandGenerator {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    fn spawn(&self) -> Result<Child> {
        let args = shell_words::split(&self.command).map_err(|e| {
            ForemanError::UserError(format!(
                "failed to parse generator command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                self.command, e
            ))
        })?;

        if args.is_empty() {
            return Err(ForemanError::UserError(format!(
                "generator command is empty after parsing: '{}'",
                self.command
            )));
        }

        let program = &args[0];
        Command::new(program)
            .args(&args[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                ForemanError::UserError(format!(
                    "failed to execute generator command '{}': {}\n\
                     Fix: ensure the command is installed and in PATH.",
                    program, e
                ))
            })
    }
}

impl Generator for CommandGenerator {
    fn generate(&self, prompt: &str, stop: &[&str]) -> Result<String> {
        let mut child = self.spawn()?;

        // Feed the prompt and close stdin so the child sees EOF. The reader
        // thread drains stdout concurrently; a child that fills the pipe
        // buffer before reading its stdin would otherwise deadlock us.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(prompt.as_bytes()).map_err(|e| {
                ForemanError::Generator(format!("failed to write prompt to generator: {}", e))
            })?;
        }

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ForemanError::Generator("generator stdout not captured".to_string()))?;
        let reader = std::thread::spawn(move || {
            use std::io::Read;
            let mut buf = String::new();
            let mut stdout = stdout;
            stdout.read_to_string(&mut buf).map(|_| buf)
        });

        let (exit_code, timed_out) = wait_with_timeout(&mut child, self.timeout)?;

        let output = reader
            .join()
            .map_err(|_| ForemanError::Generator("generator output reader panicked".to_string()))?
            .map_err(|e| {
                ForemanError::Generator(format!("failed to read generator output: {}", e))
            })?;

        if timed_out {
            return Err(ForemanError::Generator(format!(
                "generator command timed out after {}s",
                self.timeout.as_secs()
            )));
        }
        if exit_code != Some(0) {
            return Err(ForemanError::Generator(format!(
                "generator command exited with {}",
                exit_code.map_or_else(|| "no status".to_string(), |c| format!("status {}", c))
            )));
        }

        Ok(truncate_at_stop(output, stop))
    }
}

/// Cut generated text at the first occurrence of any stop sequence.
pub fn truncate_at_stop(mut text: String, stop: &[&str]) -> String {
    let cut = stop
        .iter()
        .filter_map(|s| text.find(s))
        .min();
    if let Some(at) = cut {
        text.truncate(at);
    }
    text
}

/// Poll a child process until it exits or the timeout elapses.
///
/// Returns (exit_code, timed_out). A timed-out child is killed and reaped.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<(Option<i32>, bool)> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(50);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                return Ok((status.code(), false));
            }
            Ok(None) => {
                if start.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok((None, true));
                }
                std::thread::sleep(poll_interval);
            }
            Err(e) => {
                return Err(ForemanError::Generator(format!(
                    "failed to check generator process status: {}",
                    e
                )));
            }
        }
    }
}
