//! Line-oriented user interaction.

use super::commands::Choice;
use crate::{Error, Result};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Source of user answers and sink for messages.
pub trait Prompter {
    /// Shows `prompt` and returns the next line of input, without the line
    /// terminator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] on read failure or end of input.
    fn ask(&mut self, prompt: &str) -> Result<String>;

    /// Shows a message.
    fn say(&mut self, message: &str);
}

/// Asks until the answer is exactly one of `C::KEYS`.
///
/// # Errors
///
/// Propagates errors from [`Prompter::ask`].
pub fn ask_choice<C: Choice>(prompter: &mut dyn Prompter, prompt: &str) -> Result<C> {
    let full_prompt = if prompt.is_empty() {
        format!("Enter a char in [{}]>", C::KEYS)
    } else {
        format!("{prompt}\nEnter a char in [{}]>", C::KEYS)
    };
    loop {
        let answer = prompter.ask(&full_prompt)?;
        if let Some(choice) = C::parse(&answer) {
            return Ok(choice);
        }
        tracing::debug!(answer = %answer.trim(), keys = C::KEYS, "Rejected input");
        prompter.say(&format!("'{}' is not one of [{}]", answer.trim(), C::KEYS));
    }
}

/// Source of input lines.
pub trait LineReader {
    /// Appends one line, terminator included, to `buf` and returns the number
    /// of bytes read. Zero means end of input.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying source.
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl<R: BufRead> LineReader for R {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

/// Reads from the process's shared stdin buffer without holding its lock, so
/// several prompters can take turns on stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinLines;

impl LineReader for StdinLines {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        io::stdin().read_line(buf)
    }
}

/// Prompter over a line source and a writer, normally stdin and stdout.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<StdinLines, io::Stdout> {
    /// Creates a prompter over the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(StdinLines, io::stdout())
    }
}

impl<R: LineReader, W: Write> TerminalPrompter<R, W> {
    /// Creates a prompter over arbitrary streams.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the prompter and returns the output sink.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: LineReader, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        writeln!(self.output, "{prompt}").map_err(|e| Error::operation("write_prompt", e))?;
        self.output
            .flush()
            .map_err(|e| Error::operation("flush_stdout", e))?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| Error::operation("read_input", e))?;
        if read == 0 {
            return Err(Error::operation("read_input", "end of input"));
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "{message}") {
            tracing::warn!("Failed to write message: {e}");
        }
    }
}

/// Prompter that replays queued answers and records everything shown.
///
/// Running out of answers behaves like end of input.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedPrompter {
    /// Creates a prompter that will answer with `answers`, in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Returns `true` if any prompt or message contains `needle`.
    #[must_use]
    pub fn saw(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    /// Number of answers not consumed yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.transcript.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| Error::operation("read_input", "end of input"))
    }

    fn say(&mut self, message: &str) {
        self.transcript.push(message.to_string());
    }
}
