//! Read-eval-print loop around an [`Assistant`].

use std::collections::VecDeque;
use std::io::{self, Write};

use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use spinners::{Spinner, Spinners};

use crate::{assistant::Assistant, transcript::Transcript};

/// Inputs that end the session, compared case-insensitively.
pub const EXIT_COMMANDS: [&str; 3] = ["quit", "exit", "bye"];

pub const USER_PROMPT: &str = "\nYou: ";

pub fn is_exit_command(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    EXIT_COMMANDS.contains(&input.as_str())
}

/// Source of user input lines. `Ok(None)` means end of input.
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn add_history(&mut self, _line: &str) {}
}

impl LineReader for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match self.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::other(e)),
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.add_history_entry(line);
    }
}

/// Pre-recorded input, for piped sessions and tests.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineReader for ScriptedInput {
    fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReplOptions {
    /// Sent to the assistant before the first user input
    pub greeting: Option<String>,
    /// Animate a spinner on the terminal while waiting for a reply
    pub spinner: bool,
}

/// Run the loop until an exit command or end of input. Prints `Goodbye!` on exit.
pub async fn run<A, R, W>(
    assistant: &A,
    transcript: &mut Transcript,
    reader: &mut R,
    out: &mut W,
    options: &ReplOptions,
) -> io::Result<()>
where
    A: Assistant + ?Sized,
    R: LineReader,
    W: Write,
{
    if let Some(greeting) = &options.greeting {
        let reply = exchange(assistant, transcript, greeting, out, options.spinner).await?;
        print_reply(out, assistant.label(), &reply)?;
    }

    loop {
        out.flush()?;
        let Some(line) = reader.read_line(USER_PROMPT)? else {
            writeln!(out, "\n{}", "Goodbye!".bright_cyan())?;
            break;
        };

        if is_exit_command(&line) {
            writeln!(out, "{}", "Goodbye!".bright_cyan())?;
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        reader.add_history(input);

        let reply = exchange(assistant, transcript, input, out, options.spinner).await?;
        print_reply(out, assistant.label(), &reply)?;
    }

    out.flush()
}

async fn exchange<A, W>(
    assistant: &A,
    transcript: &mut Transcript,
    input: &str,
    out: &mut W,
    spinner: bool,
) -> io::Result<String>
where
    A: Assistant + ?Sized,
    W: Write,
{
    let mut sp = spinner
        .then(|| Spinner::new(Spinners::Dots12, "Thinking...".bright_magenta().to_string()));

    let reply = assistant.respond(transcript, input).await;

    if let Some(sp) = sp.as_mut() {
        sp.stop();
        write!(out, "\r\x1B[K")?;
    }
    Ok(reply)
}

fn print_reply<W: Write>(out: &mut W, label: &str, reply: &str) -> io::Result<()> {
    writeln!(out, "\n{} {}", format!("{label}:").bright_green(), reply)
}
