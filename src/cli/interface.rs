use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::error;

use super::display::display_result;
use super::help::help_text;
use crate::command::CommandEngine;

pub const PROMPT: &str = "(hbnb) ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Line-oriented read-evaluate loop over a `CommandEngine`.
pub struct Cli<R, W> {
    engine: CommandEngine,
    input: R,
    output: W,
    prompt: Option<String>,
}

impl<R: BufRead, W: Write> Cli<R, W> {
    /// The prompt is only written when `interactive` is set, so piped
    /// sessions produce bare command output.
    pub fn new(engine: CommandEngine, input: R, output: W, interactive: bool) -> Self {
        Cli {
            engine,
            input,
            output,
            prompt: interactive.then(|| PROMPT.to_string()),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            if let Some(prompt) = &self.prompt {
                write!(self.output, "{}", prompt)?;
                self.output.flush()?;
            }

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                // end of input behaves like EOF typed at the prompt
                writeln!(self.output)?;
                break;
            }

            if self.handle_line(line.trim())? == Flow::Quit {
                break;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "quit" => return Ok(Flow::Quit),
            "EOF" => {
                writeln!(self.output)?;
                return Ok(Flow::Quit);
            }
            "help" | "?" => {
                let topic = rest.split_whitespace().next();
                writeln!(self.output, "{}", help_text(topic))?;
            }
            _ => self.execute(line)?,
        }
        Ok(Flow::Continue)
    }

    pub fn into_parts(self) -> (CommandEngine, W) {
        (self.engine, self.output)
    }

    fn execute(&mut self, line: &str) -> Result<()> {
        match self.engine.execute(line) {
            Ok(result) => display_result(&mut self.output, &result)?,
            Err(e) if e.is_fatal() => {
                error!(error = %e, "command failed, stopping");
                return Err(e.into());
            }
            Err(e) => writeln!(self.output, "{}", e)?,
        }
        Ok(())
    }
}
