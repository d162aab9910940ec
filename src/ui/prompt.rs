//! Line-based interactive prompts.
//!
//! Prompts read from any `BufRead` and write to any `Write`, so forms can
//! be driven from canned input in tests. Secrets typed at a real terminal
//! are read without echo.

use crate::error::AppError;
use colored::Colorize;
use std::io::{self, BufRead, IsTerminal, Write};

/// Reads answers from `input`, writing questions to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    hide_secrets: bool,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompts on the process's stdin/stdout. Secrets are hidden when
    /// stdin is a terminal.
    pub fn stdio() -> Self {
        let stdin = io::stdin();
        Self {
            hide_secrets: stdin.is_terminal(),
            ..Self::new(stdin.lock(), io::stdout())
        }
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            hide_secrets: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &W {
        &self.output
    }

    /// Write a line of text.
    pub fn say(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.output, "{}", text).map_err(io_error)
    }

    fn read_line(&mut self) -> Result<String, AppError> {
        self.output.flush().map_err(io_error)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(io_error)?;
        if read == 0 {
            return Err(AppError::input("No input available (stdin closed)"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask a question; returns the answer with surrounding whitespace removed.
    pub fn ask(&mut self, question: &str) -> Result<String, AppError> {
        write!(self.output, "{}: ", question).map_err(io_error)?;
        Ok(self.read_line()?.trim().to_string())
    }

    /// Ask until a non-empty answer is given.
    pub fn ask_required(&mut self, question: &str) -> Result<String, AppError> {
        loop {
            let answer = self.ask(question)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            self.say(&format!("{}", "A value is required.".red()))?;
        }
    }

    /// Ask for a secret until a non-empty answer is given.
    pub fn ask_secret(&mut self, question: &str) -> Result<String, AppError> {
        loop {
            write!(self.output, "{}: ", question).map_err(io_error)?;
            let answer = if self.hide_secrets {
                self.output.flush().map_err(io_error)?;
                rpassword::read_password().map_err(io_error)?
            } else {
                self.read_line()?
            };

            let answer = answer.trim();
            if !answer.is_empty() {
                return Ok(answer.to_string());
            }
            self.say(&format!("{}", "A value is required.".red()))?;
        }
    }

    /// Ask for a number until one parses.
    pub fn ask_number(&mut self, question: &str) -> Result<u64, AppError> {
        loop {
            let answer = self.ask(question)?;
            match answer.parse::<u64>() {
                Ok(n) => return Ok(n),
                Err(_) => self.say(&format!("{}", "Please enter a valid number.".red()))?,
            }
        }
    }

    /// Yes/no question. An empty answer picks `default`.
    pub fn confirm(&mut self, question: &str, default: bool) -> Result<bool, AppError> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            write!(self.output, "{} [{}]: ", question, hint).map_err(io_error)?;
            let answer = self.read_line()?.trim().to_lowercase();
            match answer.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Please answer y or n.")?,
            }
        }
    }
}

fn io_error(e: io::Error) -> AppError {
    AppError::input(format!("Terminal I/O failed: {}", e))
}
