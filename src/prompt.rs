//! Line-oriented console prompts. Generic over the reader and writer so that the interactive menu
//! can be driven from a byte buffer in tests.

use crate::error::{Error, ErrorType, IntoResult, Result};
use crate::model::{parse_amount, Category, CategoryKind};
use anyhow::Context;
use std::io::{BufRead, Write};
use tracing::trace;

/// The prompt shown when waiting for input.
const PROMPT: &str = "> ";

pub struct Console<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> Console<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Writes `message` followed by a newline.
    pub fn say(&mut self, message: impl AsRef<str>) -> Result<()> {
        writeln!(self.writer, "{}", message.as_ref())
            .context("Unable to write to the console")
            .pub_result(ErrorType::Io)
    }

    /// Writes `prompt`, then reads one line and returns it trimmed.
    ///
    /// # Errors
    /// - `ErrorType::Io` if the input is closed or cannot be read.
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.writer, "{prompt}")
            .and_then(|_| self.writer.flush())
            .context("Unable to write to the console")
            .pub_result(ErrorType::Io)?;
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("Unable to read from the console")
            .pub_result(ErrorType::Io)?;
        if read == 0 {
            return Err(Error::msg(ErrorType::Io, "The input was closed"));
        }
        trace!("Read '{}'", line.trim_end());
        Ok(line.trim().to_string())
    }

    /// Asks `question` and keeps asking until the answer parses as an amount. Returns the answer.
    pub fn amount(&mut self, question: &str) -> Result<String> {
        self.say(question)?;
        loop {
            let answer = self.ask(PROMPT)?;
            match parse_amount(&answer) {
                Ok(_) => return Ok(answer),
                Err(_) => self.say("Invalid input. Please enter a valid amount.")?,
            }
        }
    }

    /// Lists `categories` by menu key and keeps asking until one of the keys is entered. Returns
    /// the key.
    pub fn menu_key(&mut self, categories: &[Category]) -> Result<String> {
        let heading = match categories.first().map(Category::kind) {
            Some(CategoryKind::Expense) => {
                format!("Please choose a category (1-{}):", categories.len())
            }
            _ => "Please choose a category:".to_string(),
        };
        self.say(heading)?;
        for category in categories {
            self.say(format!("{}. {category}", category.menu_key()))?;
        }
        loop {
            let answer = self.ask(PROMPT)?;
            if categories.iter().any(|c| c.menu_key() == answer) {
                return Ok(answer);
            }
            self.say(format!(
                "Please enter a number between 1 and {}.",
                categories.len()
            ))?;
        }
    }

    /// Asks a yes or no `question` until the answer is `y` or `n`, in either case.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        loop {
            let answer = self.ask(&format!("{question} (y/n): "))?;
            match answer.to_lowercase().as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => self.say("Sorry, please choose 'y' or 'n'.")?,
            }
        }
    }
}
