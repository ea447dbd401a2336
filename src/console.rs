//! Line-oriented [`UiProvider`] for a terminal session.
//!
//! Quick picks print a numbered list and read the answer from the same
//! input the session reads commands from, so both share one reader.

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::host::{QuickPickItem, QuickPickOptions, UiProvider};

/// What a line typed at a quick pick means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Item(usize),
    Cancel,
    Invalid,
}

/// Items are numbered from 1. An empty line cancels.
pub fn parse_choice(line: &str, len: usize) -> Choice {
    let line = line.trim();
    if line.is_empty() {
        return Choice::Cancel;
    }
    match line.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Choice::Item(n - 1),
        _ => Choice::Invalid,
    }
}

pub struct ConsoleUi<R = BufReader<Stdin>> {
    input: tokio::sync::Mutex<Lines<R>>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleUi {
    /// Reads stdin, writes stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), Box::new(std::io::stdout()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> ConsoleUi<R> {
    pub fn new(input: R, output: Box<dyn Write + Send>) -> Self {
        Self {
            input: tokio::sync::Mutex::new(input.lines()),
            output: Mutex::new(output),
        }
    }

    /// Prompt and read one line. `None` at end of input.
    pub async fn read_line(&self, prompt: &str) -> std::io::Result<Option<String>> {
        self.write(prompt, false);
        self.input.lock().await.next_line().await
    }

    fn say(&self, text: &str) {
        self.write(text, true);
    }

    fn write(&self, text: &str, newline: bool) {
        let Ok(mut out) = self.output.lock() else {
            return;
        };
        let result = if newline {
            writeln!(out, "{text}")
        } else {
            write!(out, "{text}")
        };
        if let Err(e) = result.and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "console write failed");
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> UiProvider for ConsoleUi<R> {
    async fn show_quick_pick(
        &self,
        items: &[QuickPickItem],
        options: &QuickPickOptions,
    ) -> Option<usize> {
        self.say(&options.placeholder);
        for (i, item) in items.iter().enumerate() {
            match &item.description {
                Some(description) => self.say(&format!("  {}) {}  ({description})", i + 1, item.label)),
                None => self.say(&format!("  {}) {}", i + 1, item.label)),
            }
        }

        loop {
            let line = match self.read_line("pick> ").await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => {
                    tracing::warn!(error = %e, "reading pick failed");
                    return None;
                }
            };
            match parse_choice(&line, items.len()) {
                Choice::Item(index) => return Some(index),
                Choice::Cancel => return None,
                Choice::Invalid => self.say(&format!(
                    "Enter a number from 1 to {}, or an empty line to cancel",
                    items.len()
                )),
            }
        }
    }

    fn show_information_message(&self, text: &str) {
        self.say(text);
    }

    fn show_error_message(&self, text: &str) {
        self.say(&format!("error: {text}"));
    }
}
