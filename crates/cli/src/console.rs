//! Interactive terminal input.
//!
//! Reads one utterance per line from stdin. Exit commands and EOF
//! (Ctrl+D) both close the source, which ends the session cleanly.

use async_trait::async_trait;
use drafter_agent::InputSource;
use drafter_core::error::Error;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct ConsoleInput {
    lines: Lines<BufReader<Stdin>>,
}

impl ConsoleInput {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputSource for ConsoleInput {
    async fn next_utterance(&mut self) -> Result<Option<String>, Error> {
        loop {
            print!("\n👤 You > ");
            std::io::stdout()
                .flush()
                .map_err(|e| Error::Input(e.to_string()))?;

            match self.lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    if matches!(line.as_str(), "exit" | "quit" | "/exit" | "/quit" | ":q") {
                        return Ok(None);
                    }
                    return Ok(Some(line));
                }
                Ok(None) => return Ok(None), // EOF (Ctrl+D)
                Err(e) => return Err(Error::Input(e.to_string())),
            }
        }
    }
}
