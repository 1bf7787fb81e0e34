//! Operator input

use crate::error::DlqError;
use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Asks the operator a question and returns one line of input.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OperatorPrompt: Send {
    /// Returns `None` when input is closed (EOF)
    async fn ask(&mut self, question: &str) -> Result<Option<String>, DlqError>;
}

/// Terminal prompt on stdin/stdout
pub struct StdinPrompt {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinPrompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OperatorPrompt for StdinPrompt {
    async fn ask(&mut self, question: &str) -> Result<Option<String>, DlqError> {
        {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(question.as_bytes())?;
            stdout.flush()?;
        }

        Ok(self.lines.next_line().await?)
    }
}
