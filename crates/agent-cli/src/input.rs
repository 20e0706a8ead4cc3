use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use agent_core::ports::UserInput;
use agent_types::Result;

use crate::transcript;

/// Line-oriented stdin reader that shows the prompt before each read.
pub struct StdinInput {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinInput {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait(?Send)]
impl UserInput for StdinInput {
    async fn read_line(&mut self) -> Result<Option<String>> {
        print!("{}", transcript::prompt());
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?)
    }
}
