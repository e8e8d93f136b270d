//! Line-oriented prompting over any async reader and sync writer.

use std::fmt::Display;
use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::error::CliError;

/// One line of user input, with the control words already recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Value(String),
    /// An empty line.
    Blank,
    /// `:back`
    Back,
    /// `:clear`
    Clear,
    /// `:quit`, or end of input.
    Quit,
}

impl Reply {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Self::Blank,
            ":back" => Self::Back,
            ":clear" => Self::Clear,
            ":quit" | ":q" => Self::Quit,
            other => Self::Value(other.to_string()),
        }
    }
}

pub struct Prompter<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> Prompter<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(reader: R, out: W) -> Self {
        Self {
            lines: reader.lines(),
            out,
        }
    }

    /// Print one line.
    pub fn say(&mut self, text: impl Display) -> Result<(), CliError> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    /// Print `label: ` and read the reply.
    pub async fn ask(&mut self, label: &str) -> Result<Reply, CliError> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;
        let reply = match self.lines.next_line().await? {
            Some(line) => Reply::parse(&line),
            None => Reply::Quit,
        };
        // Keep transcripts readable when input is piped.
        writeln!(self.out)?;
        Ok(reply)
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recognises_control_words() {
        let input: &[u8] = b"  hello \n\n:back\n:clear\n:quit\n";
        let mut prompter = Prompter::new(input, Vec::new());
        assert_eq!(prompter.ask("a").await.unwrap(), Reply::Value("hello".into()));
        assert_eq!(prompter.ask("b").await.unwrap(), Reply::Blank);
        assert_eq!(prompter.ask("c").await.unwrap(), Reply::Back);
        assert_eq!(prompter.ask("d").await.unwrap(), Reply::Clear);
        assert_eq!(prompter.ask("e").await.unwrap(), Reply::Quit);
        // End of input reads as quit.
        assert_eq!(prompter.ask("f").await.unwrap(), Reply::Quit);

        let out = String::from_utf8(prompter.into_output()).unwrap();
        assert!(out.starts_with("a: \n"));
    }
}
