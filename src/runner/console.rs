use std::fmt::Display;
use std::io::{self, BufRead, Write};

const CLEAR_SEQUENCE: &str = "\x1B[2J\x1B[1;1H";

/// Line-oriented operator console.
///
/// Reads block until the operator presses Enter. `None` from a read means
/// the input was closed.
pub struct Console<I, O> {
    input: I,
    output: O,
    clear_screen: bool,
}

impl<I: BufRead, O: Write> Console<I, O> {
    pub fn new(input: I, output: O, clear_screen: bool) -> Self {
        Self {
            input,
            output,
            clear_screen,
        }
    }

    pub fn output(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None); // EOF
        }
        Ok(Some(buf.trim().to_string()))
    }

    /// Print `text` without a newline and read the answer
    pub fn prompt(&mut self, text: impl Display) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Show `message` and wait for Enter. Returns false if input is closed.
    pub fn pause(&mut self, message: impl Display) -> io::Result<bool> {
        self.line(message)?;
        self.output.flush()?;
        Ok(self.read_line()?.is_some())
    }

    pub fn clear(&mut self) -> io::Result<()> {
        if self.clear_screen {
            write!(self.output, "{}", CLEAR_SEQUENCE)?;
            self.output.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_trims_answer() {
        let mut console = Console::new(Cursor::new("  2 \r\n"), Vec::new(), false);
        let answer = console.prompt("Enter your choice: ").unwrap();
        assert_eq!(answer.as_deref(), Some("2"));
        let out = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(out, "Enter your choice: ");
    }

    #[test]
    fn test_eof_is_none() {
        let mut console = Console::new(Cursor::new(""), Vec::new(), false);
        assert_eq!(console.read_line().unwrap(), None);
        assert!(!console.pause("Press Enter").unwrap());
    }

    #[test]
    fn test_clear_only_when_enabled() {
        let mut console = Console::new(Cursor::new(""), Vec::new(), false);
        console.clear().unwrap();
        assert!(console.into_output().is_empty());

        let mut console = Console::new(Cursor::new(""), Vec::new(), true);
        console.clear().unwrap();
        assert_eq!(console.into_output(), CLEAR_SEQUENCE.as_bytes());
    }
}
