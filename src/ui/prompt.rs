use std::fmt::Display;
use std::io::{BufRead, Write};

use log::debug;

use crate::error::PromptError;

// ---------------------------------------------------------------------------
// Numbered-choice prompt
// ---------------------------------------------------------------------------

/// Line-oriented prompt over any reader/writer pair.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompt { input, output }
    }

    /// Writer for free-form output between prompts.
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// List `options` numbered from 1 under `heading` and return the
    /// 0-based index of the one picked. Invalid answers re-prompt; a closed
    /// input stream is [`PromptError::Interrupted`].
    pub fn choose<T: Display>(&mut self, heading: &str, options: &[T]) -> Result<usize, PromptError> {
        writeln!(self.output, "{heading}")?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "{}. {option}", i + 1)?;
        }
        self.read_index(options.len())
    }

    /// Two-option yes/no question.
    pub fn confirm(&mut self, question: &str) -> Result<bool, PromptError> {
        Ok(self.choose(question, &["Yes", "No"])? == 0)
    }

    fn read_index(&mut self, n: usize) -> Result<usize, PromptError> {
        loop {
            write!(self.output, "Select (1-{n}): ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(PromptError::Interrupted);
            }
            match line.trim().parse::<usize>() {
                Ok(choice) if (1..=n).contains(&choice) => return Ok(choice - 1),
                Ok(_) => writeln!(self.output, "Please enter a number between 1 and {n}.")?,
                Err(_) => writeln!(self.output, "Please enter a number.")?,
            }
            debug!("rejected answer {:?}", line.trim());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn printed(p: Prompt<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.output).unwrap()
    }

    #[test]
    fn returns_zero_based_index() {
        let mut p = prompt("2\n");
        assert_eq!(p.choose("Pick:", &["a", "b", "c"]).unwrap(), 1);
        let out = printed(p);
        assert!(out.contains("1. a\n2. b\n3. c\n"));
        assert!(out.contains("Select (1-3): "));
    }

    #[test]
    fn reprompts_until_valid() {
        let mut p = prompt("zero\n0\n4\n  3 \n");
        assert_eq!(p.choose("Pick:", &["a", "b", "c"]).unwrap(), 2);
        let out = printed(p);
        assert_eq!(out.matches("Select (1-3): ").count(), 4);
        assert!(out.contains("Please enter a number.\n"));
        assert_eq!(out.matches("between 1 and 3").count(), 2);
    }

    #[test]
    fn end_of_input_is_an_interrupt() {
        let mut p = prompt("x\n");
        assert!(matches!(
            p.choose("Pick:", &["a"]),
            Err(PromptError::Interrupted)
        ));
    }

    #[test]
    fn confirm_maps_first_option_to_yes() {
        assert!(prompt("1\n").confirm("Add?").unwrap());
        assert!(!prompt("2\n").confirm("Add?").unwrap());
    }
}
