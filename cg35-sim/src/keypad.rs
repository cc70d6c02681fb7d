//! Keypad fed from whitespace-separated key tokens

use std::collections::VecDeque;
use std::io::BufRead;

use cg35_core::traits::{Keypad, KeypadError};
use cg35_core::Key;
use tracing::{error, warn};

/// Reads key tokens line by line from any buffered source
///
/// Unknown tokens are skipped with a warning. The keypad is exhausted at
/// end of input.
pub struct TokenKeypad<B: BufRead> {
    source: B,
    pending: VecDeque<String>,
    line: String,
}

impl<B: BufRead> TokenKeypad<B> {
    pub fn new(source: B) -> Self {
        Self {
            source,
            pending: VecDeque::new(),
            line: String::new(),
        }
    }

    /// Queue the tokens of the next line; false at end of input
    fn refill(&mut self) -> Result<bool, KeypadError> {
        self.line.clear();
        let read = self.source.read_line(&mut self.line).map_err(|err| {
            error!(%err, "key source read failed");
            KeypadError::Read
        })?;
        self.pending
            .extend(self.line.split_whitespace().map(str::to_owned));
        Ok(read > 0)
    }
}

impl<B: BufRead> Keypad for TokenKeypad<B> {
    fn next_key(&mut self) -> Result<Option<Key>, KeypadError> {
        loop {
            while let Some(token) = self.pending.pop_front() {
                match Key::from_token(&token) {
                    Some(key) => return Ok(Some(key)),
                    None => warn!(%token, "unknown key token skipped"),
                }
            }
            if !self.refill()? {
                return Ok(None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn drain<B: BufRead>(keypad: &mut TokenKeypad<B>) -> Vec<Key> {
        let mut keys = Vec::new();
        while let Some(key) = keypad.next_key().unwrap() {
            keys.push(key);
        }
        keys
    }

    #[test]
    fn test_tokens_across_lines() {
        let mut keypad = TokenKeypad::new(Cursor::new("1 ENTER\n\n  2   +\n"));
        assert_eq!(
            drain(&mut keypad),
            [Key::Digit(1), Key::Enter, Key::Digit(2), Key::Add]
        );
        assert_eq!(keypad.next_key(), Ok(None));
    }

    #[test]
    fn test_unknown_tokens_skipped() {
        let mut keypad = TokenKeypad::new(Cursor::new("4 HYP sqrt"));
        assert_eq!(drain(&mut keypad), [Key::Digit(4), Key::Sqrt]);
    }

    #[test]
    fn test_empty_source() {
        let mut keypad = TokenKeypad::new(Cursor::new(""));
        assert_eq!(keypad.next_key(), Ok(None));
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let mut keypad = TokenKeypad::new(Cursor::new(vec![b'1', b' ', 0xff, b'\n']));
        assert_eq!(keypad.next_key(), Err(KeypadError::Read));
    }
}
