//! Number entry buffer
//!
//! Holds the digits typed since the last entry began and renders them the
//! way the display shows them while typing: `" 0."` before the first digit,
//! `" ."` after a leading point, integer digits inserted left of the point
//! and fraction digits appended after it.

use heapless::String;

use crate::codec::{DisplayText, COEFFICIENT_WIDTH, EXPONENT_WIDTH};

/// Coefficient digits that fit beside the sign and the point
pub const MAX_ENTRY_DIGITS: usize = COEFFICIENT_WIDTH - 2;

/// Digits typed for the number in X
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Entry {
    negative: bool,
    /// Integer digits followed by fraction digits
    digits: String<MAX_ENTRY_DIGITS>,
    integer_digits: usize,
    point: bool,
    exponent_negative: bool,
    exponent: [u8; 2],
}

impl Entry {
    /// Empty buffer showing `" 0."`
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if nothing has been typed into the coefficient
    pub fn is_untouched(&self) -> bool {
        self.digits.is_empty() && !self.point
    }

    /// Add a coefficient digit
    ///
    /// Leading zeros and digits beyond the field width are ignored.
    pub fn push_digit(&mut self, digit: u8) {
        if digit > 9 || (digit == 0 && self.is_untouched()) {
            return;
        }
        if self.digits.push(char::from(b'0' + digit)).is_err() {
            return;
        }
        if !self.point {
            self.integer_digits += 1;
        }
    }

    /// Enter the decimal point; only the first press counts
    pub fn push_point(&mut self) {
        if self.digits.len() < MAX_ENTRY_DIGITS {
            self.point = true;
        }
    }

    /// Change the coefficient sign, unless the field still reads `0.`
    pub fn toggle_sign(&mut self) {
        if !self.is_untouched() {
            self.negative = !self.negative;
        }
    }

    /// Shift a digit into the exponent field: `00 → 0d → dd`
    pub fn push_exponent_digit(&mut self, digit: u8) {
        if digit > 9 || self.exponent[0] != 0 {
            return;
        }
        self.exponent = [self.exponent[1], digit];
    }

    /// Change the exponent sign
    pub fn toggle_exponent_sign(&mut self) {
        self.exponent_negative = !self.exponent_negative;
    }

    /// Coefficient field text with its sign
    pub fn coefficient_text(&self) -> String<COEFFICIENT_WIDTH> {
        let mut text = String::new();
        let _ = text.push(if self.negative { '-' } else { ' ' });
        if self.is_untouched() {
            let _ = text.push_str("0.");
            return text;
        }
        let (integer, fraction) = self.digits.split_at(self.integer_digits);
        let _ = text.push_str(integer);
        let _ = text.push('.');
        let _ = text.push_str(fraction);
        text
    }

    /// Exponent field text, blank while both digits are zero
    pub fn exponent_text(&self) -> String<EXPONENT_WIDTH> {
        let mut text = String::new();
        if self.exponent == [0, 0] {
            let _ = text.push_str("   ");
            return text;
        }
        let _ = text.push(if self.exponent_negative { '-' } else { ' ' });
        for digit in self.exponent {
            let _ = text.push(char::from(b'0' + digit));
        }
        text
    }

    /// Text shown on the display while typing
    pub fn display(&self) -> DisplayText {
        DisplayText::compose(&self.coefficient_text(), &self.exponent_text())
    }
}
