//! Key vocabulary
//!
//! Every key on the keyboard, its canonical token and the class the engine
//! dispatches on.

/// Calculator keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    // Entry keys
    /// Digit 0-9
    Digit(u8),
    /// Decimal point
    Point,
    /// Change sign
    Chs,
    /// Enter exponent
    Eex,

    // Stack keys
    /// Push X
    Enter,
    /// Clear all registers and memory
    Clr,
    /// Clear X
    Clx,
    /// Store X in memory
    Sto,
    /// Recall memory
    Rcl,
    /// Roll the stack down
    Roll,
    /// Exchange X and Y
    Swap,
    /// Load π
    Pi,

    // Monadic keys
    /// Common logarithm
    Log,
    /// Natural logarithm
    Ln,
    /// Exponential
    Exp,
    /// Square root
    Sqrt,
    /// Inverse prefix for the next trig key
    Arc,
    /// Sine in degrees
    Sin,
    /// Cosine in degrees
    Cos,
    /// Tangent in degrees
    Tan,
    /// Reciprocal
    Reciprocal,

    // Dyadic keys
    /// X raised to the power Y
    Power,
    /// Y - X
    Subtract,
    /// Y + X
    Add,
    /// Y × X
    Multiply,
    /// Y ÷ X
    Divide,
}

/// Dispatch class of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyClass {
    /// Builds the number in X
    Entry,
    /// Moves values between registers
    Stack,
    /// Operates on X
    Monadic,
    /// Combines Y and X
    Dyadic,
}

/// Every non-digit key with its canonical token
const NAMED_KEYS: [(Key, &str); 25] = [
    (Key::Point, "."),
    (Key::Chs, "CHS"),
    (Key::Eex, "EEX"),
    (Key::Enter, "ENTER"),
    (Key::Clr, "CLR"),
    (Key::Clx, "CLX"),
    (Key::Sto, "STO"),
    (Key::Rcl, "RCL"),
    (Key::Roll, "R"),
    (Key::Swap, "x<>y"),
    (Key::Pi, "π"),
    (Key::Log, "LOG"),
    (Key::Ln, "LN"),
    (Key::Exp, "e^x"),
    (Key::Sqrt, "√x"),
    (Key::Arc, "ARC"),
    (Key::Sin, "SIN"),
    (Key::Cos, "COS"),
    (Key::Tan, "TAN"),
    (Key::Reciprocal, "1/x"),
    (Key::Power, "x^y"),
    (Key::Subtract, "-"),
    (Key::Add, "+"),
    (Key::Multiply, "*"),
    (Key::Divide, "÷"),
];

/// ASCII spellings accepted from host keyboards
const ALIASES: [(&str, Key); 12] = [
    ("pi", Key::Pi),
    ("sqrt", Key::Sqrt),
    ("exp", Key::Exp),
    ("/", Key::Divide),
    ("x", Key::Multiply),
    ("swap", Key::Swap),
    ("xy", Key::Swap),
    ("roll", Key::Roll),
    ("recip", Key::Reciprocal),
    ("inv", Key::Reciprocal),
    ("pow", Key::Power),
    ("arc", Key::Arc),
];

const DIGIT_TOKENS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

impl Key {
    /// Look up a key by token
    ///
    /// Canonical tokens match exactly or ignoring ASCII case; a few ASCII
    /// aliases (`pi`, `sqrt`, `/`, `swap`, ...) are accepted too.
    pub fn from_token(token: &str) -> Option<Key> {
        if let Some(digit) = DIGIT_TOKENS.iter().position(|t| *t == token) {
            return Some(Key::Digit(digit as u8));
        }
        NAMED_KEYS
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(token))
            .map(|(key, _)| *key)
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| alias.eq_ignore_ascii_case(token))
                    .map(|(_, key)| *key)
            })
    }

    /// Canonical token
    pub fn token(&self) -> &'static str {
        match self {
            Key::Digit(digit) => DIGIT_TOKENS
                .get(usize::from(*digit))
                .copied()
                .unwrap_or("?"),
            key => NAMED_KEYS
                .iter()
                .find(|(named, _)| named == key)
                .map(|(_, name)| *name)
                .unwrap_or("?"),
        }
    }

    /// Dispatch class
    pub fn class(&self) -> KeyClass {
        match self {
            Key::Digit(_) | Key::Point | Key::Chs | Key::Eex => KeyClass::Entry,
            Key::Enter
            | Key::Clr
            | Key::Clx
            | Key::Sto
            | Key::Rcl
            | Key::Roll
            | Key::Swap
            | Key::Pi => KeyClass::Stack,
            Key::Log
            | Key::Ln
            | Key::Exp
            | Key::Sqrt
            | Key::Arc
            | Key::Sin
            | Key::Cos
            | Key::Tan
            | Key::Reciprocal => KeyClass::Monadic,
            Key::Power | Key::Subtract | Key::Add | Key::Multiply | Key::Divide => {
                KeyClass::Dyadic
            }
        }
    }

    /// Check if this key builds the number in X
    pub fn is_entry(&self) -> bool {
        self.class() == KeyClass::Entry
    }
}

impl core::fmt::Display for Key {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_tokens() {
        let tokens = [
            "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", ".", "CHS", "EEX", "ENTER", "CLR",
            "CLX", "STO", "RCL", "R", "x<>y", "π", "LOG", "LN", "e^x", "√x", "ARC", "SIN", "COS",
            "TAN", "1/x", "x^y", "-", "+", "*", "÷",
        ];
        for token in tokens {
            let key = Key::from_token(token).unwrap();
            assert_eq!(key.token(), token);
        }
    }

    #[test]
    fn test_digits() {
        assert_eq!(Key::from_token("7"), Some(Key::Digit(7)));
        assert_eq!(Key::Digit(0).token(), "0");
        assert_eq!(Key::from_token("10"), None);
    }

    #[test]
    fn test_aliases_ignore_case() {
        assert_eq!(Key::from_token("enter"), Some(Key::Enter));
        assert_eq!(Key::from_token("chs"), Some(Key::Chs));
        assert_eq!(Key::from_token("Pi"), Some(Key::Pi));
        assert_eq!(Key::from_token("SQRT"), Some(Key::Sqrt));
        assert_eq!(Key::from_token("/"), Some(Key::Divide));
        assert_eq!(Key::from_token("swap"), Some(Key::Swap));
        assert_eq!(Key::from_token("r"), Some(Key::Roll));
        assert_eq!(Key::from_token("E^X"), Some(Key::Exp));
    }

    #[test]
    fn test_unknown_tokens() {
        assert_eq!(Key::from_token(""), None);
        assert_eq!(Key::from_token("HYP"), None);
        assert_eq!(Key::from_token("%"), None);
    }

    #[test]
    fn test_classes() {
        assert_eq!(Key::Digit(3).class(), KeyClass::Entry);
        assert_eq!(Key::Eex.class(), KeyClass::Entry);
        assert_eq!(Key::Pi.class(), KeyClass::Stack);
        assert_eq!(Key::Arc.class(), KeyClass::Monadic);
        assert_eq!(Key::Power.class(), KeyClass::Dyadic);
        assert!(Key::Chs.is_entry());
        assert!(!Key::Enter.is_entry());
    }
}
