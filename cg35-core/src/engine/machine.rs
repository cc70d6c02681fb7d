//! Engine state machine
//!
//! The state records what the last key did. Entry states decide whether
//! the next entry key continues the current number or starts a new one.

use cg35_decimal::DecimalError;

use super::events::Event;

/// Engine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Waiting for a key, display shows X
    Idle,
    /// Typing coefficient digits
    CoefficientEntry,
    /// Typing exponent digits
    ExponentEntry,
    /// Stack key in progress
    StackOp,
    /// Operation on X in progress
    MonadicOp,
    /// Operation on Y and X in progress
    DyadicOp,
    /// Arithmetic fault latched until the next key
    Error(ErrorKind),
}

/// Arithmetic faults
///
/// Domain errors surface as [`ErrorKind::DivisionByZero`] or
/// [`ErrorKind::InvalidOperation`]; overflow errors as
/// [`ErrorKind::Overflow`] or [`ErrorKind::InfiniteValue`]. Entry text the
/// codec rejects as malformed surfaces as [`ErrorKind::InvalidOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Domain error with a zero divisor: `÷` by zero, `1/x` of zero,
    /// `tan` of 90° or 270°
    DivisionByZero,
    /// Domain error: `√x`, `LN` or `LOG` of a negative, `ARC SIN`/`ARC COS`
    /// beyond ±1, `0 ÷ 0`, `0 x^y 0`
    InvalidOperation,
    /// Overflow error: result or typed number beyond the exponent range
    Overflow,
    /// Overflow error: infinite result such as `LN` of zero
    InfiniteValue,
}

impl ErrorKind {
    /// Status text shown while the error is latched
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::DivisionByZero => "DivisionByZero",
            ErrorKind::InvalidOperation => "InvalidOperation",
            ErrorKind::Overflow => "Overflow",
            ErrorKind::InfiniteValue => "InfiniteValue",
        }
    }
}

impl From<DecimalError> for ErrorKind {
    fn from(error: DecimalError) -> Self {
        match error {
            DecimalError::DivisionByZero => ErrorKind::DivisionByZero,
            DecimalError::InvalidOperation => ErrorKind::InvalidOperation,
            DecimalError::Overflow => ErrorKind::Overflow,
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl State {
    /// Check if a number is being typed
    pub fn is_entry(&self) -> bool {
        matches!(self, State::CoefficientEntry | State::ExponentEntry)
    }

    /// Check if this is an error state
    pub fn is_error(&self) -> bool {
        matches!(self, State::Error(_))
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // Faults win from any state
            (_, Fault(kind)) => Error(kind),

            // Entry
            (ExponentEntry, Digit) => ExponentEntry,
            (_, Digit) => CoefficientEntry,
            (_, Exponent) => ExponentEntry,

            // Operations
            (_, Stack) => StackOp,
            (_, Monadic) => MonadicOp,
            (_, Dyadic) => DyadicOp,

            // Completion
            (StackOp | MonadicOp | DyadicOp, Settled) => Idle,
            (Error(_), Dismiss) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_starts_entry() {
        let states = [
            State::Idle,
            State::StackOp,
            State::MonadicOp,
            State::DyadicOp,
            State::Error(ErrorKind::Overflow),
        ];

        for state in states {
            assert_eq!(state.transition(Event::Digit), State::CoefficientEntry);
        }
    }

    #[test]
    fn test_exponent_entry_flow() {
        let entry = State::CoefficientEntry;

        let exponent = entry.transition(Event::Exponent);
        assert_eq!(exponent, State::ExponentEntry);

        // Exponent digits and sign stay in exponent entry
        let exponent = exponent.transition(Event::Digit);
        assert_eq!(exponent, State::ExponentEntry);

        let idle = exponent
            .transition(Event::Stack)
            .transition(Event::Settled);
        assert_eq!(idle, State::Idle);
    }

    #[test]
    fn test_operations_settle_to_idle() {
        for event in [Event::Stack, Event::Monadic, Event::Dyadic] {
            let op = State::CoefficientEntry.transition(event);
            assert!(!op.is_entry());
            assert_eq!(op.transition(Event::Settled), State::Idle);
        }
    }

    #[test]
    fn test_fault_from_any_state() {
        let states = [
            State::Idle,
            State::CoefficientEntry,
            State::ExponentEntry,
            State::MonadicOp,
            State::DyadicOp,
        ];

        for state in states {
            let next = state.transition(Event::Fault(ErrorKind::DivisionByZero));
            assert_eq!(next, State::Error(ErrorKind::DivisionByZero));
            assert!(next.is_error());
        }
    }

    #[test]
    fn test_error_dismissed() {
        let error = State::Error(ErrorKind::InvalidOperation);

        // Settling does not clear an error
        assert_eq!(error.transition(Event::Settled), error);
        assert_eq!(error.transition(Event::Dismiss), State::Idle);
    }

    #[test]
    fn test_idle_ignores_settled() {
        assert_eq!(State::Idle.transition(Event::Settled), State::Idle);
        assert_eq!(State::Idle.transition(Event::Dismiss), State::Idle);
    }

    #[test]
    fn test_error_labels() {
        assert_eq!(ErrorKind::DivisionByZero.label(), "DivisionByZero");
        assert_eq!(ErrorKind::InfiniteValue.label(), "InfiniteValue");
        assert_eq!(
            ErrorKind::from(DecimalError::InvalidOperation),
            ErrorKind::InvalidOperation
        );
        assert_eq!(ErrorKind::from(DecimalError::Overflow), ErrorKind::Overflow);
    }
}
