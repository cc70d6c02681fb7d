//! Events that drive the engine state machine

use super::machine::ErrorKind;

/// Events raised while handling a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Entry events
    /// Digit, point or sign change typed
    Digit,
    /// EEX pressed
    Exponent,

    // Operation events
    /// Stack key pressed
    Stack,
    /// Monadic key pressed
    Monadic,
    /// Dyadic key pressed
    Dyadic,

    // Completion events
    /// Operation finished and the display was resynchronized
    Settled,
    /// Arithmetic fault
    Fault(ErrorKind),
    /// Key pressed while an error was latched
    Dismiss,
}

impl Event {
    /// Check if this event indicates an error
    pub fn is_error_event(&self) -> bool {
        matches!(self, Event::Fault(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_events() {
        assert!(Event::Fault(ErrorKind::Overflow).is_error_event());
        assert!(!Event::Dismiss.is_error_event());
    }
}
