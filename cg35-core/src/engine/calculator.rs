//! Key handling
//!
//! `Calculator` runs each key to completion: it updates the registers,
//! steps the state machine and resynchronizes the display text from X.
//! Arithmetic is evaluated into temporaries and only committed when it
//! succeeds with a finite result, so a fault never disturbs the stack.

use cg35_decimal::Decimal;
use heapless::String;

use super::entry::Entry;
use super::events::Event;
use super::machine::{ErrorKind, State};
use super::ops::{Function, Operations, Operator};
use super::stack::{Registers, Stack};
use crate::codec::{CodecError, DisplayCodec, DisplayText};
use crate::config::{CalculatorConfig, ConfigError};
use crate::keys::{Key, KeyClass};

/// Longest status message
pub const STATUS_CAPACITY: usize = 16;

/// Status area message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// Message text, cut to the status area
    pub text: String<STATUS_CAPACITY>,
    /// Keep the message up until the next key
    pub hold: bool,
}

impl Status {
    /// Message held until the next key
    pub fn latched(text: &str) -> Self {
        Self {
            text: truncated(text),
            hold: true,
        }
    }

    /// Message shown briefly
    pub fn transient(text: &str) -> Self {
        Self {
            text: truncated(text),
            hold: false,
        }
    }
}

fn truncated(text: &str) -> String<STATUS_CAPACITY> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Result of one key press
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Response {
    /// Text for the 15-character display
    pub display: DisplayText,
    /// Status area message, `None` clears the area
    pub status: Option<Status>,
    /// Play the error blink before settling on `display`
    pub flash: bool,
}

/// HP-35 style RPN calculator
#[derive(Debug, Clone)]
pub struct Calculator {
    codec: DisplayCodec,
    ops: Operations,
    stack: Stack,
    entry: Entry,
    state: State,
    /// ARC pressed, next trig key takes the inverse
    arc: bool,
    /// Last completed action was dyadic; new entry lifts the stack first
    lift_pending: bool,
    display: DisplayText,
    status: Option<Status>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::build(&CalculatorConfig::default())
    }
}

impl Calculator {
    /// Create a calculator with all registers cleared
    pub fn new(config: &CalculatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &CalculatorConfig) -> Self {
        let codec = DisplayCodec::new(config);
        let display = codec.encode_text(&Decimal::zero());
        Self {
            ops: Operations::new(config.internal_context()),
            codec,
            stack: Stack::new(),
            entry: Entry::new(),
            state: State::Idle,
            arc: false,
            lift_pending: false,
            display,
            status: None,
        }
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Stack registers
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Snapshot of the registers with X as displayed
    pub fn registers(&self) -> Registers {
        Registers::capture(&self.stack, self.codec.encode_text(&self.stack.x))
    }

    /// Text currently on the display
    pub fn display(&self) -> &DisplayText {
        &self.display
    }

    /// Current status message
    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Check if ARC is waiting for a trig key
    pub fn arc_pending(&self) -> bool {
        self.arc
    }

    /// Codec used for the display
    pub fn codec(&self) -> &DisplayCodec {
        &self.codec
    }

    /// Press the key named by `token`
    ///
    /// Unknown tokens change nothing and return the current display.
    pub fn press_token(&mut self, token: &str) -> Response {
        match Key::from_token(token) {
            Some(key) => self.press(key),
            None => {
                log::debug!("ignoring unknown key token {:?}", token);
                self.response(false)
            }
        }
    }

    /// Process one key to completion
    pub fn press(&mut self, key: Key) -> Response {
        log::debug!("key {} in {:?}", key, self.state);
        self.status = None;

        if self.state.is_error() && !Self::clears_error(key) {
            self.dispatch(Event::Dismiss);
            self.display = self.codec.encode_text(&self.stack.x);
            return self.response(false);
        }

        match key.class() {
            KeyClass::Entry => self.entry_key(key),
            KeyClass::Stack => self.stack_key(key),
            KeyClass::Monadic => self.monadic_key(key),
            KeyClass::Dyadic => self.dyadic_key(key),
        }
        self.response(self.state.is_error())
    }

    /// Keys that act normally while an error is latched
    fn clears_error(key: Key) -> bool {
        key.is_entry() || matches!(key, Key::Clr | Key::Clx)
    }

    fn entry_key(&mut self, key: Key) {
        if !self.state.is_entry() {
            if self.lift_pending {
                log::debug!("automatic ENTER");
                self.stack.push();
            }
            self.lift_pending = false;
            self.stack.x = Decimal::zero();
            self.entry = Entry::new();
            self.dispatch(Event::Digit);
        }

        let exponent = self.state == State::ExponentEntry;
        let event = match key {
            Key::Digit(digit) if exponent => {
                self.entry.push_exponent_digit(digit);
                Event::Digit
            }
            Key::Digit(digit) => {
                self.entry.push_digit(digit);
                Event::Digit
            }
            Key::Point if exponent => Event::Digit,
            Key::Point => {
                self.entry.push_point();
                Event::Digit
            }
            Key::Chs if exponent => {
                self.entry.toggle_exponent_sign();
                Event::Digit
            }
            Key::Chs => {
                self.entry.toggle_sign();
                Event::Digit
            }
            _ => Event::Exponent,
        };
        self.dispatch(event);

        self.display = self.entry.display();
        match self.codec.decode_text(&self.display) {
            Ok(value) => self.stack.x = value,
            Err(CodecError::Overflow) => self.fault(ErrorKind::Overflow),
            Err(CodecError::Format) => self.fault(ErrorKind::InvalidOperation),
        }
    }

    fn stack_key(&mut self, key: Key) {
        self.dispatch(Event::Stack);
        match key {
            Key::Enter => self.stack.push(),
            Key::Clr => {
                self.stack.clear();
                self.arc = false;
            }
            Key::Clx => self.stack.x = Decimal::zero(),
            Key::Sto => self.stack.mem = self.stack.x.clone(),
            Key::Rcl => {
                self.stack.push();
                self.stack.x = self.stack.mem.clone();
            }
            Key::Roll => self.stack.roll(),
            Key::Swap => self.stack.swap(),
            Key::Pi => match self.ops.pi() {
                Ok(pi) => self.stack.x = pi,
                Err(kind) => return self.fault(kind),
            },
            _ => {}
        }
        self.settle();
    }

    fn monadic_key(&mut self, key: Key) {
        self.dispatch(Event::Monadic);
        if key == Key::Arc {
            self.arc = true;
            return self.settle();
        }

        let function = match Function::from_key(key, self.arc) {
            Some(function) => function,
            None => return self.settle(),
        };
        if function.is_trig() {
            self.arc = false;
        }
        match self.ops.monadic(function, &self.stack.x) {
            Ok(value) => {
                self.stack.x = value;
                self.settle();
            }
            Err(kind) => self.fault(kind),
        }
    }

    fn dyadic_key(&mut self, key: Key) {
        self.dispatch(Event::Dyadic);
        let operator = match Operator::from_key(key) {
            Some(operator) => operator,
            None => return self.settle(),
        };
        match self.ops.dyadic(operator, &self.stack.x, &self.stack.y) {
            Ok(value) if operator.pulls() => {
                self.stack.y = value;
                self.stack.pull();
            }
            Ok(value) => self.stack.x = value,
            Err(kind) => return self.fault(kind),
        }
        self.settle();
    }

    /// Finish an operation: back to idle with X on the display
    fn settle(&mut self) {
        self.lift_pending = self.state == State::DyadicOp;
        self.dispatch(Event::Settled);
        self.display = self.codec.encode_text(&self.stack.x);
        log::trace!("\n{}", self.registers());
    }

    /// Latch an error; registers keep their values
    fn fault(&mut self, kind: ErrorKind) {
        self.dispatch(Event::Fault(kind));
        self.arc = false;
        self.lift_pending = false;
        self.display = DisplayText::flash();
        self.status = Some(Status::latched(kind.label()));
    }

    fn dispatch(&mut self, event: Event) {
        let next = self.state.transition(event);
        if event.is_error_event() {
            log::warn!("{:?} -> {:?} on {:?}", self.state, next, event);
        } else if next != self.state {
            log::debug!("{:?} -> {:?} on {:?}", self.state, next, event);
        }
        self.state = next;
    }

    fn response(&self, flash: bool) -> Response {
        Response {
            display: self.display.clone(),
            status: self.status.clone(),
            flash,
        }
    }
}
