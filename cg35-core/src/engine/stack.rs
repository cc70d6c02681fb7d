//! Four-register operand stack and memory register

use core::fmt;

use cg35_decimal::Decimal;

use crate::codec::DisplayText;

/// X, Y, Z and T registers plus the memory register
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stack {
    /// Working register shown on the display
    pub x: Decimal,
    pub y: Decimal,
    pub z: Decimal,
    pub t: Decimal,
    /// Auxiliary register for STO/RCL
    pub mem: Decimal,
}

impl Stack {
    /// All registers zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Lift the stack: T is lost, X is duplicated into Y
    pub fn push(&mut self) {
        self.t = core::mem::take(&mut self.z);
        self.z = core::mem::take(&mut self.y);
        self.y = self.x.clone();
    }

    /// Drop the stack: Y moves into X and T is backfilled with zero
    pub fn pull(&mut self) {
        self.x = core::mem::take(&mut self.y);
        self.y = core::mem::take(&mut self.z);
        self.z = core::mem::take(&mut self.t);
    }

    /// Rotate down: X gets Y and T gets the old X
    pub fn roll(&mut self) {
        let x = core::mem::take(&mut self.x);
        self.x = core::mem::take(&mut self.y);
        self.y = core::mem::take(&mut self.z);
        self.z = core::mem::replace(&mut self.t, x);
    }

    /// Exchange X and Y
    pub fn swap(&mut self) {
        core::mem::swap(&mut self.x, &mut self.y);
    }

    /// Zero the four stack registers and memory
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Register snapshot with the display text of X
#[derive(Debug, Clone, PartialEq)]
pub struct Registers {
    pub x: Decimal,
    pub y: Decimal,
    pub z: Decimal,
    pub t: Decimal,
    pub mem: Decimal,
    /// X as rendered on the display
    pub display: DisplayText,
}

impl Registers {
    pub(crate) fn capture(stack: &Stack, display: DisplayText) -> Self {
        Self {
            x: stack.x.clone(),
            y: stack.y.clone(),
            z: stack.z.clone(),
            t: stack.t.clone(),
            mem: stack.mem.clone(),
            display,
        }
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RULE: &str = "------------------------------------------------";
        writeln!(f, "{}", RULE)?;
        writeln!(f, "X:    {}  DISPLAY: '{}'", self.x, self.display)?;
        writeln!(f, "Y:    {}", self.y)?;
        writeln!(f, "Z:    {}", self.z)?;
        writeln!(f, "T:    {}", self.t)?;
        writeln!(f, "MEM:  {}", self.mem)?;
        write!(f, "{}", RULE)
    }
}
