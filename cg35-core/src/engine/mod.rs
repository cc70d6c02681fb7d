//! RPN engine
//!
//! Four-register stack, memory register, number entry and the key-driven
//! state machine. The engine is explicit, finite and deterministic: one key
//! in, one [`Response`] out.

pub mod calculator;
pub mod entry;
pub mod events;
pub mod machine;
pub mod ops;
pub mod stack;

pub use calculator::{Calculator, Response, Status};
pub use entry::Entry;
pub use events::Event;
pub use machine::{ErrorKind, State};
pub use ops::{Function, Operations, Operator};
pub use stack::{Registers, Stack};
