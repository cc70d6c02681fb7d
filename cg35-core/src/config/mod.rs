//! Configuration types
//!
//! Board-agnostic calculator settings. The host simulator loads them from
//! TOML through the `serde` feature.

pub mod types;

pub use types::*;
