//! Configuration type definitions

use core::fmt;

use cg35_decimal::{Context, Rounding};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Widest display precision the 12-character coefficient field can hold
pub const MAX_DISPLAY_PRECISION: u8 = 10;

/// Widest internal precision accepted
pub const MAX_INTERNAL_PRECISION: u8 = 60;

/// Largest exponent the two-digit exponent field can show
pub const MAX_EXPONENT_LIMIT: u8 = 99;

/// Rounding applied at both precisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoundingMode {
    /// Round half to even
    #[default]
    HalfEven,
    /// Round half away from zero
    HalfUp,
    /// Truncate
    Down,
}

impl From<RoundingMode> for Rounding {
    fn from(mode: RoundingMode) -> Self {
        match mode {
            RoundingMode::HalfEven => Rounding::HalfEven,
            RoundingMode::HalfUp => Rounding::HalfUp,
            RoundingMode::Down => Rounding::Down,
        }
    }
}

/// Calculator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CalculatorConfig {
    /// Significant digits shown on the display
    pub display_precision: u8,
    /// Significant digits kept by all arithmetic
    pub internal_precision: u8,
    /// Exponent bound (±limit)
    pub exponent_limit: u8,
    /// Rounding mode
    pub rounding: RoundingMode,
    /// Interval between error blink frames (ms)
    pub flash_interval_ms: u32,
    /// How long a transient status message stays up (ms)
    pub status_ms: u32,
    /// How long the startup banner stays up (ms)
    pub ready_ms: u32,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            display_precision: 10,
            internal_precision: 20,
            exponent_limit: 99,
            rounding: RoundingMode::HalfEven,
            flash_interval_ms: 200,
            status_ms: 500,
            ready_ms: 1000,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Display precision outside 1..=10
    DisplayPrecision(u8),
    /// Internal precision below the display precision or above 60
    InternalPrecision(u8),
    /// Exponent limit outside 1..=99
    ExponentLimit(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DisplayPrecision(value) => write!(
                f,
                "display_precision {} outside 1..={}",
                value, MAX_DISPLAY_PRECISION
            ),
            ConfigError::InternalPrecision(value) => write!(
                f,
                "internal_precision {} must lie between display_precision and {}",
                value, MAX_INTERNAL_PRECISION
            ),
            ConfigError::ExponentLimit(value) => write!(
                f,
                "exponent_limit {} outside 1..={}",
                value, MAX_EXPONENT_LIMIT
            ),
        }
    }
}

impl core::error::Error for ConfigError {}

impl CalculatorConfig {
    /// Check the configuration for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_DISPLAY_PRECISION).contains(&self.display_precision) {
            return Err(ConfigError::DisplayPrecision(self.display_precision));
        }
        if self.internal_precision < self.display_precision
            || self.internal_precision > MAX_INTERNAL_PRECISION
        {
            return Err(ConfigError::InternalPrecision(self.internal_precision));
        }
        if !(1..=MAX_EXPONENT_LIMIT).contains(&self.exponent_limit) {
            return Err(ConfigError::ExponentLimit(self.exponent_limit));
        }
        Ok(())
    }

    /// Context used when rendering to the display
    pub fn display_context(&self) -> Context {
        self.context(self.display_precision)
    }

    /// Context used by all arithmetic
    pub fn internal_context(&self) -> Context {
        self.context(self.internal_precision)
    }

    fn context(&self, precision: u8) -> Context {
        let limit = i64::from(self.exponent_limit);
        Context::new(u32::from(precision))
            .with_exponent_range(-limit, limit)
            .with_rounding(self.rounding.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CalculatorConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.display_context().precision(), 10);
        assert_eq!(config.internal_context().precision(), 20);
        assert_eq!(config.internal_context().emax(), 99);
        assert_eq!(config.internal_context().emin(), -99);
    }

    #[test]
    fn test_precision_bounds() {
        let config = CalculatorConfig {
            display_precision: 11,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::DisplayPrecision(11)));

        let config = CalculatorConfig {
            display_precision: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::DisplayPrecision(0)));

        let config = CalculatorConfig {
            internal_precision: 8,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InternalPrecision(8)));

        let config = CalculatorConfig {
            internal_precision: 61,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InternalPrecision(61)));
    }

    #[test]
    fn test_exponent_limit_bounds() {
        let config = CalculatorConfig {
            exponent_limit: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ExponentLimit(0)));

        let config = CalculatorConfig {
            exponent_limit: 100,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ExponentLimit(100)));
    }

    #[test]
    fn test_rounding_mode_maps_to_context() {
        let config = CalculatorConfig {
            rounding: RoundingMode::HalfUp,
            ..Default::default()
        };
        assert_eq!(config.internal_context().rounding(), Rounding::HalfUp);
        assert_eq!(Rounding::from(RoundingMode::Down), Rounding::Down);
    }
}
