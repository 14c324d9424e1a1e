//! Application-level configuration constants.

use crate::range::SearchRange;

// Search defaults
pub const DEFAULT_SPUR_RANGE: SearchRange = SearchRange { min: 80, max: 116 };
pub const DEFAULT_PINION_RANGE: SearchRange = SearchRange { min: 30, max: 50 };
pub const DEFAULT_SPUR_SPREAD: u32 = 10;
pub const DEFAULT_PINION_SPREAD: u32 = 6;
pub const MAX_SUGGESTIONS: usize = 5;

// Precision (fractional digits)
pub const RATIO_DIGITS: u32 = 3;
pub const RPM_DIGITS: u32 = 3;
pub const MOTOR_PRESET_DIGITS: u32 = 0;
pub const MACHINE_PRESET_DIGITS: u32 = 3;

// Output fields
pub const PLACEHOLDER: &str = "--";

// Persisted preset slots
pub const MACHINE_STORAGE_KEY: &str = "rc-gear-ratio:machines";
pub const MOTOR_STORAGE_KEY: &str = "rc-gear-ratio:motors";
