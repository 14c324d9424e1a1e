//! RC car gearing calculator.
//!
//! Converts spur/pinion tooth counts and a final-drive ratio into an overall
//! gear ratio, keeps motor and tire RPM in step, and searches nearby
//! tooth-count combinations for a target ratio. Machine and motor presets
//! are kept in browser storage.
//!
//! The page itself is rendered in JavaScript; it talks to this crate through
//! the exports in [`bindings`].

pub mod bindings;
pub mod config;
pub mod error;
pub mod preset;
pub mod range;
pub mod ratio;
pub mod search;
pub mod suggest;
pub mod utils;

pub use error::{StorageError, SuggestionError, SuggestionFailure};
pub use preset::{Machine, Motor, Preset, PresetPatch, PresetStore, Subscription};
pub use range::{resolve_search_ranges, RangeRequest, SearchMode, SearchRange};
pub use ratio::{
    apply_precision, gear_ratio, resulting_tire_rpm, rollout_mm, sync_rpm, target_gear_ratio,
    CalculatorInputs, CalculatorOutputs, RpmFill, RpmSource,
};
pub use search::{enumerate_gear_combinations, Candidate};
pub use suggest::{suggest_gears, validate_lock_mode, GearSuggestions, SuggestRequest, Suggestion};

/// Machine catalog over any slot.
pub type MachineStore<S> = PresetStore<Machine, S>;
/// Motor catalog over any slot.
pub type MotorStore<S> = PresetStore<Motor, S>;
