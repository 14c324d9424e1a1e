//! Search bounds for the gear suggestion search.

use crate::config::{
    DEFAULT_PINION_RANGE, DEFAULT_PINION_SPREAD, DEFAULT_SPUR_RANGE, DEFAULT_SPUR_SPREAD,
};
use crate::utils::positive;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Inclusive tooth-count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRange {
    pub min: u32,
    pub max: u32,
}

impl SearchRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Single tooth count, as produced by a lock mode.
    pub const fn fixed(value: u32) -> Self {
        Self { min: value, max: value }
    }

    pub fn is_locked(&self) -> bool {
        self.min == self.max
    }
}

/// Which dimension, if any, is pinned to the current form value.
///
/// Deserializes from the `<select>` value, so an unknown value means free.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    #[default]
    Free,
    LockSpur,
    LockPinion,
}

impl SearchMode {
    /// Map a `<select>` value, falling back to [`SearchMode::Free`].
    pub fn from_select_value(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            debug!("Unknown search mode '{}', using free", value);
            SearchMode::Free
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Free => "free",
            SearchMode::LockSpur => "lock-spur",
            SearchMode::LockPinion => "lock-pinion",
        }
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "free" | "" => Ok(SearchMode::Free),
            "lock-spur" => Ok(SearchMode::LockSpur),
            "lock-pinion" => Ok(SearchMode::LockPinion),
            other => Err(format!("unknown search mode '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for SearchMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(SearchMode::from_select_value(&value))
    }
}

/// Inputs of [`resolve_search_ranges`]. Every field may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RangeRequest {
    pub current_spur: Option<f64>,
    pub current_pinion: Option<f64>,
    pub spur_min: Option<f64>,
    pub spur_max: Option<f64>,
    pub pinion_min: Option<f64>,
    pub pinion_max: Option<f64>,
    pub mode: SearchMode,
}

/// Default bounds around `current`, or `fallback` when there is no current value.
fn centered_range(current: Option<f64>, spread: u32, fallback: SearchRange) -> SearchRange {
    match current.filter(|v| v.is_finite()) {
        Some(value) => {
            let spread = spread as f64;
            SearchRange {
                min: to_tooth_count((value - spread).floor()),
                max: to_tooth_count((value + spread).floor()),
            }
        }
        None => fallback,
    }
}

/// Clamp into `1..=u32::MAX`; callers have already dropped non-finite values.
fn to_tooth_count(value: f64) -> u32 {
    value.max(1.0).min(u32::MAX as f64) as u32
}

fn override_bound(value: Option<f64>) -> Option<u32> {
    value
        .filter(|v| v.is_finite())
        .map(|v| to_tooth_count(v.floor()))
}

fn resolve_one(
    current: Option<f64>,
    min_override: Option<f64>,
    max_override: Option<f64>,
    locked: bool,
    spread: u32,
    fallback: SearchRange,
) -> SearchRange {
    let mut range = centered_range(current, spread, fallback);
    if let Some(min) = override_bound(min_override) {
        range.min = min;
    }
    if let Some(max) = override_bound(max_override) {
        range.max = max;
    }

    if locked {
        if let Some(value) = positive(current) {
            return SearchRange::fixed(to_tooth_count(value.round()));
        }
    }

    if range.max < range.min {
        debug!(
            "Inverted range [{}, {}], widening by {}",
            range.min, range.max, spread
        );
        range.max = range.min.saturating_add(spread);
    }
    range
}

/// Derive the spur and pinion search ranges from the form state.
///
/// Overrides replace the computed bounds, a lock mode collapses its
/// dimension onto the rounded current value, and an inverted range is
/// widened to `min + spread`.
pub fn resolve_search_ranges(request: &RangeRequest) -> (SearchRange, SearchRange) {
    let spur = resolve_one(
        request.current_spur,
        request.spur_min,
        request.spur_max,
        request.mode == SearchMode::LockSpur,
        DEFAULT_SPUR_SPREAD,
        DEFAULT_SPUR_RANGE,
    );
    let pinion = resolve_one(
        request.current_pinion,
        request.pinion_min,
        request.pinion_max,
        request.mode == SearchMode::LockPinion,
        DEFAULT_PINION_SPREAD,
        DEFAULT_PINION_RANGE,
    );
    debug!(
        "Resolved ranges ({}): spur [{}, {}], pinion [{}, {}]",
        request.mode.as_str(),
        spur.min,
        spur.max,
        pinion.min,
        pinion.max
    );
    (spur, pinion)
}
