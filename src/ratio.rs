//! Gear ratio and RPM arithmetic.
//!
//! Every function here is pure. Arithmetic runs at full `f64` precision and
//! values are only rounded with [`apply_precision`] at the display/storage
//! boundary.

use crate::config::RPM_DIGITS;
use crate::utils::{is_positive, positive};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// `(spur / pinion) * final_ratio`, or `None` unless all three are present
/// and positive.
pub fn gear_ratio(spur: Option<f64>, pinion: Option<f64>, final_ratio: Option<f64>) -> Option<f64> {
    let spur = positive(spur)?;
    let pinion = positive(pinion)?;
    let final_ratio = positive(final_ratio)?;
    Some((spur / pinion) * final_ratio)
}

/// Gear ratio needed to turn `motor_rpm` into `tire_rpm`.
pub fn target_gear_ratio(motor_rpm: Option<f64>, tire_rpm: Option<f64>) -> Option<f64> {
    let motor = motor_rpm.filter(|v| v.is_finite())?;
    let tire = tire_rpm.filter(|v| v.is_finite())?;
    if tire == 0.0 {
        return None;
    }
    let ratio = motor / tire;
    (ratio > 0.0).then_some(ratio)
}

/// Tire RPM produced by `motor_rpm` through `gear_ratio`.
pub fn resulting_tire_rpm(motor_rpm: Option<f64>, gear_ratio: Option<f64>) -> Option<f64> {
    let motor = motor_rpm?;
    let ratio = positive(gear_ratio)?;
    Some(motor / ratio)
}

/// Distance travelled per motor revolution, in the unit of the diameter.
pub fn rollout_mm(tire_diameter_mm: Option<f64>, gear_ratio: Option<f64>) -> Option<f64> {
    let diameter = positive(tire_diameter_mm)?;
    let ratio = positive(gear_ratio)?;
    Some(PI * diameter / ratio)
}

// Past 2^53 every f64 is already an integer, so scaling cannot add digits.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Round to `digits` fractional digits, half away from zero.
///
/// Rounding is applied to the scaled binary value, so a decimal tie that
/// `f64` stores just below the half (`1.0005`) still rounds up. Values too
/// large to carry fractional digits are returned unchanged.
pub fn apply_precision(value: f64, digits: u32) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    let scale = 10f64.powi(digits as i32);
    let scaled = value * scale;
    if !scaled.is_finite() || scaled.abs() >= EXACT_INTEGER_LIMIT {
        return Some(value);
    }
    Some(scaled.round() / scale)
}

/// Which RPM field the user just edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RpmSource {
    Motor,
    Tire,
}

/// Snapshot of the calculator form's numeric fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculatorInputs {
    pub spur: Option<f64>,
    pub pinion: Option<f64>,
    pub final_ratio: Option<f64>,
    pub motor_rpm: Option<f64>,
    pub tire_rpm: Option<f64>,
}

/// A value to write back into an empty companion RPM field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "field", content = "value")]
pub enum RpmFill {
    Motor(f64),
    Tire(f64),
}

/// Outputs kept in sync with the form. `None` renders as the placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorOutputs {
    pub spur_pinion: Option<f64>,
    pub gear_ratio: Option<f64>,
    pub motor_rpm: Option<f64>,
    pub tire_rpm: Option<f64>,
    pub fill: Option<RpmFill>,
}

/// Recompute the outputs after an input change.
///
/// With `source` set, the edited field drives the other one. Without it, a
/// present motor RPM wins over a present tire RPM. The companion field is
/// only filled in when it is empty.
pub fn sync_rpm(inputs: &CalculatorInputs, source: Option<RpmSource>) -> CalculatorOutputs {
    if !(is_positive(inputs.spur) && is_positive(inputs.pinion) && is_positive(inputs.final_ratio)) {
        return CalculatorOutputs::default();
    }
    let Some(ratio) = gear_ratio(inputs.spur, inputs.pinion, inputs.final_ratio) else {
        return CalculatorOutputs::default();
    };

    let round = |v: f64| apply_precision(v, RPM_DIGITS);
    let mut out = CalculatorOutputs {
        spur_pinion: inputs.spur.zip(inputs.pinion).map(|(s, p)| s / p),
        gear_ratio: Some(ratio),
        ..Default::default()
    };

    let motor_driven = match source {
        Some(RpmSource::Motor) => true,
        Some(RpmSource::Tire) => false,
        None => inputs.motor_rpm.is_some(),
    };
    let tire_driven = match source {
        Some(RpmSource::Tire) => true,
        Some(RpmSource::Motor) => false,
        None => inputs.tire_rpm.is_some(),
    };

    if motor_driven {
        let tire = round(inputs.motor_rpm.unwrap_or(0.0) / ratio);
        out.motor_rpm = inputs.motor_rpm.and_then(round);
        out.tire_rpm = tire;
        if inputs.tire_rpm.is_none() {
            out.fill = tire.map(RpmFill::Tire);
        }
    } else if tire_driven {
        let motor = round(inputs.tire_rpm.unwrap_or(0.0) * ratio);
        out.motor_rpm = motor;
        out.tire_rpm = inputs.tire_rpm.and_then(round);
        if inputs.motor_rpm.is_none() {
            out.fill = motor.map(RpmFill::Motor);
        }
    } else {
        out.motor_rpm = inputs.motor_rpm.and_then(round);
        out.tire_rpm = inputs.tire_rpm.and_then(round);
    }
    out
}
