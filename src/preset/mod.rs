//! Named machine and motor presets.
//!
//! A machine preset carries a final-drive ratio, a motor preset a no-load
//! RPM. Both share one record shape and one store; the differences (storage
//! key, precision, seed entries, persisted field name) live in
//! [`PresetKind`].

pub mod storage;
mod store;

pub use storage::{BrowserSlot, MemorySlot, PresetSlot};
pub use store::{PresetStore, Subscription};

use crate::config::{
    MACHINE_PRESET_DIGITS, MACHINE_STORAGE_KEY, MOTOR_PRESET_DIGITS, MOTOR_STORAGE_KEY,
};
use crate::ratio::apply_precision;
use crate::utils::parse_input_number;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    /// Final ratio for machines, RPM for motors.
    pub value: f64,
}

/// Partial update for [`PresetStore::update`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PresetPatch {
    pub name: Option<String>,
    pub value: Option<f64>,
}

impl Preset {
    /// `{ id, name, <K::VALUE_FIELD> }`, the shape persisted to storage and
    /// handed to the page.
    pub fn to_record<K: PresetKind>(&self) -> serde_json::Value {
        let mut record = serde_json::Map::new();
        record.insert("id".to_string(), self.id.clone().into());
        record.insert("name".to_string(), self.name.clone().into());
        record.insert(K::VALUE_FIELD.to_string(), self.value.into());
        serde_json::Value::Object(record)
    }
}

impl PresetPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: None,
        }
    }

    pub fn value(value: f64) -> Self {
        Self {
            name: None,
            value: Some(value),
        }
    }
}

/// Per-catalog settings.
pub trait PresetKind {
    /// Used in logs and as the generated id prefix.
    const LABEL: &'static str;
    const STORAGE_KEY: &'static str;
    /// JSON field holding the numeric value in the persisted records.
    const VALUE_FIELD: &'static str;
    const PRECISION_DIGITS: u32;

    /// Built-in entries that are always present.
    fn seeds() -> Vec<Preset>;

    fn is_seed(id: &str) -> bool {
        Self::seeds().iter().any(|seed| seed.id == id)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Machine;

#[derive(Debug, Clone, Copy)]
pub struct Motor;

impl PresetKind for Machine {
    const LABEL: &'static str = "machine";
    const STORAGE_KEY: &'static str = MACHINE_STORAGE_KEY;
    const VALUE_FIELD: &'static str = "finalRatio";
    const PRECISION_DIGITS: u32 = MACHINE_PRESET_DIGITS;

    fn seeds() -> Vec<Preset> {
        vec![Preset {
            id: "default-trf420".to_string(),
            name: "TRF420".to_string(),
            value: 1.85,
        }]
    }
}

impl PresetKind for Motor {
    const LABEL: &'static str = "motor";
    const STORAGE_KEY: &'static str = MOTOR_STORAGE_KEY;
    const VALUE_FIELD: &'static str = "rpm";
    const PRECISION_DIGITS: u32 = MOTOR_PRESET_DIGITS;

    fn seeds() -> Vec<Preset> {
        vec![Preset {
            id: "default-xerun17.5t-21000".to_string(),
            name: "XeRun XR10 17.5T".to_string(),
            value: 21000.0,
        }]
    }
}

/// Round to the kind's precision and require a positive result.
pub(crate) fn sanitize_value<K: PresetKind>(value: f64) -> Option<f64> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    apply_precision(value, K::PRECISION_DIGITS).filter(|v| *v > 0.0)
}

/// Trimmed, non-empty name.
pub(crate) fn sanitize_name(name: &str) -> Option<String> {
    let clean = name.trim();
    (!clean.is_empty()).then(|| clean.to_string())
}

/// Append any seed whose id is missing, keeping existing order.
pub(crate) fn ensure_seeds<K: PresetKind>(mut presets: Vec<Preset>) -> Vec<Preset> {
    for seed in K::seeds() {
        if !presets.iter().any(|p| p.id == seed.id) {
            debug!("Re-inserting seed {} '{}'", K::LABEL, seed.name);
            presets.push(seed);
        }
    }
    presets
}

/// A persisted record before validation. Fields are loose because the slot
/// may hold anything.
#[derive(Debug, Deserialize)]
pub(crate) struct StoredPreset {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "finalRatio", alias = "rpm")]
    value: Option<serde_json::Value>,
}

impl StoredPreset {
    fn numeric_value(&self) -> Option<f64> {
        match self.value.as_ref()? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => parse_input_number(s),
            _ => None,
        }
    }

    /// Validate into a [`Preset`]; entries without an id get one from `new_id`.
    pub(crate) fn into_preset<K: PresetKind>(
        self,
        new_id: impl FnOnce() -> String,
    ) -> Option<Preset> {
        let value = sanitize_value::<K>(self.numeric_value()?)?;
        let name = sanitize_name(self.name.as_deref()?)?;
        let id = self.id.filter(|id| !id.is_empty()).unwrap_or_else(new_id);
        Some(Preset { id, name, value })
    }
}
