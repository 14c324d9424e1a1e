//! JavaScript surface for the page that renders the calculator.
//!
//! Structured values cross the boundary through `serde-wasm-bindgen` with
//! the JSON-compatible serializer, so the page sees plain objects.

use crate::error::SuggestionFailure;
use crate::preset::{BrowserSlot, Machine, Motor, Preset, PresetKind, PresetPatch, PresetStore};
use crate::ratio::{self, CalculatorInputs, RpmSource};
use crate::suggest::{self, SuggestRequest};
use crate::utils;
use log::warn;
use serde::Serialize;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use yew::Callback;

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(Into::into)
}

/// Presets in their persisted record shape (`finalRatio` / `rpm`).
fn records_to_js<K: PresetKind>(presets: &[Preset]) -> Result<JsValue, JsValue> {
    let records: Vec<serde_json::Value> = presets.iter().map(|p| p.to_record::<K>()).collect();
    to_js(&records)
}

#[wasm_bindgen(start)]
pub fn start() {
    // Log detailed panics to the browser console
    console_error_panic_hook::set_once();
}

#[wasm_bindgen(js_name = gearRatio)]
pub fn gear_ratio(spur: Option<f64>, pinion: Option<f64>, final_ratio: Option<f64>) -> Option<f64> {
    ratio::gear_ratio(spur, pinion, final_ratio)
}

#[wasm_bindgen(js_name = targetGearRatio)]
pub fn target_gear_ratio(motor_rpm: Option<f64>, tire_rpm: Option<f64>) -> Option<f64> {
    ratio::target_gear_ratio(motor_rpm, tire_rpm)
}

#[wasm_bindgen(js_name = resultingTireRpm)]
pub fn resulting_tire_rpm(motor_rpm: Option<f64>, gear_ratio: Option<f64>) -> Option<f64> {
    ratio::resulting_tire_rpm(motor_rpm, gear_ratio)
}

#[wasm_bindgen(js_name = rolloutMm)]
pub fn rollout_mm(tire_diameter_mm: Option<f64>, gear_ratio: Option<f64>) -> Option<f64> {
    ratio::rollout_mm(tire_diameter_mm, gear_ratio)
}

#[wasm_bindgen(js_name = parseInputNumber)]
pub fn parse_input_number(raw: &str) -> Option<f64> {
    utils::parse_input_number(raw)
}

/// Fixed decimals, or the placeholder for a missing value.
#[wasm_bindgen(js_name = formatOutput)]
pub fn format_output(value: Option<f64>, digits: u32) -> String {
    utils::format_output(value, digits)
}

/// `source` is `"motor"`, `"tire"` or absent.
#[wasm_bindgen(js_name = syncRpm)]
pub fn sync_rpm(inputs: JsValue, source: Option<String>) -> Result<JsValue, JsValue> {
    let inputs: CalculatorInputs = serde_wasm_bindgen::from_value(inputs)?;
    let source = match source.as_deref() {
        Some("motor") => Some(RpmSource::Motor),
        Some("tire") => Some(RpmSource::Tire),
        _ => None,
    };
    to_js(&ratio::sync_rpm(&inputs, source))
}

/// Returns the suggestion result, or throws `{ message, lockMode }`.
#[wasm_bindgen(js_name = suggestGears)]
pub fn suggest_gears(request: JsValue) -> Result<JsValue, JsValue> {
    let request: SuggestRequest = serde_wasm_bindgen::from_value(request)?;
    match suggest::suggest_gears(&request) {
        Ok(found) => to_js(&found),
        Err(e) => Err(to_js(&SuggestionFailure::from(&e))?),
    }
}

macro_rules! preset_catalog {
    ($name:ident, $kind:ty) => {
        /// Preset catalog persisted in `localStorage`.
        ///
        /// Methods borrow the catalog shared, so a subscriber may call back
        /// into it while it is being notified.
        #[wasm_bindgen]
        pub struct $name {
            store: PresetStore<$kind, BrowserSlot>,
        }

        #[wasm_bindgen]
        impl $name {
            #[wasm_bindgen(constructor)]
            pub fn new() -> Result<$name, JsValue> {
                let slot = BrowserSlot::local().map_err(|e| JsValue::from_str(&e.to_string()))?;
                Ok(Self {
                    store: PresetStore::load(slot),
                })
            }

            pub fn list(&self) -> Result<JsValue, JsValue> {
                records_to_js::<$kind>(&self.store.list())
            }

            /// The preset record, or `null`.
            #[wasm_bindgen(js_name = getById)]
            pub fn get_by_id(&self, id: &str) -> Result<JsValue, JsValue> {
                match self.store.get_by_id(id) {
                    Some(preset) => to_js(&preset.to_record::<$kind>()),
                    None => Ok(JsValue::NULL),
                }
            }

            pub fn add(&self, name: &str, value: f64) -> bool {
                self.store.add(name, value)
            }

            pub fn remove(&self, id: &str) -> bool {
                self.store.remove(id)
            }

            /// `patch` is `{ name?, value? }`.
            pub fn update(&self, id: &str, patch: JsValue) -> Result<bool, JsValue> {
                let patch: PresetPatch = serde_wasm_bindgen::from_value(patch)?;
                Ok(self.store.update(id, patch))
            }

            /// Returns an id for `unsubscribe`.
            pub fn subscribe(&self, callback: js_sys::Function) -> u32 {
                let listener = Callback::from(move |presets: Rc<Vec<Preset>>| {
                    let result = records_to_js::<$kind>(&presets)
                        .and_then(|list| callback.call1(&JsValue::NULL, &list));
                    if let Err(e) = result {
                        warn!("Preset subscriber failed: {:?}", e);
                    }
                });
                self.store.subscribe(listener).id()
            }

            pub fn unsubscribe(&self, id: u32) {
                self.store.unsubscribe(id.into());
            }
        }
    };
}

preset_catalog!(MachineCatalog, Machine);
preset_catalog!(MotorCatalog, Motor);
