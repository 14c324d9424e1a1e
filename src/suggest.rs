//! The "find gearing" workflow: validate the form snapshot, derive the
//! target ratio, resolve ranges and run the combination search.

use crate::config::{MAX_SUGGESTIONS, RPM_DIGITS};
use crate::error::SuggestionError;
use crate::range::{resolve_search_ranges, RangeRequest, SearchMode, SearchRange};
use crate::ratio::{apply_precision, resulting_tire_rpm, target_gear_ratio};
use crate::search::{enumerate_gear_combinations, Candidate};
use crate::utils::{is_positive, positive};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Snapshot of the form fields the search reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestRequest {
    pub motor_rpm: Option<f64>,
    pub tire_rpm: Option<f64>,
    pub final_ratio: Option<f64>,
    pub spur: Option<f64>,
    pub pinion: Option<f64>,
    pub spur_min: Option<f64>,
    pub spur_max: Option<f64>,
    pub pinion_min: Option<f64>,
    pub pinion_max: Option<f64>,
    pub mode: SearchMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub predicted_tire_rpm: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GearSuggestions {
    pub target_ratio: f64,
    pub spur_range: SearchRange,
    pub pinion_range: SearchRange,
    pub suggestions: Vec<Suggestion>,
}

impl GearSuggestions {
    pub fn best(&self) -> Option<&Suggestion> {
        self.suggestions.first()
    }
}

/// Reject a lock mode whose pinned field is empty or not positive.
pub fn validate_lock_mode(
    mode: SearchMode,
    spur: Option<f64>,
    pinion: Option<f64>,
) -> Result<(), SuggestionError> {
    match mode {
        SearchMode::LockSpur if !is_positive(spur) => Err(SuggestionError::LockedSpurMissing),
        SearchMode::LockPinion if !is_positive(pinion) => {
            Err(SuggestionError::LockedPinionMissing)
        }
        _ => Ok(()),
    }
}

/// Run the suggestion search for one form snapshot.
pub fn suggest_gears(request: &SuggestRequest) -> Result<GearSuggestions, SuggestionError> {
    let (Some(motor_rpm), Some(_)) = (positive(request.motor_rpm), positive(request.tire_rpm))
    else {
        return Err(SuggestionError::MissingRpm);
    };
    let final_ratio = positive(request.final_ratio).ok_or(SuggestionError::MissingFinalRatio)?;
    validate_lock_mode(request.mode, request.spur, request.pinion)?;

    let target_ratio = target_gear_ratio(request.motor_rpm, request.tire_rpm)
        .ok_or(SuggestionError::InvalidTargetRatio)?;

    let (spur_range, pinion_range) = resolve_search_ranges(&RangeRequest {
        current_spur: request.spur,
        current_pinion: request.pinion,
        spur_min: request.spur_min,
        spur_max: request.spur_max,
        pinion_min: request.pinion_min,
        pinion_max: request.pinion_max,
        mode: request.mode,
    });

    let candidates = enumerate_gear_combinations(
        target_ratio,
        final_ratio,
        spur_range,
        pinion_range,
        MAX_SUGGESTIONS,
    );
    if candidates.is_empty() {
        debug!("Search produced no candidates");
        return Err(SuggestionError::NoCombinations);
    }

    let suggestions: Vec<Suggestion> = candidates
        .into_iter()
        .map(|candidate| Suggestion {
            candidate,
            predicted_tire_rpm: resulting_tire_rpm(Some(motor_rpm), Some(candidate.ratio))
                .and_then(|rpm| apply_precision(rpm, RPM_DIGITS)),
        })
        .collect();

    info!(
        "Found {} suggestions for target ratio {:.3}",
        suggestions.len(),
        target_ratio
    );

    Ok(GearSuggestions {
        target_ratio,
        spur_range,
        pinion_range,
        suggestions,
    })
}
