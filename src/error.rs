use serde::Serialize;
use thiserror::Error;

/// Reasons the gear suggestion search was withheld.
///
/// The messages are user-facing; the Presentation Layer shows them verbatim
/// in place of the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestionError {
    #[error("Enter both the motor RPM and the tire RPM.")]
    MissingRpm,
    #[error("No final ratio is set. Select a machine or enter it directly.")]
    MissingFinalRatio,
    #[error("Spur lock mode needs the spur tooth count.")]
    LockedSpurMissing,
    #[error("Pinion lock mode needs the pinion tooth count.")]
    LockedPinionMissing,
    #[error("Cannot derive a gear ratio from the entered values. Check the numbers.")]
    InvalidTargetRatio,
    #[error("No spur/pinion combination matched. Adjust the ranges.")]
    NoCombinations,
}

impl SuggestionError {
    /// Lock-mode problems are also flagged next to the mode selector.
    pub fn is_lock_mode_error(&self) -> bool {
        matches!(
            self,
            SuggestionError::LockedSpurMissing | SuggestionError::LockedPinionMissing
        )
    }
}

/// A withheld search as the page receives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionFailure {
    pub message: String,
    /// Also flag the error next to the search mode selector.
    pub lock_mode: bool,
}

impl From<&SuggestionError> for SuggestionFailure {
    fn from(error: &SuggestionError) -> Self {
        Self {
            message: error.to_string(),
            lock_mode: error.is_lock_mode_error(),
        }
    }
}

/// Failures of the key-value slot behind the preset store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("storage access failed: {0}")]
    Access(String),
    #[error("failed to serialize presets: {0}")]
    Serialize(#[from] serde_json::Error),
}
