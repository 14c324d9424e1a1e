use rc_gear_ratio::config::{DEFAULT_PINION_RANGE, DEFAULT_SPUR_RANGE, MAX_SUGGESTIONS};
use rc_gear_ratio::{
    enumerate_gear_combinations, resolve_search_ranges, suggest_gears, RangeRequest, SearchMode,
    SearchRange, SuggestRequest, SuggestionError, SuggestionFailure,
};
use rstest::rstest;

const TRF420_FINAL: f64 = 1.85;

fn form() -> SuggestRequest {
    SuggestRequest {
        motor_rpm: Some(21000.0),
        tire_rpm: Some(3000.0),
        final_ratio: Some(2.58),
        spur: Some(80.0),
        pinion: Some(32.0),
        spur_min: Some(DEFAULT_SPUR_RANGE.min as f64),
        spur_max: Some(DEFAULT_SPUR_RANGE.max as f64),
        pinion_min: Some(DEFAULT_PINION_RANGE.min as f64),
        pinion_max: Some(DEFAULT_PINION_RANGE.max as f64),
        mode: SearchMode::Free,
    }
}

// --- COMBINATION SEARCH ---

#[test]
fn test_exact_pinion_is_found_first() {
    let target = (80.0 / 32.0) * 2.58;
    let found = enumerate_gear_combinations(
        target,
        2.58,
        SearchRange::new(80, 80),
        SearchRange::new(30, 34),
        MAX_SUGGESTIONS,
    );
    assert_eq!(found[0].spur, 80);
    assert_eq!(found[0].pinion, 32);
    assert_eq!(found[0].diff, 0.0);
    // 80/33 is closer to 80/32 than 80/31 is.
    assert_eq!(found[1].pinion, 33);
}

#[test]
fn test_full_default_grid_is_searched() {
    let found = enumerate_gear_combinations(
        7.0,
        TRF420_FINAL,
        DEFAULT_SPUR_RANGE,
        DEFAULT_PINION_RANGE,
        usize::MAX,
    );
    assert_eq!(found.len(), (37 * 21) as usize);
}

#[test]
fn test_search_is_deterministic() {
    let run = || {
        enumerate_gear_combinations(
            6.9,
            TRF420_FINAL,
            DEFAULT_SPUR_RANGE,
            DEFAULT_PINION_RANGE,
            MAX_SUGGESTIONS,
        )
    };
    assert_eq!(run(), run());
}

// --- RANGE RESOLVER ---

#[rstest]
#[case(SearchMode::Free, SearchRange::new(78, 98), SearchRange::new(26, 38))]
#[case(SearchMode::LockSpur, SearchRange::fixed(88), SearchRange::new(26, 38))]
#[case(SearchMode::LockPinion, SearchRange::new(78, 98), SearchRange::fixed(32))]
fn test_mode_shapes_ranges(
    #[case] mode: SearchMode,
    #[case] spur: SearchRange,
    #[case] pinion: SearchRange,
) {
    let resolved = resolve_search_ranges(&RangeRequest {
        current_spur: Some(88.0),
        current_pinion: Some(32.0),
        mode,
        ..Default::default()
    });
    assert_eq!(resolved, (spur, pinion));
}

#[rstest]
#[case(Some(100.0), Some(120.0), SearchRange::new(100, 120))]
#[case(Some(0.0), None, SearchRange::new(1, 98))]
#[case(Some(95.7), Some(90.0), SearchRange::new(95, 105))]
#[case(None, Some(60.0), SearchRange::new(78, 88))]
fn test_spur_overrides(
    #[case] min: Option<f64>,
    #[case] max: Option<f64>,
    #[case] expected: SearchRange,
) {
    let (spur, _) = resolve_search_ranges(&RangeRequest {
        current_spur: Some(88.0),
        spur_min: min,
        spur_max: max,
        ..Default::default()
    });
    assert_eq!(spur, expected);
}

// --- SUGGESTION WORKFLOW ---

#[rstest]
#[case::no_motor(SuggestRequest { motor_rpm: None, ..form() }, SuggestionError::MissingRpm)]
#[case::zero_tire(SuggestRequest { tire_rpm: Some(0.0), ..form() }, SuggestionError::MissingRpm)]
#[case::no_final(SuggestRequest { final_ratio: None, ..form() }, SuggestionError::MissingFinalRatio)]
#[case::lock_spur(
    SuggestRequest { spur: None, mode: SearchMode::LockSpur, ..form() },
    SuggestionError::LockedSpurMissing
)]
#[case::lock_pinion(
    SuggestRequest { pinion: Some(-3.0), mode: SearchMode::LockPinion, ..form() },
    SuggestionError::LockedPinionMissing
)]
fn test_withheld_searches(#[case] request: SuggestRequest, #[case] expected: SuggestionError) {
    assert_eq!(suggest_gears(&request).unwrap_err(), expected);
}

#[test]
fn test_missing_spur_is_fine_in_free_mode() {
    let request = SuggestRequest {
        spur: None,
        ..form()
    };
    assert!(suggest_gears(&request).is_ok());
}

#[test]
fn test_suggestions_use_override_ranges() {
    let found = suggest_gears(&form()).unwrap();
    assert_eq!(found.spur_range, DEFAULT_SPUR_RANGE);
    assert_eq!(found.pinion_range, DEFAULT_PINION_RANGE);
    assert_eq!(found.target_ratio, 7.0);
    assert_eq!(found.suggestions.len(), MAX_SUGGESTIONS);

    let best = found.best().unwrap();
    let again = enumerate_gear_combinations(
        7.0,
        2.58,
        DEFAULT_SPUR_RANGE,
        DEFAULT_PINION_RANGE,
        1,
    );
    assert_eq!(best.candidate, again[0]);
    let predicted = best.predicted_tire_rpm.unwrap();
    assert!((predicted - 21000.0 / best.candidate.ratio).abs() < 5e-4);
}

#[test]
fn test_error_messages_are_user_facing() {
    assert_eq!(
        SuggestionError::LockedSpurMissing.to_string(),
        "Spur lock mode needs the spur tooth count."
    );
    assert!(!SuggestionError::NoCombinations.is_lock_mode_error());
}

#[rstest]
#[case(SuggestionError::LockedSpurMissing, true)]
#[case(SuggestionError::LockedPinionMissing, true)]
#[case(SuggestionError::MissingRpm, false)]
#[case(SuggestionError::NoCombinations, false)]
fn test_failure_report_flags_lock_mode(#[case] error: SuggestionError, #[case] lock_mode: bool) {
    let failure = SuggestionFailure::from(&error);
    assert_eq!(failure.message, error.to_string());
    assert_eq!(failure.lock_mode, lock_mode);

    let json = serde_json::to_value(&failure).unwrap();
    assert_eq!(json["lockMode"], lock_mode);
    assert_eq!(json["message"], error.to_string());
}
