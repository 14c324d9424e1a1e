//! Exhaustive spur/pinion combination search.

use crate::range::SearchRange;
use log::debug;
use serde::{Deserialize, Serialize};

// Upper bound on the up-front reservation; overridden ranges can be arbitrarily wide.
const MAX_PREALLOCATED: usize = 1 << 16;

/// One scored (spur, pinion) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub spur: u32,
    pub pinion: u32,
    pub ratio: f64,
    /// `|ratio - target|`
    pub diff: f64,
}

/// Enumerate every pair inside the two ranges and return the `max_results`
/// closest to `target_ratio`.
///
/// Pairs are visited spur-ascending, then pinion-ascending, and the sort is
/// stable, so among equal differences the first visited pair wins. Non-finite
/// inputs or a non-positive `final_ratio` give an empty result. Bounds below
/// one are raised to one and an inverted range is searched as its minimum
/// only.
pub fn enumerate_gear_combinations(
    target_ratio: f64,
    final_ratio: f64,
    spur_range: SearchRange,
    pinion_range: SearchRange,
    max_results: usize,
) -> Vec<Candidate> {
    if !target_ratio.is_finite() || !final_ratio.is_finite() || final_ratio <= 0.0 {
        return Vec::new();
    }

    let spur_min = spur_range.min.max(1);
    let spur_max = spur_range.max.max(spur_min);
    let pinion_min = pinion_range.min.max(1);
    let pinion_max = pinion_range.max.max(pinion_min);

    let capacity = ((spur_max - spur_min) as usize + 1)
        .saturating_mul((pinion_max - pinion_min) as usize + 1)
        .min(MAX_PREALLOCATED);
    let mut results = Vec::with_capacity(capacity);

    for spur in spur_min..=spur_max {
        for pinion in pinion_min..=pinion_max {
            let ratio = (spur as f64 / pinion as f64) * final_ratio;
            results.push(Candidate {
                spur,
                pinion,
                ratio,
                diff: (ratio - target_ratio).abs(),
            });
        }
    }

    debug!(
        "Scored {} combinations against target {:.3}",
        results.len(),
        target_ratio
    );

    // `sort_by` is stable: ties keep enumeration order.
    results.sort_by(|a, b| a.diff.total_cmp(&b.diff));
    results.truncate(max_results);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_comes_first() {
        let target = (80.0 / 32.0) * 2.58;
        let found = enumerate_gear_combinations(
            target,
            2.58,
            SearchRange::fixed(80),
            SearchRange::new(30, 34),
            5,
        );
        assert_eq!(found.len(), 5);
        assert_eq!(found[0].pinion, 32);
        assert_eq!(found[0].diff, 0.0);
    }

    #[test]
    fn ties_keep_enumeration_order() {
        // 80/40 and 90/45 (and 100/50) give the same ratio.
        let found = enumerate_gear_combinations(
            2.0,
            1.0,
            SearchRange::new(80, 100),
            SearchRange::new(40, 50),
            3,
        );
        let pairs: Vec<(u32, u32)> = found.iter().map(|c| (c.spur, c.pinion)).collect();
        assert_eq!(pairs, vec![(80, 40), (82, 41), (84, 42)]);
    }

    #[test]
    fn invalid_final_ratio_returns_nothing() {
        let r = SearchRange::new(80, 90);
        assert!(enumerate_gear_combinations(6.0, 0.0, r, r, 5).is_empty());
        assert!(enumerate_gear_combinations(6.0, -1.0, r, r, 5).is_empty());
        assert!(enumerate_gear_combinations(f64::NAN, 2.0, r, r, 5).is_empty());
        assert!(enumerate_gear_combinations(6.0, f64::INFINITY, r, r, 5).is_empty());
    }

    #[test]
    fn inverted_range_searches_its_minimum() {
        let found = enumerate_gear_combinations(
            6.0,
            2.0,
            SearchRange::new(90, 80),
            SearchRange::new(30, 30),
            10,
        );
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].spur, found[0].pinion), (90, 30));
    }

    #[test]
    fn zero_min_is_raised_to_one() {
        let found = enumerate_gear_combinations(
            1.0,
            1.0,
            SearchRange::new(0, 2),
            SearchRange::new(0, 1),
            10,
        );
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|c| c.spur >= 1 && c.pinion >= 1));
    }

    #[test]
    fn zero_max_results_is_empty() {
        let r = SearchRange::new(80, 90);
        assert!(enumerate_gear_combinations(6.0, 2.0, r, r, 0).is_empty());
    }
}
