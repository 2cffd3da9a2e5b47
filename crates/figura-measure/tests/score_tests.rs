use figura_measure::score::score_breakdown;
use figura_measure::{
    score, ContrastShaping, Direction, Proportion, ReferenceRange, ScoringConfig,
};

fn shaped() -> ScoringConfig {
    ScoringConfig {
        shaping: Some(ContrastShaping {
            floor: 15.0,
            steepness: 2.0,
        }),
        ..ScoringConfig::default()
    }
}

/// Proportions on a 0.05 grid over the simplex.
fn simplex_grid() -> Vec<Proportion> {
    let mut grid = Vec::new();
    for h in 0..=20 {
        for t in 0..=(20 - h) {
            let head = h as f32 * 0.05;
            let torso = t as f32 * 0.05;
            grid.push(Proportion::new(head, torso, (1.0 - head - torso).max(0.0)));
        }
    }
    grid
}

#[test]
fn test_reference_example_scores() {
    let config = ScoringConfig::default();
    let breakdown = score_breakdown(&Proportion::new(0.12, 0.18, 0.70), &config);

    assert!((breakdown.sub_scores[0] - 100.0).abs() < 1e-3);
    assert!((breakdown.sub_scores[1] - 100.0).abs() < 1e-3);
    assert!((breakdown.sub_scores[2] - 83.333).abs() < 1e-2);
    assert!((breakdown.score - 92.667).abs() < 1e-2);
}

#[test]
fn test_worst_case_scores_zero_or_floor() {
    let worst = Proportion::new(0.36, 0.46, 0.30);
    assert!(score(&worst, &ScoringConfig::default()).abs() < 1e-3);
    assert!((score(&worst, &shaped()) - 15.0).abs() < 1e-3);
}

#[test]
fn test_scores_stay_in_bounds_over_grid() {
    let plain = ScoringConfig::default();
    let shaped = shaped();
    for p in simplex_grid() {
        let s = score(&p, &plain);
        assert!(!s.is_nan(), "NaN score for {:?}", p);
        assert!((0.0..=100.0).contains(&s), "{} out of range for {:?}", s, p);

        let s = score(&p, &shaped);
        assert!((15.0..=100.0).contains(&s), "{} below floor for {:?}", s, p);
    }
}

#[test]
fn test_scoring_is_deterministic() {
    let config = shaped();
    for p in simplex_grid() {
        assert_eq!(score(&p, &config), score(&p, &config));
    }
}

#[test]
fn test_sub_scores_are_monotone() {
    let larger = ReferenceRange::new(0.30, 0.78, Direction::LargerIsBetter, 1.0);
    let smaller = ReferenceRange::new(0.12, 0.36, Direction::SmallerIsBetter, 1.0);

    let mut prev_larger = larger.sub_score(0.0);
    let mut prev_smaller = smaller.sub_score(0.0);
    for i in 1..=100 {
        let value = i as f32 * 0.01;
        let l = larger.sub_score(value);
        let s = smaller.sub_score(value);
        assert!(l >= prev_larger, "larger-is-better dropped at {}", value);
        assert!(s <= prev_smaller, "smaller-is-better rose at {}", value);
        prev_larger = l;
        prev_smaller = s;
    }
}

#[test]
fn test_longer_leg_never_lowers_score() {
    // shrink torso into leg with head fixed
    let config = shaped();
    let mut prev = f32::NEG_INFINITY;
    for i in 0..=40 {
        let leg = 0.30 + i as f32 * 0.01;
        let s = score(&Proportion::new(0.20, 0.80 - leg, leg), &config);
        assert!(s >= prev, "score dropped at leg {}", leg);
        prev = s;
    }
}

#[test]
fn test_non_finite_proportion_does_not_produce_nan() {
    let config = ScoringConfig::default();
    let s = score(&Proportion::new(f32::NAN, 0.2, f32::INFINITY), &config);
    assert!(!s.is_nan());
    assert!((0.0..=100.0).contains(&s));
}

#[test]
fn test_shaping_is_monotone_and_bounded() {
    let shaping = ContrastShaping {
        floor: 15.0,
        steepness: 2.0,
    };
    let mut prev = shaping.apply(0.0);
    for i in 1..=100 {
        let v = shaping.apply(i as f32);
        assert!(v >= prev);
        assert!(v <= 100.0 + 1e-4);
        prev = v;
    }
}
