use crate::extract::{Proportion, Segment};
use serde::{Deserialize, Serialize};

/// Which end of a reference range is the good one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// `low` scores 100, `high` scores 0.
    SmallerIsBetter,
    /// `low` scores 0, `high` scores 100.
    LargerIsBetter,
}

/// Scoring bounds and weight for one segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub low: f32,
    pub high: f32,
    pub direction: Direction,
    pub weight: f32,
}

impl ReferenceRange {
    pub fn new(low: f32, high: f32, direction: Direction, weight: f32) -> Self {
        Self {
            low,
            high,
            direction,
            weight,
        }
    }

    /// Directional sub-score in [0, 100]. A zero-width range scores 50.
    pub fn sub_score(&self, value: f32) -> f32 {
        let span = self.high - self.low;
        if span == 0.0 {
            return 50.0;
        }
        let t = match self.direction {
            Direction::LargerIsBetter => (value - self.low) / span,
            Direction::SmallerIsBetter => (self.high - value) / span,
        };
        if t.is_nan() {
            return 0.0;
        }
        100.0 * t.clamp(0.0, 1.0)
    }
}

/// S-curve contrast plus a display floor applied after weighting.
///
/// Maps 0 to `floor`, 100 to 100 and 50 to the middle of `[floor, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrastShaping {
    pub floor: f32,
    /// tanh steepness; 0 keeps the weighted score linear.
    pub steepness: f32,
}

impl ContrastShaping {
    pub fn apply(&self, raw: f32) -> f32 {
        let centered = (raw.clamp(0.0, 100.0) / 50.0) - 1.0;
        let curved = if self.steepness > 0.0 && self.steepness.is_finite() {
            (self.steepness * centered).tanh() / self.steepness.tanh()
        } else {
            centered
        };
        let unit = ((curved + 1.0) / 2.0).clamp(0.0, 1.0);
        self.floor + (100.0 - self.floor) * unit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub head: ReferenceRange,
    pub torso: ReferenceRange,
    pub leg: ReferenceRange,
    pub shaping: Option<ContrastShaping>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            head: ReferenceRange::new(0.12, 0.36, Direction::SmallerIsBetter, 0.28),
            torso: ReferenceRange::new(0.18, 0.46, Direction::SmallerIsBetter, 0.28),
            leg: ReferenceRange::new(0.30, 0.78, Direction::LargerIsBetter, 0.44),
            shaping: None,
        }
    }
}

impl ScoringConfig {
    pub fn range(&self, segment: Segment) -> &ReferenceRange {
        match segment {
            Segment::Head => &self.head,
            Segment::Torso => &self.torso,
            Segment::Leg => &self.leg,
        }
    }

    /// Lowest score [`score`] can return.
    pub fn floor(&self) -> f32 {
        self.shaping.map(|s| s.floor).unwrap_or(0.0)
    }
}

/// Intermediate values of one scoring pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Head, torso, leg sub-scores.
    pub sub_scores: [f32; 3],
    /// Weighted average before shaping.
    pub weighted: f32,
    pub score: f32,
}

pub fn score_breakdown(proportion: &Proportion, config: &ScoringConfig) -> ScoreBreakdown {
    let mut sub_scores = [0.0; 3];
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for (i, segment) in Segment::ALL.iter().enumerate() {
        let range = config.range(*segment);
        sub_scores[i] = range.sub_score(proportion.get(*segment));
        if range.weight > 0.0 && range.weight.is_finite() {
            weighted_sum += sub_scores[i] * range.weight;
            weight_total += range.weight;
        }
    }

    let weighted = if weight_total > 0.0 {
        (weighted_sum / weight_total).clamp(0.0, 100.0)
    } else {
        50.0
    };

    let score = match &config.shaping {
        Some(shaping) => shaping.apply(weighted),
        None => weighted,
    };

    ScoreBreakdown {
        sub_scores,
        weighted,
        score: score.max(config.floor()).min(100.0),
    }
}

/// Map a proportion to a score in `[floor, 100]` (`[0, 100]` without shaping).
pub fn score(proportion: &Proportion, config: &ScoringConfig) -> f32 {
    score_breakdown(proportion, config).score
}
