use crate::error::FailureReason;
use crate::landmark::Side;
use crate::validate::{RequiredRole, ValidatedLandmarks};
use figura_base::{log, Vec2};
use serde::{Deserialize, Serialize};

/// How segment lengths are measured from the anchors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Euclidean distances between head top, shoulder, hip and foot midpoints.
    Anchor,
    /// Vertical differences only; ignores lateral sway of an upright subject.
    VerticalProjection,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub strategy: Strategy,
    /// Anchor strategy: how far past the head reference the shoulder->head
    /// vector is extended, per axis, to reach the crown.
    pub head_extension_x: f32,
    pub head_extension_y: f32,
    /// Vertical strategy: crown sits this fraction of the head-to-shoulder
    /// height above the topmost head point.
    pub vertical_head_extension: f32,
    /// Segment lengths summing to at most this many pixels are degenerate.
    pub degenerate_epsilon: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Anchor,
            head_extension_x: 0.25,
            head_extension_y: 0.90,
            vertical_head_extension: 0.30,
            degenerate_epsilon: 1e-6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Head,
    Torso,
    Leg,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Head, Segment::Torso, Segment::Leg];
}

/// Segment lengths in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SegmentLengths {
    pub head: f32,
    pub torso: f32,
    pub leg: f32,
}

impl SegmentLengths {
    pub fn total(&self) -> f32 {
        self.head + self.torso + self.leg
    }

    /// Scale to proportions summing to 1, `None` when the total is not above `epsilon`.
    pub fn normalize(&self, epsilon: f32) -> Option<Proportion> {
        let total = self.total();
        if !total.is_finite() || total <= epsilon {
            return None;
        }
        Some(Proportion {
            head: self.head / total,
            torso: self.torso / total,
            leg: self.leg / total,
        })
    }
}

/// Head, torso and leg share of total body length.
///
/// Produced by [`extract`] with components `>= 0` summing to 1. The scorer
/// accepts any finite values, so arbitrary proportions can be built for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Proportion {
    pub head: f32,
    pub torso: f32,
    pub leg: f32,
}

impl Proportion {
    pub fn new(head: f32, torso: f32, leg: f32) -> Self {
        Self { head, torso, leg }
    }

    pub fn get(&self, segment: Segment) -> f32 {
        match segment {
            Segment::Head => self.head,
            Segment::Torso => self.torso,
            Segment::Leg => self.leg,
        }
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.head, self.torso, self.leg]
    }

    pub fn is_normalized(&self, tolerance: f32) -> bool {
        self.to_array().iter().all(|v| *v >= 0.0)
            && (self.head + self.torso + self.leg - 1.0).abs() <= tolerance
    }
}

struct Anchors {
    head: Vec2<f32>,
    shoulder_mid: Vec2<f32>,
    hip_mid: Vec2<f32>,
    left_foot: Vec2<f32>,
    right_foot: Vec2<f32>,
}

fn anchor(
    validated: &ValidatedLandmarks,
    role: RequiredRole,
    width: u32,
    height: u32,
) -> Result<Vec2<f32>, FailureReason> {
    validated
        .get(role)
        .map(|landmark| landmark.to_pixels(width, height))
        .ok_or(FailureReason::InsufficientLandmarkConfidence)
}

impl Anchors {
    fn collect(
        validated: &ValidatedLandmarks,
        width: u32,
        height: u32,
    ) -> Result<Self, FailureReason> {
        let point = |role| anchor(validated, role, width, height);
        Ok(Anchors {
            head: point(RequiredRole::Head)?,
            shoulder_mid: point(RequiredRole::LeftShoulder)?
                .midpoint(point(RequiredRole::RightShoulder)?),
            hip_mid: point(RequiredRole::LeftHip)?.midpoint(point(RequiredRole::RightHip)?),
            left_foot: point(RequiredRole::LeftFoot)?,
            right_foot: point(RequiredRole::RightFoot)?,
        })
    }
}

/// Segment lengths in pixels for an image of `width` x `height`.
///
/// Fails with `InsufficientLandmarkConfidence` if `validated` lacks an anchor
/// the measurement needs.
pub fn segment_lengths(
    validated: &ValidatedLandmarks,
    width: u32,
    height: u32,
    config: &ExtractionConfig,
) -> Result<SegmentLengths, FailureReason> {
    let anchors = Anchors::collect(validated, width, height)?;

    let lengths = match config.strategy {
        Strategy::Anchor => {
            let head_top = anchors.head.extend_from(
                anchors.shoulder_mid,
                Vec2::new(config.head_extension_x, config.head_extension_y),
            );
            let foot_mid = anchors.left_foot.midpoint(anchors.right_foot);
            SegmentLengths {
                head: head_top.distance_to(anchors.shoulder_mid),
                torso: anchors.shoulder_mid.distance_to(anchors.hip_mid),
                leg: anchors.hip_mid.distance_to(foot_mid),
            }
        }
        Strategy::VerticalProjection => {
            let head_y = validated
                .head_candidates()
                .iter()
                .map(|landmark| landmark.to_pixels(width, height).y)
                .fold(anchors.head.y, f32::min);
            let shoulder_y = anchors.shoulder_mid.y;
            let head_top_y = head_y - config.vertical_head_extension * (shoulder_y - head_y);
            let foot_y = [Side::Left, Side::Right]
                .into_iter()
                .flat_map(|side| validated.foot_candidates(side))
                .map(|landmark| landmark.to_pixels(width, height).y)
                .fold(anchors.left_foot.y.max(anchors.right_foot.y), f32::max);
            // a subject lying down can invert the order; never report negative lengths
            SegmentLengths {
                head: (shoulder_y - head_top_y).max(0.0),
                torso: (anchors.hip_mid.y - shoulder_y).max(0.0),
                leg: (foot_y - anchors.hip_mid.y).max(0.0),
            }
        }
    };

    Ok(lengths)
}

/// Measure head/torso/leg proportions from validated landmarks.
pub fn extract(
    validated: &ValidatedLandmarks,
    width: u32,
    height: u32,
    config: &ExtractionConfig,
) -> Result<Proportion, FailureReason> {
    let lengths = segment_lengths(validated, width, height, config)?;
    lengths.normalize(config.degenerate_epsilon).ok_or_else(|| {
        log::debug!(
            "degenerate geometry: lengths {:?} in {}x{} image",
            lengths,
            width,
            height
        );
        FailureReason::DegenerateGeometry
    })
}
