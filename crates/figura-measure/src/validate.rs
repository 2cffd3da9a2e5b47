use crate::landmark::{Landmark, LandmarkRole, LandmarkSet, Side};
use figura_base::log;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Visibility thresholds used by [`validate`].
///
/// Foot points are often low-confidence on a correctly framed subject, so
/// they get their own looser threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum visibility for head, shoulder and hip landmarks.
    pub core_min_visibility: f32,
    /// Minimum visibility for the selected ankle/heel/foot-tip of each side.
    pub foot_min_visibility: f32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            core_min_visibility: 0.35,
            foot_min_visibility: 0.20,
        }
    }
}

/// A body anchor the validator can be asked to confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredRole {
    /// Nose, or both ears when the nose is not visible enough.
    Head,
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
    /// Best visible of left ankle, heel and foot tip.
    LeftFoot,
    /// Best visible of right ankle, heel and foot tip.
    RightFoot,
}

impl RequiredRole {
    pub const ALL: [RequiredRole; 7] = [
        RequiredRole::Head,
        RequiredRole::LeftShoulder,
        RequiredRole::RightShoulder,
        RequiredRole::LeftHip,
        RequiredRole::RightHip,
        RequiredRole::LeftFoot,
        RequiredRole::RightFoot,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RequiredRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequiredRole::Head => "head",
            RequiredRole::LeftShoulder => "left shoulder",
            RequiredRole::RightShoulder => "right shoulder",
            RequiredRole::LeftHip => "left hip",
            RequiredRole::RightHip => "right hip",
            RequiredRole::LeftFoot => "left foot",
            RequiredRole::RightFoot => "right foot",
        };
        f.write_str(name)
    }
}

/// A required role could not be confirmed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsufficientSignal {
    pub role: RequiredRole,
    /// Best visibility observed for the role, `None` if no candidate was reported.
    pub visibility: Option<f32>,
    pub threshold: f32,
}

impl fmt::Display for InsufficientSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.visibility {
            Some(visibility) => write!(
                f,
                "{} visibility {:.2} below threshold {:.2}",
                self.role, visibility, self.threshold
            ),
            None => write!(f, "{} not detected", self.role),
        }
    }
}

impl std::error::Error for InsufficientSignal {}

/// Landmarks that passed validation, keyed by [`RequiredRole`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedLandmarks {
    anchors: [Option<Landmark>; 7],
    head_candidates: Vec<Landmark>,
    left_foot_candidates: Vec<Landmark>,
    right_foot_candidates: Vec<Landmark>,
}

impl ValidatedLandmarks {
    /// The confirmed point for `role`, `None` if it was not requested.
    ///
    /// For [`RequiredRole::Head`] this is the head reference point: the nose,
    /// or the midpoint of the ears.
    pub fn get(&self, role: RequiredRole) -> Option<&Landmark> {
        self.anchors[role.slot()].as_ref()
    }

    /// Every confident head point (nose, eyes, ears), for estimating the crown.
    pub fn head_candidates(&self) -> &[Landmark] {
        &self.head_candidates
    }

    /// Every confident ankle, heel and foot tip of one side.
    pub fn foot_candidates(&self, side: Side) -> &[Landmark] {
        match side {
            Side::Left => &self.left_foot_candidates,
            Side::Right => &self.right_foot_candidates,
        }
    }
}

/// Confirm that every role in `required` is present and confident enough.
///
/// Fails on the first role that cannot be satisfied; no partial result.
pub fn validate(
    landmarks: &LandmarkSet,
    required: &[RequiredRole],
    config: &ValidationConfig,
) -> Result<ValidatedLandmarks, InsufficientSignal> {
    let mut validated = ValidatedLandmarks::default();

    for &role in required {
        let landmark = match role {
            RequiredRole::Head => {
                let head = head_reference(landmarks, config.core_min_visibility)?;
                validated.head_candidates = head_candidates(landmarks, config.core_min_visibility);
                head
            }
            RequiredRole::LeftShoulder => core_point(
                landmarks,
                role,
                LandmarkRole::shoulder(Side::Left),
                config.core_min_visibility,
            )?,
            RequiredRole::RightShoulder => core_point(
                landmarks,
                role,
                LandmarkRole::shoulder(Side::Right),
                config.core_min_visibility,
            )?,
            RequiredRole::LeftHip => core_point(
                landmarks,
                role,
                LandmarkRole::hip(Side::Left),
                config.core_min_visibility,
            )?,
            RequiredRole::RightHip => core_point(
                landmarks,
                role,
                LandmarkRole::hip(Side::Right),
                config.core_min_visibility,
            )?,
            RequiredRole::LeftFoot => {
                let foot = foot_point(landmarks, role, Side::Left, config.foot_min_visibility)?;
                validated.left_foot_candidates =
                    foot_candidates(landmarks, Side::Left, config.foot_min_visibility);
                foot
            }
            RequiredRole::RightFoot => {
                let foot = foot_point(landmarks, role, Side::Right, config.foot_min_visibility)?;
                validated.right_foot_candidates =
                    foot_candidates(landmarks, Side::Right, config.foot_min_visibility);
                foot
            }
        };
        validated.anchors[role.slot()] = Some(landmark);
    }

    Ok(validated)
}

fn usable(landmark: &Landmark) -> bool {
    landmark.position.is_finite()
}

fn confident(landmark: &Landmark, threshold: f32) -> bool {
    usable(landmark) && landmark.visibility >= threshold
}

fn reject(role: RequiredRole, visibility: Option<f32>, threshold: f32) -> InsufficientSignal {
    let signal = InsufficientSignal {
        role,
        visibility,
        threshold,
    };
    log::debug!("landmark validation failed: {}", signal);
    signal
}

fn core_point(
    landmarks: &LandmarkSet,
    role: RequiredRole,
    landmark_role: LandmarkRole,
    threshold: f32,
) -> Result<Landmark, InsufficientSignal> {
    match landmarks.get(landmark_role).filter(|landmark| usable(landmark)) {
        Some(landmark) if landmark.visibility >= threshold => Ok(*landmark),
        Some(landmark) => Err(reject(role, Some(landmark.visibility), threshold)),
        None => Err(reject(role, None, threshold)),
    }
}

fn head_reference(landmarks: &LandmarkSet, threshold: f32) -> Result<Landmark, InsufficientSignal> {
    let nose = landmarks.get(LandmarkRole::Nose).filter(|l| usable(l));
    if let Some(nose) = nose.filter(|l| l.visibility >= threshold) {
        return Ok(*nose);
    }

    let left = landmarks.get(LandmarkRole::ear(Side::Left)).filter(|l| usable(l));
    let right = landmarks.get(LandmarkRole::ear(Side::Right)).filter(|l| usable(l));
    let ears = left.zip(right).map(|(left, right)| {
        Landmark {
            position: left.position.midpoint(right.position),
            visibility: left.visibility.min(right.visibility),
        }
    });

    match ears {
        Some(ears) if ears.visibility >= threshold => Ok(ears),
        _ => {
            let best = [nose.map(|l| l.visibility), ears.map(|l| l.visibility)]
                .into_iter()
                .flatten()
                .reduce(f32::max);
            Err(reject(RequiredRole::Head, best, threshold))
        }
    }
}

fn head_candidates(landmarks: &LandmarkSet, threshold: f32) -> Vec<Landmark> {
    [
        LandmarkRole::Nose,
        LandmarkRole::LeftEye,
        LandmarkRole::RightEye,
        LandmarkRole::LeftEar,
        LandmarkRole::RightEar,
    ]
    .into_iter()
    .filter_map(|role| landmarks.get(role))
    .filter(|landmark| confident(landmark, threshold))
    .copied()
    .collect()
}

fn foot_candidates(landmarks: &LandmarkSet, side: Side, threshold: f32) -> Vec<Landmark> {
    LandmarkRole::foot(side)
        .into_iter()
        .filter_map(|role| landmarks.get(role))
        .filter(|landmark| confident(landmark, threshold))
        .copied()
        .collect()
}

fn foot_point(
    landmarks: &LandmarkSet,
    role: RequiredRole,
    side: Side,
    threshold: f32,
) -> Result<Landmark, InsufficientSignal> {
    // ties keep the earlier candidate: ankle, then heel, then foot tip
    let best = LandmarkRole::foot(side)
        .into_iter()
        .filter_map(|candidate| landmarks.get(candidate))
        .filter(|landmark| usable(landmark))
        .fold(None::<&Landmark>, |best, landmark| match best {
            Some(current) if current.visibility >= landmark.visibility => Some(current),
            _ => Some(landmark),
        });

    match best {
        Some(landmark) if landmark.visibility >= threshold => Ok(*landmark),
        Some(landmark) => Err(reject(role, Some(landmark.visibility), threshold)),
        None => Err(reject(role, None, threshold)),
    }
}
