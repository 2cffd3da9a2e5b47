use figura_base::Vec2;
use serde::Deserialize;

/// Number of landmarks in the 33-point body pose scheme
pub const LANDMARK_COUNT: usize = 33;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// A single landmark in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    /// x and y in [0, 1], origin top-left, y increasing downward.
    pub position: Vec2<f32>,
    /// Confidence in [0, 1] that the point is located correctly and unoccluded.
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            visibility,
        }
    }

    /// Position in pixels for an image of the given size.
    pub fn to_pixels(&self, width: u32, height: u32) -> Vec2<f32> {
        self.position * Vec2::new(width as f32, height as f32)
    }
}

/// Body pose landmark roles, in model output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkRole {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkRole {
    pub const ALL: [LandmarkRole; LANDMARK_COUNT] = [
        LandmarkRole::Nose,
        LandmarkRole::LeftEyeInner,
        LandmarkRole::LeftEye,
        LandmarkRole::LeftEyeOuter,
        LandmarkRole::RightEyeInner,
        LandmarkRole::RightEye,
        LandmarkRole::RightEyeOuter,
        LandmarkRole::LeftEar,
        LandmarkRole::RightEar,
        LandmarkRole::MouthLeft,
        LandmarkRole::MouthRight,
        LandmarkRole::LeftShoulder,
        LandmarkRole::RightShoulder,
        LandmarkRole::LeftElbow,
        LandmarkRole::RightElbow,
        LandmarkRole::LeftWrist,
        LandmarkRole::RightWrist,
        LandmarkRole::LeftPinky,
        LandmarkRole::RightPinky,
        LandmarkRole::LeftIndex,
        LandmarkRole::RightIndex,
        LandmarkRole::LeftThumb,
        LandmarkRole::RightThumb,
        LandmarkRole::LeftHip,
        LandmarkRole::RightHip,
        LandmarkRole::LeftKnee,
        LandmarkRole::RightKnee,
        LandmarkRole::LeftAnkle,
        LandmarkRole::RightAnkle,
        LandmarkRole::LeftHeel,
        LandmarkRole::RightHeel,
        LandmarkRole::LeftFootIndex,
        LandmarkRole::RightFootIndex,
    ];

    /// Foot candidates for one side, in tie-break order.
    pub fn foot(side: Side) -> [LandmarkRole; 3] {
        match side {
            Side::Left => [
                LandmarkRole::LeftAnkle,
                LandmarkRole::LeftHeel,
                LandmarkRole::LeftFootIndex,
            ],
            Side::Right => [
                LandmarkRole::RightAnkle,
                LandmarkRole::RightHeel,
                LandmarkRole::RightFootIndex,
            ],
        }
    }

    pub fn shoulder(side: Side) -> LandmarkRole {
        match side {
            Side::Left => LandmarkRole::LeftShoulder,
            Side::Right => LandmarkRole::RightShoulder,
        }
    }

    pub fn hip(side: Side) -> LandmarkRole {
        match side {
            Side::Left => LandmarkRole::LeftHip,
            Side::Right => LandmarkRole::RightHip,
        }
    }

    pub fn ear(side: Side) -> LandmarkRole {
        match side {
            Side::Left => LandmarkRole::LeftEar,
            Side::Right => LandmarkRole::RightEar,
        }
    }
}

impl From<LandmarkRole> for usize {
    fn from(role: LandmarkRole) -> usize {
        role as usize
    }
}

impl TryFrom<usize> for LandmarkRole {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        LandmarkRole::ALL.get(value).copied().ok_or_else(|| {
            format!(
                "Invalid landmark index: {}. Must be in range 0-{}.",
                value,
                LANDMARK_COUNT - 1
            )
        })
    }
}

/// One landmark as emitted by the pose model. Extra fields such as `z` are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LandmarkRecord {
    pub x: f32,
    pub y: f32,
    /// Absent or `null` when the model does not report visibility.
    #[serde(default)]
    pub visibility: Option<f32>,
}

impl From<LandmarkRecord> for Landmark {
    /// Unreported visibility is taken as fully confident.
    fn from(record: LandmarkRecord) -> Self {
        Landmark::new(record.x, record.y, record.visibility.unwrap_or(1.0))
    }
}

/// All landmarks of one detected person, addressed by role.
///
/// A slot is `None` when the model did not report that point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Vec<Option<LandmarkRecord>>")]
pub struct LandmarkSet {
    slots: [Option<Landmark>; LANDMARK_COUNT],
}

impl Default for LandmarkSet {
    fn default() -> Self {
        Self {
            slots: [None; LANDMARK_COUNT],
        }
    }
}

impl LandmarkSet {
    /// Build from model output order. Entries past the 33rd are ignored,
    /// missing trailing entries stay absent.
    pub fn from_ordered<I>(landmarks: I) -> Self
    where
        I: IntoIterator<Item = Option<Landmark>>,
    {
        let mut set = Self::default();
        for (slot, landmark) in set.slots.iter_mut().zip(landmarks) {
            *slot = landmark;
        }
        set
    }

    pub fn get(&self, role: LandmarkRole) -> Option<&Landmark> {
        self.slots[usize::from(role)].as_ref()
    }

    pub fn set(&mut self, role: LandmarkRole, landmark: Landmark) {
        self.slots[usize::from(role)] = Some(landmark);
    }

    pub fn remove(&mut self, role: LandmarkRole) -> Option<Landmark> {
        self.slots[usize::from(role)].take()
    }

    /// Builder form of [`LandmarkSet::set`].
    pub fn with(mut self, role: LandmarkRole, landmark: Landmark) -> Self {
        self.set(role, landmark);
        self
    }

    /// Number of roles with a reported landmark.
    pub fn present(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LandmarkRole, &Landmark)> {
        LandmarkRole::ALL
            .iter()
            .zip(self.slots.iter())
            .filter_map(|(role, slot)| slot.as_ref().map(|landmark| (*role, landmark)))
    }
}

impl From<Vec<Option<LandmarkRecord>>> for LandmarkSet {
    fn from(records: Vec<Option<LandmarkRecord>>) -> Self {
        Self::from_ordered(records.into_iter().map(|record| record.map(Landmark::from)))
    }
}
