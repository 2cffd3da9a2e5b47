use figura_measure::LandmarkSet;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a capture run.
#[derive(Clone, Debug)]
pub struct CaptureConfig {
    countdown_secs: u32,
    width: u32,
    height: u32,
    pose_timeout: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 3,
            width: 1280,
            height: 720,
            pose_timeout: Duration::from_secs(10),
        }
    }
}

impl CaptureConfig {
    /// Set the countdown length in seconds.
    pub fn with_countdown_secs(mut self, countdown_secs: u32) -> Self {
        self.countdown_secs = countdown_secs;
        self
    }

    /// Frame width used when the pose frame does not report one.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Frame height used when the pose frame does not report one.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    /// How long to wait for the pose model before giving up on a capture.
    pub fn with_pose_timeout(mut self, pose_timeout: Duration) -> Self {
        self.pose_timeout = pose_timeout;
        self
    }

    pub fn countdown_secs(&self) -> u32 {
        self.countdown_secs
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pose_timeout(&self) -> Duration {
        self.pose_timeout
    }
}

/// Pose model output for one captured frame.
#[derive(Debug, Clone, Deserialize)]
pub struct PoseFrame {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// `null` or absent when nobody was detected.
    #[serde(default)]
    pub landmarks: Option<LandmarkSet>,
}

impl PoseFrame {
    /// Frame size, falling back to the configured capture size for a
    /// missing or zero dimension.
    pub fn size(&self, config: &CaptureConfig) -> (u32, u32) {
        (
            self.width.filter(|w| *w > 0).unwrap_or(config.width()),
            self.height.filter(|h| *h > 0).unwrap_or(config.height()),
        )
    }
}

#[derive(Debug)]
pub enum CaptureError {
    Io(String),
    Parse(String),
    Timeout,
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Io(msg) => write!(f, "capture io error: {}", msg),
            CaptureError::Parse(msg) => write!(f, "bad pose frame: {}", msg),
            CaptureError::Timeout => write!(f, "pose model timed out"),
        }
    }
}

impl std::error::Error for CaptureError {}

/// Async pose model producing landmarks for the frame taken at capture time.
#[allow(async_fn_in_trait)]
pub trait PoseModel {
    async fn estimate(&mut self) -> Result<PoseFrame, CaptureError>;
}

/// Replays a pose frame recorded as JSON.
pub struct FilePoseModel {
    path: PathBuf,
}

impl FilePoseModel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PoseModel for FilePoseModel {
    async fn estimate(&mut self) -> Result<PoseFrame, CaptureError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CaptureError::Io(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_str(&json).map_err(|e| CaptureError::Parse(e.to_string()))
    }
}
