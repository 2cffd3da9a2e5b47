//! Body-proportion measurement pipeline.
//!
//! Pose landmarks flow through four pure stages: [`validate`] checks that the
//! skeleton is visible enough, [`extract`] turns it into head/torso/leg
//! proportions, [`score`] maps those onto 0-100 against reference ranges and
//! [`classify`] buckets the score into an outcome id. [`analysis`] chains the
//! stages; [`session`] is the capture state machine a caller drives around it.

pub mod analysis;
pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod landmark;
pub mod score;
pub mod session;
pub mod validate;

pub use analysis::{run_analysis, AnalysisResult, Pipeline};
pub use classify::{classify, Band, BandSet, BandTable, Category};
pub use config::{PipelineConfig, CONFIG_VERSION};
pub use error::{ConfigError, FailureReason, SessionError};
pub use extract::{extract, ExtractionConfig, Proportion, Segment, SegmentLengths, Strategy};
pub use landmark::{Landmark, LandmarkRecord, LandmarkRole, LandmarkSet, Side, LANDMARK_COUNT};
pub use score::{score, ContrastShaping, Direction, ReferenceRange, ScoreBreakdown, ScoringConfig};
pub use session::{CaptureSession, CaptureState, CaptureTicket};
pub use validate::{validate, InsufficientSignal, RequiredRole, ValidatedLandmarks, ValidationConfig};
