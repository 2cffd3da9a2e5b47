use crate::classify::Category;
use crate::config::PipelineConfig;
use crate::error::{ConfigError, FailureReason};
use crate::extract::{extract, Proportion};
use crate::landmark::LandmarkSet;
use crate::score::score;
use crate::validate::{validate, RequiredRole};
use figura_base::log;
use serde::Serialize;

/// Output of one pipeline run.
///
/// Exactly one of `failure` and (`proportion`, `score`, `outcome`) is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub proportion: Option<Proportion>,
    pub score: Option<f32>,
    pub outcome: Option<String>,
    /// Display label of the band the score fell into, if configured.
    pub band_label: Option<String>,
    pub failure: Option<FailureReason>,
}

impl AnalysisResult {
    pub fn failed(reason: FailureReason) -> Self {
        Self {
            proportion: None,
            score: None,
            outcome: None,
            band_label: None,
            failure: Some(reason),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Score rounded to the nearest integer for display.
    pub fn rounded_score(&self) -> Option<i32> {
        self.score.map(|s| s.round() as i32)
    }
}

/// Run validation, extraction, scoring and classification on one frame.
///
/// `landmarks` is `None` when the pose model found nobody. Never panics and
/// never fails outright: problems come back as `failure`.
pub fn run_analysis(
    landmarks: Option<&LandmarkSet>,
    width: u32,
    height: u32,
    category: Category,
    config: &PipelineConfig,
) -> AnalysisResult {
    let Some(landmarks) = landmarks else {
        log::debug!("analysis: no person detected");
        return AnalysisResult::failed(FailureReason::NoPersonDetected);
    };

    let validated = match validate(landmarks, &RequiredRole::ALL, &config.validation) {
        Ok(validated) => validated,
        Err(_) => return AnalysisResult::failed(FailureReason::InsufficientLandmarkConfidence),
    };

    let proportion = match extract(&validated, width, height, &config.extraction) {
        Ok(proportion) => proportion,
        Err(reason) => return AnalysisResult::failed(reason),
    };

    let score = score(&proportion, &config.scoring);
    let band = config.bands.table(category).classify(score);

    log::info!(
        "analysis: proportion {:.3}/{:.3}/{:.3} score {:.1} -> {} ({})",
        proportion.head,
        proportion.torso,
        proportion.leg,
        score,
        band.outcome,
        category
    );

    AnalysisResult {
        proportion: Some(proportion),
        score: Some(score),
        outcome: Some(band.outcome.clone()),
        band_label: band.label.clone(),
        failure: None,
    }
}

/// A checked configuration bundled with the analysis entry point.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn analyze(
        &self,
        landmarks: Option<&LandmarkSet>,
        width: u32,
        height: u32,
        category: Category,
    ) -> AnalysisResult {
        run_analysis(landmarks, width, height, category, &self.config)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }
}
