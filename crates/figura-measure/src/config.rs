use crate::classify::BandSet;
use crate::error::ConfigError;
use crate::extract::{ExtractionConfig, Segment};
use crate::score::ScoringConfig;
use crate::validate::ValidationConfig;
use figura_base::log;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration schema version understood by this build.
pub const CONFIG_VERSION: u32 = 1;

/// Every tunable of the pipeline: thresholds, geometry constants, reference
/// ranges and score bands. Loaded once, never mutated while analyzing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub version: u32,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub bands: BandSet,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            validation: ValidationConfig::default(),
            extraction: ExtractionConfig::default(),
            scoring: ScoringConfig::default(),
            bands: BandSet::default(),
        }
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn check_unit(name: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be within [0, 1], got {value}")))
    }
}

fn check_factor(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be finite and >= 0, got {value}")))
    }
}

impl PipelineConfig {
    /// Read, parse and check a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json(&json)?;
        log::info!("loaded pipeline config v{} from {}", config.version, path.display());
        Ok(config)
    }

    /// Parse and check a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the pipeline stages rely on.
    ///
    /// Band tables are already checked when they are built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(invalid(format!(
                "unsupported config version {} (expected {})",
                self.version, CONFIG_VERSION
            )));
        }

        check_unit("validation.core_min_visibility", self.validation.core_min_visibility)?;
        check_unit("validation.foot_min_visibility", self.validation.foot_min_visibility)?;

        let extraction = &self.extraction;
        check_factor("extraction.head_extension_x", extraction.head_extension_x)?;
        check_factor("extraction.head_extension_y", extraction.head_extension_y)?;
        check_factor(
            "extraction.vertical_head_extension",
            extraction.vertical_head_extension,
        )?;
        check_factor("extraction.degenerate_epsilon", extraction.degenerate_epsilon)?;

        let mut weight_total = 0.0;
        for segment in Segment::ALL {
            let range = self.scoring.range(segment);
            if !range.low.is_finite() || !range.high.is_finite() {
                return Err(invalid(format!("scoring.{segment:?}: bounds must be finite")));
            }
            if range.low > range.high {
                return Err(invalid(format!(
                    "scoring.{segment:?}: low {} exceeds high {}",
                    range.low, range.high
                )));
            }
            if !range.weight.is_finite() || range.weight < 0.0 {
                return Err(invalid(format!(
                    "scoring.{segment:?}: weight must be finite and >= 0"
                )));
            }
            weight_total += range.weight;
        }
        if weight_total <= 0.0 {
            return Err(invalid("scoring: at least one weight must be positive"));
        }

        if let Some(shaping) = &self.scoring.shaping {
            if !(0.0..100.0).contains(&shaping.floor) {
                return Err(invalid(format!(
                    "scoring.shaping.floor must be within [0, 100), got {}",
                    shaping.floor
                )));
            }
            check_factor("scoring.shaping.steepness", shaping.steepness)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Strategy;
    use crate::score::ContrastShaping;

    #[test]
    fn test_default_is_valid() {
        PipelineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let config = PipelineConfig::from_json(r#"{"version": 1}"#).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let json = r#"{"version": 1, "extraction": {"strategy": "vertical_projection"}}"#;
        let config = PipelineConfig::from_json(json).unwrap();
        assert_eq!(config.extraction.strategy, Strategy::VerticalProjection);
        assert_eq!(config.extraction.head_extension_y, 0.90);
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = PipelineConfig::default();
        let parsed = PipelineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let err = PipelineConfig::from_json(r#"{"version": 7}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_threshold_out_of_range() {
        let mut config = PipelineConfig::default();
        config.validation.foot_min_visibility = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_all_zero_weights() {
        let mut config = PipelineConfig::default();
        config.scoring.head.weight = 0.0;
        config.scoring.torso.weight = 0.0;
        config.scoring.leg.weight = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_reference_range() {
        let mut config = PipelineConfig::default();
        config.scoring.leg.low = 0.80;
        config.scoring.leg.high = 0.30;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_shaping_floor_out_of_range() {
        let mut config = PipelineConfig::default();
        config.scoring.shaping = Some(ContrastShaping {
            floor: 100.0,
            steepness: 2.0,
        });
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.scoring.shaping = Some(ContrastShaping {
            floor: -1.0,
            steepness: 2.0,
        });
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_band_table_in_json() {
        let json = r#"{
            "version": 1,
            "bands": {
                "male": [{"min": 50, "outcome": "b2"}, {"min": 70, "outcome": "a2"}, {"outcome": "d2"}],
                "female": [{"outcome": "d1"}]
            }
        }"#;
        assert!(matches!(
            PipelineConfig::from_json(json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = PipelineConfig::load("/nonexistent/figura.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
