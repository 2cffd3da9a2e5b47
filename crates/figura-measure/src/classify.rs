use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reference set chosen by the user before capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Male,
    Female,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Male => write!(f, "male"),
            Category::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Category::Male),
            "female" | "f" => Ok(Category::Female),
            other => Err(format!("unknown category '{}', expected male or female", other)),
        }
    }
}

/// One score band. `min: None` is the catch-all (`-infinity`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    #[serde(default)]
    pub min: Option<f32>,
    pub outcome: String,
    /// Human-readable range, e.g. "50-70".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Band {
    pub fn new(min: f32, outcome: impl Into<String>) -> Self {
        Self {
            min: Some(min),
            outcome: outcome.into(),
            label: None,
        }
    }

    pub fn catch_all(outcome: impl Into<String>) -> Self {
        Self {
            min: None,
            outcome: outcome.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Inclusive lower bound of the band.
    pub fn threshold(&self) -> f32 {
        self.min.unwrap_or(f32::NEG_INFINITY)
    }
}

/// Bands in strictly descending threshold order, ending in a catch-all.
///
/// The invariants are checked on construction, so [`BandTable::classify`]
/// always has an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Band>", into = "Vec<Band>")]
pub struct BandTable {
    ranked: Vec<Band>,
    catch_all: Band,
}

impl BandTable {
    pub fn new(mut bands: Vec<Band>) -> Result<Self, ConfigError> {
        let catch_all = bands
            .pop()
            .ok_or_else(|| ConfigError::Invalid("band table is empty".to_string()))?;
        if catch_all.min.is_some() {
            return Err(ConfigError::Invalid(format!(
                "last band '{}' must be the catch-all (no min)",
                catch_all.outcome
            )));
        }

        let mut previous = f32::INFINITY;
        for band in &bands {
            let min = band.min.ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "band '{}': only the last band may omit min",
                    band.outcome
                ))
            })?;
            if !min.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "band '{}': min must be finite",
                    band.outcome
                )));
            }
            if min >= previous {
                return Err(ConfigError::Invalid(format!(
                    "band '{}': thresholds must be strictly descending",
                    band.outcome
                )));
            }
            previous = min;
        }

        Ok(Self {
            ranked: bands,
            catch_all,
        })
    }

    /// First band whose threshold the score reaches (inclusive), else the catch-all.
    pub fn classify(&self, score: f32) -> &Band {
        self.ranked
            .iter()
            .find(|band| score >= band.threshold())
            .unwrap_or(&self.catch_all)
    }

    pub fn bands(&self) -> impl Iterator<Item = &Band> {
        self.ranked.iter().chain(std::iter::once(&self.catch_all))
    }

    pub fn len(&self) -> usize {
        self.ranked.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl TryFrom<Vec<Band>> for BandTable {
    type Error = ConfigError;

    fn try_from(bands: Vec<Band>) -> Result<Self, Self::Error> {
        BandTable::new(bands)
    }
}

impl From<BandTable> for Vec<Band> {
    fn from(table: BandTable) -> Self {
        let mut bands = table.ranked;
        bands.push(table.catch_all);
        bands
    }
}

/// One band table per [`Category`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSet {
    pub male: BandTable,
    pub female: BandTable,
}

impl BandSet {
    pub fn table(&self, category: Category) -> &BandTable {
        match category {
            Category::Male => &self.male,
            Category::Female => &self.female,
        }
    }
}

fn default_table(suffix: char) -> BandTable {
    BandTable {
        ranked: vec![
            Band::new(70.0, format!("a{suffix}")).with_label("70+"),
            Band::new(50.0, format!("b{suffix}")).with_label("50-70"),
            Band::new(40.0, format!("c{suffix}")).with_label("40-50"),
        ],
        catch_all: Band::catch_all(format!("d{suffix}")).with_label("under 40"),
    }
}

impl Default for BandSet {
    fn default() -> Self {
        BandSet {
            male: default_table('2'),
            female: default_table('1'),
        }
    }
}

/// Outcome id for `score` in the table selected by `category`.
pub fn classify(score: f32, bands: &BandSet, category: Category) -> &str {
    &bands.table(category).classify(score).outcome
}
