use serde::{Deserialize, Serialize};
use crate::error::{CornersError, Result};

pub const FEATURE_COUNT: usize = 13;

/// Column order shared by training and inference. The model artifact stores a
/// copy of this list and refuses to load if it differs.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "crosses",
    "shots",
    "possession",
    "pressing",
    "blocked_shots",
    "gk_saves",
    "crosses_per_shot",
    "crosses_per_pressing",
    "interaction_crosses_pressing",
    "tempo",
    "avg_corners_conceded",
    "is_home",
    "team_strength",
];

/// Ordered feature names a model was trained on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    pub fn current() -> Self {
        Self {
            names: FEATURE_NAMES.iter().map(|name| (*name).to_string()).collect(),
        }
    }

    pub fn from_names(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Fails unless both schemas list the same names in the same order.
    pub fn ensure_matches(&self, produced: &FeatureSchema) -> Result<()> {
        if self.names == produced.names {
            Ok(())
        } else {
            Err(CornersError::SchemaMismatch {
                expected: self.names.clone(),
                found: produced.names.clone(),
            })
        }
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::current()
    }
}

/// Model input for one team in one match.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    pub crosses: f64,
    pub shots: f64,
    pub possession: f64,
    pub pressing: f64,
    pub blocked_shots: f64,
    pub gk_saves: f64,
    pub crosses_per_shot: f64,
    pub crosses_per_pressing: f64,
    pub interaction_crosses_pressing: f64,
    pub tempo: f64,
    pub avg_corners_conceded: f64,
    pub is_home: f64,
    pub team_strength: f64,
}

impl FeatureVector {
    /// Values in [`FEATURE_NAMES`] order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.crosses,
            self.shots,
            self.possession,
            self.pressing,
            self.blocked_shots,
            self.gk_saves,
            self.crosses_per_shot,
            self.crosses_per_pressing,
            self.interaction_crosses_pressing,
            self.tempo,
            self.avg_corners_conceded,
            self.is_home,
            self.team_strength,
        ]
    }
}
