use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use crate::artifact::read_json_artifact;
use crate::error::Result;

/// Season aggregate statistics for one team, as stored in the fallback table.
///
/// Every field is optional because the upstream table contains nulls. Feature
/// derivation reads absent values as `0.0`; training only admits complete
/// records (see [`TeamStats::is_complete`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TeamStats {
    #[serde(default)]
    pub total_crosses: Option<f64>,
    #[serde(default)]
    pub total_shots: Option<f64>,
    #[serde(default)]
    pub total_possession: Option<f64>,
    /// Pass accuracy, used as a stand-in for pressing intensity
    #[serde(default)]
    pub total_pressing: Option<f64>,
    #[serde(default)]
    pub total_blocked_shots: Option<f64>,
    #[serde(default)]
    pub total_gk_saves: Option<f64>,
    #[serde(default)]
    pub conceded_corners_avg: Option<f64>,
    /// Training label
    #[serde(default)]
    pub total_corners: Option<f64>,
}

impl TeamStats {
    pub fn crosses(&self) -> f64 {
        self.total_crosses.unwrap_or(0.0)
    }

    pub fn shots(&self) -> f64 {
        self.total_shots.unwrap_or(0.0)
    }

    pub fn possession(&self) -> f64 {
        self.total_possession.unwrap_or(0.0)
    }

    pub fn pressing(&self) -> f64 {
        self.total_pressing.unwrap_or(0.0)
    }

    pub fn blocked_shots(&self) -> f64 {
        self.total_blocked_shots.unwrap_or(0.0)
    }

    pub fn gk_saves(&self) -> f64 {
        self.total_gk_saves.unwrap_or(0.0)
    }

    pub fn corners_conceded(&self) -> f64 {
        self.conceded_corners_avg.unwrap_or(0.0)
    }

    /// True when every field needed for a training row, label included, is present.
    pub fn is_complete(&self) -> bool {
        [
            self.total_crosses,
            self.total_shots,
            self.total_possession,
            self.total_pressing,
            self.total_blocked_shots,
            self.total_gk_saves,
            self.conceded_corners_avg,
            self.total_corners,
        ]
        .iter()
        .all(Option::is_some)
    }
}

/// Canonical team name → season aggregates. Keys are the canonical roster.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FallbackTable {
    teams: BTreeMap<String, TeamStats>,
}

impl FallbackTable {
    pub fn new(teams: BTreeMap<String, TeamStats>) -> Self {
        Self { teams }
    }

    pub fn load(path: &Path) -> Result<Self> {
        read_json_artifact(path)
    }

    pub fn get(&self, team: &str) -> Option<&TeamStats> {
        self.teams.get(team)
    }

    pub fn contains(&self, team: &str) -> bool {
        self.teams.contains_key(team)
    }

    /// Canonical names in stable (sorted) order.
    pub fn canonical_names(&self) -> Vec<String> {
        self.teams.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TeamStats)> {
        self.teams.iter()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Raw name variant → canonical name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    pub fn new(aliases: HashMap<String, String>) -> Self {
        Self { aliases }
    }

    pub fn load(path: &Path) -> Result<Self> {
        read_json_artifact(path)
    }

    /// The mapped name if an alias exists, otherwise the input unchanged.
    pub fn resolve<'a>(&'a self, raw_name: &'a str) -> &'a str {
        self.aliases.get(raw_name).map_or(raw_name, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
