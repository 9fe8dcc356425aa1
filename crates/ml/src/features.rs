// Feature engineering

use corners_models::{FallbackTable, FeatureVector, TeamStats};
use tracing::debug;

/// A complete fallback record turned into a labelled training example.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRow {
    pub team: String,
    pub features: FeatureVector,
    pub total_corners: f64,
}

/// Turns team statistics into model features.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEngineer;

impl FeatureEngineer {
    pub fn new() -> Self {
        Self
    }

    /// Features for `team` facing `opponent`. Absent fields count as zero and
    /// every ratio with a zero denominator is zero.
    pub fn derive(&self, team: &TeamStats, opponent: &TeamStats, is_home: bool) -> FeatureVector {
        let crosses = team.crosses();
        let shots = team.shots();
        let pressing = team.pressing();
        let opp_blocked = opponent.blocked_shots();
        let opp_saves = opponent.gk_saves();

        FeatureVector {
            crosses,
            shots,
            possession: team.possession(),
            pressing,
            blocked_shots: opp_blocked,
            gk_saves: opp_saves,
            crosses_per_shot: guarded_ratio(crosses, shots),
            crosses_per_pressing: guarded_ratio(crosses, pressing),
            interaction_crosses_pressing: crosses * pressing,
            tempo: pressing + opponent.pressing(),
            avg_corners_conceded: opponent.corners_conceded(),
            is_home: if is_home { 1.0 } else { 0.0 },
            team_strength: crosses + shots - opp_blocked - opp_saves,
        }
    }

    /// One row per team whose fallback record is complete. The aggregates
    /// describe the team's own season, so the team stands in as its own
    /// opponent and is treated as the home side.
    pub fn training_rows(&self, table: &FallbackTable) -> Vec<TrainingRow> {
        let mut rows = Vec::with_capacity(table.len());

        for (team, stats) in table.iter() {
            let Some(total_corners) = stats.total_corners.filter(|_| stats.is_complete()) else {
                debug!("⏭️  Skipping {} for training: incomplete fallback record", team);
                continue;
            };
            rows.push(TrainingRow {
                team: team.clone(),
                features: self.derive(stats, stats, true),
                total_corners,
            });
        }

        rows
    }
}

fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        numerator / denominator
    }
}
