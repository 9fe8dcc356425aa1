// Shared fixtures for the integration tests

use corners_models::{FallbackTable, TeamStats};
use std::collections::BTreeMap;

pub const TEAMS: [&str; 14] = [
    "Arsenal",
    "Aston Villa",
    "Bournemouth",
    "Brentford",
    "Brighton",
    "Chelsea",
    "Crystal Palace",
    "Everton",
    "Fulham",
    "Liverpool",
    "Manchester City",
    "Newcastle",
    "Tottenham",
    "West Ham",
];

/// Crossing-heavy teams win more corners.
pub fn team_stats(index: usize) -> TeamStats {
    let crosses = 12.0 + 1.5 * index as f64;
    TeamStats {
        total_crosses: Some(crosses),
        total_shots: Some(9.0 + (index % 5) as f64),
        total_possession: Some(42.0 + index as f64),
        total_pressing: Some(75.0 + (index % 7) as f64),
        total_blocked_shots: Some(3.0),
        total_gk_saves: Some(2.5),
        conceded_corners_avg: Some(4.0 + (index % 3) as f64 * 0.5),
        total_corners: Some(2.5 + crosses * 0.2),
    }
}

pub fn fallback_table() -> FallbackTable {
    let mut teams: BTreeMap<String, TeamStats> = TEAMS
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), team_stats(i)))
        .collect();

    // present for inference, excluded from training
    teams.insert(
        "Ipswich".to_string(),
        TeamStats { total_crosses: Some(15.0), total_shots: Some(8.0), ..TeamStats::default() },
    );
    FallbackTable::new(teams)
}
