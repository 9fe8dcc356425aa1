// Fixtures, per-match statistics and historical results

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Period label carrying whole-match totals in the statistics feed.
pub const WHOLE_MATCH_PERIOD: &str = "ALL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fixture {
    pub id: u64,
    pub tournament_id: u32,
    pub home_team: String,
    pub away_team: String,
    pub date: String,
}

/// Named statistics the pipeline consumes from a match breakdown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatMetric {
    CornerKicks,
    Crosses,
    BallPossession,
    TotalShots,
    BlockedShots,
    GoalkeeperSaves,
    /// Pass accuracy, the pressing proxy
    Pressing,
}

impl StatMetric {
    pub const ALL: [StatMetric; 7] = [
        StatMetric::CornerKicks,
        StatMetric::Crosses,
        StatMetric::BallPossession,
        StatMetric::TotalShots,
        StatMetric::BlockedShots,
        StatMetric::GoalkeeperSaves,
        StatMetric::Pressing,
    ];

    /// Lower-case display names the feed uses for this metric.
    pub fn display_names(self) -> &'static [&'static str] {
        match self {
            StatMetric::CornerKicks => &["corner kicks"],
            StatMetric::Crosses => &["crosses"],
            StatMetric::BallPossession => &["ball possession"],
            StatMetric::TotalShots => &["total shots"],
            StatMetric::BlockedShots => &["blocked shots"],
            StatMetric::GoalkeeperSaves => &["goalkeeper saves"],
            StatMetric::Pressing => &["accurate passes", "pass success rate"],
        }
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|metric| metric.display_names().contains(&normalized.as_str()))
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SidePair {
    pub home: Option<f64>,
    pub away: Option<f64>,
}

// --- statistics feed wire format ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduledEventsResponse {
    #[serde(default)]
    pub events: Vec<ScheduledEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledEvent {
    pub id: u64,
    pub tournament: EventTournament,
    pub home_team: NamedEntity,
    pub away_team: NamedEntity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTournament {
    #[serde(default)]
    pub unique_tournament: Option<IdEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedEntity {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdEntity {
    pub id: u32,
}

impl ScheduledEvent {
    pub fn unique_tournament_id(&self) -> Option<u32> {
        self.tournament.unique_tournament.as_ref().map(|t| t.id)
    }

    pub fn into_fixture(self, date: &str) -> Option<Fixture> {
        let tournament_id = self.unique_tournament_id()?;
        Some(Fixture {
            id: self.id,
            tournament_id,
            home_team: self.home_team.name,
            away_team: self.away_team.name,
            date: date.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsResponse {
    #[serde(default)]
    pub statistics: Vec<StatisticsPeriod>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsPeriod {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub groups: Vec<StatisticsGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsGroup {
    #[serde(default)]
    pub statistics_items: Vec<StatisticsItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub home: Option<Value>,
    #[serde(default)]
    pub away: Option<Value>,
    #[serde(default)]
    pub home_value: Option<f64>,
    #[serde(default)]
    pub away_value: Option<f64>,
}

impl StatisticsItem {
    fn pair(&self) -> SidePair {
        SidePair {
            home: self.home_value.or_else(|| self.home.as_ref().and_then(numeric_value)),
            away: self.away_value.or_else(|| self.away.as_ref().and_then(numeric_value)),
        }
    }

    fn integer_pair(&self) -> Option<(u32, u32)> {
        let home = self.home.as_ref().and_then(integer_value)?;
        let away = self.away.as_ref().and_then(integer_value)?;
        Some((home, away))
    }
}

impl StatisticsResponse {
    fn whole_match_items(&self) -> impl Iterator<Item = &StatisticsItem> {
        self.statistics
            .iter()
            .filter(|period| period.period == WHOLE_MATCH_PERIOD)
            .flat_map(|period| period.groups.iter())
            .flat_map(|group| group.statistics_items.iter())
    }

    /// Recognised metrics from the whole-match slice. Later duplicates win.
    pub fn whole_match_metrics(&self) -> BTreeMap<StatMetric, SidePair> {
        let mut metrics = BTreeMap::new();
        for item in self.whole_match_items() {
            if let Some(metric) = StatMetric::from_display_name(&item.name) {
                metrics.insert(metric, item.pair());
            }
        }
        metrics
    }

    /// Whole-match corner kicks when both sides are whole numbers.
    pub fn corner_counts(&self) -> Option<(u32, u32)> {
        self.whole_match_items()
            .find(|item| StatMetric::from_display_name(&item.name) == Some(StatMetric::CornerKicks))
            .and_then(StatisticsItem::integer_pair)
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            // "55%", "410 (85%)" and similar: take the leading number
            let token: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            token.parse().ok()
        }
        _ => None,
    }
}

fn integer_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// --- fixtures API wire format ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixturesResponse {
    #[serde(default)]
    pub response: Vec<ApiFixture>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiFixture {
    pub fixture: ApiFixtureInfo,
    pub league: ApiLeague,
    pub teams: ApiTeams,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiFixtureInfo {
    pub id: u64,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiLeague {
    pub id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiTeams {
    pub home: ApiTeam,
    pub away: ApiTeam,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiTeam {
    pub name: String,
}

impl ApiFixture {
    pub fn to_fixture(&self, date: &str) -> Fixture {
        Fixture {
            id: self.fixture.id,
            tournament_id: self.league.id,
            home_team: self.teams.home.name.clone(),
            away_team: self.teams.away.name.clone(),
            date: self.fixture.date.clone().unwrap_or_else(|| date.to_string()),
        }
    }
}

// --- tabular records ---

/// One scraped match, flattened to the columns of the statistics CSV.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScrapedMatchStats {
    pub match_id: u64,
    pub home_team: String,
    pub away_team: String,
    pub home_corner_kicks: Option<f64>,
    pub away_corner_kicks: Option<f64>,
    pub home_crosses: Option<f64>,
    pub away_crosses: Option<f64>,
    pub home_possession: Option<f64>,
    pub away_possession: Option<f64>,
    pub home_pressing: Option<f64>,
    pub away_pressing: Option<f64>,
    pub goalkeeper_saves_home: Option<f64>,
    pub goalkeeper_saves_away: Option<f64>,
    pub home_blocked_shots: Option<f64>,
    pub away_blocked_shots: Option<f64>,
    pub home_total_shots: Option<f64>,
    pub away_total_shots: Option<f64>,
}

impl ScrapedMatchStats {
    pub fn from_metrics(fixture: &Fixture, metrics: &BTreeMap<StatMetric, SidePair>) -> Self {
        let mut row = Self {
            match_id: fixture.id,
            home_team: fixture.home_team.clone(),
            away_team: fixture.away_team.clone(),
            ..Self::default()
        };

        for (metric, pair) in metrics {
            let (home, away) = match metric {
                StatMetric::CornerKicks => (&mut row.home_corner_kicks, &mut row.away_corner_kicks),
                StatMetric::Crosses => (&mut row.home_crosses, &mut row.away_crosses),
                StatMetric::BallPossession => (&mut row.home_possession, &mut row.away_possession),
                StatMetric::TotalShots => (&mut row.home_total_shots, &mut row.away_total_shots),
                StatMetric::BlockedShots => (&mut row.home_blocked_shots, &mut row.away_blocked_shots),
                StatMetric::GoalkeeperSaves => (&mut row.goalkeeper_saves_home, &mut row.goalkeeper_saves_away),
                StatMetric::Pressing => (&mut row.home_pressing, &mut row.away_pressing),
            };
            *home = pair.home;
            *away = pair.away;
        }

        row
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CornerResult {
    pub match_id: u64,
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    pub home_corner_kicks: u32,
    pub away_corner_kicks: u32,
    pub total_corners: u32,
}

/// A finished match with its actual corner total, input to accuracy replay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoricalResult {
    pub home_team: String,
    pub away_team: String,
    pub total_corners: f64,
}
