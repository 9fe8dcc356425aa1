use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use corners_ml::SearchConfig;
use corners_services::{
    FixturesApiConfig, NormalizerConfig, OddsApiConfig, ReporterConfig, SofascoreConfig, ValueBetConfig,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub normalizer: NormalizerConfig,
    pub training: TrainingConfig,
    pub value_bets: ValueBetConfig,
    pub evaluation: ReporterConfig,
    pub sources: SourcesConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub model_path: PathBuf,
    pub fallback_path: PathBuf,
    pub alias_path: PathBuf,
    /// Historical corner results replayed by `evaluate`
    pub results_path: PathBuf,
    pub output_dir: PathBuf,
    pub cache_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub n_trials: usize,
    pub n_folds: usize,
    pub cv_seed: u64,
    pub model_seed: u64,
    #[serde(default)]
    pub search_seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub sofascore: SofascoreConfig,
    pub odds_api: OddsApiConfig,
    pub fixtures_api: FixturesApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    pub discord_webhook_url: Option<String>,
    #[serde(default = "default_notify_timeout")]
    pub timeout_secs: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { discord_webhook_url: None, timeout_secs: default_notify_timeout() }
    }
}

fn default_notify_timeout() -> u64 {
    10
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Self::with_defaults(Config::builder())?
            // Add in settings from configuration file
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // CORNERS__VALUE_BETS__STD_DEV=2.0 and so on
            .add_source(Environment::with_prefix("CORNERS").separator("__").try_parsing(true))
            .build()?;

        config.try_deserialize()
    }

    fn with_defaults(builder: ConfigBuilder<DefaultState>) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let sofascore = SofascoreConfig::default();
        let odds_api = OddsApiConfig::default();
        let fixtures_api = FixturesApiConfig::default();

        builder
            .set_default("paths.model_path", "models/corners_model.json")?
            .set_default("paths.fallback_path", "fallbacks/fallback_home_away_total.json")?
            .set_default("paths.alias_path", "data/team_aliases.json")?
            .set_default("paths.results_path", "data/corner_results.csv")?
            .set_default("paths.output_dir", "output")?
            .set_default("paths.cache_dir", "data")?
            .set_default("normalizer.similarity_cutoff", 0.85)?
            .set_default("training.n_trials", 100)?
            .set_default("training.n_folds", 5)?
            .set_default("training.cv_seed", 42)?
            .set_default("training.model_seed", 42)?
            .set_default("value_bets.std_dev", 1.8)?
            .set_default("value_bets.value_threshold", 0.1)?
            .set_default("evaluation.min_team_games", 3)?
            .set_default("evaluation.extreme_miss_threshold", 5)?
            .set_default("sources.sofascore.base_url", sofascore.base_url)?
            .set_default(
                "sources.sofascore.tournament_ids",
                sofascore.tournament_ids.into_iter().map(i64::from).collect::<Vec<_>>(),
            )?
            .set_default("sources.sofascore.user_agent", sofascore.user_agent)?
            .set_default("sources.sofascore.request_timeout_secs", sofascore.request_timeout_secs)?
            .set_default("sources.sofascore.request_delay_ms", sofascore.request_delay_ms)?
            .set_default("sources.odds_api.base_url", odds_api.base_url)?
            .set_default("sources.odds_api.regions", odds_api.regions)?
            .set_default("sources.odds_api.request_timeout_secs", odds_api.request_timeout_secs)?
            .set_default("sources.fixtures_api.base_url", fixtures_api.base_url)?
            .set_default(
                "sources.fixtures_api.league_ids",
                fixtures_api.league_ids.into_iter().map(i64::from).collect::<Vec<_>>(),
            )?
            .set_default("sources.fixtures_api.season", i64::from(fixtures_api.season))?
            .set_default("sources.fixtures_api.request_timeout_secs", fixtures_api.request_timeout_secs)
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            n_trials: self.training.n_trials,
            n_folds: self.training.n_folds,
            cv_seed: self.training.cv_seed,
            model_seed: self.training.model_seed,
            search_seed: self.training.search_seed,
            ..SearchConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults_only() -> AppConfig {
        AppConfig::with_defaults(Config::builder())
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_match_component_defaults() {
        let config = defaults_only();

        assert_eq!(config.normalizer, NormalizerConfig::default());
        assert_eq!(config.value_bets, ValueBetConfig::default());
        assert_eq!(config.evaluation, ReporterConfig::default());
        assert_eq!(config.sources.sofascore, SofascoreConfig::default());
        assert_eq!(config.sources.fixtures_api, FixturesApiConfig::default());
        assert!(config.sources.odds_api.api_key.is_empty());
        assert!(config.notifications.discord_webhook_url.is_none());
    }

    #[test]
    fn test_search_config_from_training_section() {
        let search = defaults_only().search_config();

        assert_eq!(search.n_trials, 100);
        assert_eq!(search.n_folds, 5);
        assert_eq!(search.cv_seed, 42);
        assert_eq!(search.search_seed, None);
    }
}
