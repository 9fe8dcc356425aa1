mod common;

use corners_ml::{BoosterParams, CornerModel, FeatureEngineer, PredictionModel, SearchConfig, SearchSpace};
use corners_models::{AliasTable, FallbackTable, PredictionRow};
use corners_services::{
    read_historical_results, write_csv, AccuracyReporter, NormalizerConfig, PredictorService, ReporterConfig,
};
use std::fs;

fn small_search() -> SearchConfig {
    SearchConfig {
        n_trials: 4,
        n_folds: 3,
        search_seed: Some(11),
        space: SearchSpace {
            max_depth: (2, 4),
            learning_rate: (0.05, 0.2),
            n_estimators: (20, 60),
            min_child_weight: (1, 2),
            ..SearchSpace::default()
        },
        ..SearchConfig::default()
    }
}

#[test]
fn test_training_skips_incomplete_records() {
    let rows = FeatureEngineer::new().training_rows(&common::fallback_table());

    assert_eq!(rows.len(), common::TEAMS.len());
    assert!(rows.iter().all(|row| row.team != "Ipswich"));
    assert!(rows.iter().all(|row| row.features.is_home == 1.0));
}

#[test]
fn test_train_save_load_predict_evaluate() {
    let dir = tempfile::tempdir().unwrap();
    let fallback_path = dir.path().join("fallback.json");
    let alias_path = dir.path().join("aliases.json");
    let model_path = dir.path().join("models").join("corners.json");
    let results_path = dir.path().join("results.csv");

    fs::write(&fallback_path, serde_json::to_string_pretty(&common::fallback_table()).unwrap()).unwrap();
    fs::write(&alias_path, r#"{ "Man City": "Manchester City", "Spurs": "Tottenham" }"#).unwrap();

    // train and persist
    let fallback = FallbackTable::load(&fallback_path).unwrap();
    let rows = FeatureEngineer::new().training_rows(&fallback);
    let (model, outcome) = CornerModel::train(&rows, &small_search()).unwrap();
    assert_eq!(outcome.trials.len(), 4);
    assert_eq!(model.cv_rmse(), Some(outcome.best_cv_rmse));
    model.save(&model_path).unwrap();

    // a fresh process would only see the artifacts on disk
    let loaded = CornerModel::load(&model_path).unwrap();
    assert_eq!(loaded.hyperparameters(), &outcome.best_params);
    assert_eq!(loaded.predict(&rows[0].features), model.predict(&rows[0].features));

    let predictor = PredictorService::new(
        loaded,
        FallbackTable::load(&fallback_path).unwrap(),
        AliasTable::load(&alias_path).unwrap(),
        NormalizerConfig::default(),
    );

    let prediction = predictor.predict_pair("Man City", "Spurs").unwrap();
    assert_eq!(prediction.home_team, "Manchester City");
    assert_eq!(prediction.away_team, "Tottenham");
    assert!(prediction.home_expected > 0.0 && prediction.away_expected > 0.0);
    assert_eq!(prediction.total_expected, prediction.home_expected + prediction.away_expected);
    assert!(predictor.predict_pair("Real Madrid", "Chelsea").is_none());
    // incomplete records still predict with zero-filled features
    assert!(predictor.predict_pair("Ipswich", "Chelsea").is_some());

    // replay a results file
    fs::write(
        &results_path,
        "match_id,date,home_team,away_team,home_corner_kicks,away_corner_kicks,total_corners\n\
         1,2025-01-04,Arsenal,Chelsea,7,3,10\n\
         2,2025-01-05,Man City,Spurs,8,6,14\n\
         3,2025-01-05,Chelsea,Arsenal,2,2,4\n\
         4,2025-01-06,Arsenal,Everton,5,6,11\n\
         5,2025-01-06,Barcelona,Everton,4,4,8\n\
         6,2025-01-07,Everton,Chelsea,,,\n",
    )
    .unwrap();

    let results = read_historical_results(&results_path).unwrap();
    assert_eq!(results.len(), 5);

    let report = AccuracyReporter::new(ReporterConfig::default()).replay(&results, &predictor);
    assert_eq!(report.total, 4);
    assert_eq!(report.records.len(), 4);
    assert_eq!(report.error_distribution.values().sum::<usize>(), 4);
    assert!((0.0..=100.0).contains(&report.accuracy));
    // only Arsenal reaches three appearances
    let teams: Vec<&str> = report.teams.iter().map(|t| t.team.as_str()).collect();
    assert_eq!(teams, vec!["Arsenal"]);
    assert_eq!(report.teams[0].games, 3);

    let output = dir.path().join("out").join("evaluation_results.csv");
    write_csv(&output, &report.records).unwrap();
    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with(
        "home_team,away_team,expected_corners,total_corners,expected_rounded,total_rounded,hit,abs_error,extreme_miss\n"
    ));
}

#[test]
fn test_retraining_replaces_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("corners.json");
    let rows = FeatureEngineer::new().training_rows(&common::fallback_table());

    let (first, _) = CornerModel::train(&rows, &small_search()).unwrap();
    first.save(&model_path).unwrap();
    let (second, _) = CornerModel::train(&rows, &SearchConfig { search_seed: Some(99), ..small_search() }).unwrap();
    second.save(&model_path).unwrap();

    let loaded = CornerModel::load(&model_path).unwrap();
    assert_eq!(loaded.hyperparameters(), second.hyperparameters());
    assert!(!dir.path().join("corners.json.tmp").exists());
}

#[test]
fn test_prediction_table_rows() {
    let dir = tempfile::tempdir().unwrap();
    let rows = FeatureEngineer::new().training_rows(&common::fallback_table());
    let model = CornerModel::fit_with(&rows, BoosterParams { max_depth: 3, n_estimators: 40, ..BoosterParams::default() }).unwrap();
    let predictor = PredictorService::new(
        model,
        common::fallback_table(),
        AliasTable::default(),
        NormalizerConfig::default(),
    );

    let prediction = predictor.predict_pair("Arsenal", "Chelsea").unwrap();
    let row = PredictionRow::from(&prediction);
    assert_eq!(row.match_label, "Arsenal vs Chelsea");
    assert_eq!(row.expected_corners, prediction.display_total());

    let path = dir.path().join("predictions.csv");
    write_csv(&path, &[row]).unwrap();
    assert!(fs::read_to_string(&path).unwrap().starts_with("match,expected_corners\n"));
}
