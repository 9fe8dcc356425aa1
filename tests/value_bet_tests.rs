use corners_ml::PredictionModel;
use corners_models::{
    AliasTable, Bookmaker, CornersError, Direction, FallbackTable, FeatureVector, Market, OddsEvent, Outcome,
    TeamStats, ValueBet,
};
use corners_services::{NormalizerConfig, Notifier, PredictorService, ValueBetConfig, ValueBetEvaluator};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// Quarter of the team's crosses, so totals are known in advance.
struct QuarterCrosses;

impl PredictionModel for QuarterCrosses {
    fn model_name(&self) -> &str {
        "QuarterCrosses"
    }

    fn predict(&self, features: &FeatureVector) -> f64 {
        features.crosses / 4.0
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, bet: &ValueBet) -> Result<(), CornersError> {
        self.sent.lock().unwrap().push(bet.alert_message());
        Ok(())
    }
}

struct FailingNotifier;

impl Notifier for FailingNotifier {
    async fn notify(&self, _bet: &ValueBet) -> Result<(), CornersError> {
        Err(CornersError::Notification("webhook returned HTTP 500".to_string()))
    }
}

fn stats(crosses: f64) -> TeamStats {
    TeamStats {
        total_crosses: Some(crosses),
        total_shots: Some(10.0),
        total_possession: Some(50.0),
        total_pressing: Some(80.0),
        total_blocked_shots: Some(3.0),
        total_gk_saves: Some(2.0),
        conceded_corners_avg: Some(4.5),
        total_corners: Some(5.0),
    }
}

fn predictor() -> PredictorService<QuarterCrosses> {
    let teams = BTreeMap::from([
        ("Arsenal".to_string(), stats(24.0)),
        ("Chelsea".to_string(), stats(16.0)),
    ]);
    let aliases = HashMap::from([("Arsenal FC".to_string(), "Arsenal".to_string())]);
    PredictorService::new(
        QuarterCrosses,
        FallbackTable::new(teams),
        AliasTable::new(aliases),
        NormalizerConfig::default(),
    )
}

fn outcome(name: &str, price: f64, point: f64) -> Outcome {
    Outcome { name: name.to_string(), price, point: Some(point) }
}

fn event(home: &str, away: &str, outcomes: Vec<Outcome>) -> OddsEvent {
    OddsEvent {
        id: format!("{home}-{away}"),
        home_team: home.to_string(),
        away_team: away.to_string(),
        commence_time: None,
        bookmakers: vec![Bookmaker {
            key: "unibet".to_string(),
            title: "Unibet".to_string(),
            markets: vec![
                Market { key: "h2h".to_string(), outcomes: vec![Outcome { name: "Arsenal".to_string(), price: 1.9, point: None }] },
                Market { key: "totals".to_string(), outcomes },
            ],
        }],
    }
}

fn events() -> Vec<OddsEvent> {
    vec![
        // expected total 10.0
        event(
            "Arsenal FC",
            "Chelsea",
            vec![
                outcome("Over", 2.0, 9.5),
                outcome("Under", 1.8, 9.5),
                outcome("Over", 1.5, 8.5),
                outcome("Under", 1.2, 11.5),
            ],
        ),
        event("Bayern Munich", "Chelsea", vec![outcome("Over", 5.0, 9.5)]),
    ]
}

#[tokio::test]
async fn test_scan_emits_sorted_value_bets_and_notifies_each() {
    let notifier = RecordingNotifier::default();
    let bets = ValueBetEvaluator::default().scan(&events(), &predictor(), &notifier).await;

    assert_eq!(bets.len(), 2);
    assert_eq!(bets[0].line, 9.5);
    assert_eq!(bets[0].direction, Direction::Over);
    assert_eq!(bets[1].line, 8.5);
    assert!(bets[0].value > bets[1].value);
    assert!(bets.iter().all(|b| b.value > 0.1));
    assert!(bets.iter().all(|b| b.match_label == "Arsenal vs Chelsea"));
    assert!(bets.iter().all(|b| b.expected_total == 10.0));

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|message| message.contains("Arsenal vs Chelsea")));
}

#[tokio::test]
async fn test_notification_failures_do_not_drop_bets() {
    let bets = ValueBetEvaluator::default().scan(&events(), &predictor(), &FailingNotifier).await;
    assert_eq!(bets.len(), 2);
}

#[tokio::test]
async fn test_higher_threshold_filters_more() {
    let evaluator = ValueBetEvaluator::new(ValueBetConfig { std_dev: 1.8, value_threshold: 0.2 });
    let notifier = RecordingNotifier::default();

    let bets = evaluator.scan(&events(), &predictor(), &notifier).await;

    assert_eq!(bets.len(), 1);
    assert_eq!(bets[0].odds, 2.0);
    assert_eq!(notifier.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_no_events_no_bets() {
    let notifier = RecordingNotifier::default();
    let bets = ValueBetEvaluator::default().scan(&[], &predictor(), &notifier).await;

    assert!(bets.is_empty());
    assert!(notifier.sent.lock().unwrap().is_empty());
}
