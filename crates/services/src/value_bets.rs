// Value bet detection on corner totals markets

use corners_ml::PredictionModel;
use corners_models::{round_to, Direction, OddsEvent, TotalsQuote, ValueBet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use crate::notifier::Notifier;
use crate::predictor::PredictorService;

/// Distribution and threshold used to price totals quotes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValueBetConfig {
    /// Standard deviation of the match total around the model expectation
    pub std_dev: f64,
    /// Minimum `probability * odds - 1` for a bet to be reported
    pub value_threshold: f64,
}

impl Default for ValueBetConfig {
    fn default() -> Self {
        Self { std_dev: 1.8, value_threshold: 0.1 }
    }
}

/// Standard normal CDF (Abramowitz-Stegun 7.1.26, error below 1.5e-7).
pub fn normal_cdf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let z = x.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + p * z);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-z * z).exp();

    0.5 * (1.0 + sign * y)
}

/// Prices totals quotes against the model's expected corners.
#[derive(Debug, Clone, Default)]
pub struct ValueBetEvaluator {
    config: ValueBetConfig,
}

impl ValueBetEvaluator {
    pub fn new(config: ValueBetConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValueBetConfig {
        &self.config
    }

    /// P(total > line) with total ~ N(expected_total, std_dev²).
    pub fn probability_over(&self, expected_total: f64, line: f64) -> f64 {
        1.0 - normal_cdf((line - expected_total) / self.config.std_dev)
    }

    /// Probability that the quote's side of the line wins.
    pub fn outcome_probability(&self, expected_total: f64, line: f64, direction: Direction) -> f64 {
        let over = self.probability_over(expected_total, line);
        match direction {
            Direction::Over => over,
            Direction::Under => 1.0 - over,
        }
    }

    /// A [`ValueBet`] if the quote's expected value clears the threshold.
    pub fn evaluate(&self, expected_total: f64, quote: &TotalsQuote) -> Option<ValueBet> {
        if quote.odds <= 0.0 || !quote.odds.is_finite() {
            debug!("⏭️  Ignoring {} quote with odds {}", quote.bookmaker, quote.odds);
            return None;
        }

        let probability = self.outcome_probability(expected_total, quote.line, quote.direction);
        let value = probability * quote.odds - 1.0;
        debug!(
            "📋 {} {} {} @ {} ({}): p={:.3} value={:.3}",
            quote.match_label, quote.direction, quote.line, quote.odds, quote.bookmaker, probability, value
        );

        if value <= self.config.value_threshold {
            return None;
        }

        Some(ValueBet {
            match_label: quote.match_label.clone(),
            expected_total,
            line: quote.line,
            direction: quote.direction,
            odds: quote.odds,
            implied_probability: 1.0 / quote.odds,
            probability,
            value,
            bookmaker: quote.bookmaker.clone(),
        })
    }

    /// Evaluate every totals quote of every matched event. Each emitted bet is
    /// sent to `notifier` once; delivery failures are logged and ignored.
    /// Results are ordered by value, highest first.
    pub async fn scan<M, N>(&self, events: &[OddsEvent], predictor: &PredictorService<M>, notifier: &N) -> Vec<ValueBet>
    where
        M: PredictionModel,
        N: Notifier,
    {
        let mut value_bets = Vec::new();

        for event in events {
            let Some(prediction) = predictor.predict_pair(&event.home_team, &event.away_team) else {
                continue;
            };
            let expected_total = round_to(prediction.total_expected, 2);
            info!("🔍 {}: expected corners {:.2}", prediction.label(), expected_total);

            for quote in event.totals_quotes(&prediction.label()) {
                let Some(bet) = self.evaluate(expected_total, &quote) else {
                    continue;
                };
                if let Err(e) = notifier.notify(&bet).await {
                    warn!("⚠️  Notification failed for {}: {}", bet.match_label, e);
                }
                value_bets.push(bet);
            }
        }

        value_bets.sort_by(|a, b| b.value.total_cmp(&a.value));
        info!("💰 Found {} value bets across {} events", value_bets.len(), events.len());
        value_bets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(line: f64, direction: Direction, odds: f64) -> TotalsQuote {
        TotalsQuote {
            match_label: "Arsenal vs Chelsea".to_string(),
            bookmaker: "Unibet".to_string(),
            line,
            direction,
            odds,
        }
    }

    #[test]
    fn test_normal_cdf_reference_points() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!((normal_cdf(1.96) - 0.975).abs() < 1e-4);
        assert!((normal_cdf(-1.0) - 0.158655).abs() < 1e-5);
        assert!((normal_cdf(1.0) + normal_cdf(-1.0) - 1.0).abs() < 1e-7);
    }

    #[test]
    fn test_over_bet_emitted_with_expected_value() {
        let evaluator = ValueBetEvaluator::default();
        let bet = evaluator.evaluate(10.0, &quote(9.5, Direction::Over, 2.0)).unwrap();

        let expected_probability = 1.0 - normal_cdf((9.5 - 10.0) / 1.8);
        assert!((bet.probability - expected_probability).abs() < 1e-12);
        assert!((bet.probability - 0.609).abs() < 0.005);
        assert!((bet.value - 0.219).abs() < 0.01);
        assert_eq!(bet.implied_probability, 0.5);
        assert_eq!(bet.bookmaker, "Unibet");
    }

    #[test]
    fn test_under_probability_is_complement() {
        let evaluator = ValueBetEvaluator::default();
        let over = evaluator.outcome_probability(10.0, 9.5, Direction::Over);
        let under = evaluator.outcome_probability(10.0, 9.5, Direction::Under);

        assert!((over + under - 1.0).abs() < 1e-12);
        assert!(evaluator.evaluate(10.0, &quote(9.5, Direction::Under, 2.0)).is_none());
    }

    #[test]
    fn test_threshold_filters_low_value() {
        let evaluator = ValueBetEvaluator::new(ValueBetConfig { std_dev: 1.8, value_threshold: 0.1 });
        // at the line the probability is one half
        assert!(evaluator.evaluate(9.5, &quote(9.5, Direction::Over, 2.1)).is_none());
        assert!(evaluator.evaluate(9.5, &quote(9.5, Direction::Over, 2.3)).is_some());
    }

    #[test]
    fn test_custom_std_dev() {
        let tight = ValueBetEvaluator::new(ValueBetConfig { std_dev: 0.5, value_threshold: 0.1 });
        let wide = ValueBetEvaluator::new(ValueBetConfig { std_dev: 5.0, value_threshold: 0.1 });

        assert!(tight.probability_over(10.0, 9.5) > wide.probability_over(10.0, 9.5));
    }

    #[test]
    fn test_non_positive_odds_ignored() {
        assert!(ValueBetEvaluator::default().evaluate(20.0, &quote(9.5, Direction::Over, 0.0)).is_none());
    }
}
