//! Traffic-light test for VaR model reliability.
//!
//! Under a correct model, the number of breaches in `N` independent days is
//! Binomial(N, p) with `p` the tail probability of the monitored quantile.
//! Breach counts that would be improbable under that distribution move the
//! model from green to amber to red.

use crate::config::BacktestConfig;
use crate::error::{RiskError, RiskResult};
use serde::{Deserialize, Serialize};
use statrs::distribution::{Binomial, DiscreteCDF};
use std::fmt;
use tracing::warn;

/// Reliability zone of a VaR model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrafficLight {
    /// Breach count consistent with the model.
    Green,
    /// Breach count unlikely under the model.
    Amber,
    /// Breach count practically impossible under the model.
    Red,
}

impl fmt::Display for TrafficLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrafficLight::Green => "green",
            TrafficLight::Amber => "amber",
            TrafficLight::Red => "red",
        };
        write!(f, "{name}")
    }
}

/// Tail probability of a quantile: the chance of a breach on any one day.
///
/// High quantiles monitor the upper tail (`1 - q/100`), low quantiles the
/// lower tail (`q/100`).
#[must_use]
pub fn tail_probability(quantile: f64) -> f64 {
    if quantile < 50.0 {
        quantile / 100.0
    } else {
        1.0 - quantile / 100.0
    }
}

/// Breach-count thresholds of the traffic-light test.
///
/// Always `green_amber < amber_red <= trials`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficLightThresholds {
    /// Number of trials `N` (the rolling window).
    pub trials: u64,

    /// Per-day breach probability `p`.
    pub tail_probability: f64,

    /// Smallest count whose upper tail probability is below the green/amber cutoff.
    pub green_amber: u64,

    /// Smallest count whose upper tail probability is below the amber/red cutoff.
    pub amber_red: u64,
}

impl TrafficLightThresholds {
    /// Computes thresholds from the exact Binomial(`trials`, `tail_probability`) CDF.
    ///
    /// `green_amber` is the smallest `x` in `[0, trials]` with
    /// `P(X >= x) < green_amber_cutoff`, `amber_red` likewise for
    /// `amber_red_cutoff`. When no count qualifies, `trials` is used. If
    /// that leaves the two thresholds equal, `green_amber` is lowered to
    /// `trials - 1` if needed and `amber_red` raised to `green_amber + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidInput`] unless `trials > 0`,
    /// `0 < tail_probability < 1` and `0 < amber_red_cutoff < green_amber_cutoff < 1`.
    pub fn compute(
        trials: u64,
        tail_probability: f64,
        green_amber_cutoff: f64,
        amber_red_cutoff: f64,
    ) -> RiskResult<Self> {
        if trials == 0 {
            return Err(RiskError::invalid_input("traffic-light test needs at least one trial"));
        }
        if !(tail_probability > 0.0 && tail_probability < 1.0) {
            return Err(RiskError::invalid_input(format!(
                "tail probability {tail_probability} is outside (0, 1)"
            )));
        }
        if !(amber_red_cutoff > 0.0 && amber_red_cutoff < green_amber_cutoff && green_amber_cutoff < 1.0) {
            return Err(RiskError::invalid_input(format!(
                "cutoffs must satisfy 0 < amber_red ({amber_red_cutoff}) < green_amber ({green_amber_cutoff}) < 1"
            )));
        }

        let binomial = Binomial::new(tail_probability, trials)
            .map_err(|e| RiskError::invalid_input(e.to_string()))?;
        let upper_tail = |x: u64| if x == 0 { 1.0 } else { 1.0 - binomial.cdf(x - 1) };
        let smallest_below = |cutoff: f64| {
            (0..=trials)
                .find(|&x| upper_tail(x) < cutoff)
                .unwrap_or(trials)
        };

        let mut green_amber = smallest_below(green_amber_cutoff);
        let mut amber_red = smallest_below(amber_red_cutoff);
        if amber_red <= green_amber {
            warn!(
                trials,
                tail_probability,
                green_amber,
                amber_red,
                "degenerate traffic-light thresholds; separating them"
            );
            green_amber = green_amber.min(trials - 1);
            amber_red = green_amber + 1;
        }

        Ok(Self {
            trials,
            tail_probability,
            green_amber,
            amber_red,
        })
    }

    /// Thresholds for monitoring `quantile` under `config`.
    ///
    /// # Errors
    ///
    /// See [`TrafficLightThresholds::compute`].
    pub fn for_quantile(quantile: f64, config: &BacktestConfig) -> RiskResult<Self> {
        Self::compute(
            config.window as u64,
            tail_probability(quantile),
            config.green_amber_cutoff,
            config.amber_red_cutoff,
        )
    }

    /// Zone of a breach count.
    #[must_use]
    pub fn classify(&self, breaches: u64) -> TrafficLight {
        if breaches < self.green_amber {
            TrafficLight::Green
        } else if breaches < self.amber_red {
            TrafficLight::Amber
        } else {
            TrafficLight::Red
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tail_probability() {
        assert_relative_eq!(tail_probability(99.0), 0.01, epsilon = 1e-12);
        assert_relative_eq!(tail_probability(1.0), 0.01, epsilon = 1e-12);
        assert_relative_eq!(tail_probability(97.5), 0.025, epsilon = 1e-12);
    }

    #[test]
    fn test_known_thresholds() {
        let t = TrafficLightThresholds::compute(250, 0.01, 0.05, 0.0001).unwrap();
        assert_eq!((t.green_amber, t.amber_red), (6, 11));

        let t = TrafficLightThresholds::compute(365, 0.01, 0.05, 0.0001).unwrap();
        assert_eq!((t.green_amber, t.amber_red), (8, 14));

        let t = TrafficLightThresholds::compute(365, 0.05, 0.05, 0.0001).unwrap();
        assert_eq!((t.green_amber, t.amber_red), (26, 36));
    }

    #[test]
    fn test_for_quantile_uses_window() {
        let config = BacktestConfig::default();
        let upper = TrafficLightThresholds::for_quantile(99.0, &config).unwrap();
        let lower = TrafficLightThresholds::for_quantile(1.0, &config).unwrap();
        assert_eq!(upper.trials, 365);
        assert_eq!(upper.green_amber, lower.green_amber);
        assert_eq!(upper.amber_red, lower.amber_red);
    }

    #[test]
    fn test_classify() {
        let t = TrafficLightThresholds::compute(250, 0.01, 0.05, 0.0001).unwrap();
        assert_eq!(t.classify(0), TrafficLight::Green);
        assert_eq!(t.classify(5), TrafficLight::Green);
        assert_eq!(t.classify(6), TrafficLight::Amber);
        assert_eq!(t.classify(10), TrafficLight::Amber);
        assert_eq!(t.classify(11), TrafficLight::Red);
        assert!(TrafficLight::Green < TrafficLight::Red);
    }

    #[test]
    fn test_degenerate_thresholds_separated() {
        // One trial at p = 0.5: no count is improbable enough for either cutoff.
        let t = TrafficLightThresholds::compute(1, 0.5, 0.05, 0.0001).unwrap();
        assert_eq!((t.green_amber, t.amber_red), (0, 1));

        // One trial at p = 0.01: only the green/amber cutoff is reachable.
        let t = TrafficLightThresholds::compute(1, 0.01, 0.05, 0.0001).unwrap();
        assert_eq!((t.green_amber, t.amber_red), (0, 1));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(TrafficLightThresholds::compute(0, 0.01, 0.05, 0.0001).is_err());
        assert!(TrafficLightThresholds::compute(10, 0.0, 0.05, 0.0001).is_err());
        assert!(TrafficLightThresholds::compute(10, 1.0, 0.05, 0.0001).is_err());
        assert!(TrafficLightThresholds::compute(10, 0.01, 0.0001, 0.05).is_err());
    }
}
