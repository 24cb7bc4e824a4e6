//! Daily series arithmetic: P&L, breach test and rolling counts.

use serde::{Deserialize, Serialize};

/// Tail of the P&L distribution a quantile monitors.
///
/// Matches [`VaRQuantile::is_lower_tail`](riskdeck_core::VaRQuantile::is_lower_tail):
/// the lower tail is the gain tail, the upper tail the loss tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TailDirection {
    /// Gain tail, quantiles below 50: forecasts are gains, breached by larger gains.
    Lower,
    /// Loss tail, quantiles of 50 and above: forecasts are losses, breached by larger losses.
    Upper,
}

impl TailDirection {
    /// Direction monitored by `quantile`.
    #[must_use]
    pub fn of(quantile: f64) -> Self {
        if quantile < 50.0 {
            TailDirection::Lower
        } else {
            TailDirection::Upper
        }
    }

    /// `-1` for the lower tail, `+1` for the upper.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            TailDirection::Lower => -1.0,
            TailDirection::Upper => 1.0,
        }
    }
}

/// Day-over-day P&L: `baselines[t + 1] - baselines[t]`.
///
/// The last day has no next baseline and is `None`.
#[must_use]
pub fn pnl_absolute(baselines: &[f64]) -> Vec<Option<f64>> {
    let mut pnl: Vec<Option<f64>> = baselines
        .windows(2)
        .map(|pair| Some(pair[1] - pair[0]))
        .collect();
    if !baselines.is_empty() {
        pnl.push(None);
    }
    pnl
}

/// P&L relative to the day's baseline. `None` where the baseline is zero.
#[must_use]
pub fn pnl_relative(baselines: &[f64], pnl_absolute: &[Option<f64>]) -> Vec<Option<f64>> {
    baselines
        .iter()
        .zip(pnl_absolute)
        .map(|(&baseline, pnl)| pnl.filter(|_| baseline != 0.0).map(|p| p / baseline))
        .collect()
}

/// Returns true if realized P&L breaches the forecast.
///
/// The breach condition is `sign * (var_absolute + pnl) < 0`: for the upper
/// tail a loss larger than the forecast, for the lower tail a gain larger
/// than the (negative) forecast. Equality is not a breach.
#[must_use]
pub fn is_breach(direction: TailDirection, var_absolute: f64, pnl: f64) -> bool {
    direction.sign() * (var_absolute - (-pnl)) < 0.0
}

/// Trailing-window sums of `flags`.
///
/// Entry `t` counts the flags in `t + 1 - window ..= t`; the first
/// `window - 1` entries are `None`. A zero window yields all `None`.
#[must_use]
pub fn rolling_count(flags: &[bool], window: usize) -> Vec<Option<u32>> {
    let mut counts = Vec::with_capacity(flags.len());
    let mut running = 0u32;
    for (t, &flag) in flags.iter().enumerate() {
        running += u32::from(flag);
        if t >= window {
            running -= u32::from(flags[t - window]);
        }
        let full = window > 0 && t + 1 >= window;
        counts.push(full.then_some(running));
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pnl_absolute() {
        let pnl = pnl_absolute(&[100.0, 110.0, 99.0]);
        assert_eq!(pnl, vec![Some(10.0), Some(-11.0), None]);
        assert!(pnl_absolute(&[]).is_empty());
        assert_eq!(pnl_absolute(&[5.0]), vec![None]);
    }

    #[test]
    fn test_pnl_relative_zero_baseline() {
        let baselines = [0.0, 200.0, 180.0];
        let rel = pnl_relative(&baselines, &pnl_absolute(&baselines));
        assert_eq!(rel[0], None);
        assert_relative_eq!(rel[1].unwrap(), -0.1, epsilon = 1e-12);
        assert_eq!(rel[2], None);
    }

    #[test]
    fn test_breach_sign_convention() {
        assert!(is_breach(TailDirection::Upper, 100.0, -150.0));
        assert!(!is_breach(TailDirection::Upper, 100.0, -50.0));
        assert!(!is_breach(TailDirection::Upper, 100.0, -100.0));
        assert!(!is_breach(TailDirection::Upper, 100.0, 500.0));

        assert!(is_breach(TailDirection::Lower, -100.0, 150.0));
        assert!(!is_breach(TailDirection::Lower, -100.0, 50.0));
        assert!(!is_breach(TailDirection::Lower, -100.0, -500.0));
    }

    #[test]
    fn test_direction_of() {
        assert_eq!(TailDirection::of(1.0), TailDirection::Lower);
        assert_eq!(TailDirection::of(50.0), TailDirection::Upper);
        assert_eq!(TailDirection::of(99.0), TailDirection::Upper);
    }

    #[test]
    fn test_direction_agrees_with_forecast_tail() {
        for q in [0.5, 1.0, 5.0, 49.999, 50.0, 95.0, 99.0, 99.9] {
            let forecast = riskdeck_core::VaRQuantile::new(q, 1.0, 0.01).unwrap();
            let lower = TailDirection::of(q) == TailDirection::Lower;
            assert_eq!(lower, forecast.is_lower_tail(), "quantile {q}");
        }
    }

    #[test]
    fn test_rolling_count() {
        let flags = [true, false, true, true, false];
        assert_eq!(
            rolling_count(&flags, 3),
            vec![None, None, Some(2), Some(2), Some(2)]
        );
        assert_eq!(
            rolling_count(&flags, 1),
            vec![Some(1), Some(0), Some(1), Some(1), Some(0)]
        );
        assert!(rolling_count(&flags, 6).iter().all(Option::is_none));
        assert!(rolling_count(&flags, 0).iter().all(Option::is_none));
    }
}
