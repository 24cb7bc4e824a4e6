//! Engine tying decoding, decomposition and backtesting together.

use crate::error::Result;
use riskdeck_config::{EngineConfig, Validate};
use riskdeck_portfolio::RiskDecomposition;
use riskdeck_risk::VaRBacktestAnalysis;
use riskdeck_schema::{
    decode_many, decode_risk_attribution, decode_var_backtest, fetch_risk_attribution,
    fetch_var_backtest, RecordSource,
};
use serde_json::Value;
use tracing::{debug, info};

/// Runs raw records through the configured pipeline.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if `config` fails validation.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate_or_error()?;
        Ok(Self { config })
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decodes a risk attribution record and decomposes it.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed records and a portfolio error
    /// if the per-asset pivots disagree.
    pub fn decompose(&self, raw: &Value) -> Result<RiskDecomposition> {
        let result = decode_risk_attribution(raw, &self.config.decode)?;
        let decomposition = RiskDecomposition::new(&result, &self.config.aggregation)?;
        info!(
            shape = %decomposition.shape(),
            assets = decomposition.by_asset().len(),
            sectors = decomposition.by_sector().len(),
            "decomposed risk attribution"
        );
        Ok(decomposition)
    }

    /// Decomposes many risk attribution records, in input order.
    ///
    /// Records are decoded in parallel when the `parallel` feature is
    /// enabled and the batch is large enough.
    pub fn decompose_many(&self, records: &[Value]) -> Vec<Result<RiskDecomposition>> {
        debug!(records = records.len(), "decomposing batch");
        decode_many(records, &self.config.decode, decode_risk_attribution)
            .into_iter()
            .map(|decoded| {
                let result = decoded?;
                Ok(RiskDecomposition::new(&result, &self.config.aggregation)?)
            })
            .collect()
    }

    /// Decodes a VaR backtest record and analyses it.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed records and a risk error for an
    /// unknown quantile.
    pub fn backtest(&self, raw: &Value) -> Result<VaRBacktestAnalysis> {
        let result = decode_var_backtest(raw, &self.config.decode)?;
        let analysis = VaRBacktestAnalysis::new(&result, &self.config.backtest)?;
        info!(
            days = analysis.len(),
            quantiles = analysis.quantiles().len(),
            "analysed VaR backtest"
        );
        Ok(analysis)
    }

    /// Fetches a risk attribution from `source` and decomposes it.
    ///
    /// # Errors
    ///
    /// Returns a fetch error if the record cannot be delivered or decoded,
    /// and a portfolio error if the pivots disagree.
    pub fn fetch_decomposition<S: RecordSource + ?Sized>(
        &self,
        source: &S,
        body: Value,
    ) -> Result<RiskDecomposition> {
        let result = fetch_risk_attribution(source, body, &self.config.decode)?;
        Ok(RiskDecomposition::new(&result, &self.config.aggregation)?)
    }

    /// Fetches a VaR backtest from `source` and analyses it.
    ///
    /// # Errors
    ///
    /// Returns a fetch error if the record cannot be delivered or decoded,
    /// and a risk error for an unknown quantile.
    pub fn fetch_backtest<S: RecordSource + ?Sized>(
        &self,
        source: &S,
        body: Value,
    ) -> Result<VaRBacktestAnalysis> {
        let result = fetch_var_backtest(source, body, &self.config.decode)?;
        Ok(VaRBacktestAnalysis::new(&result, &self.config.backtest)?)
    }
}
