use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics, Statistics};

/// Risk profile of a simple-return series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Annualized standard deviation of returns
    pub volatility: f64,
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough decline of cumulative returns
    pub max_drawdown: f64,
    /// 5th percentile of the return distribution
    pub var_95: f64,
    /// Mean return in the tail at or below `var_95`
    pub cvar_95: f64,
}

/// Computes risk metrics from per-period simple returns.
///
/// `periods_per_year` annualizes volatility and Sharpe (365 for daily bars on
/// 24/7 token markets, 365*24 for hourly). Returns `None` below two
/// observations, where variance is undefined.
pub fn risk_metrics(returns: &[f64], periods_per_year: f64) -> Option<RiskMetrics> {
    if returns.len() < 2 {
        return None;
    }

    let mean = Statistics::mean(returns);
    let std_dev = Statistics::std_dev(returns);

    let sharpe_ratio = if std_dev > 0.0 {
        (mean * periods_per_year) / (std_dev * periods_per_year.sqrt())
    } else {
        0.0
    };

    // Max drawdown over the cumulative return path
    let mut cumulative = 0.0;
    let mut peak = f64::NEG_INFINITY;
    let mut max_drawdown = 0.0f64;
    for r in returns {
        cumulative += r;
        peak = peak.max(cumulative);
        max_drawdown = max_drawdown.max(peak - cumulative);
    }

    let mut data = Data::new(returns.to_vec());
    let var_95 = data.percentile(5);
    let tail: Vec<f64> = returns.iter().copied().filter(|r| *r <= var_95).collect();
    let cvar_95 = if tail.is_empty() {
        var_95
    } else {
        tail.iter().sum::<f64>() / tail.len() as f64
    };

    Some(RiskMetrics {
        volatility: std_dev * periods_per_year.sqrt(),
        sharpe_ratio,
        max_drawdown,
        var_95,
        cvar_95,
    })
}
