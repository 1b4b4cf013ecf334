//! Backtest summary metrics.

use serde::{Deserialize, Serialize};

use super::portfolio::{EquityPoint, Ledger};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_profit: f64,
    pub return_pct: f64,
    pub trade_count: usize,
    pub win_count: usize,
    pub loss_count: usize,
    pub win_rate: f64,
    /// Sum of per-share pnl over all sells.
    pub total_pnl: f64,
    pub max_drawdown: f64,
}

impl Metrics {
    pub fn compute(ledger: &Ledger) -> Self {
        let initial_capital = ledger.initial_capital;
        let total_profit = ledger.balance - initial_capital;

        let return_pct = if initial_capital > 0.0 {
            total_profit / initial_capital * 100.0
        } else {
            0.0
        };

        let mut win_count = 0usize;
        let mut loss_count = 0usize;
        let mut total_pnl = 0.0_f64;

        for pnl in ledger.trades.iter().filter_map(|t| t.pnl) {
            total_pnl += pnl;
            if pnl > 0.0 {
                win_count += 1;
            } else {
                loss_count += 1;
            }
        }

        let closed = win_count + loss_count;
        let win_rate = if closed > 0 {
            win_count as f64 / closed as f64
        } else {
            0.0
        };

        Metrics {
            total_profit,
            return_pct,
            trade_count: ledger.trades.len(),
            win_count,
            loss_count,
            win_rate,
            total_pnl,
            max_drawdown: compute_drawdown(&ledger.equity_curve),
        }
    }
}

/// Largest peak-to-trough decline of equity, as a fraction of the peak.
fn compute_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let Some(first) = equity_curve.first() else {
        return 0.0;
    };

    let mut peak = first.equity;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        } else if peak > 0.0 {
            let dd = (peak - point.equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}
