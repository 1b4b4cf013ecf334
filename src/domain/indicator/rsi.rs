//! RSI (Relative Strength Index) oscillator.
//!
//! Per-step gain = max(C[t] - C[t-1], 0), loss = max(C[t-1] - C[t], 0).
//! Average gain/loss is the simple mean over the last `period` steps; near the
//! start the window shrinks to the steps available so far.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 (including the first point, which has no step): RSI = 50

pub const DEFAULT_PERIOD: usize = 14;
pub const NEUTRAL: f64 = 50.0;

pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.is_empty() {
        return Vec::new();
    }

    let mut gains: Vec<f64> = Vec::with_capacity(closes.len() - 1);
    let mut losses: Vec<f64> = Vec::with_capacity(closes.len() - 1);

    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let mut values = Vec::with_capacity(closes.len());
    values.push(NEUTRAL);

    for step in 0..gains.len() {
        let start = (step + 1).saturating_sub(period);
        let count = (step + 1 - start) as f64;
        let avg_gain = gains[start..=step].iter().sum::<f64>() / count;
        let avg_loss = losses[start..=step].iter().sum::<f64>() / count;
        values.push(rsi_from_averages(avg_gain, avg_loss));
    }

    values
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return NEUTRAL;
    }
    100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
}
