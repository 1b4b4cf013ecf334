//! Simple Moving Average over closing prices.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]).
//! The first (n-1) points average every close seen so far, so no row is left
//! undefined.

pub fn calculate_sma(closes: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return Vec::new();
    }

    (0..closes.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &closes[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}
