//! Pearson correlation between the two metal curves.
//!
//! Used to flag "divergence": the gold and silver curves normally move
//! together, so a weak or negative correlation across shared tenors is worth
//! surfacing. Small noisy samples make this fragile, hence the minimum pair
//! count and the degenerate-variance guard.

use crate::domain::{Curve, Leg};

/// Minimum number of valid pairs for a correlation to be reported.
pub const MIN_CORRELATION_PAIRS: usize = 3;

/// Correlation below this reads as divergence between the two curves.
pub const DIVERGENCE_THRESHOLD: f64 = 0.5;

/// Standard Pearson correlation over two equal-length series.
///
/// `None` with fewer than [`MIN_CORRELATION_PAIRS`] pairs, on mismatched
/// lengths, or when either series has zero variance (a constant series makes
/// the coefficient undefined; returning `None` avoids a division by zero).
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < MIN_CORRELATION_PAIRS {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x * var_y).sqrt())
}

/// Cross-metal divergence reading for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Divergence {
    pub correlation: Option<f64>,
    pub label: &'static str,
}

/// Correlate two metal curves' prices on their shared tenors.
///
/// Pairs are formed tenor-by-tenor where both curves have a price on the
/// requested leg; tenors missing on either side drop out of the sample.
pub fn curve_divergence(a: &Curve, b: &Curve, leg: Leg) -> Divergence {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for p in &a.points {
        let (Some(x), Some(y)) = (
            a.price_at(p.tenor_months, leg),
            b.price_at(p.tenor_months, leg),
        ) else {
            continue;
        };
        xs.push(x);
        ys.push(y);
    }

    let correlation = pearson(&xs, &ys);
    let label = match correlation {
        None => "No data",
        Some(c) if c < DIVERGENCE_THRESHOLD => "Diverging",
        Some(_) => "Tracking",
    };
    Divergence { correlation, label }
}
