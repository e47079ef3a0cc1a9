//! Lookback momentum classification.
//!
//! Percent change of the latest value versus the value `lookback_days`
//! observations back, bucketed into signal-vs-noise and direction. Short
//! series produce a distinct "Insufficient history" reading with no pct,
//! which must stay distinguishable from a genuine zero-movement flat.

/// Signal-vs-noise tag for a momentum reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumTag {
    Noise,
    Signal,
}

impl MomentumTag {
    pub fn label(self) -> &'static str {
        match self {
            MomentumTag::Noise => "Noise",
            MomentumTag::Signal => "Signal",
        }
    }
}

/// A classified momentum reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Momentum {
    /// "Up" / "Down" / "Flat", or "Insufficient history".
    pub label: &'static str,
    /// Percent change over the lookback; `None` for insufficient history.
    pub pct: Option<f64>,
    /// Signal-vs-noise; `None` for insufficient history.
    pub tag: Option<MomentumTag>,
}

impl Momentum {
    fn insufficient() -> Momentum {
        Momentum {
            label: "Insufficient history",
            pct: None,
            tag: None,
        }
    }
}

/// Classify momentum over an ascending-date value series.
///
/// Requires at least `lookback_days + 1` points; the base value is the one
/// `lookback_days` positions before the last. A zero base is degenerate
/// (the percent change is undefined) and reads as insufficient history
/// rather than an infinity.
pub fn momentum(series: &[f64], lookback_days: usize, noise_threshold_pct: f64) -> Momentum {
    if lookback_days == 0 || series.len() < lookback_days + 1 {
        return Momentum::insufficient();
    }

    let last = series[series.len() - 1];
    let base = series[series.len() - 1 - lookback_days];
    if base == 0.0 {
        return Momentum::insufficient();
    }

    let pct = (last - base) / base * 100.0;
    let tag = if pct.abs() < noise_threshold_pct {
        MomentumTag::Noise
    } else {
        MomentumTag::Signal
    };
    let label = if pct > 0.0 {
        "Up"
    } else if pct < 0.0 {
        "Down"
    } else {
        "Flat"
    };

    Momentum {
        label,
        pct: Some(pct),
        tag: Some(tag),
    }
}
