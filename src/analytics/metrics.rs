//! Curve shape and slope metrics over a single derived curve.
//!
//! All numeric comparisons here use plain floating-point semantics with
//! strict `>`/`<` at the classification thresholds: a value exactly equal to
//! a threshold takes the non-extreme branch. The dashboard has always behaved
//! that way and downstream readings must not shift at the boundaries.
//!
//! Missing data never errors: any metric whose inputs are incomplete resolves
//! to `None` (or a `NoData` label), never to NaN or infinity.

use crate::domain::{Curve, Leg};

/// Shape classification slope threshold, in price units per tenor-month.
///
/// One fixed pair (+/-) regardless of metal. The stress detector uses
/// per-metal thresholds instead; that asymmetry is deliberate.
pub const SHAPE_SLOPE_THRESHOLD: f64 = 3.0;

/// Regime classification carry threshold (`p12 - p0`), in price units.
pub const REGIME_CARRY_THRESHOLD: f64 = 15.0;

/// Default slope-change interpretation bands (see [`interpret_slope`]).
pub const DEFAULT_SLOPE_BANDS: SlopeBands = SlopeBands { flat: 0.5, mild: 2.0 };

/// Default front-vs-back dominance ratio (see [`move_driver_label`]).
pub const DEFAULT_DRIVER_RATIO: f64 = 1.5;

/// Slope of the segment between two tenors: `(p(t2) - p(t1)) / (t2 - t1)`.
///
/// Units: price change per tenor-month. `None` if either endpoint price is
/// missing, or if `t1 == t2` (no segment to measure).
pub fn segment_slope(curve: &Curve, t1: u32, t2: u32, leg: Leg) -> Option<f64> {
    if t1 == t2 {
        return None;
    }
    let p1 = curve.price_at(t1, leg)?;
    let p2 = curve.price_at(t2, leg)?;
    Some((p2 - p1) / (t2 as f64 - t1 as f64))
}

/// Carry between two tenors: `p(t2) - p(t1)`. `None` on missing endpoints.
pub fn carry(curve: &Curve, t1: u32, t2: u32, leg: Leg) -> Option<f64> {
    let p1 = curve.price_at(t1, leg)?;
    let p2 = curve.price_at(t2, leg)?;
    Some(p2 - p1)
}

/// Curve shape classes, from the 0m -> 12m slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveShape {
    NoData,
    Steepening,
    Inverted,
    FlatMild,
}

impl CurveShape {
    pub fn label(self) -> &'static str {
        match self {
            CurveShape::NoData => "No data",
            CurveShape::Steepening => "Steepening (normal)",
            CurveShape::Inverted => "Inverted / stressed",
            CurveShape::FlatMild => "Flat / mild",
        }
    }
}

impl std::fmt::Display for CurveShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify the curve shape from the slope between tenor 0 and tenor 12.
///
/// `slope = (p12 - p0) / 12`; `> 3` steepening, `< -3` inverted, else
/// flat/mild. Slope exactly +/-3 is flat/mild (strict inequalities).
pub fn classify_shape(curve: &Curve, leg: Leg) -> CurveShape {
    let (Some(p0), Some(p12)) = (curve.price_at(0, leg), curve.price_at(12, leg)) else {
        return CurveShape::NoData;
    };
    let slope = (p12 - p0) / 12.0;
    if slope > SHAPE_SLOPE_THRESHOLD {
        CurveShape::Steepening
    } else if slope < -SHAPE_SLOPE_THRESHOLD {
        CurveShape::Inverted
    } else {
        CurveShape::FlatMild
    }
}

/// Term-structure regime, from the raw 0m -> 12m carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    NoData,
    Contango,
    Backwardation,
    Flat,
}

impl Regime {
    pub fn label(self) -> &'static str {
        match self {
            Regime::NoData => "No data",
            Regime::Contango => "Contango",
            Regime::Backwardation => "Backwardation",
            Regime::Flat => "Flat",
        }
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Regime label plus a short human-readable detail line for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeTag {
    pub regime: Regime,
    pub detail: String,
}

/// Tag the regime from `diff = p12 - p0`: `> 15` contango, `< -15`
/// backwardation, else flat. Exactly +/-15 is flat.
pub fn regime_tag(curve: &Curve, leg: Leg) -> RegimeTag {
    let (Some(p0), Some(p12)) = (curve.price_at(0, leg), curve.price_at(12, leg)) else {
        return RegimeTag {
            regime: Regime::NoData,
            detail: "missing tenor 0 or tenor 12 price".to_string(),
        };
    };
    let diff = p12 - p0;
    let regime = if diff > REGIME_CARRY_THRESHOLD {
        Regime::Contango
    } else if diff < -REGIME_CARRY_THRESHOLD {
        Regime::Backwardation
    } else {
        Regime::Flat
    };
    RegimeTag {
        regime,
        detail: format!("12m vs front carry {diff:+.2}"),
    }
}

/// Day-over-day change in a segment slope: `slope(today) - slope(prior)`.
pub fn slope_change(curve: &Curve, t1: u32, t2: u32) -> Option<f64> {
    let today = segment_slope(curve, t1, t2, Leg::Today)?;
    let prior = segment_slope(curve, t1, t2, Leg::Prior)?;
    Some(today - prior)
}

/// Interpretation bands for [`interpret_slope`], in price units per
/// tenor-month. `|delta| <= flat` reads flat; `<= mild` reads gentle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeBands {
    pub flat: f64,
    pub mild: f64,
}

/// Put a day-over-day slope delta into words.
///
/// Unlike the shape/regime classifiers, the band edges here are inclusive
/// (`<=`), matching the dashboard's historical reading.
pub fn interpret_slope(delta: f64, bands: SlopeBands) -> &'static str {
    let mag = delta.abs();
    if mag <= bands.flat {
        "Flat"
    } else if mag <= bands.mild {
        if delta > 0.0 {
            "Gentle upward carry"
        } else {
            "Gentle inversion"
        }
    } else if delta > 0.0 {
        "Upward carry (steep)"
    } else {
        "Inversion (sharp)"
    }
}

/// Which end of the curve drove a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDriver {
    NoData,
    FrontLed,
    BackLed,
    Mixed,
}

impl MoveDriver {
    pub fn label(self) -> &'static str {
        match self {
            MoveDriver::NoData => "No data",
            MoveDriver::FrontLed => "Front-led",
            MoveDriver::BackLed => "Back-led",
            MoveDriver::Mixed => "Mixed",
        }
    }
}

impl std::fmt::Display for MoveDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Compare front- and back-segment slope magnitudes: one side "leads" when
/// its magnitude exceeds the other's by more than `ratio`.
pub fn move_driver_label(
    front_slope: Option<f64>,
    back_slope: Option<f64>,
    ratio: f64,
) -> MoveDriver {
    let (Some(front), Some(back)) = (front_slope, back_slope) else {
        return MoveDriver::NoData;
    };
    let (front, back) = (front.abs(), back.abs());
    if front > back * ratio {
        MoveDriver::FrontLed
    } else if back > front * ratio {
        MoveDriver::BackLed
    } else {
        MoveDriver::Mixed
    }
}
