//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during curve derivation
//! - persisted to the JSON store file
//! - exported as the dashboard JSON payload

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The two tracked metals.
///
/// The engine operates over whatever tenors are present in the input, but the
/// metal universe is fixed: the feed, the store, and the dashboard all speak
/// gold and silver only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Metal {
    Gold,
    Silver,
}

/// Front-end stress threshold for gold, in price units per month.
///
/// Manually tuned alongside the dashboard's stress flag; the streak
/// computation and any UI flag must gate on the same number.
pub const GOLD_STRESS_THRESHOLD: f64 = 20.0;

/// Front-end stress threshold for silver, in price units per month.
pub const SILVER_STRESS_THRESHOLD: f64 = 1.25;

impl Metal {
    pub const ALL: [Metal; 2] = [Metal::Gold, Metal::Silver];

    /// Uppercase label used in the feed, the store, and the JSON payload.
    pub fn display_name(self) -> &'static str {
        match self {
            Metal::Gold => "GOLD",
            Metal::Silver => "SILVER",
        }
    }

    /// Per-metal front-end stress threshold (`|p1 - p0|` must exceed this).
    pub fn stress_threshold(self) -> f64 {
        match self {
            Metal::Gold => GOLD_STRESS_THRESHOLD,
            Metal::Silver => SILVER_STRESS_THRESHOLD,
        }
    }

    /// Parse a feed spelling ("Gold", "GOLD", "silver", ...).
    pub fn parse(s: &str) -> Option<Metal> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("gold") {
            Some(Metal::Gold)
        } else if s.eq_ignore_ascii_case("silver") {
            Some(Metal::Silver)
        } else {
            None
        }
    }
}

/// A single ingested term-structure row.
///
/// Identity key: `(as_of_date, metal, tenor_months)`. The macro fields
/// (real yield, dollar index, deficit flag) ride along on every row of a
/// date and are expected to be identical across them; the pipeline checks
/// this and emits a data-quality warning when they differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub as_of_date: NaiveDate,
    pub metal: Metal,
    pub tenor_months: u32,
    pub price: f64,
    pub real_10y_yield: Option<f64>,
    pub dollar_index: Option<f64>,
    pub deficit_flag: Option<bool>,
}

/// One tenor on a derived curve: today's price joined with the prior date's.
///
/// Either side may be absent when that date had no row for the tenor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenorPoint {
    pub tenor_months: u32,
    pub price_today: Option<f64>,
    pub price_prior: Option<f64>,
}

/// A per-metal term-structure curve, tenors ascending and unique.
///
/// The tenor set is the union of tenors observed on the two joined dates: a
/// tenor present only in prior data still appears, with `price_today = None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub metal: Metal,
    pub points: Vec<TenorPoint>,
}

impl Curve {
    /// Exact-match price lookup by tenor. No interpolation anywhere in this
    /// system; a tenor that was never observed is simply absent.
    pub fn price_at(&self, tenor_months: u32, leg: Leg) -> Option<f64> {
        let p = self.points.iter().find(|p| p.tenor_months == tenor_months)?;
        match leg {
            Leg::Today => p.price_today,
            Leg::Prior => p.price_prior,
        }
    }
}

/// Which side of the today/prior join to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Today,
    Prior,
}

/// Scalar macro fields for the latest date and its prior, plus the gold
/// front-month (tenor 0) prices the dashboard headlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroSnapshot {
    pub as_of_date: NaiveDate,
    pub prior_as_of_date: Option<NaiveDate>,
    pub real_10y: Option<f64>,
    pub real_10y_prior: Option<f64>,
    pub dollar_index: Option<f64>,
    pub dollar_index_prior: Option<f64>,
    pub deficit_flag: Option<bool>,
    pub deficit_flag_prior: Option<bool>,
    pub gold_front_month: Option<f64>,
    pub gold_front_month_prior: Option<f64>,
}

/// Day-over-day deltas for the numeric macro fields.
///
/// The deficit flag is boolean, so it stays a before/after pair on the
/// snapshot rather than becoming a numeric delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroDeltas {
    pub real_10y_delta: Option<f64>,
    pub dollar_index_delta: Option<f64>,
    pub gold_front_month_delta: Option<f64>,
}
