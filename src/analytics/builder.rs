//! Tenor-aligned curve construction.
//!
//! Joins the latest date's prices with the prior date's prices into one
//! ordered curve per metal. The caller (the pipeline, via the store) resolves
//! which dates are "today" and "prior"; this code never looks at dates.

use std::collections::BTreeMap;

use crate::domain::{Curve, Metal, Observation, TenorPoint};

/// Build a curve over the union of tenors seen on the two dates.
///
/// Inputs are pre-filtered to a single date and the requested metal. Output
/// points are sorted ascending by tenor and unique per tenor. A tenor present
/// on only one date still appears, with the other side `None`.
///
/// Duplicate rows for the same tenor (unclean upstream data) are resolved
/// first-seen; they are never averaged or summed. Empty input produces an
/// empty curve, not an error.
pub fn build_curve(metal: Metal, today: &[Observation], prior: &[Observation]) -> Curve {
    let mut by_tenor: BTreeMap<u32, (Option<f64>, Option<f64>)> = BTreeMap::new();

    for obs in today.iter().filter(|o| o.metal == metal) {
        let slot = by_tenor.entry(obs.tenor_months).or_insert((None, None));
        if slot.0.is_none() {
            slot.0 = Some(obs.price);
        }
    }
    for obs in prior.iter().filter(|o| o.metal == metal) {
        let slot = by_tenor.entry(obs.tenor_months).or_insert((None, None));
        if slot.1.is_none() {
            slot.1 = Some(obs.price);
        }
    }

    let points = by_tenor
        .into_iter()
        .map(|(tenor_months, (price_today, price_prior))| TenorPoint {
            tenor_months,
            price_today,
            price_prior,
        })
        .collect();

    Curve { metal, points }
}
