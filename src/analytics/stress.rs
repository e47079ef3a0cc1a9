//! Front-end stress streak detection.
//!
//! Counts how many most-recent consecutive observation dates show an
//! abnormally large spot-to-1m slope. This is a right-censored run length
//! ending at the latest available date, not a count over the whole window:
//! the walk stops at the first calm day, and also at the first day missing
//! either front tenor (missing data terminates counting, it is not "no
//! stress").

use std::collections::BTreeMap;

use crate::domain::Observation;

/// Count the unbroken tail of stressed dates in a front-tenor history.
///
/// `rows` is a single metal's history restricted to tenors 0 and 1 over some
/// caller-chosen lookback window; rows at other tenors are ignored. For each
/// date the front slope is the raw difference `p1 - p0` (the tenor gap is one
/// month, so no division), and the date counts as stressed when
/// `|p1 - p0| > threshold` (strict).
pub fn stress_streak(rows: &[Observation], threshold: f64) -> usize {
    // date -> (price at tenor 0, price at tenor 1); last write wins on dupes.
    let mut by_date: BTreeMap<chrono::NaiveDate, (Option<f64>, Option<f64>)> = BTreeMap::new();
    for r in rows {
        match r.tenor_months {
            0 => by_date.entry(r.as_of_date).or_default().0 = Some(r.price),
            1 => by_date.entry(r.as_of_date).or_default().1 = Some(r.price),
            _ => {}
        }
    }

    let mut streak = 0;
    for (_, (p0, p1)) in by_date.iter().rev() {
        let (Some(p0), Some(p1)) = (p0, p1) else {
            break;
        };
        if (p1 - p0).abs() > threshold {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}
