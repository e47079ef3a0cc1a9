//! Macro scalar snapshot and day-over-day deltas.
//!
//! The macro fields (real 10y yield, dollar index, deficit flag) ride along
//! on every curve row of a date and are expected to be identical across
//! them. That is an input assumption, not an enforced invariant: the
//! snapshot reads the first row of each date and separately reports any
//! disagreement as a data-quality warning.

use crate::domain::{MacroDeltas, MacroSnapshot, Metal, Observation};
use chrono::NaiveDate;

/// Build the macro snapshot for a latest/prior date pair.
///
/// `today` and `prior` are all rows (both metals) for their respective
/// dates; `prior` is empty when no prior date exists, which leaves every
/// prior-side field `None`. The gold front month is the gold tenor-0 price.
pub fn macro_snapshot(
    as_of_date: NaiveDate,
    prior_as_of_date: Option<NaiveDate>,
    today: &[Observation],
    prior: &[Observation],
) -> MacroSnapshot {
    let base_today = today.first();
    let base_prior = prior.first();

    MacroSnapshot {
        as_of_date,
        prior_as_of_date,
        real_10y: base_today.and_then(|o| o.real_10y_yield),
        real_10y_prior: base_prior.and_then(|o| o.real_10y_yield),
        dollar_index: base_today.and_then(|o| o.dollar_index),
        dollar_index_prior: base_prior.and_then(|o| o.dollar_index),
        deficit_flag: base_today.and_then(|o| o.deficit_flag),
        deficit_flag_prior: base_prior.and_then(|o| o.deficit_flag),
        gold_front_month: front_month(today, Metal::Gold),
        gold_front_month_prior: front_month(prior, Metal::Gold),
    }
}

/// `today - prior` for each numeric macro field; `None` unless both sides
/// are present. With no prior date every delta is `None`, never an error.
pub fn macro_deltas(snapshot: &MacroSnapshot) -> MacroDeltas {
    MacroDeltas {
        real_10y_delta: diff(snapshot.real_10y, snapshot.real_10y_prior),
        dollar_index_delta: diff(snapshot.dollar_index, snapshot.dollar_index_prior),
        gold_front_month_delta: diff(snapshot.gold_front_month, snapshot.gold_front_month_prior),
    }
}

/// Check that every row of a date carries the same macro values as the
/// first row. Returns human-readable warnings for the run report.
pub fn macro_consistency_warnings(date: NaiveDate, rows: &[Observation]) -> Vec<String> {
    let Some(base) = rows.first() else {
        return Vec::new();
    };

    let mut warnings = Vec::new();
    for r in &rows[1..] {
        if r.real_10y_yield != base.real_10y_yield
            || r.dollar_index != base.dollar_index
            || r.deficit_flag != base.deficit_flag
        {
            warnings.push(format!(
                "macro fields differ across rows for {date}: {} tenor {} disagrees with the first row",
                r.metal.display_name(),
                r.tenor_months
            ));
        }
    }
    warnings
}

fn front_month(rows: &[Observation], metal: Metal) -> Option<f64> {
    rows.iter()
        .find(|o| o.metal == metal && o.tenor_months == 0)
        .map(|o| o.price)
}

fn diff(today: Option<f64>, prior: Option<f64>) -> Option<f64> {
    Some(today? - prior?)
}
