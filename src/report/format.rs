//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the derivation code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::DashboardRun;
use crate::domain::{Metal, Observation};
use crate::io::ingest::ParsedFeed;
use crate::store::{IngestOutcome, MemoryStore};

/// Format the full dashboard run: dates, macro, per-metal readings, warnings.
pub fn format_dashboard(run: &DashboardRun) -> String {
    let mut out = String::new();

    out.push_str("=== metals - Gold & Silver Term Structure ===\n");
    out.push_str(&format!("As-of: {}\n", run.view.as_of_date));
    out.push_str(&format!("Prior: {}\n", fmt_opt_date(run.view.prior_date)));

    out.push_str("\nMacro:\n");
    out.push_str(&format!(
        "- Real 10y yield : {} (d/d {})\n",
        fmt_opt(run.view.macros.real_10y, 2),
        fmt_opt_signed(run.deltas.real_10y_delta, 2)
    ));
    out.push_str(&format!(
        "- Dollar index   : {} (d/d {})\n",
        fmt_opt(run.view.macros.dollar_index, 2),
        fmt_opt_signed(run.deltas.dollar_index_delta, 2)
    ));
    out.push_str(&format!(
        "- Gold front mo. : {} (d/d {})\n",
        fmt_opt(run.view.macros.gold_front_month, 1),
        fmt_opt_signed(run.deltas.gold_front_month_delta, 1)
    ));
    out.push_str(&format!(
        "- Deficit flag   : {} (prior {})\n",
        fmt_opt_flag(run.view.macros.deficit_flag),
        fmt_opt_flag(run.view.macros.deficit_flag_prior)
    ));

    for reading in &run.readings {
        out.push_str(&format!("\n{}:\n", reading.metal.display_name()));
        out.push_str(&format_curve_table(reading));
        out.push_str(&format!("- Shape today  : {}\n", reading.shape_today));
        out.push_str(&format!("- Shape prior  : {}\n", reading.shape_prior));
        out.push_str(&format!(
            "- Regime       : {} ({})\n",
            reading.regime.regime, reading.regime.detail
        ));
        out.push_str(&format!(
            "- Slope change : {} -> {}\n",
            fmt_opt_signed(reading.slope_change_0_12, 3),
            reading.slope_reading.unwrap_or("No data")
        ));
        out.push_str(&format!("- Move driver  : {}\n", reading.move_driver));
        out.push_str(&format!(
            "- Stress streak: {} day(s) (threshold {})\n",
            reading.stress_streak,
            reading.metal.stress_threshold()
        ));
    }

    out.push_str("\nSignals:\n");
    out.push_str(&format!(
        "- Gold momentum  : {}{}\n",
        run.gold_momentum.label,
        match (run.gold_momentum.pct, run.gold_momentum.tag) {
            (Some(pct), Some(tag)) => format!(" {pct:+.2}% ({})", tag.label()),
            _ => String::new(),
        }
    ));
    out.push_str(&format!(
        "- Gold vs silver : {}{}\n",
        run.divergence.label,
        match run.divergence.correlation {
            Some(c) => format!(" (corr {c:.3})"),
            None => String::new(),
        }
    ));

    if !run.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for w in &run.warnings {
            out.push_str(&format!("- {w}\n"));
        }
    }

    out
}

fn format_curve_table(reading: &crate::app::pipeline::MetalReading) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>8} {:>12} {:>12} {:>10}\n",
        "tenor", "today", "prior", "delta"
    ));
    for p in &reading.curve.points {
        let delta = match (p.price_today, p.price_prior) {
            (Some(t), Some(pr)) => format!("{:+.2}", t - pr),
            _ => "-".to_string(),
        };
        out.push_str(&format!(
            "{:>7}m {:>12} {:>12} {:>10}\n",
            p.tenor_months,
            fmt_opt(p.price_today, 2),
            fmt_opt(p.price_prior, 2),
            delta
        ));
    }
    out
}

/// Format an ingest batch summary, including rejected rows.
pub fn format_ingest(feed: &ParsedFeed, outcome: &IngestOutcome) -> String {
    let mut out = String::new();
    out.push_str("=== metals - Feed ingest ===\n");
    out.push_str(&format!(
        "Rows: {} read | {} valid | {} rejected\n",
        feed.rows_read,
        feed.rows.len(),
        feed.row_errors.len()
    ));
    out.push_str(&format!(
        "Store: {} upserted (latest) | {} appended (history) | {} already present\n",
        outcome.upserted, outcome.appended, outcome.duplicates
    ));

    if !feed.row_errors.is_empty() {
        out.push_str("\nRejected rows:\n");
        for e in &feed.row_errors {
            out.push_str(&format!("- line {}: {}\n", e.line, e.message));
        }
    }
    out
}

/// Format one metal's stored history, one line per (date, tenor).
pub fn format_history(metal: Metal, rows: &[Observation]) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== metals - {} history ===\n", metal.display_name()));
    if rows.is_empty() {
        out.push_str("(no rows)\n");
        return out;
    }
    out.push_str(&format!("{:>12} {:>8} {:>12}\n", "date", "tenor", "price"));
    for r in rows {
        out.push_str(&format!(
            "{:>12} {:>7}m {:>12.2}\n",
            r.as_of_date.to_string(),
            r.tenor_months,
            r.price
        ));
    }
    out
}

/// Format store health counts: date coverage plus rows per (date, metal).
pub fn format_validate(store: &MemoryStore) -> String {
    let mut out = String::new();
    out.push_str("=== metals - Store validation ===\n");

    let dates = store.history_dates();
    out.push_str(&format!(
        "History: {} rows over {} day(s)",
        store.history_len(),
        dates.len()
    ));
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => out.push_str(&format!(" [{first} .. {last}]\n")),
        _ => out.push('\n'),
    }
    out.push_str(&format!("Latest projection: {} rows\n", store.latest_rows().len()));

    let counts = store.counts_by_date_metal();
    if !counts.is_empty() {
        out.push_str("\nRows per date/metal:\n");
        for (date, metal, n) in counts.iter().rev().take(60) {
            out.push_str(&format!("- {date} {:<6} {n}\n", metal.display_name()));
        }
    }
    out
}

fn fmt_opt(v: Option<f64>, digits: usize) -> String {
    match v {
        Some(v) => format!("{v:.digits$}"),
        None => "-".to_string(),
    }
}

fn fmt_opt_signed(v: Option<f64>, digits: usize) -> String {
    match v {
        Some(v) => format!("{v:+.digits$}"),
        None => "-".to_string(),
    }
}

fn fmt_opt_flag(v: Option<bool>) -> &'static str {
    match v {
        Some(true) => "On",
        Some(false) => "Off",
        None => "-",
    }
}

fn fmt_opt_date(v: Option<chrono::NaiveDate>) -> String {
    match v {
        Some(d) => d.to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::{run_dashboard, DashboardOptions};
    use crate::domain::Metal;
    use chrono::NaiveDate;

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        let day = |d: u32| NaiveDate::from_ymd_opt(2026, 8, d).unwrap();
        let mut rows = Vec::new();
        for (date, p0, p12) in [(day(20), 4480.0, 4535.0), (day(21), 4500.0, 4560.0)] {
            for (tenor, price) in [(0u32, p0), (12u32, p12)] {
                rows.push(Observation {
                    as_of_date: date,
                    metal: Metal::Gold,
                    tenor_months: tenor,
                    price,
                    real_10y_yield: Some(1.9),
                    dollar_index: Some(98.4),
                    deficit_flag: Some(true),
                });
            }
        }
        store.ingest(&rows);
        store
    }

    #[test]
    fn dashboard_report_names_the_dates_and_readings() {
        let run = run_dashboard(&seeded(), &DashboardOptions::default()).unwrap();
        let text = format_dashboard(&run);
        assert!(text.contains("As-of: 2026-08-21"));
        assert!(text.contains("Prior: 2026-08-20"));
        assert!(text.contains("GOLD:"));
        assert!(text.contains("SILVER:"));
        assert!(text.contains("Contango"));
        assert!(text.contains("Stress streak: 0 day(s)"));
    }

    #[test]
    fn validate_report_counts_rows() {
        let text = format_validate(&seeded());
        assert!(text.contains("History: 4 rows over 2 day(s)"));
        assert!(text.contains("[2026-08-20 .. 2026-08-21]"));
        assert!(text.contains("GOLD"));
    }
}
