//! Dashboard view assembly and terminal reporting.
//!
//! `DashboardView` is the wire shape existing consumers expect (the browser
//! charting UI reads these exact field names); `format` renders the richer
//! run output for the terminal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Curve, MacroSnapshot};

pub mod format;

pub use format::*;

/// Per-metal stress streaks, as the dashboard JSON names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressStreaks {
    pub gold: usize,
    pub silver: usize,
}

/// The dashboard JSON payload.
///
/// Field names are load-bearing: `asOfDate`, `priorDate`, `curves[].points[]
/// .tenorMonths/priceToday/pricePrior`, `macro.*`, `stressStreak.gold/silver`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub as_of_date: NaiveDate,
    pub prior_date: Option<NaiveDate>,
    pub curves: Vec<Curve>,
    #[serde(rename = "macro")]
    pub macros: MacroSnapshot,
    pub stress_streak: StressStreaks,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Metal, TenorPoint};

    #[test]
    fn view_serializes_with_consumer_field_names() {
        let view = DashboardView {
            as_of_date: NaiveDate::from_ymd_opt(2026, 8, 21).unwrap(),
            prior_date: None,
            curves: vec![Curve {
                metal: Metal::Gold,
                points: vec![TenorPoint {
                    tenor_months: 0,
                    price_today: Some(4500.0),
                    price_prior: None,
                }],
            }],
            macros: MacroSnapshot {
                as_of_date: NaiveDate::from_ymd_opt(2026, 8, 21).unwrap(),
                prior_as_of_date: None,
                real_10y: Some(1.9),
                real_10y_prior: None,
                dollar_index: None,
                dollar_index_prior: None,
                deficit_flag: Some(true),
                deficit_flag_prior: None,
                gold_front_month: Some(4500.0),
                gold_front_month_prior: None,
            },
            stress_streak: StressStreaks { gold: 2, silver: 0 },
        };

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["asOfDate"], "2026-08-21");
        assert_eq!(value["priorDate"], serde_json::Value::Null);
        assert_eq!(value["curves"][0]["metal"], "GOLD");
        assert_eq!(value["curves"][0]["points"][0]["tenorMonths"], 0);
        assert_eq!(value["curves"][0]["points"][0]["priceToday"], 4500.0);
        assert_eq!(value["curves"][0]["points"][0]["pricePrior"], serde_json::Value::Null);
        assert_eq!(value["macro"]["real10y"], 1.9);
        assert_eq!(value["macro"]["goldFrontMonth"], 4500.0);
        assert_eq!(value["macro"]["deficitFlagPrior"], serde_json::Value::Null);
        assert_eq!(value["stressStreak"]["gold"], 2);
        assert_eq!(value["stressStreak"]["silver"], 0);
    }
}
