//! Shared dashboard pipeline used by the CLI commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! store reads -> curve join -> metrics/stress/macro/momentum -> view
//!
//! The CLI then focuses on presentation (terminal report vs JSON export).

use chrono::Duration;

use crate::analytics::{
    build_curve, classify_shape, curve_divergence, macro_consistency_warnings, macro_deltas,
    macro_snapshot, momentum, regime_tag, slope_change, stress_streak, CurveShape, Divergence,
    Momentum, MoveDriver, RegimeTag, DEFAULT_DRIVER_RATIO, DEFAULT_SLOPE_BANDS,
};
use crate::analytics::{interpret_slope, move_driver_label};
use crate::domain::{Curve, Leg, MacroDeltas, Metal};
use crate::error::AppError;
use crate::report::{DashboardView, StressStreaks};
use crate::store::ObservationStore;

/// Front segment of the curve (spot to 1m), used for move attribution.
pub const FRONT_SEGMENT: (u32, u32) = (0, 1);
/// Back segment of the curve (5m to 12m), used for move attribution.
pub const BACK_SEGMENT: (u32, u32) = (5, 12);

/// Tunable windows for a dashboard run.
#[derive(Debug, Clone, Copy)]
pub struct DashboardOptions {
    /// Calendar-day window for the stress streak and momentum series.
    pub lookback_days: i64,
    /// Momentum lookback, in observation days.
    pub momentum_lookback: usize,
    /// Momentum noise threshold, in percent.
    pub momentum_noise_pct: f64,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            lookback_days: 60,
            momentum_lookback: 5,
            momentum_noise_pct: 0.5,
        }
    }
}

/// Per-metal derived readings for the terminal report.
#[derive(Debug, Clone)]
pub struct MetalReading {
    pub metal: Metal,
    pub curve: Curve,
    pub shape_today: CurveShape,
    pub shape_prior: CurveShape,
    pub regime: RegimeTag,
    /// Day-over-day change in the 0m -> 12m slope, when both legs exist.
    pub slope_change_0_12: Option<f64>,
    pub slope_reading: Option<&'static str>,
    pub move_driver: MoveDriver,
    pub stress_streak: usize,
}

/// All computed outputs of a single dashboard run.
#[derive(Debug, Clone)]
pub struct DashboardRun {
    pub view: DashboardView,
    pub deltas: MacroDeltas,
    pub readings: Vec<MetalReading>,
    pub gold_momentum: Momentum,
    pub divergence: Divergence,
    pub warnings: Vec<String>,
}

/// Execute the full derivation pipeline against a store snapshot.
pub fn run_dashboard(
    store: &impl ObservationStore,
    opts: &DashboardOptions,
) -> Result<DashboardRun, AppError> {
    // 1) Resolve the latest and prior dates. One shared prior for both
    //    metals; no prior at all leaves every prior-side output null.
    let latest = store
        .latest_date()
        .ok_or_else(|| AppError::no_data("Store is empty. Run `metals ingest` first."))?;
    let prior = store.prior_date(latest);

    let today_rows = store.observations_on(latest);
    if today_rows.is_empty() {
        return Err(AppError::no_data(format!(
            "No observations stored for latest date {latest}."
        )));
    }
    let prior_rows = prior.map(|d| store.observations_on(d)).unwrap_or_default();

    // 2) Macro snapshot, deltas, and cross-row consistency warnings.
    let macros = macro_snapshot(latest, prior, &today_rows, &prior_rows);
    let deltas = macro_deltas(&macros);

    let mut warnings = macro_consistency_warnings(latest, &today_rows);
    if let Some(prior) = prior {
        warnings.extend(macro_consistency_warnings(prior, &prior_rows));
    }

    // 3) Per-metal curves and readings.
    let window_start = latest - Duration::days(opts.lookback_days.max(1) - 1);
    let mut readings = Vec::with_capacity(Metal::ALL.len());
    for metal in Metal::ALL {
        let curve = build_curve(metal, &today_rows, &prior_rows);

        let front = slope_change(&curve, FRONT_SEGMENT.0, FRONT_SEGMENT.1);
        let back = slope_change(&curve, BACK_SEGMENT.0, BACK_SEGMENT.1);
        let slope_change_0_12 = slope_change(&curve, 0, 12);

        let history = store.observations_in_range(metal, window_start, latest);
        let streak = stress_streak(&history, metal.stress_threshold());

        readings.push(MetalReading {
            metal,
            shape_today: classify_shape(&curve, Leg::Today),
            shape_prior: classify_shape(&curve, Leg::Prior),
            regime: regime_tag(&curve, Leg::Today),
            slope_change_0_12,
            slope_reading: slope_change_0_12.map(|d| interpret_slope(d, DEFAULT_SLOPE_BANDS)),
            move_driver: move_driver_label(front, back, DEFAULT_DRIVER_RATIO),
            stress_streak: streak,
            curve,
        });
    }

    // 4) Gold front-month momentum over the lookback window.
    let gold_front_series: Vec<f64> = store
        .observations_in_range(Metal::Gold, window_start, latest)
        .iter()
        .filter(|o| o.tenor_months == 0)
        .map(|o| o.price)
        .collect();
    let gold_momentum = momentum(
        &gold_front_series,
        opts.momentum_lookback,
        opts.momentum_noise_pct,
    );

    // 5) Cross-metal divergence on today's shared tenors.
    let divergence = curve_divergence(&readings[0].curve, &readings[1].curve, Leg::Today);

    let view = DashboardView {
        as_of_date: latest,
        prior_date: prior,
        curves: readings.iter().map(|r| r.curve.clone()).collect(),
        macros,
        stress_streak: StressStreaks {
            gold: readings[0].stress_streak,
            silver: readings[1].stress_streak,
        },
    };

    Ok(DashboardRun {
        view,
        deltas,
        readings,
        gold_momentum,
        divergence,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    fn obs(date: NaiveDate, metal: Metal, tenor: u32, price: f64) -> Observation {
        Observation {
            as_of_date: date,
            metal,
            tenor_months: tenor,
            price,
            real_10y_yield: Some(1.9),
            dollar_index: Some(98.4),
            deficit_flag: Some(true),
        }
    }

    /// Two days of the tracked tenor set, gold front end stressed on both.
    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        let gold_today = [4500.0, 4525.0, 4512.0, 4518.0, 4524.0, 4530.0, 4560.0];
        let gold_prior = [4480.0, 4503.0, 4495.0, 4500.0, 4505.0, 4510.0, 4535.0];
        let silver_today = [52.0, 52.4, 52.5, 52.6, 52.7, 52.8, 53.2];
        let silver_prior = [51.6, 52.0, 52.1, 52.2, 52.3, 52.4, 52.8];

        let tenors = [0u32, 1, 2, 3, 4, 5, 12];
        let mut rows = Vec::new();
        for (i, &t) in tenors.iter().enumerate() {
            rows.push(obs(day(20), Metal::Gold, t, gold_prior[i]));
            rows.push(obs(day(21), Metal::Gold, t, gold_today[i]));
            rows.push(obs(day(20), Metal::Silver, t, silver_prior[i]));
            rows.push(obs(day(21), Metal::Silver, t, silver_today[i]));
        }
        store.ingest(&rows);
        store
    }

    #[test]
    fn dashboard_run_resolves_dates_and_curves() {
        let run = run_dashboard(&seeded(), &DashboardOptions::default()).unwrap();
        assert_eq!(run.view.as_of_date, day(21));
        assert_eq!(run.view.prior_date, Some(day(20)));
        assert_eq!(run.view.curves.len(), 2);

        let gold = &run.view.curves[0];
        assert_eq!(gold.metal, Metal::Gold);
        let tenors: Vec<u32> = gold.points.iter().map(|p| p.tenor_months).collect();
        assert_eq!(tenors, vec![0, 1, 2, 3, 4, 5, 12]);
        assert_eq!(gold.points[0].price_today, Some(4500.0));
        assert_eq!(gold.points[0].price_prior, Some(4480.0));
    }

    #[test]
    fn stress_streaks_use_per_metal_thresholds() {
        let run = run_dashboard(&seeded(), &DashboardOptions::default()).unwrap();
        // Gold |p1 - p0|: 25 today, 23 prior -> streak 2 at threshold 20.
        assert_eq!(run.view.stress_streak.gold, 2);
        // Silver |p1 - p0|: 0.4 both days, under the 1.25 threshold.
        assert_eq!(run.view.stress_streak.silver, 0);
    }

    #[test]
    fn macro_and_deltas_come_from_first_rows() {
        let run = run_dashboard(&seeded(), &DashboardOptions::default()).unwrap();
        assert_eq!(run.view.macros.gold_front_month, Some(4500.0));
        assert_eq!(run.view.macros.gold_front_month_prior, Some(4480.0));
        assert_eq!(run.deltas.gold_front_month_delta, Some(20.0));
        assert_eq!(run.deltas.real_10y_delta, Some(0.0));
        assert!(run.warnings.is_empty());
    }

    #[test]
    fn gold_readings_classify_shape_and_regime() {
        let run = run_dashboard(&seeded(), &DashboardOptions::default()).unwrap();
        let gold = &run.readings[0];
        // Gold 0m -> 12m: slope (4560-4500)/12 = 5 > 3, carry 60 > 15.
        assert_eq!(gold.shape_today, CurveShape::Steepening);
        assert_eq!(gold.regime.regime.label(), "Contango");
        // Today slope 5.0, prior slope (4535-4480)/12 = 4.583..; change ~0.42.
        assert_eq!(gold.slope_reading, Some("Flat"));
    }

    #[test]
    fn single_date_store_has_null_prior_everywhere() {
        let mut store = MemoryStore::new();
        store.ingest(&[
            obs(day(21), Metal::Gold, 0, 4500.0),
            obs(day(21), Metal::Gold, 12, 4560.0),
        ]);

        let run = run_dashboard(&store, &DashboardOptions::default()).unwrap();
        assert_eq!(run.view.prior_date, None);
        assert_eq!(run.deltas.real_10y_delta, None);
        assert_eq!(run.readings[0].shape_prior, CurveShape::NoData);
        assert_eq!(run.readings[0].slope_change_0_12, None);
        assert!(run.view.curves[0].points.iter().all(|p| p.price_prior.is_none()));
        // Latest day has no tenor-1 row, so the streak walk stops at zero.
        assert_eq!(run.view.stress_streak.gold, 0);
    }

    #[test]
    fn empty_store_is_a_no_data_error() {
        let err = run_dashboard(&MemoryStore::new(), &DashboardOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn momentum_needs_enough_front_month_history() {
        let run = run_dashboard(&seeded(), &DashboardOptions::default()).unwrap();
        // Two front-month observations against a 5-day lookback.
        assert_eq!(run.gold_momentum.label, "Insufficient history");

        let shorter = DashboardOptions {
            momentum_lookback: 1,
            ..DashboardOptions::default()
        };
        let run = run_dashboard(&seeded(), &shorter).unwrap();
        assert_eq!(run.gold_momentum.label, "Up");
    }

    #[test]
    fn divergence_tracks_comoving_curves() {
        let run = run_dashboard(&seeded(), &DashboardOptions::default()).unwrap();
        assert_eq!(run.divergence.label, "Tracking");
    }

    #[test]
    fn run_is_deterministic() {
        let store = seeded();
        let opts = DashboardOptions::default();
        let a = run_dashboard(&store, &opts).unwrap();
        let b = run_dashboard(&store, &opts).unwrap();
        assert_eq!(a.view, b.view);
        assert_eq!(
            serde_json::to_string(&a.view).unwrap(),
            serde_json::to_string(&b.view).unwrap()
        );
    }
}
