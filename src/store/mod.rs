//! Observation storage.
//!
//! The engine only ever consumes the four read operations on
//! [`ObservationStore`]; everything else here is the reference
//! implementation backing the CLI: an in-memory store with the same
//! latest/history split as the production database, round-tripped through a
//! JSON file so `metals ingest` runs accumulate across invocations.
//!
//! - **latest**: one row per `(metal, tenor)`, replaced on every ingest
//! - **history**: append-only, one row per `(date, metal, tenor)`;
//!   re-ingesting an existing key is a silent no-op, not an error

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Metal, Observation};
use crate::error::AppError;

/// Read interface the derivation pipeline consumes.
///
/// Date resolution semantics the engine depends on: `latest_date` is the max
/// date with any history row; `prior_date` is the max date strictly before
/// the given one, shared across metals (one prior for both curves, never a
/// per-metal prior).
pub trait ObservationStore {
    fn latest_date(&self) -> Option<NaiveDate>;
    fn prior_date(&self, before: NaiveDate) -> Option<NaiveDate>;
    /// All rows for one date, ordered by (metal, tenor).
    fn observations_on(&self, date: NaiveDate) -> Vec<Observation>;
    /// One metal's rows over an inclusive date range, date-ascending.
    fn observations_in_range(&self, metal: Metal, from: NaiveDate, to: NaiveDate) -> Vec<Observation>;
}

/// Counts from one ingest batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOutcome {
    pub upserted: usize,
    pub appended: usize,
    /// History keys that already existed (no-op re-ingestion).
    pub duplicates: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    history: BTreeMap<(NaiveDate, Metal, u32), Observation>,
    latest: BTreeMap<(Metal, u32), Observation>,
}

/// On-disk shape of the store file.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    latest: Vec<Observation>,
    history: Vec<Observation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store file, or start empty when the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let file = File::open(path)
            .map_err(|e| AppError::usage(format!("Failed to open store '{}': {e}", path.display())))?;
        let parsed: StoreFile = serde_json::from_reader(file)
            .map_err(|e| AppError::usage(format!("Invalid store file '{}': {e}", path.display())))?;

        let mut store = Self::new();
        for obs in parsed.history {
            store
                .history
                .insert((obs.as_of_date, obs.metal, obs.tenor_months), obs);
        }
        for obs in parsed.latest {
            store.latest.insert((obs.metal, obs.tenor_months), obs);
        }
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let file = File::create(path)
            .map_err(|e| AppError::usage(format!("Failed to create store '{}': {e}", path.display())))?;
        let out = StoreFile {
            latest: self.latest.values().cloned().collect(),
            history: self.history.values().cloned().collect(),
        };
        serde_json::to_writer_pretty(file, &out)
            .map_err(|e| AppError::usage(format!("Failed to write store '{}': {e}", path.display())))?;
        Ok(())
    }

    /// Apply one ingest batch: upsert the latest projection, append history.
    pub fn ingest(&mut self, rows: &[Observation]) -> IngestOutcome {
        let mut outcome = IngestOutcome::default();
        for obs in rows {
            self.latest.insert((obs.metal, obs.tenor_months), obs.clone());
            outcome.upserted += 1;

            let key = (obs.as_of_date, obs.metal, obs.tenor_months);
            if self.history.contains_key(&key) {
                outcome.duplicates += 1;
            } else {
                self.history.insert(key, obs.clone());
                outcome.appended += 1;
            }
        }
        outcome
    }

    /// The latest projection, ordered by (metal, tenor).
    pub fn latest_rows(&self) -> Vec<Observation> {
        self.latest.values().cloned().collect()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Distinct history dates, ascending.
    pub fn history_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.history.keys().map(|(d, _, _)| *d).collect();
        dates.dedup();
        dates
    }

    /// Row counts per (date, metal), date-ascending. Used by `metals validate`.
    pub fn counts_by_date_metal(&self) -> Vec<(NaiveDate, Metal, usize)> {
        let mut counts: BTreeMap<(NaiveDate, Metal), usize> = BTreeMap::new();
        for (date, metal, _) in self.history.keys() {
            *counts.entry((*date, *metal)).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .map(|((date, metal), n)| (date, metal, n))
            .collect()
    }
}

impl ObservationStore for MemoryStore {
    fn latest_date(&self) -> Option<NaiveDate> {
        self.history.keys().next_back().map(|(d, _, _)| *d)
    }

    fn prior_date(&self, before: NaiveDate) -> Option<NaiveDate> {
        self.history
            .range(..(before, Metal::Gold, 0))
            .next_back()
            .map(|((d, _, _), _)| *d)
    }

    fn observations_on(&self, date: NaiveDate) -> Vec<Observation> {
        self.history
            .range((date, Metal::Gold, 0)..=(date, Metal::Silver, u32::MAX))
            .map(|(_, obs)| obs.clone())
            .collect()
    }

    fn observations_in_range(&self, metal: Metal, from: NaiveDate, to: NaiveDate) -> Vec<Observation> {
        self.history
            .range((from, Metal::Gold, 0)..=(to, Metal::Silver, u32::MAX))
            .filter(|((_, m, _), _)| *m == metal)
            .map(|(_, obs)| obs.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.ingest(&[
            obs(day(13), Metal::Gold, 0, 4480.0),
            obs(day(13), Metal::Silver, 0, 51.5),
            obs(day(14), Metal::Gold, 0, 4490.0),
            obs(day(14), Metal::Gold, 12, 4520.0),
            obs(day(15), Metal::Gold, 0, 4500.0),
            obs(day(15), Metal::Silver, 0, 52.0),
        ]);
        store
    }

    #[test]
    fn latest_and_prior_date_resolution() {
        let store = seeded();
        assert_eq!(store.latest_date(), Some(day(15)));
        assert_eq!(store.prior_date(day(15)), Some(day(14)));
        // Prior is shared across metals: day 14 has no silver rows but is
        // still the prior for both curves.
        assert_eq!(store.prior_date(day(14)), Some(day(13)));
        assert_eq!(store.prior_date(day(13)), None);
    }

    #[test]
    fn empty_store_has_no_dates() {
        let store = MemoryStore::new();
        assert_eq!(store.latest_date(), None);
        assert_eq!(store.prior_date(day(15)), None);
        assert!(store.observations_on(day(15)).is_empty());
    }

    #[test]
    fn observations_on_orders_by_metal_then_tenor() {
        let store = seeded();
        let rows = store.observations_on(day(15));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].metal, Metal::Gold);
        assert_eq!(rows[1].metal, Metal::Silver);
    }

    #[test]
    fn range_query_filters_metal_and_sorts_ascending() {
        let store = seeded();
        let rows = store.observations_in_range(Metal::Gold, day(13), day(15));
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.as_of_date).collect();
        assert_eq!(dates, vec![day(13), day(14), day(14), day(15)]);
        assert!(rows.iter().all(|r| r.metal == Metal::Gold));
    }

    #[test]
    fn reingest_is_a_noop_on_history_but_updates_latest() {
        let mut store = seeded();
        let before = store.history_len();

        let outcome = store.ingest(&[obs(day(15), Metal::Gold, 0, 4999.0)]);
        assert_eq!(outcome.duplicates, 1);
        assert_eq!(outcome.appended, 0);
        assert_eq!(store.history_len(), before);

        // History kept the original price; latest took the new one.
        let hist = store.observations_on(day(15));
        assert_eq!(hist[0].price, 4500.0);
        let latest = store.latest_rows();
        assert_eq!(
            latest.iter().find(|r| r.metal == Metal::Gold && r.tenor_months == 0).unwrap().price,
            4999.0
        );
    }

    #[test]
    fn counts_by_date_metal_for_validation() {
        let store = seeded();
        let counts = store.counts_by_date_metal();
        assert_eq!(counts[0], (day(13), Metal::Gold, 1));
        assert_eq!(counts[1], (day(13), Metal::Silver, 1));
        assert_eq!(counts[2], (day(14), Metal::Gold, 2));
    }

    #[test]
    fn store_round_trips_through_json() {
        let dir = std::env::temp_dir().join("metals-curves-store-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("store.json");

        let store = seeded();
        store.save(&path).unwrap();
        let reloaded = MemoryStore::load(&path).unwrap();

        assert_eq!(reloaded.history_len(), store.history_len());
        assert_eq!(reloaded.latest_rows(), store.latest_rows());
        assert_eq!(reloaded.latest_date(), store.latest_date());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_store_file_loads_empty() {
        let path = std::env::temp_dir().join("metals-curves-does-not-exist.json");
        let store = MemoryStore::load(&path).unwrap();
        assert_eq!(store.latest_date(), None);
    }
}
