//! CSV feed ingest and normalization.
//!
//! Turns the daily term-structure CSV (one row per metal/tenor) into typed
//! `Observation`s that are safe to hand to the store and the engine.
//!
//! Design goals:
//! - **Strict schema** for required fields (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened):
//!   a non-numeric price or unknown metal becomes a row error, never a NaN
//!   or a zero smuggled downstream
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no curve logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{Metal, Observation};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: typed rows plus a report of what was skipped.
#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub rows: Vec<Observation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Parse a feed CSV file into observations.
pub fn parse_feed_file(path: &Path) -> Result<ParsedFeed, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open CSV '{}': {e}", path.display())))?;
    parse_feed(file)
}

/// Fetch a feed CSV over HTTP and parse it.
///
/// The sheet export URL typically comes from `METALS_CSV_URL` (see the CLI).
pub fn fetch_feed_url(url: &str) -> Result<ParsedFeed, AppError> {
    let response = reqwest::blocking::get(url)
        .map_err(|e| AppError::usage(format!("CSV fetch failed for '{url}': {e}")))?;
    if !response.status().is_success() {
        return Err(AppError::usage(format!(
            "CSV fetch failed for '{url}': HTTP {}",
            response.status()
        )));
    }
    let text = response
        .text()
        .map_err(|e| AppError::usage(format!("CSV fetch failed for '{url}': {e}")))?;
    parse_feed(text.as_bytes())
}

/// Parse feed CSV from any reader.
///
/// Headers are matched after normalization (lowercase, spaces/underscores
/// and any UTF-8 BOM stripped), so "As Of Date", "as_of_date" and
/// "AsOfDate" all resolve to the same column. The original sheet's price
/// header aliases are honored.
pub fn parse_feed<R: Read>(reader: R) -> Result<ParsedFeed, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::usage(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for required in ["asofdate", "metal", "tenormonths"] {
        if !header_map.contains_key(required) {
            return Err(AppError::usage(format!(
                "CSV headers not recognized: missing `{required}` (expected As Of Date, Metal, Tenor Months, Price)."
            )));
        }
    }
    if PRICE_ALIASES.iter().all(|a| !header_map.contains_key(*a)) {
        return Err(AppError::usage(
            "CSV headers not recognized: missing `price` (or a CME contract price column).",
        ));
    }

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header row, and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(obs) => rows.push(obs),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if rows.is_empty() {
        return Err(AppError::no_data(format!(
            "No valid rows remain after validation ({} read, {} rejected).",
            rows_read,
            row_errors.len()
        )));
    }

    Ok(ParsedFeed {
        rows,
        row_errors,
        rows_read,
    })
}

const PRICE_ALIASES: [&str; 3] = ["price", "cmecontrprice", "cmecontractprice"];
const REAL_YIELD_ALIASES: [&str; 3] = ["10yrrealyld", "10yrrealyield", "realyield"];

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Sheet exports sometimes prefix the first header with a UTF-8 BOM;
    // strip it or schema validation will report a missing column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect::<String>()
        .to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Observation, String> {
    let as_of_date = parse_date(get_required(record, header_map, "asofdate")?)?;

    let metal_raw = get_required(record, header_map, "metal")?;
    let metal = Metal::parse(metal_raw).ok_or_else(|| {
        format!("Unknown metal '{metal_raw}' (expected Gold or Silver).")
    })?;

    let tenor_raw = get_required(record, header_map, "tenormonths")?;
    let tenor_months = tenor_raw
        .parse::<u32>()
        .map_err(|_| format!("Invalid tenor '{tenor_raw}' (expected a whole number of months)."))?;

    let price_raw = get_aliased(record, header_map, &PRICE_ALIASES)
        .ok_or_else(|| "Missing price value.".to_string())?;
    let price = parse_f64(price_raw).ok_or_else(|| format!("Invalid price '{price_raw}'."))?;

    let real_10y_yield = match get_aliased(record, header_map, &REAL_YIELD_ALIASES) {
        Some(s) => Some(parse_f64(s).ok_or_else(|| format!("Invalid real yield '{s}'."))?),
        None => None,
    };
    let dollar_index = match get_optional(record, header_map, "dollarindex") {
        Some(s) => Some(parse_f64(s).ok_or_else(|| format!("Invalid dollar index '{s}'."))?),
        None => None,
    };
    let deficit_flag = match get_optional(record, header_map, "deficitgdpflag") {
        Some(s) => Some(parse_flag(s).ok_or_else(|| format!("Invalid deficit flag '{s}'."))?),
        None => None,
    };

    Ok(Observation {
        as_of_date,
        metal,
        tenor_months,
        price,
        real_10y_yield,
        dollar_index,
        deficit_flag,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn get_aliased<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    aliases: &[&str],
) -> Option<&'a str> {
    aliases.iter().find_map(|name| get_optional(record, header_map, name))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // ISO first; sheet exports occasionally use slashed variants.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

fn parse_f64(s: &str) -> Option<f64> {
    let v = s.trim_matches('"').parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim() {
        "1" => Some(true),
        "0" => Some(false),
        s if s.eq_ignore_ascii_case("true") => Some(true),
        s if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = "\
As Of Date,Metal,Tenor Months,Price,10yr Real Yld,Dollar Index,Deficit GDP Flag
2026-08-21,Gold,0,4500.0,1.9,98.4,1
2026-08-21,Gold,12,4550.0,1.9,98.4,1
2026-08-21,Silver,0,52.0,1.9,98.4,1
";

    #[test]
    fn parses_sheet_headers_with_spaces() {
        let feed = parse_feed(FEED.as_bytes()).unwrap();
        assert_eq!(feed.rows.len(), 3);
        assert!(feed.row_errors.is_empty());

        let gold = &feed.rows[0];
        assert_eq!(gold.metal, Metal::Gold);
        assert_eq!(gold.tenor_months, 0);
        assert_eq!(gold.price, 4500.0);
        assert_eq!(gold.real_10y_yield, Some(1.9));
        assert_eq!(gold.deficit_flag, Some(true));
    }

    #[test]
    fn honors_price_alias_and_bom() {
        let feed = parse_feed(
            "\u{feff}as_of_date,metal,tenor_months,CME Contr Price\n2026-08-21,SILVER,1,52.3\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(feed.rows[0].price, 52.3);
        assert_eq!(feed.rows[0].metal, Metal::Silver);
        assert_eq!(feed.rows[0].real_10y_yield, None);
    }

    #[test]
    fn bad_rows_become_row_errors_not_values() {
        let feed = parse_feed(
            "As Of Date,Metal,Tenor Months,Price\n\
             2026-08-21,Gold,0,4500.0\n\
             2026-08-21,Copper,0,99.0\n\
             2026-08-21,Gold,1,not-a-number\n\
             not-a-date,Gold,2,4510.0\n"
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(feed.rows.len(), 1);
        assert_eq!(feed.row_errors.len(), 3);
        assert_eq!(feed.rows_read, 4);
        assert!(feed.row_errors[0].message.contains("Unknown metal"));
        assert!(feed.row_errors[1].message.contains("Invalid price"));
    }

    #[test]
    fn missing_required_header_is_a_schema_error() {
        let err = parse_feed("Metal,Tenor Months,Price\nGold,0,4500.0\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("asofdate"));
    }

    #[test]
    fn all_rows_invalid_is_a_no_data_error() {
        let err = parse_feed(
            "As Of Date,Metal,Tenor Months,Price\n2026-08-21,Copper,0,1.0\n".as_bytes(),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn blank_optional_fields_stay_null() {
        let feed = parse_feed(
            "As Of Date,Metal,Tenor Months,Price,Dollar Index,Deficit GDP Flag\n\
             2026-08-21,Gold,0,4500.0,,\n"
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(feed.rows[0].dollar_index, None);
        assert_eq!(feed.rows[0].deficit_flag, None);
    }

    #[test]
    fn accepts_slashed_dates() {
        let feed = parse_feed(
            "As Of Date,Metal,Tenor Months,Price\n21/08/2026,Gold,0,4500.0\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(
            feed.rows[0].as_of_date,
            NaiveDate::from_ymd_opt(2026, 8, 21).unwrap()
        );
    }
}
